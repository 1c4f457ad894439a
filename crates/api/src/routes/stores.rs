//! Route definitions for stores and their themes, mounted at `/stores`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{stores, themes};
use crate::state::AppState;

/// ```text
/// GET    /                                       -> list_stores
/// POST   /                                       -> create_store
/// GET    /{store_id}                             -> get_store
/// GET    /{store_id}/themes                      -> list_store_themes
/// POST   /{store_id}/themes                      -> create_store_theme
/// GET    /{store_id}/themes/active               -> get_active_theme
/// GET    /{store_id}/themes/{theme_id}           -> get_theme
/// PATCH  /{store_id}/themes/{theme_id}           -> replace_theme
/// POST   /{store_id}/themes/{theme_id}/activate  -> activate_theme
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::list_stores).post(stores::create_store))
        .route("/{store_id}", get(stores::get_store))
        .route(
            "/{store_id}/themes",
            get(themes::list_store_themes).post(themes::create_store_theme),
        )
        .route("/{store_id}/themes/active", get(themes::get_active_theme))
        .route(
            "/{store_id}/themes/{theme_id}",
            get(themes::get_theme).patch(themes::replace_theme),
        )
        .route(
            "/{store_id}/themes/{theme_id}/activate",
            post(themes::activate_theme),
        )
}
