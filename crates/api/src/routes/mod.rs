pub mod health;
pub mod stores;
pub mod themes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /stores                                          list, provision
/// /stores/{store_id}                               get
/// /stores/{store_id}/themes                        list, create
/// /stores/{store_id}/themes/active                 active theme
/// /stores/{store_id}/themes/{theme_id}             get, full replace (PATCH)
/// /stores/{store_id}/themes/{theme_id}/activate    activate (POST)
///
/// /themes/presets                                  preset templates
/// /themes/meta/fonts                               font catalog
/// /themes/meta/blocks                              block registry
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/stores", stores::router())
        .nest("/themes", themes::router())
}
