//! Platform-wide theme routes mounted at `/themes`.

use axum::routing::get;
use axum::Router;

use crate::handlers::themes;
use crate::state::AppState;

/// ```text
/// GET /presets       -> list_presets
/// GET /meta/fonts    -> get_font_catalog
/// GET /meta/blocks   -> get_block_catalog
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/presets", get(themes::list_presets))
        .route("/meta/fonts", get(themes::get_font_catalog))
        .route("/meta/blocks", get(themes::get_block_catalog))
}
