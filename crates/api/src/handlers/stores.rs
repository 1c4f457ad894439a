//! Handlers for stores.
//!
//! Provisioning a store also creates its first active theme.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use storefront_core::theme::{validate_theme_name, Theme};
use storefront_db::models::store::{CreateStore, Store};
use storefront_db::repositories::StoreRepo;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::rbac::{RequireAuth, RequireStoreAccess};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response of `POST /stores`.
#[derive(Debug, Serialize)]
pub struct ProvisionedStore {
    pub store: Store,
    pub active_theme: Theme,
}

/// POST /api/v1/stores
///
/// Create a store owned by the caller, with a copy of the default preset as
/// its active theme.
pub async fn create_store(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateStore>,
) -> AppResult<impl IntoResponse> {
    // Store names share the theme name rules (non-blank, bounded length).
    validate_theme_name(&input.name)?;

    let (store, active_theme) = StoreRepo::provision(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        store_id = store.id,
        theme_id = active_theme.id,
        user_id = user.user_id,
        "Store provisioned",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProvisionedStore {
                store,
                active_theme,
            },
        }),
    ))
}

/// GET /api/v1/stores
///
/// The caller's stores; admins see every store.
pub async fn list_stores(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stores = if user.is_admin() {
        StoreRepo::list_all(&state.pool).await?
    } else {
        StoreRepo::list_for_owner(&state.pool, user.user_id).await?
    };

    Ok(Json(DataResponse { data: stores }))
}

/// GET /api/v1/stores/{store_id}
pub async fn get_store(access: RequireStoreAccess) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse { data: access.store }))
}
