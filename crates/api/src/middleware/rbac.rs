//! Authorization extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests the caller may not
//! make. Use these in handler signatures to enforce authorization at the
//! type level.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use storefront_core::error::CoreError;
use storefront_core::types::DbId;
use storefront_db::models::store::Store;
use storefront_db::repositories::StoreRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires any authenticated user (any valid role).
///
/// ```ignore
/// async fn any_authed(RequireAuth(user): RequireAuth) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// The caller plus the store named by the `{store_id}` path segment.
///
/// Rejects with 404 if the store does not exist and 403 if the caller is
/// neither its owner nor an admin.
///
/// ```ignore
/// async fn store_only(access: RequireStoreAccess) -> AppResult<Json<Store>> {
///     Ok(Json(access.store))
/// }
/// ```
pub struct RequireStoreAccess {
    pub user: AuthUser,
    pub store: Store,
}

impl FromRequestParts<AppState> for RequireStoreAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let store_id: DbId = params
            .get("store_id")
            .ok_or_else(|| AppError::InternalError("route has no {store_id} segment".into()))?
            .parse()
            .map_err(|_| AppError::BadRequest("store_id must be an integer".into()))?;

        let store = StoreRepo::find_by_id(&state.pool, store_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Store",
                id: store_id,
            }))?;

        if !user.can_access_store(store.owner_user_id) {
            tracing::warn!(
                user_id = user.user_id,
                store_id,
                "Store access denied",
            );
            return Err(AppError::Core(CoreError::Forbidden(
                "You do not have access to this store".into(),
            )));
        }

        Ok(RequireStoreAccess { user, store })
    }
}
