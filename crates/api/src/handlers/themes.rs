//! Handlers for store themes, presets, and editor metadata.
//!
//! Store-scoped endpoints take [`RequireStoreAccess`], so every handler here
//! runs for the store's owner (or an admin) only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use storefront_core::blocks::block_catalog;
use storefront_core::error::CoreError;
use storefront_core::theme::{font_catalog, validate_theme_name, ReplaceTheme, ThemeDocument};
use storefront_core::types::DbId;
use storefront_db::models::theme::{CreateTheme, ReplaceOutcome};
use storefront_db::repositories::ThemeRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::{RequireAuth, RequireStoreAccess};
use crate::response::DataResponse;
use crate::state::AppState;

fn theme_not_found(theme_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Theme",
        id: theme_id,
    })
}

// ---------------------------------------------------------------------------
// Platform-wide metadata
// ---------------------------------------------------------------------------

/// GET /api/v1/themes/presets
///
/// Read-only preset templates a store can copy.
pub async fn list_presets(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let presets = ThemeRepo::list_presets(&state.pool).await?;
    Ok(Json(DataResponse { data: presets }))
}

/// GET /api/v1/themes/meta/fonts
pub async fn get_font_catalog(RequireAuth(_user): RequireAuth) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: font_catalog(),
    }))
}

/// GET /api/v1/themes/meta/blocks
///
/// Block registry: every kind with its label, field schema, and defaults.
pub async fn get_block_catalog(RequireAuth(_user): RequireAuth) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: block_catalog(),
    }))
}

// ---------------------------------------------------------------------------
// Store themes
// ---------------------------------------------------------------------------

/// GET /api/v1/stores/{store_id}/themes
pub async fn list_store_themes(
    access: RequireStoreAccess,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let themes = ThemeRepo::list_for_store(&state.pool, access.store.id).await?;
    Ok(Json(DataResponse { data: themes }))
}

/// POST /api/v1/stores/{store_id}/themes
///
/// Create an inactive theme, either a copy of `preset_id` or the default
/// document.
pub async fn create_store_theme(
    access: RequireStoreAccess,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTheme>,
) -> AppResult<impl IntoResponse> {
    let store_id = access.store.id;
    if let Some(name) = &input.name {
        validate_theme_name(name)?;
    }

    let theme = match input.preset_id {
        Some(preset_id) => {
            ThemeRepo::duplicate_preset(&state.pool, store_id, preset_id, input.name.as_deref())
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "ThemePreset",
                    id: preset_id,
                }))?
        }
        None => {
            let mut document = ThemeDocument::default();
            if let Some(name) = input.name {
                document.name = name;
            }
            ThemeRepo::create_for_store(&state.pool, store_id, &document).await?
        }
    };

    tracing::info!(
        store_id,
        theme_id = theme.id,
        preset_id = input.preset_id,
        user_id = access.user.user_id,
        "Theme created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: theme })))
}

/// GET /api/v1/stores/{store_id}/themes/active
pub async fn get_active_theme(
    access: RequireStoreAccess,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let store_id = access.store.id;
    let theme = ThemeRepo::find_active_for_store(&state.pool, store_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ActiveTheme",
                id: store_id,
            })
        })?;
    Ok(Json(DataResponse { data: theme }))
}

/// GET /api/v1/stores/{store_id}/themes/{theme_id}
pub async fn get_theme(
    access: RequireStoreAccess,
    State(state): State<AppState>,
    Path((_store_id, theme_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let theme = ThemeRepo::find_for_store(&state.pool, access.store.id, theme_id)
        .await?
        .ok_or_else(|| theme_not_found(theme_id))?;
    Ok(Json(DataResponse { data: theme }))
}

/// PATCH /api/v1/stores/{store_id}/themes/{theme_id}
///
/// Full replace of the theme document. The body is validated as a whole
/// before anything is written; a stale `expected_version` yields 409.
pub async fn replace_theme(
    access: RequireStoreAccess,
    State(state): State<AppState>,
    Path((_store_id, theme_id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<ReplaceTheme>,
) -> AppResult<impl IntoResponse> {
    let store_id = access.store.id;
    input.document.validate()?;

    let theme = match ThemeRepo::replace(&state.pool, store_id, theme_id, &input).await? {
        ReplaceOutcome::Updated(theme) => theme,
        ReplaceOutcome::NotFound => return Err(theme_not_found(theme_id)),
        ReplaceOutcome::VersionMismatch { current } => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Theme was saved elsewhere (current version {current}); reload and retry"
            ))));
        }
    };

    tracing::info!(
        store_id,
        theme_id,
        version = theme.version,
        blocks = theme.document.blocks.len(),
        user_id = access.user.user_id,
        "Theme saved",
    );

    Ok(Json(DataResponse { data: theme }))
}

/// POST /api/v1/stores/{store_id}/themes/{theme_id}/activate
///
/// Make the theme the store's only active theme.
pub async fn activate_theme(
    access: RequireStoreAccess,
    State(state): State<AppState>,
    Path((_store_id, theme_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let store_id = access.store.id;
    let theme = ThemeRepo::activate(&state.pool, store_id, theme_id)
        .await?
        .ok_or_else(|| theme_not_found(theme_id))?;

    tracing::info!(
        store_id,
        theme_id,
        user_id = access.user.user_id,
        "Theme activated",
    );

    Ok(Json(DataResponse { data: theme }))
}
