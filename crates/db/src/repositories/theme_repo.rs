//! Repository for the `themes` table.
//!
//! Store themes and platform presets share the table; presets have a `NULL`
//! `store_id` and are never returned by the store-scoped lookups.

use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use storefront_core::theme::{ReplaceTheme, Theme, ThemeDocument};
use storefront_core::types::DbId;

use crate::models::theme::{ReplaceOutcome, ThemeRow};

/// Column list for `themes` queries.
pub(crate) const COLUMNS: &str = "\
    id, store_id, name, is_active, is_preset, colors, typography, styles, blocks, \
    logo_url, favicon_url, custom_css, version, created_at, updated_at";

/// Provides data access for store themes and presets.
pub struct ThemeRepo;

impl ThemeRepo {
    // -----------------------------------------------------------------------
    // Presets
    // -----------------------------------------------------------------------

    /// List platform presets, oldest first.
    pub async fn list_presets(pool: &PgPool) -> Result<Vec<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes WHERE is_preset ORDER BY id");
        let rows = sqlx::query_as::<_, ThemeRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Theme::from).collect())
    }

    pub async fn count_presets(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM themes WHERE is_preset")
            .fetch_one(pool)
            .await
    }

    pub async fn find_preset(pool: &PgPool, id: DbId) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes WHERE id = $1 AND is_preset");
        let row = sqlx::query_as::<_, ThemeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Theme::from))
    }

    // -----------------------------------------------------------------------
    // Store themes
    // -----------------------------------------------------------------------

    /// List a store's themes, active theme first.
    pub async fn list_for_store(pool: &PgPool, store_id: DbId) -> Result<Vec<Theme>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM themes WHERE store_id = $1 \
             ORDER BY is_active DESC, updated_at DESC, id"
        );
        let rows = sqlx::query_as::<_, ThemeRow>(&query)
            .bind(store_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Theme::from).collect())
    }

    /// Find a theme by id, scoped to its store.
    ///
    /// Returns `None` if the theme does not exist or belongs to another store.
    pub async fn find_for_store(
        pool: &PgPool,
        store_id: DbId,
        theme_id: DbId,
    ) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes WHERE id = $1 AND store_id = $2");
        let row = sqlx::query_as::<_, ThemeRow>(&query)
            .bind(theme_id)
            .bind(store_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Theme::from))
    }

    pub async fn find_active_for_store(
        pool: &PgPool,
        store_id: DbId,
    ) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes WHERE store_id = $1 AND is_active");
        let row = sqlx::query_as::<_, ThemeRow>(&query)
            .bind(store_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Theme::from))
    }

    /// Insert a new, inactive theme for a store.
    pub async fn create_for_store(
        pool: &PgPool,
        store_id: DbId,
        document: &ThemeDocument,
    ) -> Result<Theme, sqlx::Error> {
        Self::insert(pool, store_id, document, false).await
    }

    /// Copy a preset into a store as a new inactive theme.
    ///
    /// Returns `None` if `preset_id` is not a preset.
    pub async fn duplicate_preset(
        pool: &PgPool,
        store_id: DbId,
        preset_id: DbId,
        name: Option<&str>,
    ) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!(
            "INSERT INTO themes \
                 (store_id, name, colors, typography, styles, blocks, \
                  logo_url, favicon_url, custom_css) \
             SELECT $1, COALESCE($3, name), colors, typography, styles, blocks, \
                    logo_url, favicon_url, custom_css \
             FROM themes WHERE id = $2 AND is_preset \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ThemeRow>(&query)
            .bind(store_id)
            .bind(preset_id)
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Theme::from))
    }

    /// Full replace of a store theme's document.
    ///
    /// Bumps `version`. When `expected_version` is set the update only
    /// applies if the stored version still matches.
    pub async fn replace(
        pool: &PgPool,
        store_id: DbId,
        theme_id: DbId,
        input: &ReplaceTheme,
    ) -> Result<ReplaceOutcome, sqlx::Error> {
        let doc = &input.document;
        let query = format!(
            "UPDATE themes SET \
                 name = $3, colors = $4, typography = $5, styles = $6, blocks = $7, \
                 logo_url = $8, favicon_url = $9, custom_css = $10, \
                 version = version + 1 \
             WHERE id = $1 AND store_id = $2 \
               AND ($11::INTEGER IS NULL OR version = $11) \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, ThemeRow>(&query)
            .bind(theme_id)
            .bind(store_id)
            .bind(&doc.name)
            .bind(Json(&doc.colors))
            .bind(Json(&doc.typography))
            .bind(Json(&doc.styles))
            .bind(Json(&doc.blocks))
            .bind(&doc.logo_url)
            .bind(&doc.favicon_url)
            .bind(&doc.custom_css)
            .bind(input.expected_version)
            .fetch_optional(pool)
            .await?;

        if let Some(row) = updated {
            return Ok(ReplaceOutcome::Updated(row.into()));
        }

        let current = sqlx::query_scalar::<_, i32>(
            "SELECT version FROM themes WHERE id = $1 AND store_id = $2",
        )
        .bind(theme_id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?;

        Ok(match current {
            Some(current) => ReplaceOutcome::VersionMismatch { current },
            None => ReplaceOutcome::NotFound,
        })
    }

    /// Make `theme_id` the only active theme of `store_id`.
    ///
    /// Runs in one transaction holding a row lock on the store, so
    /// concurrent activations for the same store apply one after another and
    /// exactly one theme is active when they finish. Returns `None` if the
    /// store does not exist or the theme does not belong to it.
    pub async fn activate(
        pool: &PgPool,
        store_id: DbId,
        theme_id: DbId,
    ) -> Result<Option<Theme>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query_scalar::<_, DbId>("SELECT id FROM stores WHERE id = $1 FOR UPDATE")
            .bind(store_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let owned = sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM themes WHERE id = $1 AND store_id = $2",
        )
        .bind(theme_id)
        .bind(store_id)
        .fetch_optional(&mut *tx)
        .await?;
        if owned.is_none() {
            return Ok(None);
        }

        let cleared = sqlx::query(
            "UPDATE themes SET is_active = false \
             WHERE store_id = $1 AND is_active AND id <> $2",
        )
        .bind(store_id)
        .bind(theme_id)
        .execute(&mut *tx)
        .await?;

        let query = format!("UPDATE themes SET is_active = true WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, ThemeRow>(&query)
            .bind(theme_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            store_id,
            theme_id,
            deactivated = cleared.rows_affected(),
            "Theme activated"
        );
        Ok(Some(row.into()))
    }

    /// Insert a store theme through any executor (pool or open transaction).
    pub(crate) async fn insert<'e, E>(
        executor: E,
        store_id: DbId,
        document: &ThemeDocument,
        is_active: bool,
    ) -> Result<Theme, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO themes \
                 (store_id, name, is_active, colors, typography, styles, blocks, \
                  logo_url, favicon_url, custom_css) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ThemeRow>(&query)
            .bind(store_id)
            .bind(&document.name)
            .bind(is_active)
            .bind(Json(&document.colors))
            .bind(Json(&document.typography))
            .bind(Json(&document.styles))
            .bind(Json(&document.blocks))
            .bind(&document.logo_url)
            .bind(&document.favicon_url)
            .bind(&document.custom_css)
            .fetch_one(executor)
            .await?;
        Ok(row.into())
    }
}
