//! Repository for the `stores` table.

use sqlx::PgPool;
use storefront_core::theme::Theme;
use storefront_core::types::DbId;

use crate::models::store::{CreateStore, Store};
use crate::models::theme::ThemeRow;
use crate::repositories::theme_repo::{ThemeRepo, COLUMNS as THEME_COLUMNS};

/// Column list for `stores` queries.
const COLUMNS: &str = "id, owner_user_id, name, created_at, updated_at";

/// Provides data access for stores.
pub struct StoreRepo;

impl StoreRepo {
    /// Create a store together with its first, active theme.
    ///
    /// The theme is a copy of the oldest preset, or the default document if
    /// no preset exists. Both rows are written in one transaction so a store
    /// never exists without an active theme.
    pub async fn provision(
        pool: &PgPool,
        owner_user_id: DbId,
        input: &CreateStore,
    ) -> Result<(Store, Theme), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO stores (owner_user_id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let store = sqlx::query_as::<_, Store>(&query)
            .bind(owner_user_id)
            .bind(&input.name)
            .fetch_one(&mut *tx)
            .await?;

        let query =
            format!("SELECT {THEME_COLUMNS} FROM themes WHERE is_preset ORDER BY id LIMIT 1");
        let document = sqlx::query_as::<_, ThemeRow>(&query)
            .fetch_optional(&mut *tx)
            .await?
            .map(|row| Theme::from(row).document)
            .unwrap_or_default();

        let theme = ThemeRepo::insert(&mut *tx, store.id, &document, true).await?;

        tx.commit().await?;
        Ok((store, theme))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE id = $1");
        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the stores owned by a user, oldest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_user_id: DbId,
    ) -> Result<Vec<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE owner_user_id = $1 ORDER BY id");
        sqlx::query_as::<_, Store>(&query)
            .bind(owner_user_id)
            .fetch_all(pool)
            .await
    }

    /// List every store (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores ORDER BY id");
        sqlx::query_as::<_, Store>(&query).fetch_all(pool).await
    }
}

