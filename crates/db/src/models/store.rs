use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storefront_core::types::{DbId, Timestamp};

/// A row from the `stores` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Store {
    pub id: DbId,
    pub owner_user_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for provisioning a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStore {
    pub name: String,
}
