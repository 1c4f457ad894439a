//! Theme rows.
//!
//! The JSONB columns decode straight into the typed document parts, so a
//! row that does not match the current model fails as a column decode error
//! instead of reaching handlers half-parsed.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use storefront_core::blocks::Block;
use storefront_core::theme::{Theme, ThemeColors, ThemeDocument, ThemeStyles, ThemeTypography};
use storefront_core::types::{DbId, Timestamp};

/// A row from the `themes` table.
#[derive(Debug, Clone, FromRow)]
pub struct ThemeRow {
    pub id: DbId,
    pub store_id: Option<DbId>,
    pub name: String,
    pub is_active: bool,
    pub is_preset: bool,
    pub colors: Json<ThemeColors>,
    pub typography: Json<ThemeTypography>,
    pub styles: Json<ThemeStyles>,
    pub blocks: Json<Vec<Block>>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub custom_css: Option<String>,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ThemeRow> for Theme {
    fn from(row: ThemeRow) -> Self {
        Theme {
            id: row.id,
            store_id: row.store_id,
            is_active: row.is_active,
            is_preset: row.is_preset,
            version: row.version,
            document: ThemeDocument {
                name: row.name,
                colors: row.colors.0,
                typography: row.typography.0,
                styles: row.styles.0,
                blocks: row.blocks.0,
                logo_url: row.logo_url,
                favicon_url: row.favicon_url,
                custom_css: row.custom_css,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for `POST /stores/{store_id}/themes`.
///
/// With `preset_id` the new theme copies that preset; otherwise it starts
/// from the default document. `name` overrides either.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTheme {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preset_id: Option<DbId>,
}

/// Result of a full-replace save.
#[derive(Debug, Clone)]
pub enum ReplaceOutcome {
    Updated(Theme),
    /// No theme with that id in that store.
    NotFound,
    /// `expected_version` did not match; carries the stored version.
    VersionMismatch { current: i32 },
}
