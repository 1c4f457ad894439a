//! HTTP client for the storefront theme API.
//!
//! [`ThemeApiClient`] implements [`storefront_core::editor::ThemeBackend`],
//! so a [`storefront_core::editor::ThemeEditor`] can save straight through
//! the REST API.

pub mod client;

pub use client::{BlockCatalogItem, ThemeApiClient, ThemeApiError};
