//! Domain types and pure logic for storefront themes.
//!
//! Nothing in this crate touches the database or the network: the block
//! registry, theme document validation, and the editor state machine are
//! shared by the API server and the HTTP client.

pub mod blocks;
pub mod editor;
pub mod error;
pub mod roles;
pub mod theme;
pub mod types;
