//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the table and the
//! `Deserialize` DTOs accepted for inserts.

pub mod store;
pub mod theme;
