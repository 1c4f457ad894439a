//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod store_repo;
pub mod theme_repo;

pub use store_repo::StoreRepo;
pub use theme_repo::ThemeRepo;
