//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`rbac::RequireStoreAccess`] -- Requires ownership of the `{store_id}` in the path.

pub mod auth;
pub mod rbac;
