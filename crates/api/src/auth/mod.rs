//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token generation and validation.
//!
//! Tokens are issued by the platform's identity service; this server only
//! validates them.

pub mod jwt;
