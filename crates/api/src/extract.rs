//! Request extractors shared by handlers.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections render as [`AppError`] JSON bodies.
///
/// A body that does not deserialize (unknown option value, wrong type,
/// malformed JSON) becomes a 400 `VALIDATION_ERROR` instead of axum's
/// plain-text 422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
