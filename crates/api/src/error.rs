//! HTTP error type and its JSON rendering.
//!
//! Every failure leaves the server as `{ "error": message, "code": CODE }`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storefront_core::error::CoreError;

/// Postgres SQLSTATE for unique violations.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for CHECK constraint violations.
const PG_CHECK_VIOLATION: &str = "23514";

const SANITIZED_MESSAGE: &str = "An internal error occurred";

/// Error returned by handlers and extractors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request that is not a document validation failure.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Bodies that fail to deserialize (bad option value, wrong type, broken
/// JSON) are validation failures; missing content type and the like are
/// plain bad requests.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                AppError::Core(CoreError::Validation(rejection.body_text()))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl AppError {
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.classify();
        (status, axum::Json(ErrorBody { error, code })).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        SANITIZED_MESSAGE.to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::BlockNotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Block {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Map a sqlx error to a response.
///
/// - `RowNotFound` is a 404.
/// - Unique violations on `uq_*` constraints are 409. Losing a race on
///   `uq_themes_one_active_per_store` asks the caller to retry.
/// - CHECK violations on `ck_*` constraints are 400.
/// - Anything else is logged and sanitized to a 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or_default();
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) if constraint == "uq_themes_one_active_per_store" => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "Another theme was activated at the same time; retry".to_string(),
                ),
                Some(PG_UNIQUE_VIOLATION) if constraint.starts_with("uq_") => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
                Some(PG_CHECK_VIOLATION) if constraint.starts_with("ck_") => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates constraint: {constraint}"),
                ),
                _ => {
                    tracing::error!(error = %db_err, constraint, "Database error");
                    internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
