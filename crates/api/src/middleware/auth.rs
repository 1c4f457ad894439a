//! Bearer-token authentication.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use storefront_core::error::CoreError;
use storefront_core::roles::Role;
use storefront_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller, as identified by a valid access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.sees_all_stores()
    }

    /// Whether the caller may read and edit a store owned by `owner_user_id`.
    pub fn can_access_store(&self, owner_user_id: DbId) -> bool {
        self.user_id == owner_user_id || self.is_admin()
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// The token part of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Authorization header is not valid ASCII"))?;

    header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use axum::http::Request;

    use super::*;
    use crate::auth::jwt::{generate_access_token, JwtConfig, DEFAULT_ISSUER};
    use crate::config::ServerConfig;

    fn test_state() -> AppState {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
            db_max_connections: 1,
            jwt: JwtConfig {
                secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
                issuer: DEFAULT_ISSUER.to_string(),
                access_token_expiry_mins: 15,
            },
        };
        AppState {
            // Never connected: the extractor does not touch the database.
            pool: sqlx::PgPool::connect_lazy("postgres://localhost/storefront_unused").unwrap(),
            config: Arc::new(config),
        }
    }

    async fn extract(state: &AppState, authorization: Option<String>) -> Result<AuthUser, AppError> {
        let mut builder = Request::builder().uri("/api/v1/themes/meta/fonts");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn minted_merchant_token_is_accepted() {
        let state = test_state();
        let token = generate_access_token(42, Role::Merchant, &state.config.jwt).unwrap();

        let user = extract(&state, Some(format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.role, Role::Merchant);
        assert!(user.can_access_store(42));
        assert!(!user.can_access_store(7));
    }

    #[tokio::test]
    async fn admin_token_reaches_foreign_stores() {
        let state = test_state();
        let token = generate_access_token(1, Role::Admin, &state.config.jwt).unwrap();

        let user = extract(&state, Some(format!("Bearer {token}"))).await.unwrap();
        assert!(user.is_admin());
        assert!(user.can_access_store(99));
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_unauthorized() {
        let state = test_state();
        assert_matches!(
            extract(&state, None).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
        assert_matches!(
            extract(&state, Some("Token abc".to_string())).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
        assert_matches!(
            extract(&state, Some("Bearer not-a-jwt".to_string())).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }
}
