//! Access-token handling.
//!
//! Merchant dashboards authenticate with HS256 JWTs minted by the platform's
//! identity service. The server shares the signing secret and checks the
//! signature, expiry, and issuer of every token.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use storefront_core::roles::Role;
use storefront_core::types::DbId;
use uuid::Uuid;

/// Default `iss` claim expected on every token.
pub const DEFAULT_ISSUER: &str = "storefront-identity";

/// Default access token lifetime in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's id.
    pub sub: DbId,
    pub role: Role,
    pub iss: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Token id (UUID v4), for audit logs.
    pub jti: String,
}

/// Signing secret and token policy.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required), `JWT_ISSUER`, and
    /// `JWT_ACCESS_EXPIRY_MINS`.
    ///
    /// # Panics
    ///
    /// Panics if the secret is missing or empty, or the expiry is not an
    /// integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.into());

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .map(|v| {
                v.parse()
                    .expect("JWT_ACCESS_EXPIRY_MINS must be an integer number of minutes")
            })
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);

        Self {
            secret,
            issuer,
            access_token_expiry_mins,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

/// Mint a token for `user_id`. Used by tests and local tooling; production
/// tokens come from the identity service.
pub fn generate_access_token(
    user_id: DbId,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role,
        iss: config.issuer.clone(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, expiry, and issuer; return the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            access_token_expiry_mins: 15,
        }
    }

    fn sign(claims: &Claims, config: &JwtConfig) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn merchant_token_round_trips() {
        let config = test_config();
        let token = generate_access_token(42, Role::Merchant, &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Merchant);
        assert_eq!(claims.iss, DEFAULT_ISSUER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        // Well past the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: Role::Merchant,
            iss: config.issuer.clone(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        assert!(validate_token(&sign(&claims, &config), &config).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let config = test_config();
        let other = JwtConfig {
            issuer: "someone-else".to_string(),
            ..test_config()
        };
        let token = generate_access_token(1, Role::Admin, &other).unwrap();
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = JwtConfig {
            secret: "secret-bravo".to_string(),
            ..test_config()
        };
        let token = generate_access_token(1, Role::Merchant, &other).unwrap();
        assert!(validate_token(&token, &test_config()).is_err());
    }
}
