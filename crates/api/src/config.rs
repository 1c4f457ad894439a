//! Server configuration from environment variables.

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Runtime settings for the theme API server.
///
/// | Env Var                 | Default                  |
/// |-------------------------|--------------------------|
/// | `HOST`                  | `0.0.0.0`                |
/// | `PORT`                  | `3000`                   |
/// | `CORS_ORIGINS`          | `http://localhost:5173`  |
/// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
/// | `DB_MAX_CONNECTIONS`    | `20`                     |
///
/// JWT settings are described on [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Merchant dashboard origins allowed to call the API.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// # Panics
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", storefront_db::DEFAULT_MAX_CONNECTIONS),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Read and parse `name`, falling back to `default` when unset.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
