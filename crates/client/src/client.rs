//! REST client for store themes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use storefront_core::blocks::BlockKind;
use storefront_core::editor::ThemeBackend;
use storefront_core::theme::{FontCatalog, ReplaceTheme, Theme};
use storefront_core::types::DbId;

/// Errors from the theme API client.
#[derive(Debug, thiserror::Error)]
pub enum ThemeApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        /// Machine-readable error code (e.g. `VALIDATION_ERROR`), if the
        /// body carried one.
        code: Option<String>,
        /// The server's `error` message, or the raw body.
        message: String,
    },
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

/// One entry of `GET /themes/meta/blocks`, as the client needs it.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockCatalogItem {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub label: String,
    pub fields: Vec<serde_json::Value>,
    pub defaults: serde_json::Value,
}

/// HTTP client bound to one API base URL and bearer token.
pub struct ThemeApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ThemeApiClient {
    /// * `base_url` - API root including the version prefix, e.g.
    ///   `https://shop.example.com/api/v1`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET /stores/{store_id}/themes/{theme_id}
    pub async fn get_theme(&self, store_id: DbId, theme_id: DbId) -> Result<Theme, ThemeApiError> {
        let response = self
            .client
            .get(self.url(&format!("/stores/{store_id}/themes/{theme_id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// GET /stores/{store_id}/themes
    pub async fn list_themes(&self, store_id: DbId) -> Result<Vec<Theme>, ThemeApiError> {
        let response = self
            .client
            .get(self.url(&format!("/stores/{store_id}/themes")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// PATCH /stores/{store_id}/themes/{theme_id}
    pub async fn replace_theme(
        &self,
        store_id: DbId,
        theme_id: DbId,
        body: &ReplaceTheme,
    ) -> Result<Theme, ThemeApiError> {
        let response = self
            .client
            .patch(self.url(&format!("/stores/{store_id}/themes/{theme_id}")))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// POST /stores/{store_id}/themes/{theme_id}/activate
    pub async fn activate_theme(
        &self,
        store_id: DbId,
        theme_id: DbId,
    ) -> Result<Theme, ThemeApiError> {
        let response = self
            .client
            .post(self.url(&format!(
                "/stores/{store_id}/themes/{theme_id}/activate"
            )))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// GET /themes/meta/fonts
    pub async fn font_catalog(&self) -> Result<FontCatalog, ThemeApiError> {
        let response = self
            .client
            .get(self.url("/themes/meta/fonts"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// GET /themes/meta/blocks
    pub async fn block_catalog(&self) -> Result<Vec<BlockCatalogItem>, ThemeApiError> {
        let response = self
            .client
            .get(self.url("/themes/meta/blocks"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or a
    /// [`ThemeApiError::Api`] carrying the server's error message.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ThemeApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => (parsed.code, parsed.error),
            Err(_) => (None, body),
        };
        tracing::debug!(status = status.as_u16(), ?code, %message, "Theme API error");
        Err(ThemeApiError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    /// Unwrap the `{ "data": ... }` envelope of a successful response.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ThemeApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Envelope<T>>().await?.data)
    }
}

#[async_trait]
impl ThemeBackend for ThemeApiClient {
    type Error = ThemeApiError;

    async fn replace_theme(
        &self,
        store_id: DbId,
        theme_id: DbId,
        body: &ReplaceTheme,
    ) -> Result<Theme, ThemeApiError> {
        ThemeApiClient::replace_theme(self, store_id, theme_id, body).await
    }

    async fn activate_theme(&self, store_id: DbId, theme_id: DbId) -> Result<Theme, ThemeApiError> {
        ThemeApiClient::activate_theme(self, store_id, theme_id).await
    }
}
