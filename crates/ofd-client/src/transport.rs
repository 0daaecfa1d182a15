//! # HTTP Transport
//!
//! Thin JSON-over-HTTP layer on top of `reqwest`.
//!
//! ## Request Flow
//! ```text
//!   get_json("/api/ticket/doc1", token)
//!        │
//!        ▼
//!   GET {base_url}/api/ticket/doc1      X-XSRF-TOKEN: <token>
//!        │
//!        ├── send fails ───────────► Transport / Timeout
//!        ├── status not 2xx ───────► HttpStatus { status, url }
//!        ├── body not valid JSON ──► Decode { url, reason }
//!        ▼
//!   Ok(T)
//! ```

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::OfdConfig;
use crate::error::{OfdError, OfdResult};

/// Header carrying the session token on every authenticated request.
pub const TOKEN_HEADER: &str = "X-XSRF-TOKEN";

/// Owns the HTTP client and the service base URL.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    base_url: String,
}

impl Transport {
    /// Builds a client with the configured timeout.
    pub fn new(config: &OfdConfig) -> OfdResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OfdError::InvalidConfig(format!("Failed to create HTTP client: {e}")))?;
        Ok(Transport {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    /// Full URL for an API path (leading slash included).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticated GET returning a decoded JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: &str,
    ) -> OfdResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let request = self
            .http
            .get(&url)
            .query(query)
            .header(TOKEN_HEADER, token);
        Self::execute(request, &url).await
    }

    /// Unauthenticated POST of a JSON body.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> OfdResult<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        Self::execute(self.http.post(&url).json(body), &url).await
    }

    async fn execute<T: DeserializeOwned>(request: RequestBuilder, url: &str) -> OfdResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OfdError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| OfdError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
