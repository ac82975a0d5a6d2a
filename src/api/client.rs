// Cloudflare API HTTP client.
// Sends authenticated requests and surfaces the provider's response envelope.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::api::auth::Credentials;
use crate::api::types::ApiEnvelope;
use crate::error::Result;

/// Production endpoint for the v4 API.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ERROR_BODY_SNIPPET: usize = 500;

/// Authenticated client for the Cloudflare v4 API.
pub struct CloudflareClient {
    client: Client,
    base_url: String,
}

impl CloudflareClient {
    /// Create a client with the given credentials and base URL.
    pub fn new(credentials: &Credentials, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = credentials.headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from environment credentials, honoring the
    /// CLOUDFLARE_BASE_URL override.
    pub fn from_env() -> Result<Self> {
        let credentials = Credentials::from_env()?;
        let base_url =
            std::env::var("CLOUDFLARE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self::new(&credentials, base_url)
    }

    /// Absolute URL for a request path. Full URLs pass through; relative
    /// paths get a leading slash and the base URL.
    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send a request and return the provider's response envelope.
    /// Error envelopes come back as `Ok` so they surface to the user as-is;
    /// only transport failures return `Err`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiEnvelope> {
        let url = self.url_for(path);
        debug!(%method, %url, "sending request");

        let mut builder = self.client.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if text.is_empty() {
            return Ok(if status.is_success() {
                ApiEnvelope::empty_success()
            } else {
                ApiEnvelope::failure(Some(status.as_u16() as i64), status.to_string())
            });
        }

        match serde_json::from_str::<ApiEnvelope>(&text) {
            Ok(envelope) => Ok(envelope),
            Err(err) => {
                debug!(%status, error = %err, "response body is not an envelope");
                Ok(ApiEnvelope::failure(
                    Some(status.as_u16() as i64),
                    format!("{status}: {}", snippet(&text)),
                ))
            }
        }
    }

    /// Check that the configured credentials are accepted by the API.
    pub async fn verify(&self) -> Result<ApiEnvelope> {
        self.request(Method::GET, "/user/tokens/verify", None).await
    }
}

fn snippet(text: &str) -> String {
    if text.chars().count() <= ERROR_BODY_SNIPPET {
        text.to_string()
    } else {
        text.chars().take(ERROR_BODY_SNIPPET).collect()
    }
}
