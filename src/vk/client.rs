//! HTTP client for the VK API

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::types::ApiEnvelope;
use crate::config::AppConfig;
use crate::errors::VkMatchError;
use crate::Result;

/// Query parameters of one API call
pub type Params<'a> = [(&'a str, String)];

/// VK API client bound to a single access token
///
/// Every call carries the token and the protocol version. The client does
/// not throttle by itself: paginated callers invoke [`VkClient::pace`]
/// between pages to stay under `max_requests_per_second`.
#[derive(Debug, Clone)]
pub struct VkClient {
    client: Client,
    base_url: Url,
    access_token: String,
    api_version: String,
    min_interval: Duration,
}

impl VkClient {
    /// Create a new client for `base_url` (e.g. `https://api.vk.com/method/`)
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, access_token, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: &str,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        // Url::join drops the last path segment unless it ends with a slash
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| VkMatchError::Config(format!("invalid VK API url {base_url:?}: {e}")))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            access_token: access_token.into(),
            api_version: "5.131".to_string(),
            min_interval: interval_for(crate::config::default_max_requests_per_second()),
        })
    }

    /// Client for users.* and photos.* calls
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::build(config, &config.vk.access_token)
    }

    /// Client for messages.send, authorised with the community token
    pub fn chat_from_config(config: &AppConfig) -> Result<Self> {
        Self::build(config, config.chat_access_token())
    }

    fn build(config: &AppConfig, token: &str) -> Result<Self> {
        Ok(
            Self::with_timeout(&config.vk.api_base_url, token, config.request_timeout())?
                .with_api_version(&config.vk.api_version)
                .with_rate_limit(config.vk.max_requests_per_second),
        )
    }

    #[must_use]
    pub fn with_api_version(mut self, version: &str) -> Self {
        self.api_version = version.to_string();
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, max_requests_per_second: u32) -> Self {
        self.min_interval = interval_for(max_requests_per_second);
        self
    }

    /// Delay inserted between successive pages
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Sleep for one rate-limit interval
    pub async fn pace(&self) {
        tokio::time::sleep(self.min_interval).await;
    }

    /// Call `method` and return the raw `response` payload
    pub async fn call(&self, method: &str, params: &Params<'_>) -> Result<serde_json::Value> {
        let url = self
            .base_url
            .join(method)
            .map_err(|e| VkMatchError::Validation(format!("invalid method name {method:?}: {e}")))?;

        tracing::debug!(method, params = params.len(), "VK API call");

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("v", self.api_version.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VkMatchError::Transport(format!(
                "{method} failed: HTTP {status}"
            )));
        }

        let body = response.text().await?;
        let envelope: ApiEnvelope =
            serde_json::from_str(&body).map_err(|e| malformed(method, &e))?;

        if let Some(error) = envelope.error {
            tracing::debug!(method, code = error.error_code, "VK API returned an error");
            return Err(VkMatchError::Protocol {
                code: error.error_code,
                message: error.error_msg,
            });
        }

        envelope.response.ok_or_else(|| VkMatchError::Protocol {
            code: 0,
            message: format!("{method} returned neither response nor error"),
        })
    }

    /// Call `method` and deserialize the `response` payload into `T`
    pub async fn call_typed<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &Params<'_>,
    ) -> Result<T> {
        let value = self.call(method, params).await?;
        serde_json::from_value(value).map_err(|e| malformed(method, &e))
    }
}

/// A body that is not the documented envelope or payload shape
fn malformed(method: &str, err: &serde_json::Error) -> VkMatchError {
    VkMatchError::Protocol {
        code: 0,
        message: format!("{method} returned a malformed body: {err}"),
    }
}

fn interval_for(max_requests_per_second: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(max_requests_per_second.max(1)))
}
