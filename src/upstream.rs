//! Upstream search client.
//!
//! One bounded-timeout GET per relay request, no retries and no pooled
//! connections shared between requests.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;

use crate::error::UpstreamError;

pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
pub const SUBSCRIPTION_TOKEN_HEADER: &str = "X-Subscription-Token";

/// Parameters forwarded to the provider unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub count: u32,
    pub language: String,
}

/// Decoded provider body. Only `web.results` is read; a missing path
/// decodes to an empty result list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamResult {
    #[serde(default)]
    web: Option<WebSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WebSection {
    #[serde(default)]
    results: Option<Vec<WebResult>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl UpstreamResult {
    pub fn from_results(results: Vec<WebResult>) -> Self {
        UpstreamResult {
            web: Some(WebSection {
                results: Some(results),
            }),
        }
    }

    pub fn results(&self) -> &[WebResult] {
        self.web
            .as_ref()
            .and_then(|web| web.results.as_deref())
            .unwrap_or(&[])
    }

    pub fn into_results(self) -> Vec<WebResult> {
        self.web.and_then(|web| web.results).unwrap_or_default()
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn fetch(&self, params: &SearchParams) -> Result<UpstreamResult, UpstreamError>;
}

/// Brave web-search client.
pub struct BraveClient {
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl BraveClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        BraveClient {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout: UPSTREAM_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SearchProvider for BraveClient {
    async fn fetch(&self, params: &SearchParams) -> Result<UpstreamResult, UpstreamError> {
        // the gzip feature adds `Accept-Encoding: gzip` and decodes the body
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let count = params.count.to_string();
        let response = client
            .get(&self.endpoint)
            .header(SUBSCRIPTION_TOKEN_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .query(&[
                ("q", params.query.as_str()),
                ("count", count.as_str()),
                ("search_lang", params.language.as_str()),
                ("text_decorations", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "upstream search returned an error status");
            return Err(UpstreamError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let result: UpstreamResult = serde_json::from_slice(&body)?;
        tracing::debug!(results = result.results().len(), "upstream search succeeded");
        Ok(result)
    }
}
