//! The HTTP seam between `LlmClient` and the model provider.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::GenerateContentRequest;

/// Status and body of a provider reply, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues exactly one POST per call. Implementations must be safe to share
/// across concurrent analyses.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn post_json(&self, url: &str, body: &GenerateContentRequest<'_>) -> Result<RawResponse>;
}

/// Production transport backed by a pooled `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl ModelTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &GenerateContentRequest<'_>) -> Result<RawResponse> {
        // The request URL carries the API key; strip it from any error text.
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| e.without_url())?;

        Ok(RawResponse { status, body })
    }
}
