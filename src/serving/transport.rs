use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

/// A fully prepared invocation request.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub url: String,
    pub bearer_token: String,
    pub body: Vec<u8>,
    pub timeout: Duration,
}

/// Status and undecoded body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one POST. Non-2xx statuses are responses, not errors.
    async fn post(&self, request: InvocationRequest) -> Result<RawResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        // one request per user action; idle connections are not kept
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: InvocationRequest) -> Result<RawResponse> {
        let timeout = request.timeout;
        debug!("POST {} ({} bytes)", request.url, request.body.len());

        let response = self
            .client
            .post(&request.url)
            .header(AUTHORIZATION, format!("Bearer {}", request.bearer_token))
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .body(request.body)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(e, timeout))?;

        debug!("Received HTTP {} with {} bytes", status, body.len());
        Ok(RawResponse { status, body })
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> Error {
    if error.is_timeout() {
        Error::Timeout { timeout }
    } else {
        Error::Network(error)
    }
}
