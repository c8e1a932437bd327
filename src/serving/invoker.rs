use super::state::{InvocationEvent, InvocationState};
use super::target::EndpointTarget;
use super::transport::{InvocationRequest, RawResponse, Transport};
use crate::config::ClientConfig;
use crate::payload::{NonFinitePolicy, Payload, encode_payload};
use crate::{Error, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Response body, decoded when it is JSON and kept verbatim otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(raw),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    /// Body as display text: pretty JSON or the raw string.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult {
    pub status_code: u16,
    pub body: ResponseBody,
    pub is_success: bool,
    pub state: InvocationState,
}

impl InvocationResult {
    pub fn from_response(response: RawResponse) -> Self {
        Self {
            status_code: response.status,
            is_success: response.status == 200,
            body: ResponseBody::parse(response.body),
            state: InvocationState::Pending,
        }
    }

    /// Turns a non-200 result into [`Error::Remote`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_success {
            Ok(self)
        } else {
            Err(Error::Remote {
                status: self.status_code,
                body: self.body.to_display_string(),
            })
        }
    }
}

/// Sends payloads to serving endpoints, one blocking round trip per call.
pub struct EndpointInvoker {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    non_finite: NonFinitePolicy,
}

impl EndpointInvoker {
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            timeout: Duration::from_secs(config.timeout_secs),
            non_finite: config.non_finite,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn non_finite_policy(&self) -> NonFinitePolicy {
        self.non_finite
    }

    pub async fn invoke(&self, target: &EndpointTarget, payload: &Payload) -> Result<InvocationResult> {
        let body = encode_payload(payload, self.non_finite)?;
        let request = InvocationRequest {
            url: target.invocations_url(),
            bearer_token: target.credential().to_string(),
            body,
            timeout: self.timeout,
        };

        info!(
            "Invoking endpoint '{}' with {}",
            target.endpoint_name(),
            payload.describe()
        );

        let state = InvocationState::Pending;
        let response = match self.transport.post(request).await {
            Ok(response) => response,
            Err(e) => {
                let state = state.transition(InvocationEvent::TransportFailed)?;
                error!(
                    "Invocation of '{}' ended {:?}: {}",
                    target.endpoint_name(),
                    state,
                    e
                );
                return Err(e);
            }
        };

        let mut result = InvocationResult::from_response(response);
        let event = if result.is_success {
            InvocationEvent::Accepted
        } else {
            InvocationEvent::Rejected
        };
        result.state = state.transition(event)?;

        if result.is_success {
            if !result.body.is_json() {
                warn!("Endpoint returned HTTP 200 with a non-JSON body, keeping raw text");
            }
            info!("Endpoint '{}' responded successfully", target.endpoint_name());
        } else {
            warn!(
                "Endpoint '{}' responded with HTTP {}",
                target.endpoint_name(),
                result.status_code
            );
        }

        Ok(result)
    }
}
