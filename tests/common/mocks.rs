use async_trait::async_trait;
use serving_client::{
    Error, Result,
    serving::{InvocationRequest, RawResponse, Transport},
};
use std::sync::{Arc, Mutex};

/// Stub transport for testing; records every request it receives.
#[derive(Debug)]
pub struct StubTransport {
    pub responses: Arc<Mutex<Vec<RawResponse>>>,
    pub requests: Arc<Mutex<Vec<InvocationRequest>>>,
    pub timeout: bool,
}

impl StubTransport {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            timeout: false,
        }
    }

    pub fn responding(status: u16, body: &str) -> Self {
        Self::new().with_response(status, body)
    }

    pub fn with_response(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push(RawResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn with_timeout(mut self) -> Self {
        self.timeout = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<InvocationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Body of the most recent request, as UTF-8 text.
    pub fn last_body(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn post(&self, request: InvocationRequest) -> Result<RawResponse> {
        let timeout = request.timeout;
        self.requests.lock().unwrap().push(request);

        if self.timeout {
            return Err(Error::Timeout { timeout });
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::input("No more stub responses available"));
        }

        Ok(responses.remove(0))
    }
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new()
    }
}
