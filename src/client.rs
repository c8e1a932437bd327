use crate::payload::{Payload, Table, parse_raw_payload};
use crate::serving::{EndpointInvoker, EndpointTarget, InvocationResult};
use crate::{Error, Result};
use tracing::info;

/// Default column for single-text and batch inputs.
pub const DEFAULT_TEXT_COLUMN: &str = "text";
/// Default row cap for batch inputs.
pub const DEFAULT_BATCH_LIMIT: usize = 32;

/// Validates user input, shapes it into a payload and invokes the endpoint.
///
/// Every input check happens before the invoker is touched, so a rejected
/// input never produces a request.
pub struct ServingClient {
    invoker: EndpointInvoker,
    target: EndpointTarget,
}

impl ServingClient {
    pub fn new(invoker: EndpointInvoker, target: EndpointTarget) -> Self {
        Self { invoker, target }
    }

    pub fn target(&self) -> &EndpointTarget {
        &self.target
    }

    pub async fn send_text(&self, text: &str, column: &str) -> Result<InvocationResult> {
        let table = Table::single_text(column, text)?;
        self.send(Payload::dataframe_split(&table)).await
    }

    /// Sends the first `limit` rows of `column`.
    pub async fn send_batch(&self, table: &Table, column: &str, limit: usize) -> Result<InvocationResult> {
        if limit == 0 {
            return Err(Error::input("Max rows to send must be at least 1"));
        }
        let selected = table.select(&[column])?.head(limit);
        info!("Sending {} rows from column '{}'", selected.row_count(), column);
        self.send(Payload::dataframe_split(&selected)).await
    }

    pub async fn send_raw(&self, json_text: &str) -> Result<InvocationResult> {
        let payload = parse_raw_payload(json_text)?;
        self.send(payload).await
    }

    pub async fn send(&self, payload: Payload) -> Result<InvocationResult> {
        self.invoker.invoke(&self.target, &payload).await
    }
}
