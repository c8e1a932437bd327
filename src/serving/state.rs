use crate::{Error, Result};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationEvent {
    /// HTTP 200 received.
    Accepted,
    /// Any other status received.
    Rejected,
    /// Connection failure or timeout.
    TransportFailed,
}

impl InvocationState {
    pub fn transition(self, event: InvocationEvent) -> Result<Self> {
        let next = match (self, event) {
            (Self::Pending, InvocationEvent::Accepted) => Self::Succeeded,
            (Self::Pending, InvocationEvent::Rejected) => Self::Failed,
            (Self::Pending, InvocationEvent::TransportFailed) => Self::Failed,
            _ => {
                warn!(
                    "Invalid invocation transition from {:?} with event {:?}",
                    self, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{self:?}"),
                    requested: format!("{event:?}"),
                });
            }
        };

        debug!("Invocation state: {:?} -> {:?} (event: {:?})", self, next, event);
        Ok(next)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}
