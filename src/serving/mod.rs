mod invoker;
mod state;
mod target;
mod transport;

pub use invoker::{EndpointInvoker, InvocationResult, ResponseBody};
pub use state::{InvocationEvent, InvocationState};
pub use target::{EndpointTarget, build_invocations_url, mask_credential};
pub use transport::{InvocationRequest, RawResponse, ReqwestTransport, Transport};
