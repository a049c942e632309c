use bridge_core::{ChannelError, RpcError};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcFailure {
    /// The agent answered with an error payload, passed through
    /// verbatim.
    #[error("agent error [{}]: {}", .0.code, .0.message)]
    Agent(RpcError),
    /// No response arrived inside the caller's deadline. Distinct from
    /// an agent-reported error.
    #[error("request {method} timed out after {timeout:?}")]
    Timeout { method: String, timeout: Duration },
    #[error("channel closed before a response arrived")]
    ChannelClosed,
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("failed to decode result for {method}: {reason}")]
    Decode { method: String, reason: String },
}
