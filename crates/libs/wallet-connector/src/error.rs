use bridge_rpc::RpcFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A required argument failed synchronous validation; no message
    /// was sent.
    #[error("invalid argument {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    #[error("asset {asset_id} has no variant for chain {chain_ref}")]
    MissingChainVariant { asset_id: String, chain_ref: String },
    #[error("chain metadata lookup failed: {0}")]
    ChainLookup(String),
    #[error("malformed agent response for {method}: {reason}")]
    MalformedResponse { method: &'static str, reason: String },
    #[error("failed to read connector config: {0}")]
    Config(String),
    #[error(transparent)]
    Rpc(#[from] RpcFailure),
}

impl ConnectorError {
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { field, reason: reason.into() }
    }
}
