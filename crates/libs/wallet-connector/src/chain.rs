use crate::error::ConnectorError;
use crate::types::ChainInfo;

/// Resolves chain metadata for a node endpoint before the network is
/// registered with the agent. Lookup failures propagate to the caller
/// unchanged; no request is sent when the lookup fails.
pub trait ChainInfoSource: Send + Sync {
    fn lookup(&self, node_url: &str) -> Result<ChainInfo, ConnectorError>;
}
