use crate::types::ConnectorInfo;

/// Receives the presence notification once the readiness probe
/// succeeds, for discovery by host-page tooling.
pub trait PresenceSink: Send + Sync {
    fn announce(&self, info: ConnectorInfo);
}
