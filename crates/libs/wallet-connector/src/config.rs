use crate::error::ConnectorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Connector identity: the channel discriminator shared with the
    /// agent. Never mutated after construction.
    pub name: String,
    /// Chain reference assets must resolve a variant for.
    pub chain_ref: String,
    /// Deadline for the readiness and connectivity probes.
    pub probe_timeout_ms: u64,
    /// Deadline applied to every other capability call. Unset waits for
    /// a response indefinitely.
    pub request_timeout_ms: Option<u64>,
    /// Broadcast presence to host-page tooling after a successful
    /// probe.
    pub announce_presence: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            name: "orbit".to_owned(),
            chain_ref: "orbit:mainnet".to_owned(),
            probe_timeout_ms: 800,
            request_timeout_ms: Some(60_000),
            announce_presence: true,
        }
    }
}

impl ConnectorConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConnectorError> {
        let raw =
            std::fs::read_to_string(path).map_err(|err| ConnectorError::Config(err.to_string()))?;
        toml::from_str(&raw).map_err(|err| ConnectorError::Config(err.to_string()))
    }

    pub fn example_toml() -> String {
        let cfg = Self::default();
        toml::to_string_pretty(&cfg).expect("valid connector config template")
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
