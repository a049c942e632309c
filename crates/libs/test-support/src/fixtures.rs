use std::sync::Mutex;
use wallet_connector::{ChainInfo, ChainInfoSource, ConnectorError, ConnectorInfo, PresenceSink};

/// Presence sink that records every announcement it receives.
#[derive(Default)]
pub struct RecordingPresence {
    announced: Mutex<Vec<ConnectorInfo>>,
}

impl RecordingPresence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announcements(&self) -> Vec<ConnectorInfo> {
        self.announced.lock().expect("announcement log mutex poisoned").clone()
    }
}

impl PresenceSink for RecordingPresence {
    fn announce(&self, info: ConnectorInfo) {
        self.announced.lock().expect("announcement log mutex poisoned").push(info);
    }
}

/// Chain metadata source answering every lookup with one fixed record.
pub struct StaticChains {
    pub info: ChainInfo,
}

impl StaticChains {
    pub fn new(chain_ref: &str) -> Self {
        Self { info: ChainInfo { chain_ref: chain_ref.to_owned(), name: None } }
    }
}

impl ChainInfoSource for StaticChains {
    fn lookup(&self, _node_url: &str) -> Result<ChainInfo, ConnectorError> {
        Ok(self.info.clone())
    }
}

/// Chain metadata source that fails every lookup.
pub struct FailingChains {
    pub reason: String,
}

impl FailingChains {
    pub fn new(reason: &str) -> Self {
        Self { reason: reason.to_owned() }
    }
}

impl ChainInfoSource for FailingChains {
    fn lookup(&self, _node_url: &str) -> Result<ChainInfo, ConnectorError> {
        Err(ConnectorError::ChainLookup(self.reason.clone()))
    }
}
