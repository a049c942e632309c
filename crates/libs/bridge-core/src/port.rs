use crate::envelope::{ChannelMessage, Origin};
use crate::error::ChannelError;
use tokio::sync::broadcast;

const BUS_CAPACITY: usize = 64;

/// A message as the platform layer hands it over: the envelope plus the
/// origin the channel delivered it from.
#[derive(Clone, Debug)]
pub struct InboundEnvelope {
    pub origin: Origin,
    pub message: ChannelMessage,
}

/// Handle onto the shared broadcast channel. Injected into the adapter
/// so hosts and tests control the transport instead of relying on an
/// ambient messaging primitive.
pub trait ChannelPort: Send + Sync {
    fn send(&self, message: ChannelMessage) -> Result<(), ChannelError>;

    fn subscribe(&self) -> broadcast::Receiver<InboundEnvelope>;
}

/// Process-local stand-in for the platform broadcast channel. Every
/// endpoint sees every message, tagged with the sending endpoint's
/// origin.
#[derive(Clone)]
pub struct LocalBus {
    tx: broadcast::Sender<InboundEnvelope>,
}

impl LocalBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn endpoint(&self, origin: Origin) -> LocalEndpoint {
        LocalEndpoint { bus: self.tx.clone(), origin }
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct LocalEndpoint {
    bus: broadcast::Sender<InboundEnvelope>,
    origin: Origin,
}

impl ChannelPort for LocalEndpoint {
    fn send(&self, message: ChannelMessage) -> Result<(), ChannelError> {
        // A broadcast with no listeners swallows the message, matching
        // the platform primitive.
        let _ = self.bus.send(InboundEnvelope { origin: self.origin.clone(), message });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<InboundEnvelope> {
        self.bus.subscribe()
    }
}
