use crate::envelope::{ChannelId, ChannelMessage, ChannelTarget, MessageKind, Origin, RpcRequest};
use crate::error::ChannelError;
use crate::port::{ChannelPort, InboundEnvelope};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Upper-layer consumer of messages that survive the acceptance
/// predicate.
pub trait MessageSink: Send + Sync {
    fn deliver(&self, message: ChannelMessage);
}

/// Page-side endpoint of one connector's logical channel. Outbound
/// requests are stamped with the connector identity and the agent
/// target; inbound traffic is filtered before anything above sees it.
#[derive(Clone)]
pub struct ChannelAdapter {
    port: Arc<dyn ChannelPort>,
    channel: ChannelId,
    origin: Origin,
}

impl ChannelAdapter {
    pub fn new(port: Arc<dyn ChannelPort>, channel: ChannelId, origin: Origin) -> Self {
        Self { port, channel, origin }
    }

    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    pub fn send_request(&self, request: RpcRequest) -> Result<(), ChannelError> {
        self.port.send(ChannelMessage::request(self.channel.clone(), request))
    }

    /// Acceptance predicate for inbound traffic: same origin as the
    /// page, not a request (the page never consumes its own outbound
    /// requests), this connector's identity, and the page-side target.
    /// Anything else is dropped with no error and no side effect.
    pub fn accepts(&self, envelope: &InboundEnvelope) -> bool {
        envelope.origin == self.origin
            && envelope.message.kind != MessageKind::Request
            && envelope.message.channel == self.channel
            && envelope.message.target == ChannelTarget::Page
    }

    /// Spawns the inbound pump: accepted messages go to `sink`, the
    /// rest are discarded silently.
    pub fn attach(&self, sink: Arc<dyn MessageSink>) -> JoinHandle<()> {
        let adapter = self.clone();
        let mut rx = self.port.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => {
                        if adapter.accepts(&envelope) {
                            sink.deliver(envelope.message);
                        } else {
                            log::trace!("dropping foreign message on channel {}", adapter.channel.0);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!(
                            "channel {} receiver lagged, skipped {skipped} messages",
                            adapter.channel.0
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
