use bridge_core::{
    ChannelId, ChannelMessage, ChannelPort, ChannelTarget, EventNotice, InboundEnvelope, LocalBus,
    LocalEndpoint, MessageKind, Origin, RequestId, RpcError, RpcRequest, RpcResponse,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared channel with a page-side port and scriptable agent-side
/// handles, all on one origin unless a foreign endpoint is asked for.
pub struct MemoryChannel {
    bus: LocalBus,
    origin: Origin,
}

impl MemoryChannel {
    pub fn new(origin: &str) -> Self {
        Self { bus: LocalBus::new(), origin: Origin(origin.to_owned()) }
    }

    pub fn origin(&self) -> Origin {
        self.origin.clone()
    }

    pub fn page_port(&self) -> Arc<dyn ChannelPort> {
        Arc::new(self.bus.endpoint(self.origin.clone()))
    }

    /// Agent-side handle on the page's origin. Create it before driving
    /// the page so no request is missed.
    pub fn agent(&self, channel: &str) -> AgentHandle {
        AgentHandle::new(self.bus.endpoint(self.origin.clone()), ChannelId(channel.to_owned()))
    }

    /// Endpoint that reports a different origin; everything it sends
    /// must be rejected by the page adapter.
    pub fn foreign_endpoint(&self, origin: &str) -> LocalEndpoint {
        self.bus.endpoint(Origin(origin.to_owned()))
    }
}

/// One agent endpoint: receives the page's requests for its channel and
/// sends responses and event notifications back.
pub struct AgentHandle {
    endpoint: LocalEndpoint,
    channel: ChannelId,
    rx: broadcast::Receiver<InboundEnvelope>,
}

impl AgentHandle {
    fn new(endpoint: LocalEndpoint, channel: ChannelId) -> Self {
        let rx = endpoint.subscribe();
        Self { endpoint, channel, rx }
    }

    /// Next page request addressed to this agent, or `None` once the
    /// bus is gone.
    pub async fn recv_request(&mut self) -> Option<RpcRequest> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) => {
                    let message = envelope.message;
                    if message.kind == MessageKind::Request
                        && message.channel == self.channel
                        && message.target == ChannelTarget::Agent
                    {
                        if let Some(request) = message.request {
                            return Some(request);
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn respond(&self, id: RequestId, result: JsonValue) {
        self.send_response(RpcResponse { id, result: Some(result), error: None });
    }

    pub fn respond_error(&self, id: RequestId, code: &str, message: &str) {
        self.send_response(RpcResponse {
            id,
            result: None,
            error: Some(RpcError { code: code.to_owned(), message: message.to_owned() }),
        });
    }

    pub fn send_response(&self, response: RpcResponse) {
        let _ = self.endpoint.send(ChannelMessage::response(self.channel.clone(), response));
    }

    pub fn emit(&self, events: Vec<EventNotice>) {
        let _ = self.endpoint.send(ChannelMessage::events(self.channel.clone(), events));
    }

    /// Raw injection for acceptance-predicate tests.
    pub fn send_raw(&self, message: ChannelMessage) {
        let _ = self.endpoint.send(message);
    }
}
