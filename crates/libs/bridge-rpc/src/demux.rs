use crate::client::RpcClient;
use crate::events::EventRouter;
use bridge_core::{ChannelMessage, MessageKind, MessageSink};
use std::sync::Arc;

/// Splits accepted channel traffic into response correlation and event
/// dispatch.
pub struct RpcDemux {
    client: Arc<RpcClient>,
    router: Arc<EventRouter>,
}

impl RpcDemux {
    pub fn new(client: Arc<RpcClient>, router: Arc<EventRouter>) -> Self {
        Self { client, router }
    }
}

impl MessageSink for RpcDemux {
    fn deliver(&self, message: ChannelMessage) {
        match message.kind {
            MessageKind::Response => {
                if let Some(response) = message.response {
                    self.client.handle_response(response);
                }
            }
            MessageKind::Event => {
                if let Some(events) = message.events {
                    self.router.dispatch(&events);
                }
            }
            // The adapter never lets requests through; a message whose
            // payload disagrees with its kind is treated like any other
            // malformed message.
            MessageKind::Request => {}
        }
    }
}
