use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Event name reserved for channel-readiness renegotiation. Notices
/// carrying it are diverted to the connector's handshake and never
/// reach subscribers.
pub const START_EVENT: &str = "start";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Request,
    Response,
    Event,
}

/// Logical endpoint a message is addressed to. The page only consumes
/// traffic targeting [`ChannelTarget::Page`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelTarget {
    Page,
    Agent,
}

/// Connector identity used as the channel discriminator. Set once at
/// construction and never mutated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Origin(pub String);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    pub id: RequestId,
    pub method: String,
    pub params: Option<JsonValue>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RpcResponse {
    pub id: RequestId,
    pub result: Option<JsonValue>,
    pub error: Option<RpcError>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    pub code: String,
    pub message: String,
}

/// One named event with its ordered parameter list. A single message
/// may carry several notices; they are processed in array order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventNotice {
    pub event: String,
    #[serde(default)]
    pub params: Vec<JsonValue>,
}

/// Envelope shared by both ends of the channel. `kind` selects which of
/// the payload fields is populated; the others stay absent on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChannelMessage {
    pub kind: MessageKind,
    pub channel: ChannelId,
    pub target: ChannelTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RpcRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<RpcResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventNotice>>,
}

impl ChannelMessage {
    pub fn request(channel: ChannelId, request: RpcRequest) -> Self {
        Self {
            kind: MessageKind::Request,
            channel,
            target: ChannelTarget::Agent,
            request: Some(request),
            response: None,
            events: None,
        }
    }

    pub fn response(channel: ChannelId, response: RpcResponse) -> Self {
        Self {
            kind: MessageKind::Response,
            channel,
            target: ChannelTarget::Page,
            request: None,
            response: Some(response),
            events: None,
        }
    }

    pub fn events(channel: ChannelId, events: Vec<EventNotice>) -> Self {
        Self {
            kind: MessageKind::Event,
            channel,
            target: ChannelTarget::Page,
            request: None,
            response: None,
            events: Some(events),
        }
    }
}
