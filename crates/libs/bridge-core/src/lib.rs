//! Channel envelope and page-side adapter for the shared wallet channel.

pub mod adapter;
pub mod envelope;
pub mod error;
pub mod port;

pub use adapter::{ChannelAdapter, MessageSink};
pub use envelope::{
    ChannelId, ChannelMessage, ChannelTarget, EventNotice, MessageKind, Origin, RequestId,
    RpcError, RpcRequest, RpcResponse, START_EVENT,
};
pub use error::ChannelError;
pub use port::{ChannelPort, InboundEnvelope, LocalBus, LocalEndpoint};
