//! Request/response correlation and event demultiplexing over the
//! shared wallet channel.

pub mod client;
pub mod demux;
pub mod error;
pub mod events;
pub mod id;

pub use client::{CallOptions, RpcClient};
pub use demux::RpcDemux;
pub use error::RpcFailure;
pub use events::{EventHandler, EventRouter, RestartHook};
pub use id::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
