//! Shared fixtures for exercising the wallet channel without a browser
//! host: an in-memory channel with a scriptable agent side, plus
//! recording collaborators for the connector seams.

pub mod agent;
pub mod channel;
pub mod fixtures;

pub use agent::{ScriptedAgent, ScriptedReply};
pub use bridge_rpc::SequentialIdGenerator;
pub use channel::{AgentHandle, MemoryChannel};
pub use fixtures::{FailingChains, RecordingPresence, StaticChains};
