//! Capability facade for a page-embedded wallet connector. Each public
//! operation validates its inputs synchronously, issues exactly one RPC
//! call through the channel stack, and normalizes the agent's reply.

pub mod announce;
pub mod chain;
pub mod config;
pub mod connector;
pub mod error;
pub mod lifecycle;
pub mod method;
pub mod types;

pub use announce::PresenceSink;
pub use chain::ChainInfoSource;
pub use config::ConnectorConfig;
pub use connector::WalletConnector;
pub use error::ConnectorError;
pub use lifecycle::{ConnectorState, Lifecycle};
pub use method::ConnectorMethod;
pub use types::{
    AbiRecord, Account, Asset, ChainInfo, ConnectorInfo, DataToSign, NetworkRecord, NodeRef,
    SendOutcome, SignedMessage, SignedTransaction, TransactionReceipt, TransactionRequest,
    TransactionTransform,
};
