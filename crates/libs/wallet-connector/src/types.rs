use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SignedMessage {
    pub signer: String,
    pub signature: String,
}

/// Structured payload for `sign_data`. The signer field is required;
/// the payload itself travels opaque.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataToSign {
    #[serde(default)]
    pub signer: Option<String>,
    pub payload: JsonValue,
}

pub type TransactionTransform = dyn Fn(JsonValue) -> JsonValue + Send + Sync;

/// Pending transaction plus the optional caller-supplied pre-send
/// transform and target endpoint override. Shared by `send_transaction`
/// and `sign_transaction`.
#[derive(Clone)]
pub struct TransactionRequest {
    pub transaction: JsonValue,
    pub transform: Option<Arc<TransactionTransform>>,
    pub endpoint: Option<String>,
}

impl TransactionRequest {
    pub fn new(transaction: JsonValue) -> Self {
        Self { transaction, transform: None, endpoint: None }
    }

    pub fn with_transform(mut self, transform: Arc<TransactionTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Node that accepted a submitted transaction, cached by the agent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NodeRef {
    pub url: String,
    #[serde(default)]
    pub chain_ref: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransactionReceipt {
    pub id: String,
    pub node: NodeRef,
}

/// What `send_transaction` hands back: the richer receipt when the
/// agent reports which node accepted the transaction, the bare id
/// otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum SendOutcome {
    Submitted(String),
    Confirmed(TransactionReceipt),
}

impl SendOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Submitted(id) => id,
            Self::Confirmed(receipt) => &receipt.id,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SignedTransaction {
    pub transaction: JsonValue,
    pub signature: String,
}

/// A wallet asset with chain-specific renditions keyed by chain
/// reference.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub asset_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub variants: BTreeMap<String, JsonValue>,
}

impl Asset {
    pub fn variant_for(&self, chain_ref: &str) -> Option<&JsonValue> {
        self.variants.get(chain_ref)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AbiRecord {
    pub contract_id: String,
    pub abi: JsonValue,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NetworkRecord {
    pub name: String,
    pub chain_ref: String,
    pub node_url: String,
}

/// Chain metadata resolved from a node endpoint before a network is
/// registered.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChainInfo {
    pub chain_ref: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Descriptor broadcast to host-page tooling once the readiness probe
/// succeeds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConnectorInfo {
    pub name: String,
    pub chain_ref: String,
}
