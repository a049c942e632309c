use crate::announce::PresenceSink;
use crate::chain::ChainInfoSource;
use crate::config::ConnectorConfig;
use crate::error::ConnectorError;
use crate::lifecycle::{ConnectorState, Lifecycle};
use crate::method::ConnectorMethod;
use crate::types::{
    AbiRecord, Account, Asset, ConnectorInfo, DataToSign, NetworkRecord, NodeRef, SendOutcome,
    SignedMessage, SignedTransaction, TransactionReceipt, TransactionRequest,
};
use bridge_core::{ChannelAdapter, ChannelId, ChannelPort, Origin, START_EVENT};
use bridge_rpc::{
    CallOptions, EventRouter, IdGenerator, RandomIdGenerator, RestartHook, RpcClient, RpcDemux,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value as JsonValue};
use std::sync::{Arc, Mutex, Weak};
use tokio::task::JoinHandle;

/// Page-side wallet connector. Construction fixes the identity and the
/// collaborators; capabilities are thin calls into the RPC client with
/// per-capability validation and output normalization.
pub struct WalletConnector {
    config: ConnectorConfig,
    adapter: ChannelAdapter,
    rpc: Arc<RpcClient>,
    router: Arc<EventRouter>,
    lifecycle: Mutex<Lifecycle>,
    presence: Option<Arc<dyn PresenceSink>>,
    chains: Option<Arc<dyn ChainInfoSource>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl WalletConnector {
    pub fn new(port: Arc<dyn ChannelPort>, origin: Origin, config: ConnectorConfig) -> Self {
        Self::with_ids(port, origin, config, Arc::new(RandomIdGenerator))
    }

    pub fn with_ids(
        port: Arc<dyn ChannelPort>,
        origin: Origin,
        config: ConnectorConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let adapter = ChannelAdapter::new(port, ChannelId(config.name.clone()), origin);
        let rpc = Arc::new(
            RpcClient::new(adapter.clone(), ids).with_default_timeout(config.request_timeout()),
        );
        Self {
            config,
            adapter,
            rpc,
            router: Arc::new(EventRouter::new()),
            lifecycle: Mutex::new(Lifecycle::default()),
            presence: None,
            chains: None,
            pump: Mutex::new(None),
        }
    }

    pub fn with_presence_sink(mut self, sink: Arc<dyn PresenceSink>) -> Self {
        self.presence = Some(sink);
        self
    }

    pub fn with_chain_source(mut self, source: Arc<dyn ChainInfoSource>) -> Self {
        self.chains = Some(source);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn state(&self) -> ConnectorState {
        self.lifecycle.lock().expect("lifecycle mutex poisoned").state()
    }

    /// Wires the inbound pump, installs the restart hook, and runs the
    /// readiness handshake. Returns whether an agent answered the
    /// probe. The reserved lifecycle event re-runs the handshake for as
    /// long as the connector is alive.
    pub async fn start(self: Arc<Self>) -> bool {
        {
            let mut pump = self.pump.lock().expect("pump handle mutex poisoned");
            if pump.is_none() {
                let sink = Arc::new(RpcDemux::new(self.rpc.clone(), self.router.clone()));
                *pump = Some(self.adapter.attach(sink));
            }
        }
        self.router
            .set_restart_hook(Arc::new(HandshakeHook { connector: Arc::downgrade(&self) }));
        self.handshake().await
    }

    /// Readiness probe plus presence announcement.
    pub async fn handshake(&self) -> bool {
        self.lifecycle.lock().expect("lifecycle mutex poisoned").mark_probing();
        let present = self.probe().await;

        let mut lifecycle = self.lifecycle.lock().expect("lifecycle mutex poisoned");
        if !present {
            lifecycle.reset_idle();
            log::debug!("readiness probe failed, connector {} stays idle", self.config.name);
            return false;
        }
        lifecycle.mark_announced();
        drop(lifecycle);

        if self.config.announce_presence {
            if let Some(sink) = &self.presence {
                sink.announce(ConnectorInfo {
                    name: self.config.name.clone(),
                    chain_ref: self.config.chain_ref.clone(),
                });
            }
        }
        true
    }

    /// Readiness probe: is an agent present and responsive on this
    /// channel. Failures of any kind read as absent.
    pub async fn probe(&self) -> bool {
        self.rpc.probe_call(ConnectorMethod::Probe.as_str(), self.config.probe_timeout()).await
    }

    /// Connectivity probe with the same calibration as [`probe`]: it
    /// resolves to `false` on timeout or error, never rejecting.
    pub async fn is_connected(&self) -> bool {
        self.rpc
            .probe_call(ConnectorMethod::IsConnected.as_str(), self.config.probe_timeout())
            .await
    }

    /// Subscribes to a named agent event. The reserved readiness event
    /// cannot be subscribed to; it never reaches handlers.
    pub fn on<F>(&self, event: &str, handler: F) -> Result<(), ConnectorError>
    where
        F: Fn(&[JsonValue]) + Send + Sync + 'static,
    {
        if event == START_EVENT {
            return Err(ConnectorError::invalid_argument("event", "reserved lifecycle event"));
        }
        self.router.on(event, handler);
        Ok(())
    }

    pub async fn connect(&self) -> Result<Vec<Account>, ConnectorError> {
        self.call_typed(ConnectorMethod::Connect, None).await
    }

    pub async fn disconnect(&self) -> Result<(), ConnectorError> {
        self.call(ConnectorMethod::Disconnect, None).await.map(|_| ())
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, ConnectorError> {
        self.call_typed(ConnectorMethod::Accounts, None).await
    }

    pub async fn current_account(&self) -> Result<Option<Account>, ConnectorError> {
        self.call_typed(ConnectorMethod::CurrentAccount, None).await
    }

    pub async fn sign_message(&self, message: &str) -> Result<SignedMessage, ConnectorError> {
        if message.trim().is_empty() {
            return Err(ConnectorError::invalid_argument(
                "message",
                "must be present and non-blank",
            ));
        }
        self.call_typed(ConnectorMethod::SignMessage, Some(json!({ "message": message }))).await
    }

    pub async fn sign_data(&self, data: &DataToSign) -> Result<SignedMessage, ConnectorError> {
        let signer = match &data.signer {
            Some(signer) if !signer.trim().is_empty() => signer,
            _ => {
                return Err(ConnectorError::invalid_argument(
                    "signer",
                    "structured payloads must name a signer",
                ))
            }
        };
        self.call_typed(
            ConnectorMethod::SignData,
            Some(json!({ "signer": signer, "payload": data.payload })),
        )
        .await
    }

    pub async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<SendOutcome, ConnectorError> {
        let params = prepare_transaction(request)?;
        let result = self.call(ConnectorMethod::SendTransaction, Some(params)).await?;
        normalize_send_result(result)
    }

    pub async fn sign_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<SignedTransaction, ConnectorError> {
        let params = prepare_transaction(request)?;
        self.call_typed(ConnectorMethod::SignTransaction, Some(params)).await
    }

    pub async fn assets(&self) -> Result<Vec<Asset>, ConnectorError> {
        self.call_typed(ConnectorMethod::Assets, None).await
    }

    /// Registers a batch of assets. Every asset must resolve a variant
    /// for the connector's native chain; a miss fails the whole batch
    /// before anything is sent.
    pub async fn add_assets(&self, assets: &[Asset]) -> Result<(), ConnectorError> {
        let mut resolved = Vec::with_capacity(assets.len());
        for asset in assets {
            let Some(variant) = asset.variant_for(&self.config.chain_ref) else {
                return Err(ConnectorError::MissingChainVariant {
                    asset_id: asset.asset_id.clone(),
                    chain_ref: self.config.chain_ref.clone(),
                });
            };
            resolved.push(json!({ "asset_id": asset.asset_id, "variant": variant }));
        }
        self.call(ConnectorMethod::AddAssets, Some(JsonValue::Array(resolved))).await.map(|_| ())
    }

    pub async fn add_abi(&self, record: &AbiRecord) -> Result<(), ConnectorError> {
        require_contract_id(&record.contract_id)?;
        self.call(
            ConnectorMethod::AddAbi,
            Some(json!({ "contract_id": record.contract_id, "abi": record.abi })),
        )
        .await
        .map(|_| ())
    }

    pub async fn get_abi(&self, contract_id: &str) -> Result<Option<JsonValue>, ConnectorError> {
        require_contract_id(contract_id)?;
        let value =
            self.call(ConnectorMethod::GetAbi, Some(json!({ "contract_id": contract_id }))).await?;
        Ok((!value.is_null()).then_some(value))
    }

    pub async fn has_abi(&self, contract_id: &str) -> Result<bool, ConnectorError> {
        require_contract_id(contract_id)?;
        self.call_typed(ConnectorMethod::HasAbi, Some(json!({ "contract_id": contract_id }))).await
    }

    pub async fn current_network(&self) -> Result<NetworkRecord, ConnectorError> {
        self.call_typed(ConnectorMethod::CurrentNetwork, None).await
    }

    pub async fn select_network(&self, name: &str) -> Result<(), ConnectorError> {
        if name.trim().is_empty() {
            return Err(ConnectorError::invalid_argument("name", "must be present and non-blank"));
        }
        self.call(ConnectorMethod::SelectNetwork, Some(json!({ "name": name }))).await.map(|_| ())
    }

    pub async fn networks(&self) -> Result<Vec<NetworkRecord>, ConnectorError> {
        self.call_typed(ConnectorMethod::Networks, None).await
    }

    /// Resolves chain metadata for `node_url` through the injected
    /// source, then registers the network with the agent.
    pub async fn add_network(&self, node_url: &str) -> Result<NetworkRecord, ConnectorError> {
        if node_url.trim().is_empty() {
            return Err(ConnectorError::invalid_argument(
                "node_url",
                "must be present and non-blank",
            ));
        }
        let Some(chains) = &self.chains else {
            return Err(ConnectorError::ChainLookup(
                "no chain metadata source configured".to_owned(),
            ));
        };
        let info = chains.lookup(node_url)?;
        self.call_typed(
            ConnectorMethod::AddNetwork,
            Some(json!({ "url": node_url, "chain_ref": info.chain_ref, "name": info.name })),
        )
        .await
    }

    pub async fn version(&self) -> Result<String, ConnectorError> {
        self.call_typed(ConnectorMethod::Version, None).await
    }

    async fn call(
        &self,
        method: ConnectorMethod,
        params: Option<JsonValue>,
    ) -> Result<JsonValue, ConnectorError> {
        Ok(self.rpc.request(method.as_str(), params).await?)
    }

    async fn call_typed<T: DeserializeOwned>(
        &self,
        method: ConnectorMethod,
        params: Option<JsonValue>,
    ) -> Result<T, ConnectorError> {
        Ok(self.rpc.call_typed(method.as_str(), params, CallOptions::default()).await?)
    }
}

struct HandshakeHook {
    connector: Weak<WalletConnector>,
}

impl RestartHook for HandshakeHook {
    fn on_restart(&self) {
        let Some(connector) = self.connector.upgrade() else { return };
        tokio::spawn(async move {
            let _ = connector.handshake().await;
        });
    }
}

fn require_contract_id(contract_id: &str) -> Result<(), ConnectorError> {
    if contract_id.trim().is_empty() {
        return Err(ConnectorError::invalid_argument(
            "contract_id",
            "must be present and non-blank",
        ));
    }
    Ok(())
}

/// Shared request-preparation step for the send-and-sign and sign-only
/// capabilities: the pending transaction must be a structured object
/// naming a sender; the caller transform runs after normalization; the
/// endpoint override rides along when present.
fn prepare_transaction(request: &TransactionRequest) -> Result<JsonValue, ConnectorError> {
    let JsonValue::Object(fields) = &request.transaction else {
        return Err(ConnectorError::invalid_argument(
            "transaction",
            "must be a structured object",
        ));
    };
    let named_sender = fields
        .get("sender")
        .and_then(JsonValue::as_str)
        .is_some_and(|sender| !sender.trim().is_empty());
    if !named_sender {
        return Err(ConnectorError::invalid_argument(
            "transaction.sender",
            "pending transactions must name a sender",
        ));
    }

    let mut prepared = request.transaction.clone();
    if let Some(transform) = &request.transform {
        prepared = transform(prepared);
    }

    let mut params = serde_json::Map::new();
    params.insert("transaction".to_owned(), prepared);
    if let Some(endpoint) = &request.endpoint {
        params.insert("endpoint".to_owned(), JsonValue::String(endpoint.clone()));
    }
    Ok(JsonValue::Object(params))
}

/// The agent reports either a bare transaction id or a record carrying
/// the id plus the node that accepted it; only the latter holds enough
/// to rebuild the receipt.
fn normalize_send_result(result: JsonValue) -> Result<SendOutcome, ConnectorError> {
    match result {
        JsonValue::String(id) => Ok(SendOutcome::Submitted(id)),
        JsonValue::Object(fields) => {
            let id = fields
                .get("id")
                .and_then(JsonValue::as_str)
                .ok_or_else(|| ConnectorError::MalformedResponse {
                    method: "send_transaction",
                    reason: "missing transaction id".to_owned(),
                })?
                .to_owned();
            match fields.get("node") {
                Some(node) if !node.is_null() => {
                    let node: NodeRef = serde_json::from_value(node.clone()).map_err(|err| {
                        ConnectorError::MalformedResponse {
                            method: "send_transaction",
                            reason: err.to_string(),
                        }
                    })?;
                    Ok(SendOutcome::Confirmed(TransactionReceipt { id, node }))
                }
                _ => Ok(SendOutcome::Submitted(id)),
            }
        }
        other => Err(ConnectorError::MalformedResponse {
            method: "send_transaction",
            reason: format!("unexpected result shape: {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn prepare_requires_a_structured_transaction() {
        let request = TransactionRequest::new(json!("not-an-object"));
        let err = prepare_transaction(&request).expect_err("scalar transaction must fail");
        assert!(matches!(err, ConnectorError::InvalidArgument { field: "transaction", .. }));
    }

    #[test]
    fn prepare_requires_a_named_sender() {
        let request = TransactionRequest::new(json!({ "amount": 5 }));
        let err = prepare_transaction(&request).expect_err("missing sender must fail");
        assert!(matches!(
            err,
            ConnectorError::InvalidArgument { field: "transaction.sender", .. }
        ));
    }

    #[test]
    fn prepare_applies_transform_and_endpoint_override() {
        let request = TransactionRequest::new(json!({ "sender": "addr-1", "amount": 5 }))
            .with_transform(Arc::new(|mut tx: JsonValue| {
                tx["amount"] = json!(7);
                tx
            }))
            .with_endpoint("https://alt-node.orbit.example");

        let params = prepare_transaction(&request).expect("prepared params");
        assert_eq!(params["transaction"]["amount"], 7);
        assert_eq!(params["transaction"]["sender"], "addr-1");
        assert_eq!(params["endpoint"], "https://alt-node.orbit.example");
    }

    #[test]
    fn prepare_omits_endpoint_when_not_overridden() {
        let request = TransactionRequest::new(json!({ "sender": "addr-1" }));
        let params = prepare_transaction(&request).expect("prepared params");
        assert!(params.get("endpoint").is_none());
    }

    #[test]
    fn bare_id_result_stays_a_plain_identifier() {
        let outcome = normalize_send_result(json!("tx-17")).expect("normalized");
        assert_eq!(outcome, SendOutcome::Submitted("tx-17".to_owned()));
    }

    #[test]
    fn id_only_object_stays_a_plain_identifier() {
        let outcome = normalize_send_result(json!({ "id": "tx-17" })).expect("normalized");
        assert_eq!(outcome, SendOutcome::Submitted("tx-17".to_owned()));
    }

    #[test]
    fn id_plus_node_reconstructs_the_receipt() {
        let outcome = normalize_send_result(json!({
            "id": "tx-17",
            "node": { "url": "https://node.orbit.example", "chain_ref": "orbit:mainnet" },
        }))
        .expect("normalized");
        assert_eq!(
            outcome,
            SendOutcome::Confirmed(TransactionReceipt {
                id: "tx-17".to_owned(),
                node: NodeRef {
                    url: "https://node.orbit.example".to_owned(),
                    chain_ref: Some("orbit:mainnet".to_owned()),
                },
            })
        );
    }

    #[test]
    fn unexpected_result_shape_is_malformed() {
        let err = normalize_send_result(json!(42)).expect_err("number result must fail");
        assert!(matches!(err, ConnectorError::MalformedResponse { .. }));
    }
}
