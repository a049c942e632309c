//! End-to-end facade scenarios: handshake and presence, probe
//! calibration, validation short-circuits, and output normalization.

use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use test_support::{
    FailingChains, MemoryChannel, RecordingPresence, ScriptedAgent, ScriptedReply,
    SequentialIdGenerator, StaticChains,
};
use wallet_connector::{
    Asset, ConnectorConfig, ConnectorError, ConnectorState, DataToSign, SendOutcome,
    TransactionRequest, WalletConnector,
};

const ORIGIN: &str = "https://dapp.example";
const CHANNEL: &str = "orbit";
const CHAIN: &str = "orbit:mainnet";

fn test_config() -> ConnectorConfig {
    ConnectorConfig {
        name: CHANNEL.to_owned(),
        chain_ref: CHAIN.to_owned(),
        probe_timeout_ms: 100,
        request_timeout_ms: Some(2_000),
        announce_presence: true,
    }
}

fn connector_on(channel: &MemoryChannel, config: ConnectorConfig) -> WalletConnector {
    WalletConnector::with_ids(
        channel.page_port(),
        channel.origin(),
        config,
        Arc::new(SequentialIdGenerator::new()),
    )
}

fn script(entries: Vec<(&str, ScriptedReply)>) -> HashMap<String, ScriptedReply> {
    entries.into_iter().map(|(method, reply)| (method.to_owned(), reply)).collect()
}

async fn wait_for(mut probe: impl FnMut() -> bool) {
    for _ in 0..100 {
        if probe() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn successful_handshake_announces_presence() {
    let channel = MemoryChannel::new(ORIGIN);
    let agent = ScriptedAgent::spawn(
        channel.agent(CHANNEL),
        script(vec![("probe", ScriptedReply::Result(json!(true)))]),
    );
    let presence = Arc::new(RecordingPresence::new());
    let connector = Arc::new(
        connector_on(&channel, test_config()).with_presence_sink(presence.clone()),
    );

    assert!(connector.clone().start().await, "agent is present");
    assert_eq!(connector.state(), ConnectorState::Announced);
    assert_eq!(agent.calls_for("probe"), 1);

    let announced = presence.announcements();
    assert_eq!(announced.len(), 1);
    assert_eq!(announced[0].name, CHANNEL);
    assert_eq!(announced[0].chain_ref, CHAIN);
}

#[tokio::test]
async fn failed_probe_stays_idle_and_announces_nothing() {
    let channel = MemoryChannel::new(ORIGIN);
    let presence = Arc::new(RecordingPresence::new());
    let connector = Arc::new(
        connector_on(&channel, test_config()).with_presence_sink(presence.clone()),
    );

    assert!(!connector.clone().start().await, "no agent is listening");
    assert_eq!(connector.state(), ConnectorState::Idle);
    assert!(presence.announcements().is_empty());
}

#[tokio::test]
async fn reserved_lifecycle_event_reruns_the_handshake() {
    let channel = MemoryChannel::new(ORIGIN);
    let agent = ScriptedAgent::spawn(
        channel.agent(CHANNEL),
        script(vec![("probe", ScriptedReply::Result(json!(true)))]),
    );
    let emitter = channel.agent(CHANNEL);
    let presence = Arc::new(RecordingPresence::new());
    let connector = Arc::new(
        connector_on(&channel, test_config()).with_presence_sink(presence.clone()),
    );
    assert!(connector.clone().start().await);
    assert_eq!(agent.calls_for("probe"), 1);

    emitter.emit(vec![bridge_core::EventNotice {
        event: bridge_core::START_EVENT.to_owned(),
        params: vec![],
    }]);

    wait_for(|| agent.calls_for("probe") == 2).await;
    wait_for(|| presence.announcements().len() == 2).await;
    assert_eq!(connector.state(), ConnectorState::Announced);
}

#[tokio::test]
async fn connectivity_probe_reports_the_agent_boolean() {
    let channel = MemoryChannel::new(ORIGIN);
    let _agent = ScriptedAgent::spawn(
        channel.agent(CHANNEL),
        script(vec![
            ("probe", ScriptedReply::Result(json!(true))),
            ("is_connected", ScriptedReply::Result(json!(true))),
        ]),
    );
    let connector = Arc::new(connector_on(&channel, test_config()));
    connector.clone().start().await;

    assert!(connector.is_connected().await);
}

#[tokio::test]
async fn connectivity_probe_resolves_false_when_no_reply_arrives() {
    let channel = MemoryChannel::new(ORIGIN);
    let _agent = ScriptedAgent::spawn(
        channel.agent(CHANNEL),
        script(vec![
            ("probe", ScriptedReply::Result(json!(true))),
            ("is_connected", ScriptedReply::Silence),
        ]),
    );
    // Default calibration: 800ms probe deadline.
    let config = ConnectorConfig { name: CHANNEL.to_owned(), ..ConnectorConfig::default() };
    let connector = Arc::new(connector_on(&channel, config));
    connector.clone().start().await;

    assert!(!connector.is_connected().await);
}

#[tokio::test]
async fn connectivity_probe_swallows_agent_errors() {
    let channel = MemoryChannel::new(ORIGIN);
    let _agent = ScriptedAgent::spawn(
        channel.agent(CHANNEL),
        script(vec![
            ("probe", ScriptedReply::Result(json!(true))),
            (
                "is_connected",
                ScriptedReply::Error { code: "internal".to_owned(), message: "boom".to_owned() },
            ),
        ]),
    );
    let connector = Arc::new(connector_on(&channel, test_config()));
    connector.clone().start().await;

    assert!(!connector.is_connected().await);
}

#[tokio::test]
async fn blank_sign_message_fails_validation_without_any_request() {
    let channel = MemoryChannel::new(ORIGIN);
    let mut agent = channel.agent(CHANNEL);
    let connector = connector_on(&channel, test_config());

    let err = connector.sign_message("   ").await.expect_err("blank message must fail");
    assert!(matches!(err, ConnectorError::InvalidArgument { field: "message", .. }));

    let quiet = tokio::time::timeout(Duration::from_millis(50), agent.recv_request()).await;
    assert!(quiet.is_err(), "no request may reach the agent");
}

#[tokio::test]
async fn sign_data_requires_the_signer_field() {
    let channel = MemoryChannel::new(ORIGIN);
    let mut agent = channel.agent(CHANNEL);
    let connector = connector_on(&channel, test_config());

    let data = DataToSign { signer: None, payload: json!({ "note": "hello" }) };
    let err = connector.sign_data(&data).await.expect_err("unsigned payload must fail");
    assert!(matches!(err, ConnectorError::InvalidArgument { field: "signer", .. }));

    let quiet = tokio::time::timeout(Duration::from_millis(50), agent.recv_request()).await;
    assert!(quiet.is_err(), "no request may reach the agent");
}

#[tokio::test]
async fn add_assets_rejects_batches_missing_the_native_variant() {
    let channel = MemoryChannel::new(ORIGIN);
    let mut agent = channel.agent(CHANNEL);
    let connector = connector_on(&channel, test_config());

    let good = Asset {
        asset_id: "usd-stable".to_owned(),
        name: None,
        variants: [(CHAIN.to_owned(), json!({ "decimals": 8 }))].into_iter().collect(),
    };
    let bad = Asset {
        asset_id: "foreign-token".to_owned(),
        name: None,
        variants: [("other:chain".to_owned(), json!({}))].into_iter().collect(),
    };

    let err = connector.add_assets(&[good, bad]).await.expect_err("batch must fail validation");
    match err {
        ConnectorError::MissingChainVariant { asset_id, chain_ref } => {
            assert_eq!(asset_id, "foreign-token");
            assert_eq!(chain_ref, CHAIN);
        }
        other => panic!("expected missing variant failure, got {other:?}"),
    }

    let quiet = tokio::time::timeout(Duration::from_millis(50), agent.recv_request()).await;
    assert!(quiet.is_err(), "zero requests must be sent");
}

#[tokio::test]
async fn send_transaction_reconstructs_the_receipt_when_the_node_is_cached() {
    let channel = MemoryChannel::new(ORIGIN);
    let _agent = ScriptedAgent::spawn(
        channel.agent(CHANNEL),
        script(vec![(
            "send_transaction",
            ScriptedReply::Result(json!({
                "id": "tx-42",
                "node": { "url": "https://node.orbit.example", "chain_ref": CHAIN },
            })),
        )]),
    );
    let connector = connector_on(&channel, test_config());

    let request = TransactionRequest::new(json!({ "sender": "addr-1", "amount": 3 }));
    let outcome = connector.send_transaction(&request).await.expect("send settles");
    match outcome {
        SendOutcome::Confirmed(receipt) => {
            assert_eq!(receipt.id, "tx-42");
            assert_eq!(receipt.node.url, "https://node.orbit.example");
        }
        other => panic!("expected receipt, got {other:?}"),
    }
}

#[tokio::test]
async fn send_transaction_returns_the_bare_identifier_unchanged() {
    let channel = MemoryChannel::new(ORIGIN);
    let _agent = ScriptedAgent::spawn(
        channel.agent(CHANNEL),
        script(vec![("send_transaction", ScriptedReply::Result(json!("tx-42")))]),
    );
    let connector = connector_on(&channel, test_config());

    let request = TransactionRequest::new(json!({ "sender": "addr-1" }));
    let outcome = connector.send_transaction(&request).await.expect("send settles");
    assert_eq!(outcome, SendOutcome::Submitted("tx-42".to_owned()));
}

#[tokio::test]
async fn add_network_lookup_failure_propagates_without_any_request() {
    let channel = MemoryChannel::new(ORIGIN);
    let mut agent = channel.agent(CHANNEL);
    let connector = connector_on(&channel, test_config())
        .with_chain_source(Arc::new(FailingChains::new("endpoint unreachable")));

    let err = connector
        .add_network("https://node.orbit.example")
        .await
        .expect_err("lookup failure must propagate");
    assert!(matches!(err, ConnectorError::ChainLookup(_)));

    let quiet = tokio::time::timeout(Duration::from_millis(50), agent.recv_request()).await;
    assert!(quiet.is_err(), "zero requests must be sent");
}

#[tokio::test]
async fn add_network_registers_with_resolved_chain_metadata() {
    let channel = MemoryChannel::new(ORIGIN);
    let _agent = ScriptedAgent::spawn(
        channel.agent(CHANNEL),
        script(vec![(
            "add_network",
            ScriptedReply::Result(json!({
                "name": "orbit-main",
                "chain_ref": CHAIN,
                "node_url": "https://node.orbit.example",
            })),
        )]),
    );
    let connector = connector_on(&channel, test_config())
        .with_chain_source(Arc::new(StaticChains::new(CHAIN)));

    let record =
        connector.add_network("https://node.orbit.example").await.expect("network registered");
    assert_eq!(record.chain_ref, CHAIN);
    assert_eq!(record.node_url, "https://node.orbit.example");
}

#[tokio::test]
async fn abi_queries_normalize_null_to_none() {
    let channel = MemoryChannel::new(ORIGIN);
    let _agent = ScriptedAgent::spawn(
        channel.agent(CHANNEL),
        script(vec![
            ("get_abi", ScriptedReply::Result(JsonValue::Null)),
            ("has_abi", ScriptedReply::Result(json!(false))),
        ]),
    );
    let connector = connector_on(&channel, test_config());

    assert_eq!(connector.get_abi("counter-v2").await.expect("query settles"), None);
    assert!(!connector.has_abi("counter-v2").await.expect("check settles"));

    let err = connector.get_abi("  ").await.expect_err("blank contract id must fail");
    assert!(matches!(err, ConnectorError::InvalidArgument { field: "contract_id", .. }));
}

#[tokio::test]
async fn subscribers_receive_event_parameters_in_order() {
    let channel = MemoryChannel::new(ORIGIN);
    let agent = channel.agent(CHANNEL);
    let connector = Arc::new(connector_on(&channel, test_config()));
    // Attach the pump without an agent; the probe fails but events must
    // still flow afterwards.
    connector.clone().start().await;

    let seen: Arc<std::sync::Mutex<Vec<String>>> = Arc::default();
    let log = seen.clone();
    connector
        .on("accounts_changed", move |params| {
            log.lock().expect("seen log").push(params[0].to_string());
        })
        .expect("subscription accepted");

    agent.emit(vec![bridge_core::EventNotice {
        event: "accounts_changed".to_owned(),
        params: vec![json!("addr-1")],
    }]);

    wait_for(|| !seen.lock().expect("seen log").is_empty()).await;
    assert_eq!(seen.lock().expect("seen log").as_slice(), ["\"addr-1\""]);
}

#[tokio::test]
async fn subscribing_to_the_reserved_event_is_rejected() {
    let channel = MemoryChannel::new(ORIGIN);
    let connector = connector_on(&channel, test_config());
    let err = connector
        .on(bridge_core::START_EVENT, |_| {})
        .expect_err("reserved event must be rejected");
    assert!(matches!(err, ConnectorError::InvalidArgument { field: "event", .. }));
}
