//! Drives a connector against an in-process agent: readiness
//! handshake, account listing, and a signed message, all over the
//! local bus.

use bridge_core::{
    ChannelId, ChannelMessage, ChannelPort, ChannelTarget, LocalBus, MessageKind, Origin,
    RpcResponse,
};
use serde_json::json;
use std::sync::Arc;
use wallet_connector::{ConnectorConfig, WalletConnector};

fn spawn_demo_agent(bus: &LocalBus, origin: Origin, channel: ChannelId) {
    let endpoint = bus.endpoint(origin);
    let mut rx = endpoint.subscribe();
    tokio::spawn(async move {
        while let Ok(envelope) = rx.recv().await {
            let message = envelope.message;
            if message.kind != MessageKind::Request
                || message.channel != channel
                || message.target != ChannelTarget::Agent
            {
                continue;
            }
            let Some(request) = message.request else { continue };
            let result = match request.method.as_str() {
                "probe" => json!(true),
                "accounts" => json!([{ "address": "addr-demo-1" }]),
                "sign_message" => json!({ "signer": "addr-demo-1", "signature": "ed25519:demo" }),
                _ => json!(null),
            };
            let response =
                RpcResponse { id: request.id, result: Some(result), error: None };
            let _ = endpoint.send(ChannelMessage::response(channel.clone(), response));
        }
    });
}

#[tokio::main]
async fn main() {
    let origin = Origin("https://dapp.example".to_owned());
    let config = ConnectorConfig::default();
    let bus = LocalBus::new();
    spawn_demo_agent(&bus, origin.clone(), ChannelId(config.name.clone()));

    let port: Arc<dyn ChannelPort> = Arc::new(bus.endpoint(origin.clone()));
    let connector = Arc::new(WalletConnector::new(port, origin, config));

    let present = connector.clone().start().await;
    println!("agent present: {present}");

    match connector.accounts().await {
        Ok(accounts) => println!("accounts: {accounts:?}"),
        Err(err) => eprintln!("accounts failed: {err}"),
    }
    match connector.sign_message("hello from the page").await {
        Ok(signed) => println!("signed by {}: {}", signed.signer, signed.signature),
        Err(err) => eprintln!("signing failed: {err}"),
    }
}
