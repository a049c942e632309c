use crate::error::RpcFailure;
use crate::id::IdGenerator;
use bridge_core::{ChannelAdapter, RequestId, RpcRequest, RpcResponse};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

type Settlement = Result<JsonValue, RpcFailure>;

/// Per-call knobs. An unset timeout falls back to the client default;
/// if that is also unset the call waits for a response indefinitely.
#[derive(Clone, Copy, Debug, Default)]
pub struct CallOptions {
    pub timeout: Option<Duration>,
}

/// Request/response correlation over the channel adapter. Owns the
/// pending-request table for its connector identity; entries are
/// created on send and destroyed on the matching response or timeout,
/// whichever settles first.
pub struct RpcClient {
    adapter: ChannelAdapter,
    ids: Arc<dyn IdGenerator>,
    default_timeout: Option<Duration>,
    pending: Mutex<HashMap<RequestId, oneshot::Sender<Settlement>>>,
}

impl RpcClient {
    pub fn new(adapter: ChannelAdapter, ids: Arc<dyn IdGenerator>) -> Self {
        Self { adapter, ids, default_timeout: None, pending: Mutex::new(HashMap::new()) }
    }

    /// Deadline applied to every call that does not carry its own.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub async fn request(&self, method: &str, params: Option<JsonValue>) -> Settlement {
        self.request_with(method, params, CallOptions::default()).await
    }

    pub async fn request_with(
        &self,
        method: &str,
        params: Option<JsonValue>,
        options: CallOptions,
    ) -> Settlement {
        let id = self.ids.next_id();
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().expect("pending table mutex poisoned");
            pending.insert(id.clone(), tx);
        }

        let request = RpcRequest { id: id.clone(), method: method.to_owned(), params };
        if let Err(err) = self.adapter.send_request(request) {
            self.forget(&id);
            return Err(err.into());
        }

        match options.timeout.or(self.default_timeout) {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(settled) => Self::unwrap_settlement(settled),
                Err(_) => {
                    self.forget(&id);
                    Err(RpcFailure::Timeout { method: method.to_owned(), timeout: limit })
                }
            },
            None => Self::unwrap_settlement(rx.await),
        }
    }

    pub async fn call_typed<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<JsonValue>,
        options: CallOptions,
    ) -> Result<T, RpcFailure> {
        let value = self.request_with(method, params, options).await?;
        serde_json::from_value(value)
            .map_err(|err| RpcFailure::Decode { method: method.to_owned(), reason: err.to_string() })
    }

    /// Probe calibration: a short-deadline call whose failures all read
    /// as "no agent". A reply reporting anything but an explicit
    /// `false` counts as present. Never surfaces an error.
    pub async fn probe_call(&self, method: &str, timeout: Duration) -> bool {
        match self.request_with(method, None, CallOptions { timeout: Some(timeout) }).await {
            Ok(JsonValue::Bool(flag)) => flag,
            Ok(_) => true,
            Err(_) => false,
        }
    }

    /// Settles the matching pending call. Responses with unknown or
    /// already-settled ids are ignored.
    pub fn handle_response(&self, response: RpcResponse) {
        let entry = {
            let mut pending = self.pending.lock().expect("pending table mutex poisoned");
            pending.remove(&response.id)
        };
        let Some(tx) = entry else {
            log::debug!("ignoring response for unknown request id {}", response.id.0);
            return;
        };
        let settlement = match response.error {
            Some(err) => Err(RpcFailure::Agent(err)),
            None => Ok(response.result.unwrap_or(JsonValue::Null)),
        };
        // The receiver is gone when the caller already timed out.
        let _ = tx.send(settlement);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().expect("pending table mutex poisoned").len()
    }

    fn forget(&self, id: &RequestId) {
        let mut pending = self.pending.lock().expect("pending table mutex poisoned");
        pending.remove(id);
    }

    fn unwrap_settlement(settled: Result<Settlement, oneshot::error::RecvError>) -> Settlement {
        settled.unwrap_or(Err(RpcFailure::ChannelClosed))
    }
}
