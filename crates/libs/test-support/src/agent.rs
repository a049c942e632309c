use crate::channel::AgentHandle;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Canned behavior for one RPC method.
pub enum ScriptedReply {
    Result(JsonValue),
    Error { code: String, message: String },
    /// Never answer; exercises the timeout path.
    Silence,
}

/// Method-table agent: serves the script until the channel closes and
/// counts every request it sees, answered or not.
pub struct ScriptedAgent {
    task: JoinHandle<()>,
    calls: Arc<Mutex<HashMap<String, u64>>>,
}

impl ScriptedAgent {
    pub fn spawn(mut handle: AgentHandle, script: HashMap<String, ScriptedReply>) -> Self {
        let calls: Arc<Mutex<HashMap<String, u64>>> = Arc::default();
        let counter = calls.clone();
        let task = tokio::spawn(async move {
            while let Some(request) = handle.recv_request().await {
                {
                    let mut seen = counter.lock().expect("call counter mutex poisoned");
                    *seen.entry(request.method.clone()).or_insert(0) += 1;
                }
                match script.get(&request.method) {
                    Some(ScriptedReply::Result(value)) => handle.respond(request.id, value.clone()),
                    Some(ScriptedReply::Error { code, message }) => {
                        handle.respond_error(request.id, code, message);
                    }
                    Some(ScriptedReply::Silence) => {}
                    None => handle.respond_error(request.id, "unknown_method", &request.method),
                }
            }
        });
        Self { task, calls }
    }

    pub fn calls_for(&self, method: &str) -> u64 {
        self.calls
            .lock()
            .expect("call counter mutex poisoned")
            .get(method)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> u64 {
        self.calls.lock().expect("call counter mutex poisoned").values().sum()
    }
}

impl Drop for ScriptedAgent {
    fn drop(&mut self) {
        self.task.abort();
    }
}
