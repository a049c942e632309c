use bridge_core::{EventNotice, START_EVENT};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type EventHandler = Arc<dyn Fn(&[JsonValue]) + Send + Sync>;

/// Invoked when the agent renegotiates channel readiness. The reserved
/// notice never reaches subscriber handlers.
pub trait RestartHook: Send + Sync {
    fn on_restart(&self);
}

/// Demultiplexes inbound event notices into named dispatch. Owns the
/// subscriber registry for one connector instance; nothing is buffered
/// for names without a subscriber.
#[derive(Default)]
pub struct EventRouter {
    handlers: Mutex<HashMap<String, Vec<EventHandler>>>,
    restart: Mutex<Option<Arc<dyn RestartHook>>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`. All handlers for a name run in
    /// registration order, once per matching notice.
    pub fn on<F>(&self, event: &str, handler: F)
    where
        F: Fn(&[JsonValue]) + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.lock().expect("handler registry mutex poisoned");
        handlers.entry(event.to_owned()).or_default().push(Arc::new(handler));
    }

    pub fn set_restart_hook(&self, hook: Arc<dyn RestartHook>) {
        *self.restart.lock().expect("restart hook mutex poisoned") = Some(hook);
    }

    /// Processes one notification's notices in array order.
    pub fn dispatch(&self, notices: &[EventNotice]) {
        for notice in notices {
            if notice.event == START_EVENT {
                let hook = self.restart.lock().expect("restart hook mutex poisoned").clone();
                if let Some(hook) = hook {
                    hook.on_restart();
                }
                continue;
            }
            let matched = {
                let handlers = self.handlers.lock().expect("handler registry mutex poisoned");
                handlers.get(&notice.event).cloned()
            };
            let Some(matched) = matched else {
                log::trace!("no subscriber for event {}, discarding", notice.event);
                continue;
            };
            for handler in matched {
                handler(&notice.params);
            }
        }
    }
}
