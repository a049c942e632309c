/// Connector lifecycle. `Probing` covers the readiness probe in
/// flight; `Announced` means the probe succeeded and presence was
/// broadcast to the host page. A failed probe falls back to `Idle`
/// without announcing. Disconnection is an agent-side concept reported
/// through its own capability call and is not tracked here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorState {
    Idle,
    Probing,
    Announced,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lifecycle {
    state: ConnectorState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self { state: ConnectorState::Idle }
    }
}

impl Lifecycle {
    pub fn state(&self) -> ConnectorState {
        self.state
    }

    /// Entered on every readiness handshake, including the ones the
    /// reserved lifecycle event re-triggers later.
    pub fn mark_probing(&mut self) {
        self.state = ConnectorState::Probing;
    }

    pub fn mark_announced(&mut self) {
        self.state = ConnectorState::Announced;
    }

    pub fn reset_idle(&mut self) {
        self.state = ConnectorState::Idle;
    }

    pub fn state_name(&self) -> &'static str {
        match self.state {
            ConnectorState::Idle => "idle",
            ConnectorState::Probing => "probing",
            ConnectorState::Announced => "announced",
        }
    }
}
