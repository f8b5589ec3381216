//! Per-screen busy gate.
//!
//! A screen holds one gate. While an action is in flight the gate rejects
//! every other `begin`, which the screen turns into an inert no-op rather
//! than an error.

/// Gate state: either idle or running exactly one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState<A> {
    Idle,
    InFlight(A),
}

#[derive(Debug)]
pub struct ActionGate<A> {
    state: GateState<A>,
}

impl<A: Copy + PartialEq> ActionGate<A> {
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> GateState<A> {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, GateState::InFlight(_))
    }

    /// Whether `action` specifically is running (drives per-button spinners).
    pub fn is_running(&self, action: A) -> bool {
        self.state == GateState::InFlight(action)
    }

    /// Move from idle to in-flight. Returns `false` and leaves the state
    /// unchanged when something is already running.
    pub fn begin(&mut self, action: A) -> bool {
        if self.is_busy() {
            return false;
        }
        self.state = GateState::InFlight(action);
        true
    }

    /// Return to idle. Idempotent.
    pub fn finish(&mut self) {
        self.state = GateState::Idle;
    }
}

impl<A: Copy + PartialEq> Default for ActionGate<A> {
    fn default() -> Self {
        Self::new()
    }
}
