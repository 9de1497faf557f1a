/// Lifecycle state of one tool server's child process.
///
/// ```text
/// NEW → SPAWNING → HANDSHAKING → READY → (BUSY ↔ READY) → DRAINING → STOPPED
///                        ↓          ↓
///                      FAILED ←←←←←←←
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    New,
    Spawning,
    Handshaking,
    Ready,
    Busy,
    Draining,
    Stopped,
    Failed,
}

impl ServerState {
    /// Whether a request can be issued while in this state.
    pub fn accepts_requests(&self) -> bool {
        matches!(self, ServerState::Ready | ServerState::Busy)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ServerState::Stopped | ServerState::Failed)
    }

    /// Valid forward transitions, used by tests and by the supervisor to
    /// assert it never applies an impossible transition.
    pub fn can_transition_to(&self, next: ServerState) -> bool {
        use ServerState::*;
        matches!(
            (self, next),
            (New, Spawning)
                | (Spawning, Handshaking)
                | (Spawning, Failed)
                | (Handshaking, Ready)
                | (Handshaking, Failed)
                | (Ready, Busy)
                | (Busy, Ready)
                | (Ready, Draining)
                | (Busy, Draining)
                | (Ready, Failed)
                | (Busy, Failed)
                | (Draining, Stopped)
                | (Draining, Failed)
        )
    }
}
