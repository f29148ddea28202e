use crate::core::client::ClientHandle;
use crate::core::session::state::SessionState;
use std::time::Instant;

/// Session identifier
///
/// Display identities are not unique; all pool bookkeeping keys on this id.
pub type SessionId = String;

/// Generate a fresh session id
pub fn new_session_id() -> SessionId {
    format!("session_{}", uuid::Uuid::new_v4().simple())
}

/// One tracked client instance
pub struct SessionEntry {
    /// Generated display identity
    pub identity: String,
    /// Exclusively owned connection handle
    pub handle: Box<dyn ClientHandle>,
    /// Current lifecycle state
    pub state: SessionState,
    /// Termination deadline, set on transition to Active
    pub deadline: Option<Instant>,
    /// Creation timestamp
    pub created_at: Instant,
}

impl SessionEntry {
    /// Create a new pending session around an established connection
    pub fn new(identity: String, handle: Box<dyn ClientHandle>) -> Self {
        Self {
            identity,
            handle,
            state: SessionState::Pending,
            deadline: None,
            created_at: Instant::now(),
        }
    }

    /// Transition to Active and record the termination deadline
    pub fn activate(&mut self, deadline: Instant) {
        self.state = SessionState::Active;
        self.deadline = Some(deadline);
    }

    /// Mark the session as finished
    pub fn end(&mut self) {
        self.state = SessionState::Ended;
    }
}

impl std::fmt::Debug for SessionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEntry")
            .field("identity", &self.identity)
            .field("state", &self.state)
            .field("deadline", &self.deadline)
            .finish()
    }
}
