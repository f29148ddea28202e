use serde::{Deserialize, Serialize};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionState {
    /// Slot reserved, join not yet confirmed
    Pending,
    /// Join confirmed, termination deadline scheduled
    Active,
    /// Session finished; removed from the pool
    Ended,
}

impl SessionState {
    pub fn is_ended(&self) -> bool {
        matches!(self, SessionState::Ended)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Pending => write!(f, "Pending"),
            SessionState::Active => write!(f, "Active"),
            SessionState::Ended => write!(f, "Ended"),
        }
    }
}
