use crate::domain::error::SwarmResult;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc;

/// Lifecycle signal emitted by a remote client connection
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The remote service confirmed the join
    Joined,
    /// The remote side ended the connection
    Disconnected(String),
    /// The connection failed after establishment
    Errored(String),
}

/// Population snapshot reported by the remote service
#[derive(Debug, Clone, Deserialize)]
pub struct ServerStatus {
    /// Number of players currently online
    pub players_online: u64,
}

/// An established client connection: the control handle plus its event stream
pub struct ClientSession {
    /// Exclusively owned handle to the underlying connection
    pub handle: Box<dyn ClientHandle>,
    /// Lifecycle events for this connection
    pub events: mpsc::UnboundedReceiver<ClientEvent>,
}

/// Control surface of an established connection
#[async_trait]
pub trait ClientHandle: Send + Sync {
    /// Request disconnection with the given reason
    async fn disconnect(&self, reason: &str) -> SwarmResult<()>;
}

/// Connection factory for the remote service
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establish a new client connection under the given identity
    async fn connect(
        &self,
        host: &str,
        port: u16,
        identity: &str,
        anonymous: bool,
    ) -> SwarmResult<ClientSession>;

    /// Query the remote population count, independent of any connection
    async fn probe(&self, host: &str, port: u16) -> SwarmResult<ServerStatus>;
}

/// Display-identity source for new sessions
///
/// No uniqueness is guaranteed; pool bookkeeping never keys on the
/// generated string.
pub trait IdentityProvider: Send + Sync {
    fn generate(&self) -> String;
}

impl std::fmt::Display for ClientEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientEvent::Joined => write!(f, "joined"),
            ClientEvent::Disconnected(reason) => write!(f, "disconnected: {}", reason),
            ClientEvent::Errored(error) => write!(f, "errored: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_display() {
        assert_eq!(ClientEvent::Joined.to_string(), "joined");
        assert_eq!(
            ClientEvent::Disconnected("kicked".to_string()).to_string(),
            "disconnected: kicked"
        );
        assert_eq!(
            ClientEvent::Errored("reset".to_string()).to_string(),
            "errored: reset"
        );
    }

    #[test]
    fn test_server_status_deserialization() {
        let status: ServerStatus = serde_json::from_str("{\"players_online\": 42}").unwrap();
        assert_eq!(status.players_online, 42);
    }
}
