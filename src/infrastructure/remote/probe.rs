use crate::core::client::ServerStatus;
use crate::domain::error::{SwarmError, SwarmResult};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Query the remote population count
///
/// One-shot request independent of any session: connects, sends `STATUS`,
/// and parses a single JSON reply line, e.g. `{"players_online": 17}`.
pub async fn probe(host: &str, port: u16, timeout: Duration) -> SwarmResult<ServerStatus> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| SwarmError::Probe {
            message: format!("Probe timeout to {}:{}", host, port),
        })?
        .map_err(|e| SwarmError::Probe {
            message: format!("Probe failed to connect to {}:{}: {}", host, port, e),
        })?;

    let (read_half, mut write_half) = stream.into_split();

    write_half
        .write_all(b"STATUS\n")
        .await
        .map_err(|e| SwarmError::Probe {
            message: format!("Failed to send status request: {}", e),
        })?;
    write_half.flush().await.map_err(|e| SwarmError::Probe {
        message: format!("Failed to flush status request: {}", e),
    })?;

    let mut lines = BufReader::new(read_half).lines();
    let line = tokio::time::timeout(timeout, lines.next_line())
        .await
        .map_err(|_| SwarmError::Probe {
            message: format!("Status reply timeout from {}:{}", host, port),
        })?
        .map_err(|e| SwarmError::Probe {
            message: format!("Failed to read status reply: {}", e),
        })?
        .ok_or_else(|| SwarmError::Probe {
            message: "Connection closed before status reply".to_string(),
        })?;

    serde_json::from_str(&line).map_err(|e| SwarmError::Probe {
        message: format!("Invalid status payload: {}", e),
    })
}
