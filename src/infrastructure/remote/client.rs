use crate::core::client::{ClientEvent, ClientHandle, ClientSession, Connector, ServerStatus};
use crate::domain::error::{SwarmError, SwarmResult};
use crate::infrastructure::remote::probe;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// TCP connection factory for the remote service
///
/// Speaks a line protocol: `JOIN <identity> <mode>` on connect, after which
/// the server answers `WELCOME`; the server may end a session with
/// `KICK <reason>`; the client leaves with `QUIT <reason>`.
pub struct RemoteConnector {
    connect_timeout: Duration,
}

impl RemoteConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

/// Handle to one established remote connection
pub struct RemoteClient {
    writer: Arc<Mutex<OwnedWriteHalf>>,
    _reader_task: tokio::task::JoinHandle<()>,
}

#[async_trait]
impl Connector for RemoteConnector {
    async fn connect(
        &self,
        host: &str,
        port: u16,
        identity: &str,
        anonymous: bool,
    ) -> SwarmResult<ClientSession> {
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| SwarmError::Creation {
                message: format!("Connection timeout to {}:{}", host, port),
            })?
            .map_err(|e| SwarmError::Creation {
                message: format!("Failed to connect to {}:{}: {}", host, port, e),
            })?;

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        let (read_half, write_half) = stream.into_split();
        let writer = Arc::new(Mutex::new(write_half));

        // Announce the identity before any signal can arrive
        {
            let mode = if anonymous { "anonymous" } else { "named" };
            let mut guard = writer.lock().await;
            guard
                .write_all(format!("JOIN {} {}\n", identity, mode).as_bytes())
                .await
                .map_err(|e| SwarmError::Creation {
                    message: format!("Failed to send join for '{}': {}", identity, e),
                })?;
            guard.flush().await.map_err(|e| SwarmError::Creation {
                message: format!("Failed to flush join for '{}': {}", identity, e),
            })?;
        }

        info!("TCP connection established to {}:{}", host, port);

        let (event_sender, events) = mpsc::unbounded_channel();
        let reader_task = tokio::spawn(read_loop(read_half, event_sender));

        Ok(ClientSession {
            handle: Box::new(RemoteClient {
                writer,
                _reader_task: reader_task,
            }),
            events,
        })
    }

    async fn probe(&self, host: &str, port: u16) -> SwarmResult<ServerStatus> {
        probe::probe(host, port, self.connect_timeout).await
    }
}

#[async_trait]
impl ClientHandle for RemoteClient {
    async fn disconnect(&self, reason: &str) -> SwarmResult<()> {
        let mut guard = self.writer.lock().await;
        guard
            .write_all(format!("QUIT {}\n", reason).as_bytes())
            .await?;
        guard.flush().await?;
        guard.shutdown().await?;

        debug!("Sent disconnect: {}", reason);
        Ok(())
    }
}

/// Turn server lines into lifecycle events
async fn read_loop(read_half: OwnedReadHalf, event_sender: mpsc::UnboundedSender<ClientEvent>) {
    let mut lines = BufReader::new(read_half).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();

                if line == "WELCOME" {
                    if event_sender.send(ClientEvent::Joined).is_err() {
                        break;
                    }
                } else if let Some(reason) = line.strip_prefix("KICK ") {
                    let _ = event_sender.send(ClientEvent::Disconnected(reason.to_string()));
                    break;
                } else if line == "KICK" {
                    let _ = event_sender
                        .send(ClientEvent::Disconnected("no reason given".to_string()));
                    break;
                } else {
                    debug!("Ignoring server line: {}", line);
                }
            }
            Ok(None) => {
                let _ = event_sender
                    .send(ClientEvent::Disconnected("connection closed by server".to_string()));
                break;
            }
            Err(e) => {
                let _ = event_sender.send(ClientEvent::Errored(e.to_string()));
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    async fn connect_to(
        addr: std::net::SocketAddr,
        identity: &str,
    ) -> SwarmResult<ClientSession> {
        let connector = RemoteConnector::new(Duration::from_millis(1000));
        connector
            .connect(&addr.ip().to_string(), addr.port(), identity, true)
            .await
    }

    #[tokio::test]
    async fn test_connect_fails_gracefully() {
        let connector = RemoteConnector::new(Duration::from_millis(200));

        // Port 1 on localhost is not listening
        let result = connector.connect("127.0.0.1", 1, "Tester42", true).await;
        assert!(matches!(result, Err(SwarmError::Creation { .. })));
    }

    #[tokio::test]
    async fn test_connect_timeout() {
        // TEST-NET-1 (RFC 5737), non-routable
        let connector = RemoteConnector::new(Duration::from_millis(100));
        let result = connector.connect("192.0.2.1", 12345, "Tester42", true).await;

        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("timeout") || e.to_string().contains("connect"));
        }
    }

    #[tokio::test]
    async fn test_join_line_and_welcome_event() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let mut lines = BufReader::new(read_half).lines();

            let join = lines.next_line().await.unwrap().unwrap();
            write_half.write_all(b"WELCOME\n").await.unwrap();
            join
        });

        let mut session = connect_to(addr, "Tester42").await.unwrap();
        let event = session.events.recv().await.unwrap();
        assert_eq!(event, ClientEvent::Joined);

        let join_line = server.await.unwrap();
        assert_eq!(join_line, "JOIN Tester42 anonymous");
    }

    #[tokio::test]
    async fn test_kick_becomes_disconnected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let mut lines = BufReader::new(read_half).lines();
            let _ = lines.next_line().await;

            write_half.write_all(b"WELCOME\nKICK maintenance\n").await.unwrap();
            // Hold the socket open long enough for the client to read
            tokio::time::sleep(Duration::from_millis(100)).await;
        });

        let mut session = connect_to(addr, "Tester42").await.unwrap();
        assert_eq!(session.events.recv().await.unwrap(), ClientEvent::Joined);
        assert_eq!(
            session.events.recv().await.unwrap(),
            ClientEvent::Disconnected("maintenance".to_string())
        );
    }

    #[tokio::test]
    async fn test_server_close_becomes_disconnected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let mut session = connect_to(addr, "Tester42").await.unwrap();
        let event = session.events.recv().await.unwrap();
        assert!(matches!(event, ClientEvent::Disconnected(_)));
    }

    #[tokio::test]
    async fn test_disconnect_sends_quit_line() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = String::new();
            socket.read_to_string(&mut buffer).await.unwrap();
            buffer
        });

        let session = connect_to(addr, "Tester42").await.unwrap();
        session.handle.disconnect("Session ended").await.unwrap();

        let received = server.await.unwrap();
        assert!(received.contains("JOIN Tester42 anonymous\n"));
        assert!(received.contains("QUIT Session ended\n"));
    }
}
