use crate::core::session::manager::SwarmManager;
use crate::domain::error::SwarmResult;
use std::sync::Arc;
use tracing::info;

/// Coordinates mass teardown on process termination
///
/// Listens for interrupt and terminate signals; both paths close the spawn
/// gate first, then issue a best-effort disconnect to every tracked
/// session. Disconnects are not awaited for acknowledgement.
pub struct ShutdownCoordinator {
    manager: Arc<SwarmManager>,
}

impl ShutdownCoordinator {
    pub fn new(manager: Arc<SwarmManager>) -> Self {
        Self { manager }
    }

    /// Wait for a termination signal, then tear the pool down
    pub async fn run(&self) -> SwarmResult<()> {
        let signal = wait_for_signal().await?;
        info!("{} received, logging out clients", signal);
        self.shutdown().await;
        Ok(())
    }

    /// Disconnect all tracked sessions
    ///
    /// Also used directly by the normal exit path.
    pub async fn shutdown(&self) {
        self.manager.halt();
        let count = self.manager.disconnect_all("Client shutting down").await;
        info!("Logged out {} clients", count);
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> SwarmResult<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => Ok("SIGINT"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> SwarmResult<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("interrupt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::{
        ClientEvent, ClientHandle, ClientSession, Connector, IdentityProvider, ServerStatus,
    };
    use crate::domain::config::{IntervalConfig, SwarmConfig};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct CountingHandle {
        disconnects: Arc<StdMutex<Vec<String>>>,
    }

    #[async_trait]
    impl ClientHandle for CountingHandle {
        async fn disconnect(&self, reason: &str) -> SwarmResult<()> {
            self.disconnects.lock().unwrap().push(reason.to_string());
            Ok(())
        }
    }

    struct CountingConnector {
        disconnects: Arc<StdMutex<Vec<String>>>,
        senders: StdMutex<Vec<mpsc::UnboundedSender<ClientEvent>>>,
    }

    #[async_trait]
    impl Connector for CountingConnector {
        async fn connect(
            &self,
            _host: &str,
            _port: u16,
            _identity: &str,
            _anonymous: bool,
        ) -> SwarmResult<ClientSession> {
            let (sender, events) = mpsc::unbounded_channel();
            let _ = sender.send(ClientEvent::Joined);
            // Keep the sender alive so the event stream stays open
            self.senders.lock().unwrap().push(sender);

            Ok(ClientSession {
                handle: Box::new(CountingHandle {
                    disconnects: Arc::clone(&self.disconnects),
                }),
                events,
            })
        }

        async fn probe(&self, _host: &str, _port: u16) -> SwarmResult<ServerStatus> {
            Ok(ServerStatus { players_online: 1 })
        }
    }

    struct SeqIdentities {
        counter: AtomicUsize,
    }

    impl IdentityProvider for SeqIdentities {
        fn generate(&self) -> String {
            format!("bot{}", self.counter.fetch_add(1, Ordering::SeqCst))
        }
    }

    #[tokio::test]
    async fn test_shutdown_disconnects_all_and_closes_gate() {
        let disconnects = Arc::new(StdMutex::new(Vec::new()));
        let config = SwarmConfig {
            host: "127.0.0.1".to_string(),
            port: 7878,
            session: IntervalConfig::new(60_000, 60_000),
            delay: IntervalConfig::new(0, 0),
            max_sessions: 3,
            connect_timeout_ms: 1000,
        };

        let manager = Arc::new(SwarmManager::new(
            config,
            Arc::new(CountingConnector {
                disconnects: Arc::clone(&disconnects),
                senders: StdMutex::new(Vec::new()),
            }),
            Arc::new(SeqIdentities {
                counter: AtomicUsize::new(0),
            }),
        ));
        manager.start().await.unwrap();

        // Wait for the pool to fill
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while manager.pool().len().await < 3 && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(manager.pool().len().await, 3);

        let coordinator = ShutdownCoordinator::new(Arc::clone(&manager));
        coordinator.shutdown().await;

        assert!(!manager.is_accepting());
        assert!(manager.pool().is_empty().await);

        let reasons = disconnects.lock().unwrap().clone();
        assert_eq!(reasons.len(), 3);
        assert!(reasons.iter().all(|r| r == "Client shutting down"));
    }
}
