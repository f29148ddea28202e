use crate::core::client::{ClientEvent, ClientSession, Connector, IdentityProvider};
use crate::core::session::{
    pool::SessionPool,
    session::{new_session_id, SessionEntry, SessionId},
};
use crate::core::timing::IntervalBounds;
use crate::domain::config::SwarmConfig;
use crate::domain::error::{SwarmError, SwarmResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

/// Idle period between supervisor capacity checks while the pool is full
const SUPERVISOR_IDLE: Duration = Duration::from_millis(200);

/// Internal event routed through the manager's dispatch loop
#[derive(Debug)]
enum SwarmEvent {
    /// Lifecycle signal from one session's connection
    Client(SessionId, ClientEvent),
    /// A scheduled termination deadline elapsed
    DeadlineFired(SessionId),
}

/// Session pool manager
///
/// Owns the bounded pool, schedules randomized spawn attempts, dispatches
/// lifecycle signals through a single event loop, and runs the supervisory
/// top-up loop for the process lifetime.
pub struct SwarmManager {
    shared: Arc<ManagerShared>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<SwarmEvent>>>,
}

struct ManagerShared {
    config: SwarmConfig,
    connector: Arc<dyn Connector>,
    identities: Arc<dyn IdentityProvider>,
    pool: SessionPool,
    events_tx: mpsc::UnboundedSender<SwarmEvent>,
    /// Spawn gate; cleared once shutdown begins
    accepting: AtomicBool,
}

impl SwarmManager {
    /// Create a new manager around the given collaborators
    pub fn new(
        config: SwarmConfig,
        connector: Arc<dyn Connector>,
        identities: Arc<dyn IdentityProvider>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let pool = SessionPool::new(config.max_sessions);

        Self {
            shared: Arc::new(ManagerShared {
                config,
                connector,
                identities,
                pool,
                events_tx,
                accepting: AtomicBool::new(true),
            }),
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Start the swarm
    ///
    /// Schedules one randomized-delay spawn attempt per pool slot, then
    /// starts the dispatch loop and the supervisory loop. May be called
    /// once; a second call fails.
    pub async fn start(&self) -> SwarmResult<()> {
        let events_rx = self
            .events_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| SwarmError::Session {
                message: "Manager is already started".to_string(),
            })?;

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.dispatch_loop(events_rx).await;
        });

        for _ in 0..self.shared.config.max_sessions {
            self.shared.schedule_spawn();
        }

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.supervise().await;
        });

        info!(
            "Swarm manager started for {}:{} (capacity {})",
            self.shared.config.host, self.shared.config.port, self.shared.config.max_sessions
        );
        Ok(())
    }

    /// The managed session pool
    pub fn pool(&self) -> &SessionPool {
        &self.shared.pool
    }

    /// Stop accepting new sessions
    ///
    /// The supervisory loop exits and pending spawn attempts are discarded
    /// before reserving a slot.
    pub fn halt(&self) {
        self.shared.accepting.store(false, Ordering::SeqCst);
        debug!("Spawn gate closed");
    }

    /// Whether new spawn attempts are still admitted
    pub fn is_accepting(&self) -> bool {
        self.shared.accepting.load(Ordering::SeqCst)
    }

    /// Disconnect every tracked session with the given reason
    ///
    /// Each disconnect is independently guarded; one failing session never
    /// blocks the rest. Returns the number of sessions the request was
    /// issued to.
    pub async fn disconnect_all(&self, reason: &str) -> usize {
        let entries = self.shared.pool.drain().await;
        let count = entries.len();

        for mut entry in entries {
            entry.end();
            match entry.handle.disconnect(reason).await {
                Ok(()) => info!("{} has been logged out", entry.identity),
                Err(e) => warn!("Failed to disconnect '{}': {}", entry.identity, e),
            }
        }

        count
    }
}

impl ManagerShared {
    fn accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    fn start_delay(&self) -> IntervalBounds {
        self.config.delay.into()
    }

    fn session_duration(&self) -> IntervalBounds {
        self.config.session.into()
    }

    /// Schedule one spawn attempt after an independently drawn start delay
    fn schedule_spawn(self: &Arc<Self>) {
        let shared = Arc::clone(self);
        let delay = shared.start_delay().sample();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.spawn_attempt().await;
        });
    }

    /// One spawn attempt: identity, connection, slot reservation, probe
    ///
    /// A failed attempt is logged and discarded; the supervisory loop owns
    /// the resulting deficit.
    async fn spawn_attempt(self: &Arc<Self>) {
        if !self.accepting() {
            return;
        }

        let identity = self.identities.generate();

        let client = match self
            .connector
            .connect(&self.config.host, self.config.port, &identity, true)
            .await
        {
            Ok(client) => client,
            Err(e) => {
                warn!("Error while creating client '{}': {}", identity, e);
                return;
            }
        };

        // Observational only; the result never touches pool state
        self.spawn_probe();

        let ClientSession { handle, events } = client;
        let id = new_session_id();
        let entry = SessionEntry::new(identity.clone(), handle);

        // Slot is reserved at construction time, before the join confirms
        if let Err(e) = self.pool.reserve(id.clone(), entry).await {
            // Late arrival against a full (or halted) pool; dropping the
            // session closes its connection
            warn!("Discarding client '{}': {}", identity, e);
            return;
        }

        if !self.accepting() {
            if let Some(mut entry) = self.pool.release(&id).await {
                entry.end();
                let _ = entry.handle.disconnect("Client shutting down").await;
            }
            return;
        }

        self.pump_events(id, events);
    }

    /// Forward one connection's events into the dispatch mailbox
    fn pump_events(self: &Arc<Self>, id: SessionId, mut events: mpsc::UnboundedReceiver<ClientEvent>) {
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if events_tx.send(SwarmEvent::Client(id.clone(), event)).is_err() {
                    break;
                }
            }
        });
    }

    /// Log the remote population count
    fn spawn_probe(self: &Arc<Self>) {
        let shared = Arc::clone(self);

        tokio::spawn(async move {
            match shared
                .connector
                .probe(&shared.config.host, shared.config.port)
                .await
            {
                Ok(status) => info!("Players online: {}", status.players_online),
                Err(e) => warn!("Probe error: {}", e),
            }
        });
    }

    /// Single dispatch point for all lifecycle signals
    async fn dispatch_loop(self: Arc<Self>, mut events_rx: mpsc::UnboundedReceiver<SwarmEvent>) {
        while let Some(event) = events_rx.recv().await {
            self.handle_event(event).await;
        }
        debug!("Dispatch loop finished");
    }

    async fn handle_event(self: &Arc<Self>, event: SwarmEvent) {
        match event {
            SwarmEvent::Client(id, ClientEvent::Joined) => self.on_joined(id).await,
            SwarmEvent::Client(id, ClientEvent::Disconnected(reason)) => {
                self.on_disconnected(id, reason).await
            }
            SwarmEvent::Client(id, ClientEvent::Errored(error)) => self.on_errored(id, error).await,
            SwarmEvent::DeadlineFired(id) => self.on_deadline_fired(id).await,
        }
    }

    /// Join confirmed: sample a duration and schedule the single-shot deadline
    async fn on_joined(self: &Arc<Self>, id: SessionId) {
        let duration = self.session_duration().sample();
        let deadline = Instant::now() + duration;

        let identity = self
            .pool
            .with_entry(&id, |entry| {
                entry.activate(deadline);
                entry.identity.clone()
            })
            .await;

        match identity {
            Some(identity) => {
                info!("{} has joined the server", identity);
                self.schedule_deadline(id, duration);
            }
            None => debug!("Join signal for untracked session '{}'", id),
        }
    }

    fn schedule_deadline(self: &Arc<Self>, id: SessionId, duration: Duration) {
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = events_tx.send(SwarmEvent::DeadlineFired(id));
        });
    }

    /// Deadline elapsed: disconnect, remove, replenish
    ///
    /// Deadlines are never cancelled; one firing after an out-of-band
    /// removal finds the id already released and is a no-op.
    async fn on_deadline_fired(self: &Arc<Self>, id: SessionId) {
        let Some(mut entry) = self.pool.release(&id).await else {
            debug!("Deadline fired for already removed session '{}'", id);
            return;
        };

        entry.end();
        if let Err(e) = entry.handle.disconnect("Session ended").await {
            warn!("Failed to disconnect '{}': {}", entry.identity, e);
        }
        info!(
            "{} has been logged out after {} seconds",
            entry.identity,
            entry.created_at.elapsed().as_secs()
        );

        if self.accepting() {
            self.schedule_spawn();
        }
    }

    /// Remote-initiated disconnect: release immediately, leave the deficit
    /// to the supervisory loop
    async fn on_disconnected(self: &Arc<Self>, id: SessionId, reason: String) {
        if let Some(mut entry) = self.pool.release(&id).await {
            entry.end();
            info!("{} disconnected: {}", entry.identity, reason);
        } else {
            debug!("Disconnect signal for already removed session '{}'", id);
        }
    }

    /// Connection error after establishment: release exactly once
    async fn on_errored(self: &Arc<Self>, id: SessionId, error: String) {
        if let Some(mut entry) = self.pool.release(&id).await {
            entry.end();
            error!("Error on client {}: {}", entry.identity, error);
        } else {
            debug!("Error signal for already removed session '{}'", id);
        }
    }

    /// Continuous top-up loop
    ///
    /// Checks capacity immediately before each attempt; the pool's atomic
    /// reserve is the final arbiter under concurrent spawns.
    async fn supervise(self: Arc<Self>) {
        loop {
            if !self.accepting() {
                break;
            }

            if self.pool.len().await < self.pool.capacity() {
                let delay = self.start_delay().sample();
                tokio::time::sleep(delay).await;

                if !self.accepting() {
                    break;
                }
                if self.pool.len().await < self.pool.capacity() {
                    self.spawn_attempt().await;
                }
            } else {
                tokio::time::sleep(SUPERVISOR_IDLE).await;
            }
        }
        debug!("Supervisory loop finished");
    }
}
