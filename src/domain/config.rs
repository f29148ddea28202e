use crate::domain::error::{SwarmError, SwarmResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// SwarmCom configuration
///
/// Read once at startup; the manager never mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Remote service host
    #[serde(default = "default_host")]
    pub host: String,
    /// Remote service port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum number of concurrent sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Connect timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Session duration bounds
    #[serde(default = "default_session_interval")]
    pub session: IntervalConfig,
    /// Spawn start-delay bounds
    #[serde(default = "default_delay_interval")]
    pub delay: IntervalConfig,
}

/// Inclusive millisecond interval bounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntervalConfig {
    /// Lower bound in milliseconds
    pub min_ms: u64,
    /// Upper bound in milliseconds
    pub max_ms: u64,
}

impl IntervalConfig {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7878
}

fn default_session_interval() -> IntervalConfig {
    IntervalConfig::new(300_000, 600_000)
}

fn default_delay_interval() -> IntervalConfig {
    IntervalConfig::new(30_000, 150_000)
}

fn default_max_sessions() -> usize {
    76
}

fn default_connect_timeout() -> u64 {
    3000
}

impl SwarmConfig {
    /// Validate the configuration
    pub fn validate(&self) -> SwarmResult<()> {
        if self.host.is_empty() {
            return Err(SwarmError::Config {
                message: "Host must not be empty".to_string(),
            });
        }

        if self.session.min_ms > self.session.max_ms {
            return Err(SwarmError::Config {
                message: format!(
                    "Session duration bounds are inverted ({} > {})",
                    self.session.min_ms, self.session.max_ms
                ),
            });
        }

        if self.delay.min_ms > self.delay.max_ms {
            return Err(SwarmError::Config {
                message: format!(
                    "Start delay bounds are inverted ({} > {})",
                    self.delay.min_ms, self.delay.max_ms
                ),
            });
        }

        Ok(())
    }

    /// Connect timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_sessions: default_max_sessions(),
            connect_timeout_ms: default_connect_timeout(),
            session: default_session_interval(),
            delay: default_delay_interval(),
        }
    }
}
