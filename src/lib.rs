//! SwarmCom Library
//!
//! Simulated client swarm tool maintaining a bounded pool of sessions
//! against a remote service, with randomized scheduling and coordinated
//! teardown on process termination.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::client::{
    ClientEvent, ClientHandle, ClientSession, Connector, IdentityProvider, ServerStatus,
};
pub use crate::core::session::{SessionId, SessionPool, SessionState, SwarmManager};
pub use crate::core::shutdown::ShutdownCoordinator;
pub use crate::domain::config::SwarmConfig;
pub use crate::domain::error::{SwarmError, SwarmResult};
