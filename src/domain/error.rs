use thiserror::Error;

/// SwarmCom unified error type
#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Client creation failed: {message}")]
    Creation { message: String },

    #[error("Probe failed: {message}")]
    Probe { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Session pool is full ({capacity} sessions)")]
    PoolFull { capacity: usize },

    #[error("Communication timeout")]
    Timeout,
}

pub type SwarmResult<T> = Result<T, SwarmError>;
