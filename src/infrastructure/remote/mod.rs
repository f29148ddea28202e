pub mod client;
pub mod probe;

pub use client::{RemoteClient, RemoteConnector};
