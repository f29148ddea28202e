use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for SwarmCom
#[derive(Parser, Debug)]
#[command(
    name = "swarmcom",
    version = env!("CARGO_PKG_VERSION"),
    about = "Simulated client swarm tool",
    long_about = "Maintains a bounded pool of simulated client sessions against a remote service, continuously replacing sessions that end and tearing all of them down on exit."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
