// SwarmCom - Simulated Client Swarm Tool
mod cli;
mod core;
mod domain;
mod infrastructure;

use crate::core::session::manager::SwarmManager;
use crate::core::shutdown::ShutdownCoordinator;
use anyhow::Context;
use clap::Parser;
use cli::args::Args;
use infrastructure::config::ConfigManager;
use infrastructure::identity::IdentityGenerator;
use infrastructure::logging::init_logging;
use infrastructure::remote::RemoteConnector;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose, args.quiet) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = match &args.config {
        Some(path) => ConfigManager::load_config_from_path(path)
            .with_context(|| format!("Loading configuration from {}", path.display()))?,
        None => ConfigManager::new()
            .and_then(|manager| manager.load_config())
            .context("Loading configuration")?,
    };
    config.validate().context("Validating configuration")?;

    let connector = Arc::new(RemoteConnector::new(config.connect_timeout()));
    let identities = Arc::new(IdentityGenerator::new());
    let manager = Arc::new(SwarmManager::new(config, connector, identities));

    manager.start().await.context("Starting swarm manager")?;

    let coordinator = ShutdownCoordinator::new(Arc::clone(&manager));
    coordinator.run().await.context("Waiting for shutdown")?;

    // Signal path: disconnects were issued; terminate without waiting for
    // acknowledgement
    std::process::exit(0);
}
