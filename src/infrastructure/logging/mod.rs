// Logging module - Logging infrastructure
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging system
pub fn init_logging(verbose: bool, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if quiet {
        "swarmcom=error"
    } else if verbose {
        "swarmcom=debug"
    } else {
        "swarmcom=info,warn,error"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .try_init()?;

    tracing::info!("SwarmCom logging system initialized");
    Ok(())
}
