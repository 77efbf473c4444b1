use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use aether_server::api::{self, AppState};
use aether_server::config::BridgeConfig;
use aether_server::lifecycle::{Lifecycle, ShutdownOutcome, shutdown_signal};
use aether_server::logging;

/// Exit code for failures before the listener is serving.
const STARTUP_FAILURE: u8 = 2;

/// Aether chat bridge HTTP server.
#[derive(Parser, Debug)]
#[command(
    name = "aether-server",
    about = "Authenticated HTTP relay between game-server chat and external messaging"
)]
struct Cli {
    /// Path to the TOML configuration file (optional).
    #[arg(short, long, default_value = "aether.toml")]
    config: PathBuf,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = match BridgeConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("aether-server: {e}");
            return ExitCode::from(STARTUP_FAILURE);
        }
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("aether-server: {e}");
            return ExitCode::from(STARTUP_FAILURE);
        }
    };

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            return ExitCode::from(STARTUP_FAILURE);
        }
    };

    info!(
        message_sender = config.features.message_sender,
        message_receiver = config.features.message_receiver,
        upstream = state.relay.url(),
        blocklist = state.filter.terms().len(),
        "configuration resolved"
    );

    let lifecycle = Lifecycle::new(config.shutdown_grace());
    let addr = config.server.bind_address();
    let Ok(listener) = lifecycle.bind(&addr).await else {
        return ExitCode::from(STARTUP_FAILURE);
    };
    info!(address = %addr, "aether-server listening");

    match lifecycle
        .serve(listener, api::router(state), shutdown_signal())
        .await
    {
        Ok(ShutdownOutcome::Clean) => {
            info!("server stopped");
            ExitCode::SUCCESS
        }
        Ok(outcome @ ShutdownOutcome::Forced) => {
            // Flush what we can, then leave without waiting on stuck requests.
            drop(log_guard);
            std::process::exit(outcome.exit_code());
        }
        Err(e) => {
            error!(error = %e, "server terminated with an error");
            ExitCode::FAILURE
        }
    }
}
