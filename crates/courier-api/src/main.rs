//! Binary entry point for the Courier REST API.
//!
//! Configuration comes from environment variables; a `.env` file is
//! honored in development.

use courier_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        env = ?config.app.env,
        port = config.api.port,
        "Starting Courier API server"
    );

    if let Err(e) = courier_api::run(config).await {
        error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}
