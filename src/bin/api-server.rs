//! Signaldesk API Server
//!
//! JSON API over the signal engine, indicators and alert mailbox, plus health
//! and metrics endpoints. Holds no state between requests.

use dotenvy::dotenv;
use signaldesk::config::ScannerConfig;
use signaldesk::core::http::start_server;
use signaldesk::logging;
use std::env;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let config = ScannerConfig::from_env()?;

    let env = signaldesk::config::get_environment();
    info!("Starting Signaldesk API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        result = start_server(port, config) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
            }
        }
    }

    info!("API server stopped");
    Ok(())
}
