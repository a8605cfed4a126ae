//! roster server binary.
//!
//! Startup runs `configure → connect → listen`. A configuration or database
//! failure is logged and ends the process with a non-zero status; there is
//! no retry.

use std::process::ExitCode;
use std::sync::Arc;

use roster::{App, Config, MongoStore, Server};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = match MongoStore::connect(&config.mongo_uri, config.mongo_db.as_deref()).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "MongoDB connection error");
            return ExitCode::FAILURE;
        }
    };
    info!("Connected to MongoDB");

    let server = match Server::bind(config.addr()).await {
        Ok(server) => server,
        Err(e) => {
            error!(addr = %config.addr(), error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(port = config.port, "Server running on port {}", config.port);

    server.serve(App::new(Arc::new(store))).await;
    ExitCode::SUCCESS
}
