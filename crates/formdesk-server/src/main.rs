//! Formdesk template server binary.

use std::sync::Arc;

use formdesk_server::{AppState, ServerConfig, app};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formdesk_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let addr = config.addr();

    let state = match AppState::from_config(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to open template storage: {e}");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    info!("Formdesk server listening on {addr}");

    if let Err(e) = axum::serve(listener, app(state)).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
