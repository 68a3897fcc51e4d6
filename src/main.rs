// src/main.rs
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use productos_api::config::Config;
use productos_api::repository::PgProductoStore;
use productos_api::state::AppState;
use productos_api::{app, database};

const PORT_ATTEMPTS: u16 = 20;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return;
        }
    };

    // Create database pool
    let db_pool = match database::create_pool(&config.database_url, config.db_max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create database pool");
            return;
        }
    };

    // Create application state
    let store = Arc::new(PgProductoStore::new(db_pool));
    let app = app(AppState::new(store, &config));

    let Some((listener, addr)) = bind_with_fallback(config.host, config.port).await else {
        tracing::error!(
            "Failed to bind to any port starting at {} on {}",
            config.port,
            config.host
        );
        return;
    };
    tracing::info!("Server running on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
    }
}

/// Binds the first free port in `port..=port + PORT_ATTEMPTS`.
async fn bind_with_fallback(host: IpAddr, port: u16) -> Option<(TcpListener, SocketAddr)> {
    for attempt in 0..=PORT_ATTEMPTS {
        let addr = SocketAddr::from((host, port.saturating_add(attempt)));
        match TcpListener::bind(addr).await {
            Ok(listener) => return Some((listener, addr)),
            Err(e) if attempt == 0 => {
                tracing::warn!(%addr, error = %e, "Port in use, trying next");
            }
            Err(_) => {}
        }
    }
    None
}
