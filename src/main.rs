// src/main.rs
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use storefront_backend::{config::AppConfig, database, routes, state, storage::ObjectBlobStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront_backend=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return;
        }
    };

    // Create database pool
    let db_pool = match database::create_pool(&config.database_url).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create database pool");
            return;
        }
    };

    let blobs = match ObjectBlobStore::local(&config.blob_root, config.blob_public_url.clone()) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, root = %config.blob_root, "Failed to open blob store");
            return;
        }
    };

    let host: IpAddr = config.host.parse().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    let base_port = config.port;

    // Create application state
    let app_state = state::AppState::new(
        Arc::new(database::PgCatalog::new(db_pool)),
        Arc::new(blobs),
        config,
    );
    let app = routes::app(app_state);

    // Try base_port..base_port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = base_port.saturating_add(offset);
            let addr = SocketAddr::from((host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => { bound = Some((l, addr)); break; }
                Err(e) => {
                    if offset == 0 { tracing::warn!(%addr, error=%e, "Port in use, trying next"); }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                l
            }
            None => {
                tracing::error!("Failed to bind to any port starting at {} on {}", base_port, host);
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
    }
}
