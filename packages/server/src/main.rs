//! `resource-registry` — HTTP server for the `resource` entity.
//!
//! # Quick start
//!
//! ```sh
//! # In-memory registry on the default port:
//! resource-registry
//!
//! # Persistent SQLite registry behind a bearer token:
//! REGISTRY_DB=./registry.db REGISTRY_API_TOKEN=s3cret resource-registry
//! ```
//!
//! # Environment variables
//!
//! See [`RegistryConfig::from_env`] for the full list.

use std::process;
use std::sync::Arc;

use resource_registry::{build_router, MemoryStorage, RegistryConfig, SqliteStorage, Storage};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "resource_registry=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = match RegistryConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            process::exit(2);
        }
    };

    let storage: Arc<dyn Storage> = match &config.db_path {
        Some(path) => match SqliteStorage::open(path) {
            Ok(s) => {
                tracing::info!("storage: SQLite at {path}");
                Arc::new(s)
            }
            Err(e) => {
                tracing::error!("failed to open SQLite database at {path}: {e}");
                process::exit(1);
            }
        },
        None => {
            tracing::info!("storage: in-memory (data will not survive restart)");
            Arc::new(MemoryStorage::new())
        }
    };

    if config.api_token.is_none() {
        tracing::warn!("REGISTRY_API_TOKEN unset: requests are not authenticated");
    }

    let bind_addr = config.bind_addr;
    let app = build_router(storage, config);

    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {bind_addr}: {e}");
            process::exit(1);
        }
    };
    tracing::info!("listening on {bind_addr}");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        process::exit(1);
    }
}
