//! Shared helpers for the resource registry conformance test suite.
//!
//! Provides [`spawn_registry`] — a function that binds a `TcpListener` on an
//! ephemeral port, wires up an in-process registry backed by `MemoryStorage`,
//! and returns both the local URL and a reference to the underlying storage
//! so tests can pre-populate data without going through the HTTP layer.

use std::sync::Arc;

use resource_registry::{build_router, MemoryStorage, RegistryConfig, Storage};

/// Start an ephemeral in-process registry and return `(base_url, storage)`.
///
/// Pass `Some(token)` to require `Authorization: Bearer <token>`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound.
pub async fn spawn_registry(api_token: Option<&str>) -> (String, Arc<MemoryStorage>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    let base_url = format!("http://{addr}");

    let mem_storage = Arc::new(MemoryStorage::new());
    let storage: Arc<dyn Storage> = Arc::clone(&mem_storage) as Arc<dyn Storage>;

    let config = RegistryConfig {
        bind_addr: addr,
        db_path: None,
        api_token: api_token.map(str::to_string),
    };
    let router = build_router(storage, config);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance registry error");
    });

    (base_url, mem_storage)
}
