//! ServerBuilder for fluent API to build the HTTP shell

use super::router::build_routes;
use super::state::{AppState, SessionRegistry};
use crate::config::AppConfig;
use crate::core::store::Store;
use crate::storage::InMemoryStore;
use crate::storage::in_memory::InMemoryBills;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder for the billed HTTP server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(config)
///     .with_in_memory_store(InMemoryStore::new("http://localhost:5678"))
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    store: Option<Arc<dyn Store>>,
    receipts: Option<Arc<InMemoryBills>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            store: None,
            receipts: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the store (required)
    pub fn with_store(mut self, store: impl Store + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Use an in-memory store and serve its receipts under `/receipts`
    pub fn with_in_memory_store(mut self, store: InMemoryStore) -> Self {
        self.receipts = Some(store.receipts());
        self.store = Some(Arc::new(store));
        self
    }

    /// Build the state shared by the handlers
    pub fn build_state(self) -> Result<AppState> {
        let store = self
            .store
            .ok_or_else(|| anyhow::anyhow!("Store is required. Call .with_store()"))?;

        Ok(AppState {
            store,
            config: Arc::new(self.config),
            sessions: SessionRegistry::new(),
            receipts: self.receipts,
        })
    }

    /// Build the router, wrapped in request tracing
    pub fn build(self) -> Result<Router> {
        let state = self.build_state()?;
        Ok(build_routes(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to the configured address and handles SIGTERM and SIGINT
    /// (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
