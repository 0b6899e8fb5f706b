//! Backend HTTP service: validates requests, proxies catalog lookups and
//! keeps the favorites list in memory.

pub mod error;
pub mod repository;
pub mod request_log;
pub mod routes;
pub mod service;
pub mod shutdown;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::catalog::CatalogClient;
use crate::config::{ConfigError, ConfigStore};
use crate::server::repository::FavoritesRepository;
use crate::server::routes::build_router;
use crate::server::shutdown::ShutdownManager;

/// How long shutdown waits for in-flight work to finish.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub repository: FavoritesRepository,
    pub catalog: Arc<dyn CatalogClient>,
    pub shutdown: Arc<ShutdownManager>,
}

pub struct MovieServer {
    pub addr: SocketAddr,
    state: AppState,
}

impl MovieServer {
    pub fn new(config: ConfigStore, catalog: Arc<dyn CatalogClient>) -> Result<Self, ConfigError> {
        let addr = config.get().bind_addr()?;
        Ok(Self {
            addr,
            state: AppState {
                repository: FavoritesRepository::new(),
                catalog,
                shutdown: Arc::new(ShutdownManager::new()),
            },
        })
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.state.shutdown.clone(),
        }
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(self) -> std::io::Result<()> {
        tracing::info!("Starting movie server on {}", self.addr);
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until shutdown, then drain
    /// in-flight work.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        tracing::info!("Movie server listening on {}", listener.local_addr()?);

        let shutdown = self.state.shutdown.clone();
        let app = build_router(self.state);

        let signal = shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                if let Err(e) = signal.wait_for_shutdown().await {
                    tracing::error!(error = %e, "Failed to listen for shutdown signals");
                }
            })
            .await?;

        shutdown.drain(DRAIN_TIMEOUT).await;
        tracing::info!("Movie server stopped");
        Ok(())
    }
}

/// Stops a running [`MovieServer`] from another task.
#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Arc<ShutdownManager>,
}

impl ServerHandle {
    pub fn shutdown(&self) {
        self.shutdown.signal_shutdown();
    }
}
