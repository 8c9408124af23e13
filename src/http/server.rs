//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Build the Axum Router: transpile middleware in front of static files
//! - Wire up middleware (tracing, request ID, timeout, limits)
//! - Bind and run the server until stopped
//!
//! # Design Decisions
//! - `DevServer` owns all configuration; there is no process-global state,
//!   so several servers can run side by side
//! - `start` returns a handle; `ServerHandle::stop` drains gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    limit::RequestBodyLimitLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::middleware::transpile_middleware;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::Shutdown;
use crate::observability::spans::make_request_span;
use crate::transpile::{OxcTransform, Transform, TransformError, Transpiler};

/// Errors from building, starting or stopping a server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("transform setup failed: {0}")]
    Transform(#[from] TransformError),
    #[error("failed to resolve static root: {0}")]
    Root(#[source] std::io::Error),
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Development server: compiles TypeScript on request, serves everything
/// else from the static root.
pub struct DevServer {
    router: Router,
    config: ServerConfig,
}

impl DevServer {
    /// Create a server using the oxc transform configured in `config`.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let transform = OxcTransform::new(&config.transform)?;
        Self::with_transform(config, Arc::new(transform))
    }

    /// Create a server with a caller-supplied transform.
    pub fn with_transform(
        config: ServerConfig,
        transform: Arc<dyn Transform>,
    ) -> Result<Self, ServerError> {
        let transpiler =
            Transpiler::new(&config.static_files, transform).map_err(ServerError::Root)?;
        let router = Self::build_router(&config, Arc::new(transpiler));
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, transpiler: Arc<Transpiler>) -> Router {
        let static_files = ServeDir::new(transpiler.root());
        let mount = config.static_files.mount_path.trim_end_matches('/');
        let router = if mount.is_empty() {
            Router::new().fallback_service(static_files)
        } else {
            Router::new().nest_service(mount, static_files)
        };

        router
            .layer(axum::middleware::from_fn_with_state(
                transpiler,
                transpile_middleware,
            ))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_connections))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind the configured address and start serving.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let listener = TcpListener::bind(&self.config.listener.bind_address)
            .await
            .map_err(ServerError::Bind)?;
        self.start_on(listener).await
    }

    /// Start serving on an already bound listener.
    pub async fn start_on(self, listener: TcpListener) -> Result<ServerHandle, ServerError> {
        let local_addr = listener.local_addr().map_err(ServerError::Bind)?;
        let shutdown = Shutdown::new();
        let mut stop = shutdown.subscribe();

        tracing::info!(
            address = %local_addr,
            root = %self.config.static_files.root.display(),
            mount_path = %self.config.static_files.mount_path,
            target = %self.config.transform.target,
            "Dev server listening"
        );

        let app = self.router;
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop.recv().await;
                })
                .await
        });

        Ok(ServerHandle {
            local_addr,
            shutdown,
            task,
        })
    }
}

/// A running server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    /// Address the server is accepting connections on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting, drain in-flight requests and wait for the server task.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        self.task.await?.map_err(ServerError::Serve)?;
        tracing::info!(address = %self.local_addr, "Dev server stopped");
        Ok(())
    }
}
