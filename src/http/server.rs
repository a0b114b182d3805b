//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the downstream handler
//! - Wire up middleware (interception, timeout, request ID, tracing)
//! - Bind server to listener
//! - Stop on shutdown broadcast

use axum::{middleware, http::uri::Authority, Router};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::MockGateConfig;
use crate::http::middleware::{intercept_middleware, InterceptState};
use crate::http::upstream::{echo_handler, forward_handler, UpstreamState};

/// Error type for server operations.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid upstream address '{0}'")]
    Upstream(String),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the mock gate.
pub struct HttpServer {
    router: Router,
    config: MockGateConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: MockGateConfig) -> Result<Self, ServerError> {
        let router = Self::build_router(&config)?;
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &MockGateConfig) -> Result<Router, ServerError> {
        let downstream = match &config.upstream.address {
            Some(addr) => {
                let authority: Authority = addr
                    .parse()
                    .map_err(|_| ServerError::Upstream(addr.clone()))?;
                Router::new()
                    .fallback(forward_handler)
                    .with_state(UpstreamState::new(authority))
            }
            None => Router::new().fallback(echo_handler),
        };

        let intercept = InterceptState {
            max_body_size: config.security.max_body_size,
        };

        Ok(downstream
            .layer(middleware::from_fn_with_state(intercept, intercept_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid)))
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = self.config.upstream.address.as_deref().unwrap_or("echo"),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &MockGateConfig {
        &self.config
    }
}
