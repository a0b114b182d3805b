//! Mock gate (v1)
//!
//! Sits in front of a development mock backend and short-circuits selected
//! requests with canned error responses.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  MOCK GATE                   │
//!                      │                                              │
//!     Client Request   │  ┌──────────┐    ┌─────────────┐             │
//!     ─────────────────┼─▶│   http   │───▶│ interceptor │──┐ reject   │
//!                      │  │  server  │    │    rules    │  │          │
//!                      │  └──────────┘    └──────┬──────┘  │          │
//!                      │                         │ pass    │          │
//!                      │                         ▼         │          │
//!     Client Response  │                  ┌─────────────┐  │          │
//!     ◀────────────────┼──────────────────│  upstream   │◀─┘          │
//!                      │                  │ forward/echo│─────────────┼──▶ Mock
//!                      │                  └─────────────┘             │    Backend
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mock_gate::config::{load_config, validation::validate_config, ConfigError, MockGateConfig};
use mock_gate::lifecycle::{signals::shutdown_on_signal, Shutdown};
use mock_gate::observability::logging;
use mock_gate::HttpServer;

#[derive(Parser)]
#[command(name = "mock-gate")]
#[command(about = "Error-injecting gate for a development mock server", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overrides listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Mock backend address, overrides upstream.address.
    #[arg(short, long)]
    upstream: Option<String>,
}

impl Cli {
    fn load(&self) -> Result<MockGateConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => MockGateConfig::default(),
        };
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(upstream) = &self.upstream {
            config.upstream.address = Some(upstream.clone());
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().load()?;

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = ?config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        shutdown_on_signal(&shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
