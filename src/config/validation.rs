//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MockGateConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use axum::http::uri::Authority;

use crate::config::schema::MockGateConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),
    #[error("upstream.address '{0}' is not a host[:port] authority")]
    UpstreamAddress(String),
    #[error("timeouts.request_secs must be greater than 0")]
    ZeroRequestTimeout,
    #[error("security.max_body_size must be greater than 0")]
    ZeroBodyLimit,
    #[error("observability.log_level '{0}' is not a valid filter")]
    LogLevel(String),
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &MockGateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Some(addr) = &config.upstream.address {
        if addr.parse::<Authority>().is_err() {
            errors.push(ValidationError::UpstreamAddress(addr.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if tracing_subscriber::EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
