//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MockGateConfig (validated, immutable)
//!     → CLI overrides applied in main.rs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Rule constants are not configurable

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_str, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, MockGateConfig, ObservabilityConfig, SecurityConfig,
    TimeoutConfig, UpstreamConfig,
};
