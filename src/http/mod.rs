//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/intercept.rs (buffer body, evaluate rules)
//!         → rejected: JSON error response
//!         → passed:   upstream.rs (forward or echo) + X-Response-Time
//!     → Send to client
//! ```

pub mod middleware;
pub mod server;
pub mod upstream;

pub use middleware::X_RESPONSE_TIME;
pub use server::{HttpServer, ServerError};
