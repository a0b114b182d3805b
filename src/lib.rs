//! Request-interception gate for a development mock server.
//!
//! Rejects selected requests with canned JSON errors (invalid charge
//! amount, unknown user, out-of-stock product, exhausted coupon) and
//! passes everything else to a mock backend.

pub mod config;
pub mod http;
pub mod interceptor;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::MockGateConfig;
pub use http::HttpServer;
pub use interceptor::{ErrorCode, ErrorResponse, Interceptor, RequestDescriptor, Verdict};
pub use lifecycle::Shutdown;
