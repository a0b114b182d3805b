//! Axum middleware.

pub mod intercept;

pub use intercept::{intercept_middleware, InterceptState, X_RESPONSE_TIME};
