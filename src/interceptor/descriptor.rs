//! Request-scoped view the rules are evaluated against.

use axum::http::{request::Parts, HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::{Map, Value};

/// Header carrying the client's idempotency key.
pub const IDEMPOTENCY_KEY: &str = "idempotency-key";

/// Method, path, headers and parsed JSON body of one incoming request.
///
/// The body is always a JSON object; a missing, empty or non-object body
/// is represented as `{}`.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Value::Object(Map::new()),
        }
    }

    /// Build a descriptor from request parts and the buffered body bytes.
    pub fn from_parts(parts: &Parts, body: &[u8]) -> Self {
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            headers: parts.headers.clone(),
            body: parse_body(body),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = if body.is_object() {
            body
        } else {
            Value::Object(Map::new())
        };
        self
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Non-empty `idempotency-key` header value, matched case-insensitively.
    pub fn idempotency_key(&self) -> Option<&str> {
        self.headers
            .get(IDEMPOTENCY_KEY)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(Map::new()),
    }
}
