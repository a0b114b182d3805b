//! Interception middleware.
//! Buffers the body, runs the rules, and stamps pass-through responses.

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::interceptor::{ErrorCode, ErrorResponse, Interceptor, RequestDescriptor, Verdict};

/// Response header set on every request that is passed through.
pub const X_RESPONSE_TIME: &str = "x-response-time";

/// State required by the interception middleware.
#[derive(Debug, Clone, Copy)]
pub struct InterceptState {
    pub max_body_size: usize,
}

pub async fn intercept_middleware(
    State(state): State<InterceptState>,
    req: Request,
    next: Next,
) -> Response {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_string();

    let bytes = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Request body rejected");
            return ErrorResponse::new(ErrorCode::PayloadTooLarge, path).into_response();
        }
    };

    let descriptor = RequestDescriptor::from_parts(&parts, &bytes);

    if let Verdict::Reject { rule, code } = Interceptor.evaluate(&descriptor) {
        tracing::warn!(
            method = %descriptor.method,
            path = %descriptor.path,
            rule,
            code = %code,
            status = code.status().as_u16(),
            "Request rejected"
        );
        return ErrorResponse::new(code, descriptor.path).into_response();
    }

    if let Some(key) = descriptor.idempotency_key() {
        tracing::info!(idempotency_key = %key, "[Idempotency-Key]: {}", key);
    }

    let stamp = Utc::now().timestamp_millis();
    let mut response = next.run(Request::from_parts(parts, Body::from(bytes))).await;
    response
        .headers_mut()
        .insert(X_RESPONSE_TIME, HeaderValue::from(stamp));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::any, Router};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    fn app(max_body_size: usize) -> Router {
        Router::new()
            .route("/{*path}", any(|body: String| async move { body }))
            .layer(middleware::from_fn_with_state(
                InterceptState { max_body_size },
                intercept_middleware,
            ))
    }

    #[tokio::test]
    async fn test_rejection_is_terminal() {
        let req = Request::builder()
            .method("POST")
            .uri("/charge")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"amount": 500}"#))
            .unwrap();

        let res = app(1024).oneshot(req).await.unwrap();
        assert_eq!(res.status(), 400);
        assert!(res.headers().get(X_RESPONSE_TIME).is_none());

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "INVALID_AMOUNT");
        assert_eq!(json["path"], "/charge");
    }

    #[tokio::test]
    async fn test_pass_through_keeps_body_and_stamps_header() {
        let payload = r#"{"amount": 5000}"#;
        let req = Request::builder()
            .method("POST")
            .uri("/charge")
            .body(Body::from(payload))
            .unwrap();

        let res = app(1024).oneshot(req).await.unwrap();
        assert_eq!(res.status(), 200);

        let stamp = res.headers()[X_RESPONSE_TIME].to_str().unwrap();
        assert!(stamp.parse::<i64>().unwrap() > 0);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], payload.as_bytes());
    }

    #[tokio::test]
    async fn test_oversized_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/orders")
            .body(Body::from(vec![b'x'; 64]))
            .unwrap();

        let res = app(16).oneshot(req).await.unwrap();
        assert_eq!(res.status(), 413);
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn lines_containing(&self, needle: &str) -> usize {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter(|line| line.contains(needle))
                .count()
        }
    }

    fn keyed_request(method: &str, uri: &str, key: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Idempotency-Key", key)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_idempotency_key_logged_only_on_pass_through() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let res = app(1024).oneshot(keyed_request("GET", "/products", "abc123")).await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(logs.lines_containing("abc123"), 1);

        let res = app(1024)
            .oneshot(keyed_request("POST", "/coupons/2/issue", "rejected-key"))
            .await
            .unwrap();
        assert_eq!(res.status(), 409);
        assert_eq!(logs.lines_containing("rejected-key"), 0);

        let res = app(1024).oneshot(keyed_request("GET", "/products", "")).await.unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(logs.lines_containing("[Idempotency-Key]"), 1);
    }
}
