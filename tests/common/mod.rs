//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use mock_gate::{HttpServer, MockGateConfig, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A running gate and the handle that stops it.
pub struct Gate {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl Gate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gate {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gate on an ephemeral loopback port.
pub async fn start_gate(mut config: MockGateConfig) -> Gate {
    config.listener.bind_address = "127.0.0.1:0".into();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Gate { addr, shutdown }
}

/// Start a mock backend that answers 201 with a description of the request
/// and counts how many requests reached it.
#[allow(dead_code)]
pub async fn start_mock_backend() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().fallback(describe_request).with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, hits)
}

async fn describe_request(
    State(hits): State<Arc<AtomicUsize>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    let body = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
    (
        StatusCode::CREATED,
        [("x-backend", "mock")],
        Json(json!({
            "method": method.as_str(),
            "path_and_query": uri.path_and_query().map(|p| p.as_str()),
            "idempotency_key": headers.get("idempotency-key").and_then(|v| v.to_str().ok()),
            "body": body,
        })),
    )
}

/// Address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
