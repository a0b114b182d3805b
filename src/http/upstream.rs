//! Downstream handlers for passed-through requests.
//!
//! # Responsibilities
//! - Forward to the configured mock backend, preserving method, headers,
//!   body and path+query
//! - Answer locally with an echo when no backend is configured
//!
//! # Design Decisions
//! - Upstream failures surface as 502 in the same JSON error shape

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Method, Uri,
    },
    response::{IntoResponse, Response},
    Json,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::{json, Value};

use crate::interceptor::{ErrorCode, ErrorResponse};

/// Client and target for upstream forwarding.
#[derive(Clone)]
pub struct UpstreamState {
    pub client: Client<HttpConnector, Body>,
    pub authority: Authority,
}

impl UpstreamState {
    pub fn new(authority: Authority) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, authority }
    }
}

/// Forward the request to the upstream mock backend.
pub async fn forward_handler(State(state): State<UpstreamState>, request: Request) -> Response {
    let (mut parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.authority.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Failed to build upstream URI");
            return ErrorResponse::new(ErrorCode::UpstreamUnavailable, path).into_response();
        }
    };

    tracing::debug!(method = %parts.method, uri = %parts.uri, "Forwarding request");

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(path = %path, upstream = %state.authority, error = %e, "Upstream error");
            ErrorResponse::new(ErrorCode::UpstreamUnavailable, path).into_response()
        }
    }
}

/// Answer with the request's method, path and JSON body.
pub async fn echo_handler(method: Method, uri: Uri, body: Bytes) -> Json<Value> {
    let body = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "body": body,
    }))
}
