//! Error response contract shared by every rejection.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Machine-readable rejection codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidAmount,
    UserNotFound,
    OutOfStock,
    SoldOut,
    PayloadTooLarge,
    UpstreamUnavailable,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::InvalidAmount => StatusCode::BAD_REQUEST,
            ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
            ErrorCode::OutOfStock | ErrorCode::SoldOut => StatusCode::CONFLICT,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::OutOfStock => "OUT_OF_STOCK",
            ErrorCode::SoldOut => "SOLD_OUT",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
        }
    }

    /// Fixed client-facing message.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::InvalidAmount => "충전 금액은 1,000원 ~ 1,000,000원 사이여야 합니다",
            ErrorCode::UserNotFound => "존재하지 않는 회원입니다",
            ErrorCode::OutOfStock => "재고가 부족합니다",
            ErrorCode::SoldOut => "쿠폰이 모두 소진되었습니다",
            ErrorCode::PayloadTooLarge => "요청 본문이 너무 큽니다",
            ErrorCode::UpstreamUnavailable => "목 서버에 연결할 수 없습니다",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body written for every rejected request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: &'static str,
    pub code: ErrorCode,
    pub message: &'static str,
    pub path: String,
}

impl ErrorResponse {
    /// Build the response for `code`, stamped with the current time.
    pub fn new(code: ErrorCode, path: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown"),
            code,
            message: code.message(),
            path: path.into(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}
