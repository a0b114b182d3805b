//! Request interception.
//!
//! # Data Flow
//! ```text
//! Incoming request (buffered)
//!     → descriptor.rs (method, path, headers, JSON body)
//!     → rules.rs (charge amount → user → stock → coupon, first match wins)
//!     → Reject: response.rs (ErrorResponse JSON, terminal)
//!     → Pass:   idempotency key logged, X-Response-Time set, next handler
//! ```
//!
//! # Design Decisions
//! - `Interceptor` has no fields and no cross-request state
//! - Rules are plain values in a static slice; order is fixed
//! - Malformed optional input falls back to defaults instead of erroring

pub mod descriptor;
pub mod response;
pub mod rules;

pub use descriptor::{RequestDescriptor, IDEMPOTENCY_KEY};
pub use response::{ErrorCode, ErrorResponse};
pub use rules::{Rule, RULES};

/// Outcome of evaluating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A rule matched; the request ends with this code.
    Reject { rule: &'static str, code: ErrorCode },
    /// No rule matched; hand the request to the next handler.
    Pass,
}

/// Stateless request classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interceptor;

impl Interceptor {
    /// Evaluate the rules in order and return the first rejection.
    pub fn evaluate(&self, req: &RequestDescriptor) -> Verdict {
        RULES
            .iter()
            .find_map(|rule| rule.check(req).map(|code| Verdict::Reject { rule: rule.name(), code }))
            .unwrap_or(Verdict::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use serde_json::json;

    fn code_of(req: &RequestDescriptor) -> Option<ErrorCode> {
        match Interceptor.evaluate(req) {
            Verdict::Reject { code, .. } => Some(code),
            Verdict::Pass => None,
        }
    }

    #[test]
    fn test_scenarios() {
        let charge = RequestDescriptor::new(Method::POST, "/charge").with_body(json!({"amount": 500}));
        assert_eq!(code_of(&charge), Some(ErrorCode::InvalidAmount));

        assert_eq!(
            code_of(&RequestDescriptor::new(Method::GET, "/users/101")),
            Some(ErrorCode::UserNotFound)
        );
        assert_eq!(code_of(&RequestDescriptor::new(Method::GET, "/users/100")), None);

        let order = RequestDescriptor::new(Method::POST, "/orders")
            .with_body(json!({"items": [{"productId": 3}]}));
        assert_eq!(code_of(&order), Some(ErrorCode::OutOfStock));

        assert_eq!(
            code_of(&RequestDescriptor::new(Method::POST, "/coupons/2/issue")),
            Some(ErrorCode::SoldOut)
        );
        assert_eq!(code_of(&RequestDescriptor::new(Method::POST, "/coupons/5/issue")), None);
    }

    #[test]
    fn test_first_rule_wins() {
        // Matches the charge, stock and coupon rules at once.
        let req = RequestDescriptor::new(Method::POST, "/charge/orders/coupons/2/issue")
            .with_body(json!({"amount": 10, "items": [{"productId": 3}]}));
        assert_eq!(
            Interceptor.evaluate(&req),
            Verdict::Reject { rule: "charge_amount", code: ErrorCode::InvalidAmount }
        );

        let valid_amount = req.clone().with_body(json!({"amount": 5000, "items": [{"productId": 3}]}));
        assert_eq!(
            Interceptor.evaluate(&valid_amount),
            Verdict::Reject { rule: "stock_available", code: ErrorCode::OutOfStock }
        );
    }

    #[test]
    fn test_unmatched_requests_pass() {
        for req in [
            RequestDescriptor::new(Method::GET, "/products"),
            RequestDescriptor::new(Method::DELETE, "/users/500"),
            RequestDescriptor::new(Method::POST, "/coupons/issue"),
            RequestDescriptor::new(Method::GET, "/").with_header("idempotency-key", "abc123"),
        ] {
            assert_eq!(Interceptor.evaluate(&req), Verdict::Pass);
        }
    }
}
