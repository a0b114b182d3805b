//! Request matching primitives used by the interception rules.
//!
//! # Responsibilities
//! - Match the request method (exact)
//! - Match a path substring (case-sensitive, anywhere in the path)
//! - Capture the digit run following a path marker such as `/users/`
//!
//! # Design Decisions
//! - No regex; substring scans keep matching O(n)
//! - Captures are unanchored: the first marker followed by a digit wins
//! - Digit runs too long for `u64` saturate instead of failing

use axum::http::Method;

use crate::interceptor::RequestDescriptor;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &RequestDescriptor) -> bool;
}

/// Returns true when every matcher accepts the request.
pub fn all_match(matchers: &[&dyn Matcher], req: &RequestDescriptor) -> bool {
    matchers.iter().all(|m| m.matches(req))
}

/// Matches the request method.
#[derive(Debug, Clone)]
pub struct MethodMatcher(pub Method);

impl Matcher for MethodMatcher {
    fn matches(&self, req: &RequestDescriptor) -> bool {
        req.method == self.0
    }
}

/// Matches when the path contains the given fragment anywhere.
#[derive(Debug, Clone, Copy)]
pub struct PathContains(pub &'static str);

impl Matcher for PathContains {
    fn matches(&self, req: &RequestDescriptor) -> bool {
        req.path.contains(self.0)
    }
}

/// Captures the digits directly following a marker, e.g. `42` in
/// `/api/users/42/orders` for the marker `/users/`.
#[derive(Debug, Clone, Copy)]
pub struct PathDigits(pub &'static str);

impl PathDigits {
    /// Extract the first digit run that immediately follows the marker.
    pub fn capture(&self, path: &str) -> Option<u64> {
        path.match_indices(self.0).find_map(|(idx, _)| {
            let rest = &path[idx + self.0.len()..];
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let digits = &rest[..end];
            if digits.is_empty() {
                None
            } else {
                // Only overflow can fail here.
                Some(digits.parse::<u64>().unwrap_or(u64::MAX))
            }
        })
    }
}

impl Matcher for PathDigits {
    fn matches(&self, req: &RequestDescriptor) -> bool {
        self.capture(&req.path).is_some()
    }
}
