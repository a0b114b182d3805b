//! Request matching.
//!
//! The interceptor does not route; it only needs to recognise a handful of
//! method/path shapes. `matcher.rs` provides the composable predicates the
//! rules are built from.

pub mod matcher;

pub use matcher::{all_match, Matcher, MethodMatcher, PathContains, PathDigits};
