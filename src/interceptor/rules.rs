//! The four rejection rules, in evaluation order.
//!
//! Each rule stands in for a real backend lookup with a single literal:
//! the amount bounds, the highest existing user ID, the out-of-stock
//! product and the exhausted coupon.

use axum::http::Method;
use serde_json::Value;

use crate::interceptor::descriptor::RequestDescriptor;
use crate::interceptor::response::ErrorCode;
use crate::routing::{all_match, MethodMatcher, PathContains, PathDigits};

pub const MIN_CHARGE_AMOUNT: f64 = 1_000.0;
pub const MAX_CHARGE_AMOUNT: f64 = 1_000_000.0;
/// Users 1..=100 exist.
pub const MAX_EXISTING_USER_ID: u64 = 100;
pub const OUT_OF_STOCK_PRODUCT_ID: f64 = 3.0;
pub const SOLD_OUT_COUPON_ID: u64 = 2;

const USER_ID: PathDigits = PathDigits("/users/");
const COUPON_ID: PathDigits = PathDigits("/coupons/");

/// A single request check.
pub trait Rule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the rejection code when the request must be refused.
    fn check(&self, req: &RequestDescriptor) -> Option<ErrorCode>;
}

/// Rules in the order they are evaluated. The first rejection wins.
pub static RULES: &[&dyn Rule] = &[&ChargeAmount, &UserExists, &StockAvailable, &CouponRemaining];

/// POST `*/charge` requires `amount` within [1000, 1000000].
#[derive(Debug, Clone, Copy)]
pub struct ChargeAmount;

impl Rule for ChargeAmount {
    fn name(&self) -> &'static str {
        "charge_amount"
    }

    fn check(&self, req: &RequestDescriptor) -> Option<ErrorCode> {
        if !all_match(&[&MethodMatcher(Method::POST), &PathContains("/charge")], req) {
            return None;
        }
        // NaN fails neither bound, so amounts with no numeric reading pass.
        let rejected = match charge_amount(&req.body) {
            None => true,
            Some(amount) => amount < MIN_CHARGE_AMOUNT || amount > MAX_CHARGE_AMOUNT,
        };
        rejected.then_some(ErrorCode::InvalidAmount)
    }
}

/// Reads `amount`. Absent and falsy values (null, false, 0, empty string)
/// yield `None`; anything else is coerced to a number, NaN when it has no
/// numeric reading.
fn charge_amount(body: &Value) -> Option<f64> {
    match body.get("amount")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        value => Some(to_number(value)),
    }
}

/// Loose numeric coercion: booleans count as 0/1, strings are parsed,
/// a single-element array reads as its element and other shapes are NaN.
fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => str_to_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            // An element is read through its string form, so `[true]` is NaN.
            [Value::Bool(_)] => f64::NAN,
            [item] => to_number(item),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn str_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
        }
    }
    // Rust also accepts "inf" and "nan" spellings; only decimal forms count here.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// GET `/users/<id>` for an ID above 100 is unknown.
#[derive(Debug, Clone, Copy)]
pub struct UserExists;

impl Rule for UserExists {
    fn name(&self) -> &'static str {
        "user_exists"
    }

    fn check(&self, req: &RequestDescriptor) -> Option<ErrorCode> {
        if req.method != Method::GET {
            return None;
        }
        match USER_ID.capture(&req.path) {
            Some(id) if id > MAX_EXISTING_USER_ID => Some(ErrorCode::UserNotFound),
            _ => None,
        }
    }
}

/// POST `*/orders` containing product 3 is out of stock.
#[derive(Debug, Clone, Copy)]
pub struct StockAvailable;

impl Rule for StockAvailable {
    fn name(&self) -> &'static str {
        "stock_available"
    }

    fn check(&self, req: &RequestDescriptor) -> Option<ErrorCode> {
        if !all_match(&[&MethodMatcher(Method::POST), &PathContains("/orders")], req) {
            return None;
        }
        let out_of_stock = req
            .body
            .get("items")
            .and_then(Value::as_array)
            .is_some_and(|items| {
                items.iter().any(|item| {
                    item.get("productId").and_then(Value::as_f64) == Some(OUT_OF_STOCK_PRODUCT_ID)
                })
            });
        out_of_stock.then_some(ErrorCode::OutOfStock)
    }
}

/// POST `*/coupons*/issue*` for coupon 2 is sold out. A missing coupon ID
/// counts as 0.
#[derive(Debug, Clone, Copy)]
pub struct CouponRemaining;

impl Rule for CouponRemaining {
    fn name(&self) -> &'static str {
        "coupon_remaining"
    }

    fn check(&self, req: &RequestDescriptor) -> Option<ErrorCode> {
        if !all_match(
            &[&MethodMatcher(Method::POST), &PathContains("/coupons"), &PathContains("/issue")],
            req,
        ) {
            return None;
        }
        let coupon_id = COUPON_ID.capture(&req.path).unwrap_or(0);
        (coupon_id == SOLD_OUT_COUPON_ID).then_some(ErrorCode::SoldOut)
    }
}
