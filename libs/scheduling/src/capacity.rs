//! Capacity normalization.
//!
//! Room capacity arrives from clients as whatever JSON they sent: a number,
//! a numeric string, null, or garbage. Every call site goes through this one
//! function so the coercion rules live in exactly one place.

use serde_json::Value;

/// Normalize a raw capacity value to an integer >= 1.
///
/// Finite numeric input of at least one is floored; everything else
/// (absent, null, fractional below one, zero, negative, non-numeric) falls
/// back to 1.
#[must_use]
pub fn normalize_capacity(raw: Option<&Value>) -> u32 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(f) if f.is_finite() && f >= 1.0 => f.floor().min(u32::MAX as f64) as u32,
        _ => 1,
    }
}
