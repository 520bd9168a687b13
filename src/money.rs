//! Money helpers shared by the ledger and the trip summary.
//!
//! Amounts are plain `f64`. Every "is this settled" style comparison goes
//! through [`EPSILON`] so rounding noise never shows up as a one-cent debt.

/// Tolerance for every money comparison.
pub const EPSILON: f64 = 0.01;

/// Treats missing, NaN and infinite values as zero.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `max(0, value)` after sanitizing.
pub fn non_negative(value: f64) -> f64 {
    sanitize(value).max(0.0)
}

/// What is still owed once `paid` has been credited against `owed`.
pub fn outstanding(owed: f64, paid: f64) -> f64 {
    non_negative(sanitize(owed) - sanitize(paid))
}

/// True when the amount is within tolerance of zero (or below it).
pub fn is_settled(value: f64) -> bool {
    value <= EPSILON
}

/// True when the amount is a real, positive debt.
pub fn is_outstanding(value: f64) -> bool {
    value > EPSILON
}

/// `part / whole * 100`, or 0% when `whole` is zero.
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole.abs() < f64::EPSILON {
        0.0
    } else {
        part / whole * 100.0
    }
}
