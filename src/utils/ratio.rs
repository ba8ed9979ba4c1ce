//! Division helpers for derived metrics.
//!
//! Every derived column (per-post ratios, engagement rate, percentage change)
//! divides by a counter that can legitimately be zero: a brand new account has
//! no posts, a deleted one has no followers. Those rows carry a missing value
//! instead of an infinity or a NaN so that downstream comparisons and renderers
//! only ever deal with one "no value" marker.

// ============================================
// Division Helpers
// ============================================

/// Divide two values, returning None when the result is not finite.
/// Covers `x / 0`, `0 / 0` and NaN inputs.
#[inline]
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    let value = numerator / denominator;
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}

/// Percentage of `part` over `whole`, e.g. engagement over followers.
#[inline]
pub fn percent_of(part: f64, whole: f64) -> Option<f64> {
    ratio(100.0 * part, whole)
}

/// Percentage change from `past` to `current`.
///
/// Computed as `(current - past) * 100 / past` so that integral inputs give
/// exact results where possible (100 -> 110 is exactly 10.0).
#[inline]
pub fn percent_change(current: f64, past: f64) -> Option<f64> {
    ratio((current - past) * 100.0, past)
}
