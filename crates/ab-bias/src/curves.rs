//! Piecewise bias curves.
//!
//! Every curve maps a `[0, 1]` input to a weight that is strictly positive:
//! off-profile behavior stays possible, only less likely.  The constants are
//! tuned values; changing any of them shifts which behaviors agents pick.
//!
//! The three idle "battery" curves decay past their tolerance band with
//! different denominators (`1 − hi`, `lo`, `tol`).  Keep them distinct.

use crate::EnergyRange;

/// Lowest weight any final bias may take.
pub const MIN_BIAS: f32 = 0.05;

/// Weight for momentum outside a definition's energy range.
pub const OUT_OF_RANGE_BIAS: f32 = 0.1;

/// Keeps decay denominators away from zero at the edges of `[0, 1]`.
const EPS: f32 = 1e-6;

/// Clamp a blended weight into `[MIN_BIAS, 1.0]`.
#[inline]
pub fn clamp_bias(v: f32) -> f32 {
    if v.is_nan() { MIN_BIAS } else { v.clamp(MIN_BIAS, 1.0) }
}

/// Centered tent over `range`: 1.0 at the center, 0.5 at either edge, a flat
/// [`OUT_OF_RANGE_BIAS`] outside.
pub fn scalar_bias(momentum: f32, range: EnergyRange) -> f32 {
    if momentum.is_nan() || !range.contains(momentum) {
        return OUT_OF_RANGE_BIAS;
    }
    let half = (range.high() - range.low()) * 0.5;
    if half <= 0.0 {
        return 1.0;
    }
    let offset = (momentum - range.center()).abs() / half;
    clamp_bias(1.0 - 0.5 * offset.min(1.0))
}

/// Monotonic battery ramp: 0.05 below `baseline − slack`, 1.0 at or above
/// `baseline`, linear in between.
pub fn battery_bias(value: f32, baseline: f32, slack: f32) -> f32 {
    let floor = baseline - slack;
    if value < floor {
        MIN_BIAS
    } else if value >= baseline {
        1.0
    } else {
        MIN_BIAS + (1.0 - MIN_BIAS) * ((value - floor) / slack)
    }
}

/// Rewards a drained battery: 0.95 at or below `midpoint − tolerance`,
/// falling linearly to 0.55 at `midpoint + tolerance`, then decaying toward
/// 0.15 as the overshoot approaches 1.0.
pub fn favour_low_battery(value: f32, midpoint: f32, tolerance: f32) -> f32 {
    let lo = midpoint - tolerance;
    let hi = midpoint + tolerance;
    if value <= lo {
        0.95
    } else if value >= hi {
        let overshoot = (value - hi) / (1.0 - hi).max(EPS);
        (0.55 - 0.40 * overshoot).max(0.15)
    } else {
        0.95 - 0.40 * ((value - lo) / (hi - lo))
    }
}

/// Mirror of [`favour_low_battery`]: rewards a full battery.
pub fn favour_high_battery(value: f32, midpoint: f32, tolerance: f32) -> f32 {
    let lo = midpoint - tolerance;
    let hi = midpoint + tolerance;
    if value >= hi {
        0.95
    } else if value <= lo {
        let overshoot = (lo - value) / lo.max(EPS);
        (0.55 - 0.40 * overshoot).max(0.15)
    } else {
        0.55 + 0.40 * ((value - lo) / (hi - lo))
    }
}

/// Rewards values within `tolerance` of `midpoint` (1.0 → 0.75 at the band
/// edge) and penalises both tails equally, bottoming out at 0.15.
pub fn favour_centered_battery(value: f32, midpoint: f32, tolerance: f32) -> f32 {
    let distance = (value - midpoint).abs();
    if distance <= tolerance {
        if tolerance <= 0.0 {
            return 1.0;
        }
        1.0 - 0.25 * (distance / tolerance)
    } else {
        let overshoot = (distance - tolerance) / tolerance.max(EPS);
        (0.75 - 0.60 * overshoot).max(0.15)
    }
}
