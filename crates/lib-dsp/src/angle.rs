//! Helpers for periodic quantities (phases, angles).

use std::f64::consts::PI;

/// One full turn in radians.
pub const TAU: f64 = 2.0 * PI;

/// Wrap a value into `[center - period/2, center + period/2)`.
#[inline]
pub fn wrap_around(value: f64, period: f64, center: f64) -> f64 {
    value - period * ((value - center + period / 2.0) / period).floor()
}

/// Wrap a phase into `[-π, π)`.
#[inline]
pub fn wrap(phase: f64) -> f64 {
    wrap_around(phase, TAU, 0.0)
}

/// Unwrap a sequence of periodic values in place.
///
/// Walks the sequence keeping a running correction: whenever the corrected
/// jump to the next value exceeds half a period, a full period is removed
/// (or added) from that point on.
pub fn unwrap_with_period(values: &mut [f64], period: f64) {
    let half = period / 2.0;
    let mut adjust = 0.0;
    for i in 1..values.len() {
        let jump = values[i] - values[i - 1] + adjust;
        if jump > half {
            adjust -= period;
        } else if jump < -half {
            adjust += period;
        }
        values[i] += adjust;
    }
}

/// Unwrap phases (radians) in place.
#[inline]
pub fn unwrap(phases: &mut [f64]) {
    unwrap_with_period(phases, TAU);
}
