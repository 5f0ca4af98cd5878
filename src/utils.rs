//! Coordinate and angle helpers shared by all controllers.

use std::f64::consts::TAU;

/// Clamps `value` into `[min, max]`. NaN collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Normalizes an angle in radians to `[0, 2π)`.
pub fn normalize_angle(rad: f64) -> f64 {
    let normalized = rad - TAU * (rad / TAU).floor();
    // tiny negative inputs round up to exactly TAU
    if normalized >= TAU {
        0.0
    } else {
        normalized
    }
}

/// Euclidean length of the vector `(dx, dy)`.
pub fn distance(dx: f64, dy: f64) -> f64 {
    dx.hypot(dy)
}

/// Interpolates between two angles along the shorter arc.
///
/// `weight` of 0 yields `from`, 1 yields `to`. The result is in `(-π, π]`,
/// pass it through [`normalize_angle`] when a positive angle is needed.
pub fn lerp_angle(from: f64, to: f64, weight: f64) -> f64 {
    let cos = (1.0 - weight) * from.cos() + weight * to.cos();
    let sin = (1.0 - weight) * from.sin() + weight * to.sin();
    sin.atan2(cos)
}
