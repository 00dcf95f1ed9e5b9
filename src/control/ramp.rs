// Acceleration-limited ramp and output dead-band

/// Step `current` toward `target` by at most `accel_limit * dt`
///
/// Once the remaining gap is smaller than one step, the target is returned
/// exactly, so the ramp never overshoots.
pub fn ramp(dt: f64, current: f64, accel_limit: f64, target: f64) -> f64 {
    let max_dv = accel_limit * dt;

    if (target - current).abs() >= max_dv {
        if target > current {
            current + max_dv
        } else {
            current - max_dv
        }
    } else {
        target
    }
}

/// Snap values with magnitude below `threshold` to exactly zero
pub fn dead_band(value: f64, threshold: f64) -> f64 {
    if value.abs() < threshold { 0.0 } else { value }
}
