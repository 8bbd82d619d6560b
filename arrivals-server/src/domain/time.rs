//! Wait-time arithmetic.
//!
//! The feed reports predicted arrivals as Unix epoch seconds. Waits are
//! expressed in fractional minutes and smoothed with an exponential moving
//! average.

/// Seconds since the Unix epoch.
pub type EpochSecs = i64;

/// Smoothing factor for the moving average wait.
///
/// Closer to 0 is steadier, closer to 1 reacts faster to each new estimate.
pub const SMOOTHING_ALPHA: f64 = 0.25;

/// Minutes from `now` until `arrival`, clamped at zero.
pub fn wait_minutes(arrival: EpochSecs, now: EpochSecs) -> f64 {
    ((arrival - now) as f64 / 60.0).max(0.0)
}

/// Exponential moving average step: `α·sample + (1-α)·previous`.
pub fn smooth(previous: f64, sample: f64) -> f64 {
    SMOOTHING_ALPHA * sample + (1.0 - SMOOTHING_ALPHA) * previous
}
