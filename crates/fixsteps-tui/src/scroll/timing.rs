//! Time helpers for scroll animations.

use std::time::{Duration, Instant};

/// Fraction of `duration` elapsed between `start` and `now`, clamped to [0, 1]
#[inline]
pub fn progress(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete(start: Instant, duration: Duration, now: Instant) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Interpolate between two scroll offsets, rounding to the nearest row
#[inline]
pub fn lerp_u16(from: u16, to: u16, t: f64) -> u16 {
    let value = from as f64 + (to as f64 - from as f64) * t;
    value.round().clamp(0.0, u16::MAX as f64) as u16
}
