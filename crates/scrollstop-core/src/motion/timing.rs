//! Time calculation utilities for page animations

use std::time::Duration;

/// Animation progress (0.0 to 1.0) at `now` for an animation started at `start`
///
/// A zero duration is always complete. Timestamps before `start` count as 0.
#[inline]
pub fn progress(start: Duration, now: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Whether an animation started at `start` has run its full duration
#[inline]
pub fn is_complete(start: Duration, now: Duration, duration: Duration) -> bool {
    now.saturating_sub(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Frame interval for a target frame rate (~60fps fallback when zero)
#[inline]
pub fn frame_interval(fps: u32) -> Duration {
    if fps == 0 {
        Duration::from_millis(16)
    } else {
        Duration::from_secs_f64(1.0 / fps as f64)
    }
}
