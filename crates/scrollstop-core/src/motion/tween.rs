//! A single eased value
//!
//! The target is supplied on every evaluation rather than stored, so a
//! caller can follow a destination that moves while the tween runs (section
//! offsets shift while the header resizes).

use std::time::Duration;

use super::easing::EasingType;
use super::timing::{is_complete, lerp, progress};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Animation start time
    start: Duration,
    /// Starting value
    from: f64,
    /// Animation duration
    duration: Duration,
    /// Easing function
    easing: EasingType,
}

impl Tween {
    pub fn new(start: Duration, from: f64, duration: Duration, easing: EasingType) -> Self {
        Self {
            start,
            from,
            duration,
            easing,
        }
    }

    pub fn origin(&self) -> f64 {
        self.from
    }

    pub fn start(&self) -> Duration {
        self.start
    }

    /// Eased progress at `now`
    #[inline]
    pub fn eased(&self, now: Duration) -> f64 {
        self.easing.apply(progress(self.start, now, self.duration))
    }

    /// Interpolated value at `now` toward `target`
    #[inline]
    pub fn value(&self, now: Duration, target: f64) -> f64 {
        lerp(self.from, target, self.eased(now))
    }

    #[inline]
    pub fn is_complete(&self, now: Duration) -> bool {
        is_complete(self.start, now, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_tween_follows_moving_target() {
        let tween = Tween::new(ms(0), 0.0, ms(100), EasingType::Linear);
        assert!((tween.value(ms(50), 100.0) - 50.0).abs() < 1e-9);
        // Target moved mid-flight: the same progress applies to the new target
        assert!((tween.value(ms(50), 200.0) - 100.0).abs() < 1e-9);
        assert_eq!(tween.value(ms(100), 300.0), 300.0);
        assert!(tween.is_complete(ms(100)));
    }

    #[test]
    fn test_cubic_tween_front_loaded() {
        let tween = Tween::new(ms(1000), 100.0, ms(600), EasingType::Cubic);
        let quarter = tween.value(ms(1150), 700.0);
        // Ease-out covers more than a quarter of the distance in a quarter of the time
        assert!(quarter > 100.0 + 600.0 * 0.25);
        assert!(!tween.is_complete(ms(1599)));
    }
}
