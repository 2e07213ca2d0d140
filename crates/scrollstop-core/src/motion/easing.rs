//! Pure easing functions for page animations
//!
//! Every curve maps input [0, 1] to output [0, 1]. Section scrolling,
//! header resizes and counters all use ease-out cubic.

/// Easing curve for animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EasingType {
    /// Constant speed
    Linear,
    /// Ease-out cubic: 1 - (1-t)^3
    #[default]
    Cubic,
}

impl EasingType {
    /// Apply the easing function to a progress value, clamped to [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::Cubic => ease_out_cubic(t),
        }
    }
}

/// Ease-out cubic: f(t) = 1 - (1-t)³
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_boundaries() {
        for easing in [EasingType::Linear, EasingType::Cubic] {
            assert!(easing.apply(0.0).abs() < 0.001, "{:?} at t=0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", easing);
            assert_eq!(easing.apply(-1.0), 0.0);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in [EasingType::Linear, EasingType::Cubic] {
            let mut prev = 0.0;
            for i in 0..=10 {
                let t = i as f64 / 10.0;
                let v = easing.apply(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_default_is_cubic() {
        assert_eq!(EasingType::default(), EasingType::Cubic);
        assert_eq!(EasingType::default().apply(0.5), ease_out_cubic(0.5));
    }

    #[test]
    fn test_cubic_midpoint() {
        // 1 - 0.5^3
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }
}
