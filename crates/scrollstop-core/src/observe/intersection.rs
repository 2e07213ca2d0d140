//! Intersection math between elements and the scroll container's viewport

use crate::layout::Rect;

/// Visible window of the scroll container plus observer root margins
///
/// Margins follow CSS `rootMargin`: positive values grow the observed
/// area, negative values shrink it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Viewport {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height,
            margin_top: 0.0,
            margin_bottom: 0.0,
        }
    }

    pub fn with_margins(mut self, margin_top: f64, margin_bottom: f64) -> Self {
        self.margin_top = margin_top;
        self.margin_bottom = margin_bottom;
        self
    }

    fn root_top(&self) -> f64 {
        self.top - self.margin_top
    }

    fn root_bottom(&self) -> f64 {
        self.top + self.height + self.margin_bottom
    }
}

/// Fraction of `rect` inside the viewport, in [0, 1]
///
/// A zero-height element counts as fully visible while its top edge lies
/// inside the root.
pub fn intersection_ratio(rect: Rect, viewport: &Viewport) -> f64 {
    let root_top = viewport.root_top();
    let root_bottom = viewport.root_bottom();
    if root_bottom <= root_top {
        return 0.0;
    }

    if rect.height <= 0.0 {
        return if rect.top >= root_top && rect.top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }

    let overlap = rect.bottom().min(root_bottom) - rect.top.max(root_top);
    (overlap.max(0.0) / rect.height).clamp(0.0, 1.0)
}

/// Whether `rect` is intersecting with at least `threshold` of its area visible
pub fn meets_threshold(rect: Rect, viewport: &Viewport, threshold: f64) -> bool {
    let ratio = intersection_ratio(rect, viewport);
    ratio > 0.0 && ratio >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_partial_overlap() {
        let viewport = Viewport::new(0.0, 100.0);
        assert_eq!(intersection_ratio(Rect::new(50.0, 100.0), &viewport), 0.5);
        assert_eq!(intersection_ratio(Rect::new(-20.0, 40.0), &viewport), 0.5);
        assert_eq!(intersection_ratio(Rect::new(10.0, 20.0), &viewport), 1.0);
        assert_eq!(intersection_ratio(Rect::new(200.0, 20.0), &viewport), 0.0);
    }

    #[test]
    fn test_negative_bottom_margin_shrinks_root() {
        let viewport = Viewport::new(0.0, 100.0).with_margins(0.0, -40.0);
        // Element in the bottom 40px is outside the shrunken root
        assert_eq!(intersection_ratio(Rect::new(70.0, 20.0), &viewport), 0.0);
        assert_eq!(intersection_ratio(Rect::new(50.0, 20.0), &viewport), 0.5);
    }

    #[test]
    fn test_zero_height_element() {
        let viewport = Viewport::new(100.0, 100.0);
        assert_eq!(intersection_ratio(Rect::new(150.0, 0.0), &viewport), 1.0);
        assert_eq!(intersection_ratio(Rect::new(250.0, 0.0), &viewport), 0.0);
    }

    #[test]
    fn test_threshold_requires_overlap() {
        let viewport = Viewport::new(0.0, 100.0);
        assert!(!meets_threshold(Rect::new(100.0, 50.0), &viewport, 0.0));
        assert!(meets_threshold(Rect::new(90.0, 50.0), &viewport, 0.0));
        assert!(!meets_threshold(Rect::new(90.0, 50.0), &viewport, 0.5));
    }
}
