//! Marquee carousels run only while their section is on screen

use tracing::debug;

use super::intersection::{meets_threshold, Viewport};
use crate::layout::Rect;

#[derive(Debug, Clone)]
pub struct CarouselGate {
    threshold: f64,
    supported: bool,
    running: bool,
}

impl CarouselGate {
    /// Paused by default; without observation support it runs unconditionally
    pub fn new(threshold: f64, supported: bool) -> Self {
        Self {
            threshold,
            supported,
            running: !supported,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Update from the section's position; true when the play state changed
    pub fn update(&mut self, section: Rect, viewport: &Viewport) -> bool {
        if !self.supported {
            return false;
        }
        let running = meets_threshold(section, viewport, self.threshold);
        if running == self.running {
            return false;
        }
        self.running = running;
        debug!(running, "Carousel play state changed");
        true
    }
}
