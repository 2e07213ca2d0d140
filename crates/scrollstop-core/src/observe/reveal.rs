//! One-shot reveal triggers
//!
//! Each observed element fires the first time it intersects the viewport at
//! the configured threshold, then it is dropped from the watch list.

use tracing::debug;

use super::intersection::{meets_threshold, Viewport};
use crate::layout::Rect;

/// What happened when an element was handed to the observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Watching; it fires from a later `scan`
    Watching,
    /// Observation is unavailable, so the element is final right away
    RevealedNow,
}

#[derive(Debug, Clone)]
pub struct RevealObserver<K> {
    threshold: f64,
    margin_bottom: f64,
    supported: bool,
    watched: Vec<K>,
}

impl<K: Clone + PartialEq> RevealObserver<K> {
    pub fn new(threshold: f64, margin_bottom: f64, supported: bool) -> Self {
        Self {
            threshold,
            margin_bottom,
            supported,
            watched: Vec::new(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn observe(&mut self, key: K) -> Observation {
        if !self.supported {
            return Observation::RevealedNow;
        }
        if !self.watched.contains(&key) {
            self.watched.push(key);
        }
        Observation::Watching
    }

    pub fn unobserve(&mut self, key: &K) {
        self.watched.retain(|k| k != key);
    }

    pub fn watching(&self) -> usize {
        self.watched.len()
    }

    /// Fire every watched element now intersecting, in observation order
    ///
    /// `rect_of` returning `None` means the element is gone; it stays
    /// watched and is skipped.
    pub fn scan<F>(&mut self, top: f64, height: f64, mut rect_of: F) -> Vec<K>
    where
        F: FnMut(&K) -> Option<Rect>,
    {
        let viewport = Viewport::new(top, height).with_margins(0.0, self.margin_bottom);
        let mut fired = Vec::new();
        self.watched.retain(|key| {
            let Some(rect) = rect_of(key) else {
                return true;
            };
            if meets_threshold(rect, &viewport, self.threshold) {
                fired.push(key.clone());
                false
            } else {
                true
            }
        });
        if !fired.is_empty() {
            debug!(count = fired.len(), "Elements entered the viewport");
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rects(key: &&str) -> Option<Rect> {
        match *key {
            "hero" => Some(Rect::new(0.0, 200.0)),
            "about" => Some(Rect::new(900.0, 200.0)),
            "footer" => Some(Rect::new(1900.0, 100.0)),
            _ => None,
        }
    }

    #[test]
    fn test_fires_once_then_unwatches() {
        let mut observer = RevealObserver::new(0.08, -40.0, true);
        for key in ["hero", "about", "footer", "missing"] {
            assert_eq!(observer.observe(key), Observation::Watching);
        }

        assert_eq!(observer.scan(0.0, 800.0, rects), vec!["hero"]);
        assert_eq!(observer.scan(0.0, 800.0, rects), Vec::<&str>::new());

        assert_eq!(observer.scan(800.0, 800.0, rects), vec!["about"]);
        // Scrolling back does not re-fire
        assert!(observer.scan(0.0, 800.0, rects).is_empty());
        assert_eq!(observer.watching(), 2);
    }

    #[test]
    fn test_bottom_margin_delays_reveal() {
        let mut observer = RevealObserver::new(0.08, -40.0, true);
        observer.observe("about");
        // Top 20px of "about" visible, all of it inside the excluded bottom band
        assert!(observer.scan(120.0, 800.0, rects).is_empty());
        assert_eq!(observer.scan(160.0, 800.0, rects), vec!["about"]);
    }

    #[test]
    fn test_unsupported_reveals_immediately() {
        let mut observer = RevealObserver::new(0.08, -40.0, false);
        assert_eq!(observer.observe("footer"), Observation::RevealedNow);
        assert_eq!(observer.watching(), 0);
        assert!(observer.scan(0.0, 800.0, rects).is_empty());
    }
}
