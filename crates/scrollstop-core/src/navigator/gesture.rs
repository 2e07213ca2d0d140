//! Raw gesture bookkeeping: wheel debouncing, touch drags, key mapping

use std::time::Duration;

/// Which way a gesture moves through the sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Direction of a vertical wheel delta (positive scrolls down)
    pub fn from_wheel(delta_y: f64) -> Option<Self> {
        if delta_y > 0.0 {
            Some(Direction::Next)
        } else if delta_y < 0.0 {
            Some(Direction::Previous)
        } else {
            None
        }
    }
}

/// Navigation keys the page listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    PageDown,
    PageUp,
    Space,
}

impl NavKey {
    pub fn direction(self) -> Direction {
        match self {
            NavKey::ArrowDown | NavKey::PageDown | NavKey::Space => Direction::Next,
            NavKey::ArrowUp | NavKey::PageUp => Direction::Previous,
        }
    }

    /// Parse a DOM-style key name ("ArrowDown", "PageUp", " ")
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowDown" => Some(NavKey::ArrowDown),
            "ArrowUp" => Some(NavKey::ArrowUp),
            "PageDown" => Some(NavKey::PageDown),
            "PageUp" => Some(NavKey::PageUp),
            " " | "Space" => Some(NavKey::Space),
            _ => None,
        }
    }
}

/// One section per physical wheel gesture
///
/// Every wheel event, including momentum events, pushes the expiry out by
/// the cooldown. Only the first event after a quiet period is let through.
#[derive(Debug, Clone)]
pub struct WheelGate {
    cooldown: Duration,
    cooling: bool,
    expires: Option<Duration>,
}

impl WheelGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            cooling: false,
            expires: None,
        }
    }

    /// Record a wheel event at `now`; true when the gesture is still open
    pub fn refresh(&mut self, now: Duration) -> bool {
        if self.expires.is_some_and(|at| now >= at) {
            self.cooling = false;
        }
        self.expires = Some(now + self.cooldown);
        self.cooling
    }

    /// Mark the current gesture as consumed
    pub fn consume(&mut self) {
        self.cooling = true;
    }

    pub fn is_cooling(&self, now: Duration) -> bool {
        self.cooling && self.expires.is_some_and(|at| now < at)
    }
}

/// Finger position tracking between touch start and end
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    start_y: Option<f64>,
    start_scroll: f64,
}

impl TouchTracker {
    pub fn begin(&mut self, y: f64, scroll_top: f64) {
        self.start_y = Some(y);
        self.start_scroll = scroll_top;
    }

    pub fn is_active(&self) -> bool {
        self.start_y.is_some()
    }

    /// Upward finger movement since the touch began (positive means swipe up)
    pub fn delta(&self, y: f64) -> Option<f64> {
        self.start_y.map(|start| start - y)
    }

    /// Scroll offset the drag is measured from
    pub fn start_scroll(&self) -> f64 {
        self.start_scroll
    }

    /// Finish the touch, returning the final delta
    pub fn finish(&mut self, y: f64) -> Option<f64> {
        let delta = self.delta(y);
        self.start_y = None;
        delta
    }
}
