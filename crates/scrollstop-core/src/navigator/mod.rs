//! Section-snapping scroll controller
//!
//! Turns wheel, touch, keyboard and button input into an eased scroll from
//! one full-viewport section to the next. All state that the page scripts
//! kept in globals (current index, animation lock, compact header flag)
//! lives on one `SectionNavigator`, so several pages can run side by side
//! and tests can drive it with a simulated clock.
//!
//! # Usage
//!
//! ```ignore
//! let mut nav = SectionNavigator::new(NavigatorConfig::default());
//! nav.wheel(120.0, now, &layout);
//! // every frame
//! let scroll_top = nav.tick(now, &layout);
//! ```

pub mod gesture;
pub mod locate;

use std::time::Duration;

use tracing::{debug, info};

use crate::config::{NavigatorConfig, NavigatorMode};
use crate::layout::SectionLayout;
use crate::motion::{EasingType, Tween};

pub use gesture::{Direction, NavKey, TouchTracker, WheelGate};
pub use locate::section_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MotionKind {
    /// Section change; holds the input lock until it settles
    Transition,
    /// Return to the current section after a short drag; lock-free
    SnapBack,
}

#[derive(Debug, Clone)]
struct Motion {
    kind: MotionKind,
    target: usize,
    tween: Tween,
}

/// Result of advancing the navigator by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub scroll_top: f64,
    /// Set on the frame a section transition released the lock
    pub settled: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SectionNavigator {
    config: NavigatorConfig,
    current: usize,
    animating: bool,
    compact: bool,
    scroll_top: f64,
    last_wheel: Option<Duration>,
    wheel: WheelGate,
    touch: TouchTracker,
    motion: Option<Motion>,
    settle_check: Option<Duration>,
}

impl SectionNavigator {
    pub fn new(config: NavigatorConfig) -> Self {
        let wheel = WheelGate::new(Duration::from_millis(config.wheel_cooldown_ms));
        Self {
            config,
            current: 0,
            animating: false,
            compact: false,
            scroll_top: 0.0,
            last_wheel: None,
            wheel,
            touch: TouchTracker::default(),
            motion: None,
            settle_check: None,
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn mode(&self) -> NavigatorMode {
        self.config.mode
    }

    /// Whether a section transition holds the input lock
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Whether anything still needs per-frame updates
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animating || self.motion.is_some()
    }

    #[inline]
    pub fn is_compact(&self) -> bool {
        self.compact
    }

    #[inline]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Set the scroll offset directly, e.g. when the host restores a position
    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top.max(0.0);
    }

    /// Section the reader is on
    ///
    /// Chapter mode reports the tracked index. Scan mode derives it from the
    /// scroll offset with the reference-line scan.
    pub fn current_index<L: SectionLayout + ?Sized>(&self, layout: &L) -> usize {
        match self.config.mode {
            NavigatorMode::Chapter => self.current.min(layout.section_count().saturating_sub(1)),
            NavigatorMode::Scan => section_at(layout, self.scroll_top, self.config.current_ratio),
        }
    }

    /// Index of the pathway marker to highlight
    pub fn active_marker<L: SectionLayout + ?Sized>(&self, layout: &L) -> usize {
        self.current_index(layout)
    }

    /// Start an eased scroll to section `index`
    ///
    /// Returns false when the request is dropped: the lock is held, the index
    /// is out of range, or (chapter mode) it is already the current section.
    pub fn go_to<L: SectionLayout + ?Sized>(
        &mut self,
        index: usize,
        now: Duration,
        layout: &L,
    ) -> bool {
        if self.animating {
            debug!(index, "Navigation dropped: transition in flight");
            return false;
        }
        if index >= layout.section_count() {
            debug!(index, count = layout.section_count(), "Navigation dropped: out of range");
            return false;
        }
        if self.config.mode == NavigatorMode::Chapter && index == self.current {
            return false;
        }

        let from = self.current;
        self.animating = true;
        self.current = index;
        self.settle_check = None;
        // Header and content animate together
        self.compact = index > 0;
        self.motion = Some(Motion {
            kind: MotionKind::Transition,
            target: index,
            tween: Tween::new(
                now,
                self.scroll_top,
                Duration::from_millis(self.config.duration_ms),
                EasingType::Cubic,
            ),
        });
        info!(from, to = index, "Section transition started");
        true
    }

    /// Move one section in `direction` from the current one
    pub fn step<L: SectionLayout + ?Sized>(
        &mut self,
        direction: Direction,
        now: Duration,
        layout: &L,
    ) -> bool {
        if self.animating {
            return false;
        }
        let index = self.current_index(layout);
        let count = layout.section_count();
        let target = match direction {
            Direction::Next if index + 1 < count => index + 1,
            Direction::Previous if index > 0 => index - 1,
            _ => return false,
        };
        self.go_to(target, now, layout)
    }

    /// Advance animations to `now` and return the scroll offset to render
    pub fn tick<L: SectionLayout + ?Sized>(&mut self, now: Duration, layout: &L) -> FrameState {
        let mut settled = None;

        if let Some(motion) = self.motion.clone() {
            // Offsets move while the header resizes, so the target is re-read every frame
            let target = layout.section_offset(motion.target);
            if motion.tween.is_complete(now) {
                self.scroll_top = target;
                self.motion = None;
                if motion.kind == MotionKind::Transition {
                    settled = self.try_settle(now, layout);
                }
            } else {
                self.scroll_top = motion.tween.value(now, target);
            }
        } else if let Some(at) = self.settle_check {
            if now >= at {
                settled = self.try_settle(now, layout);
            }
        }

        FrameState {
            scroll_top: self.scroll_top,
            settled,
        }
    }

    /// Hard-snap to the target and release the lock unless a wheel gesture is still flowing
    fn try_settle<L: SectionLayout + ?Sized>(&mut self, now: Duration, layout: &L) -> Option<usize> {
        self.scroll_top = layout.section_offset(self.current);

        let window = Duration::from_millis(self.config.settle_window_ms);
        let wheel_open = self
            .last_wheel
            .is_some_and(|at| now.saturating_sub(at) < window);
        if wheel_open {
            self.settle_check = Some(now + Duration::from_millis(self.config.settle_recheck_ms));
            debug!(index = self.current, "Wheel momentum still flowing, holding lock");
            return None;
        }

        self.settle_check = None;
        self.animating = false;
        info!(index = self.current, "Section transition settled");
        Some(self.current)
    }

    /// Wheel input: one section per discrete gesture
    pub fn wheel<L: SectionLayout + ?Sized>(
        &mut self,
        delta_y: f64,
        now: Duration,
        layout: &L,
    ) -> bool {
        self.last_wheel = Some(now);
        let gesture_open = self.wheel.refresh(now);
        if self.animating || gesture_open {
            return false;
        }
        self.wheel.consume();

        match Direction::from_wheel(delta_y) {
            Some(direction) => self.step(direction, now, layout),
            None => false,
        }
    }

    /// Keyboard input; ignored while typing in a text field
    pub fn key<L: SectionLayout + ?Sized>(
        &mut self,
        key: NavKey,
        focus_in_text_input: bool,
        now: Duration,
        layout: &L,
    ) -> bool {
        if focus_in_text_input || self.animating {
            return false;
        }
        self.step(key.direction(), now, layout)
    }

    /// A "next" button inside section `section` was pressed
    pub fn next_button<L: SectionLayout + ?Sized>(
        &mut self,
        section: usize,
        now: Duration,
        layout: &L,
    ) -> bool {
        if self.animating {
            return false;
        }
        match self.config.mode {
            NavigatorMode::Chapter => self.go_to(self.current + 1, now, layout),
            NavigatorMode::Scan => {
                if section + 1 < layout.section_count() {
                    self.go_to(section + 1, now, layout)
                } else {
                    false
                }
            }
        }
    }

    pub fn touch_start(&mut self, y: f64) {
        if self.animating {
            return;
        }
        self.touch.begin(y, self.scroll_top);
    }

    /// Finger moved: drag the content along with it
    pub fn touch_move<L: SectionLayout + ?Sized>(&mut self, y: f64, layout: &L) {
        if self.animating {
            return;
        }
        if let Some(delta) = self.touch.delta(y) {
            // A drag takes over from any snap-back still easing
            self.motion = None;
            let dragged = self.touch.start_scroll() + delta * self.config.effective_drag_factor();
            self.scroll_top = dragged.clamp(0.0, layout.max_scroll());
        }
    }

    /// Finger lifted: change section past the threshold, otherwise snap back
    pub fn touch_end<L: SectionLayout + ?Sized>(
        &mut self,
        y: f64,
        now: Duration,
        layout: &L,
    ) -> bool {
        if self.animating {
            return false;
        }
        let Some(delta) = self.touch.finish(y) else {
            return false;
        };

        let threshold = self.config.swipe_threshold_px;
        let direction = if delta > threshold {
            Some(Direction::Next)
        } else if delta < -threshold {
            Some(Direction::Previous)
        } else {
            None
        };

        if let Some(direction) = direction {
            if self.step(direction, now, layout) {
                return true;
            }
        }
        self.snap_back(now, layout);
        false
    }

    /// Ease back to the current section without taking the lock
    pub fn snap_back<L: SectionLayout + ?Sized>(&mut self, now: Duration, layout: &L) {
        if layout.section_count() == 0 {
            return;
        }
        let target = self.current_index(layout);
        if (layout.section_offset(target) - self.scroll_top).abs() < f64::EPSILON {
            return;
        }
        self.motion = Some(Motion {
            kind: MotionKind::SnapBack,
            target,
            tween: Tween::new(
                now,
                self.scroll_top,
                Duration::from_millis(self.config.duration_ms),
                EasingType::Cubic,
            ),
        });
    }

    /// Scroll safety net: outside transitions, compact once past the threshold
    ///
    /// Catches positions the navigator did not produce itself, such as a
    /// restored scroll offset or a drag. Returns true when the flag changed.
    pub fn sync_compact(&mut self) -> bool {
        if self.animating {
            return false;
        }
        let compact = self.scroll_top > self.config.compact_scroll_px;
        if compact == self.compact {
            return false;
        }
        self.compact = compact;
        true
    }

    /// Re-align to the current section after the viewport changed size
    pub fn realign<L: SectionLayout + ?Sized>(&mut self, layout: &L) {
        if self.motion.is_some() || layout.section_count() == 0 {
            return;
        }
        self.scroll_top = layout.section_offset(self.current_index(layout));
    }
}
