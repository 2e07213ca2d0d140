//! Section geometry inside the scroll container
//!
//! Offsets are measured in page pixels from the top of the scrollable
//! content. They are not stable: the header shrinks when the page goes
//! compact and every section below it moves up with it.

use std::time::Duration;

use crate::motion::{EasingType, Tween};

/// How long the header takes to change height
pub const HEADER_RESIZE: Duration = Duration::from_millis(300);

/// Read-only view of the sections the navigator moves between
pub trait SectionLayout {
    fn section_count(&self) -> usize;

    /// Offset of section `index` from the top of the scrollable content
    fn section_offset(&self, index: usize) -> f64;

    /// Visible height of the scroll container
    fn viewport_height(&self) -> f64;

    /// Largest reachable scroll offset
    fn max_scroll(&self) -> f64 {
        match self.section_count() {
            0 => 0.0,
            n => self.section_offset(n - 1),
        }
    }
}

/// Vertical extent of an element in content coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Site header that shrinks to a compact bar after the first section
#[derive(Debug, Clone)]
pub struct Header {
    full_height: f64,
    compact_height: f64,
    compact: bool,
    resize: Option<Tween>,
}

impl Header {
    pub fn new(full_height: f64, compact_height: f64) -> Self {
        Self {
            full_height,
            compact_height,
            compact: false,
            resize: None,
        }
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    /// Switch mode; the height eases toward the new size from wherever it is now
    pub fn set_compact(&mut self, compact: bool, now: Duration) {
        if compact == self.compact {
            return;
        }
        let from = self.height(now);
        self.compact = compact;
        self.resize = Some(Tween::new(now, from, HEADER_RESIZE, EasingType::Cubic));
    }

    fn target_height(&self) -> f64 {
        if self.compact {
            self.compact_height
        } else {
            self.full_height
        }
    }

    /// Rendered height at `now`
    pub fn height(&self, now: Duration) -> f64 {
        match &self.resize {
            Some(tween) if !tween.is_complete(now) => tween.value(now, self.target_height()),
            _ => self.target_height(),
        }
    }

    pub fn is_resizing(&self, now: Duration) -> bool {
        self.resize.as_ref().is_some_and(|t| !t.is_complete(now))
    }
}

/// Full-viewport sections stacked under a top padding equal to the header height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedLayout {
    pub header_height: f64,
    pub viewport_height: f64,
    pub section_count: usize,
}

impl StackedLayout {
    pub fn new(header_height: f64, viewport_height: f64, section_count: usize) -> Self {
        Self {
            header_height,
            viewport_height,
            section_count,
        }
    }

    /// Rect covering section `index`
    pub fn section_rect(&self, index: usize) -> Rect {
        Rect::new(self.section_offset(index), self.viewport_height)
    }

    /// Total scrollable height
    pub fn content_height(&self) -> f64 {
        self.header_height + self.viewport_height * self.section_count as f64
    }
}

impl SectionLayout for StackedLayout {
    fn section_count(&self) -> usize {
        self.section_count
    }

    fn section_offset(&self, index: usize) -> f64 {
        self.header_height + self.viewport_height * index as f64
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn max_scroll(&self) -> f64 {
        (self.content_height() - self.viewport_height).max(0.0)
    }
}

/// Explicit offsets, for pages whose sections differ in height
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLayout {
    pub offsets: Vec<f64>,
    pub viewport_height: f64,
}

impl SectionLayout for FixedLayout {
    fn section_count(&self) -> usize {
        self.offsets.len()
    }

    fn section_offset(&self, index: usize) -> f64 {
        self.offsets.get(index).copied().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}
