use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::debug;

use scrollstop_core::layout::Rect;
use scrollstop_core::page::{ElementId, ElementKind, FrameReport, PageEffect, PageHost, PageSpec};
use scrollstop_core::{AppConfig, PageInput};

use crate::theme::Theme;

/// Marquee tile width in columns, plus one column of gap
pub const TILE_WIDTH: u16 = 30;
pub const TILE_GAP: u16 = 1;

/// Source of page time
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    Real(Instant),
    /// Advanced explicitly, for tests
    Manual(Duration),
}

impl Clock {
    pub fn now(&self) -> Duration {
        match self {
            Clock::Real(start) => start.elapsed(),
            Clock::Manual(now) => *now,
        }
    }
}

/// Application state
pub struct App {
    pub host: PageHost,
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    clock: Clock,
    /// Should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    pub show_help: bool,
    /// Embed under the mouse button, until it is released
    pub pressed_embed: Option<ElementId>,
    /// Terminal cells the page is drawn in
    pub page_size: (u16, u16),
}

impl App {
    pub fn new(spec: PageSpec, config: Arc<AppConfig>, theme: Theme, cols: u16, rows: u16) -> Result<Self> {
        Self::with_clock(spec, config, theme, cols, rows, Clock::Real(Instant::now()))
    }

    pub fn with_clock(
        spec: PageSpec,
        config: Arc<AppConfig>,
        theme: Theme,
        cols: u16,
        rows: u16,
        clock: Clock,
    ) -> Result<Self> {
        let ppr = config.ui.px_per_row;
        let host = PageHost::new(
            spec,
            (*config).clone(),
            f64::from(cols) * ppr / 2.0,
            f64::from(rows) * ppr,
        )?;
        Ok(Self {
            host,
            config,
            theme,
            clock,
            should_quit: false,
            status_message: None,
            show_help: false,
            pressed_embed: None,
            page_size: (cols, rows),
        })
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Move a manual clock forward; no effect on the real clock
    pub fn advance(&mut self, by: Duration) {
        if let Clock::Manual(now) = &mut self.clock {
            *now += by;
        }
    }

    /// Page pixels per terminal row
    pub fn px_per_row(&self) -> f64 {
        self.config.ui.px_per_row.max(1.0)
    }

    /// Page pixels per terminal column; cells are about twice as tall as wide
    pub fn px_per_col(&self) -> f64 {
        self.px_per_row() / 2.0
    }

    /// Terminal row to viewport pixels
    pub fn row_to_px(&self, row: u16) -> f64 {
        f64::from(row) * self.px_per_row()
    }

    pub fn col_to_px(&self, col: u16) -> f64 {
        f64::from(col) * self.px_per_col()
    }

    /// Screen row of a content-space offset, may be off screen
    pub fn screen_row(&self, content_y: f64) -> i32 {
        ((content_y - self.host.navigator().scroll_top()) / self.px_per_row()).floor() as i32
    }

    /// Height in rows of a content-space extent, at least one
    pub fn rows_for(&self, height: f64) -> i32 {
        ((height / self.px_per_row()).round() as i32).max(1)
    }

    /// Rows currently covered by the header
    pub fn header_rows(&self) -> u16 {
        (self.host.header_height(self.now()) / self.px_per_row()).round() as u16
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        debug!(cols, rows, "Terminal resized");
        self.page_size = (cols, rows);
        let input = PageInput::Resize {
            width: self.col_to_px(cols),
            height: self.row_to_px(rows),
        };
        self.apply(input);
    }

    /// Feed one input to the page
    pub fn apply(&mut self, input: PageInput) -> Option<PageEffect> {
        let now = self.now();
        self.host.handle(input, now)
    }

    /// Advance the page one frame
    pub fn update(&mut self) -> FrameReport {
        let now = self.now();
        let report = self.host.frame(now);
        if let Some(destination) = &report.navigate {
            let intro = self.host.arrive(destination);
            if intro {
                self.set_status(format!("Arrived at {} (intro played)", destination));
            } else {
                self.set_status(format!("Arrived at {}", destination));
            }
        }
        report
    }

    /// Whether the next poll should use the animation frame rate
    pub fn needs_fast_update(&self) -> bool {
        self.host.is_animating(self.now())
    }

    /// Section the reader is on
    pub fn current_section(&self) -> usize {
        let layout = self.host.layout(self.now());
        self.host.navigator().current_index(&layout)
    }

    /// Marquee shift in columns for a carousel section, wrapped at the loop seam
    pub fn marquee_shift(&self, section: usize) -> i32 {
        let tiles = self
            .host
            .elements()
            .iter()
            .filter(|e| e.section == section && matches!(e.kind, ElementKind::Embed { .. }))
            .count() as i32;
        let half = (tiles / 2).max(1) * i32::from(TILE_WIDTH + TILE_GAP);
        let offset = self
            .host
            .carousels()
            .iter()
            .find(|c| c.section == section)
            .map(|c| c.offset())
            .unwrap_or(0.0);
        (offset / self.px_per_col()) as i32 % half
    }

    /// Embed element drawn at a screen cell
    pub fn embed_at(&self, col: u16, row: u16) -> Option<ElementId> {
        let rects = self.host.element_rects(self.now());
        let spec = self.host.spec();
        let mut tile = 0i32;
        let mut tile_section = usize::MAX;

        for (i, element) in self.host.elements().iter().enumerate() {
            if !matches!(element.kind, ElementKind::Embed { .. }) {
                continue;
            }
            let rect: Rect = rects[i];
            let top = self.screen_row(rect.top);
            let bottom = top + self.rows_for(rect.height);
            let row = i32::from(row);
            let in_rows = row >= top && row < bottom;

            if spec.sections[element.section].carousel {
                if element.section != tile_section {
                    tile_section = element.section;
                    tile = 0;
                }
                let x = tile * i32::from(TILE_WIDTH + TILE_GAP) - self.marquee_shift(element.section);
                tile += 1;
                let col = i32::from(col);
                if in_rows && col >= x && col < x + i32::from(TILE_WIDTH) {
                    return Some(ElementId(i));
                }
            } else if in_rows {
                return Some(ElementId(i));
            }
        }
        None
    }

    /// First embed with a visible row, skipping loop duplicates
    pub fn first_visible_embed(&self) -> Option<ElementId> {
        let rects = self.host.element_rects(self.now());
        let rows = i32::from(self.page_size.1);
        self.host
            .elements()
            .iter()
            .enumerate()
            .find(|(i, e)| {
                let ElementKind::Embed { duplicate, .. } = e.kind else {
                    return false;
                };
                let top = self.screen_row(rects[*i].top);
                let bottom = top + self.rows_for(rects[*i].height);
                !duplicate && bottom > 0 && top < rows
            })
            .map(|(i, _)| ElementId(i))
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_app() -> App {
        let mut config = AppConfig::default();
        config.transition.seed = Some(5);
        config.transition.audio = false;
        App::with_clock(
            PageSpec::demo().unwrap(),
            Arc::new(config),
            Theme::default(),
            100,
            40,
            Clock::Manual(Duration::ZERO),
        )
        .unwrap()
    }

    /// Run frames for `ms` milliseconds of page time
    pub(crate) fn run_for(app: &mut App, ms: u64) {
        for _ in 0..ms / 16 {
            app.advance(Duration::from_millis(16));
            app.update();
        }
    }

    #[test]
    fn test_viewport_follows_terminal_size() {
        let app = test_app();
        assert_eq!(app.host.viewport(), (800.0, 640.0));
        assert_eq!(app.header_rows(), 3);
    }

    #[test]
    fn test_key_navigation_reaches_next_section() {
        let mut app = test_app();
        app.update();
        app.apply(PageInput::Key {
            key: scrollstop_core::navigator::NavKey::ArrowDown,
            in_text_input: false,
        });
        run_for(&mut app, 1000);
        assert_eq!(app.current_section(), 1);
        assert_eq!(app.header_rows(), 1);
    }

    #[test]
    fn test_transition_arrival_sets_status() {
        let mut app = test_app();
        app.apply(PageInput::Click {
            href: "game.html".into(),
        });
        assert!(app.needs_fast_update());
        run_for(&mut app, 2000);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Arrived at game.html (intro played)")
        );
    }

    #[test]
    fn test_resize_realigns_page() {
        let mut app = test_app();
        app.resize(60, 20);
        assert_eq!(app.host.viewport(), (480.0, 320.0));
    }

    #[test]
    fn test_embed_lookup_on_work_section() {
        let mut app = test_app();
        app.apply(PageInput::Click {
            href: "#work".into(),
        });
        run_for(&mut app, 1000);

        let embed = app.first_visible_embed().unwrap();
        let rects = app.host.element_rects(app.now());
        let row = app.screen_row(rects[embed.0].top) as u16;
        // Marquee barely moved, so the first tile still sits at the left edge
        assert_eq!(app.embed_at(1, row), Some(embed));
        assert_eq!(app.embed_at(1, 0), None);
    }
}
