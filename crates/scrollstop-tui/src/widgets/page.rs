use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};

use scrollstop_core::layout::SectionLayout;
use scrollstop_core::page::{ElementId, ElementKind};

use super::canvas::{fill_row, fit, put, tile};
use crate::app::{App, TILE_GAP, TILE_WIDTH};

/// Left margin of section content
const MARGIN: i32 = 4;

/// Scrolling page content: sections, their elements and the pathway markers
pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let now = app.now();
        let host = &app.host;
        let base = Style::default().bg(theme.background).fg(theme.foreground);
        let muted = base.fg(theme.muted);
        let accent = base.fg(theme.accent).add_modifier(Modifier::BOLD);

        let buf = frame.buffer_mut();
        for row in 0..area.height {
            fill_row(buf, area, i32::from(row), base);
        }

        let layout = host.layout(now);
        let (_, viewport_height) = host.viewport();
        let (hero_x, hero_y) = host.hero_offset();
        let ppc = app.px_per_col();
        let ppr = app.px_per_row();

        for (index, section) in host.spec().sections.iter().enumerate() {
            let top = app.screen_row(layout.section_offset(index));
            let rows = app.rows_for(viewport_height);
            if top + rows < 0 || top >= i32::from(area.height) {
                continue;
            }

            if index > 0 {
                put(buf, area, 0, top, &"─".repeat(area.width as usize), muted);
            }

            // Hero title drifts with the pointer
            let (dx, dy) = if index == 0 {
                ((hero_x / ppc).round() as i32, (hero_y / ppr).round() as i32)
            } else {
                (0, 0)
            };
            put(buf, area, MARGIN + dx, top + 2 + dy, &section.title, accent);

            if section.next_button {
                put(buf, area, MARGIN, top + rows - 2, "[n] next ↓", muted);
            }
        }

        let rects = host.element_rects(now);
        let mut tile_index = 0i32;
        let mut tile_section = usize::MAX;

        for (i, element) in host.elements().iter().enumerate() {
            let rect = rects[i];
            let row = app.screen_row(rect.top);
            let height = app.rows_for(rect.height);
            if row + height < 0 || row >= i32::from(area.height) {
                continue;
            }

            match &element.kind {
                ElementKind::Text(text) => put(buf, area, MARGIN, row, text, muted),
                ElementKind::Reveal { text, revealed } => {
                    if *revealed {
                        put(buf, area, MARGIN, row, &format!("▸ {}", text), base);
                    }
                }
                ElementKind::Metric { label, .. } => {
                    let value = host.element_text(ElementId(i), now);
                    put(buf, area, MARGIN, row, &format!("{:>8}", value), accent);
                    put(buf, area, MARGIN + 10, row, label, muted);
                }
                ElementKind::Embed { overlay, .. } => {
                    let src = host.element_text(ElementId(i), now);
                    let title = if src.contains("instagram.com") {
                        "instagram"
                    } else {
                        "embed"
                    };
                    let body = overlay.post_url().unwrap_or(&src);
                    let styles = (muted, base);

                    if host.spec().sections[element.section].carousel {
                        if element.section != tile_section {
                            tile_section = element.section;
                            tile_index = 0;
                        }
                        let x = tile_index * i32::from(TILE_WIDTH + TILE_GAP)
                            - app.marquee_shift(element.section);
                        tile_index += 1;
                        let size = (i32::from(TILE_WIDTH), height);
                        tile(buf, area, (x, row), size, title, body, styles);
                    } else {
                        let width = (i32::from(area.width) - MARGIN * 2).max(4);
                        tile(buf, area, (MARGIN, row), (width, height), title, body, styles);
                    }
                }
            }
        }

        // Pathway: one marker per section on the right edge
        let count = host.spec().sections.len() as i32;
        let marker = host.navigator().active_marker(&layout) as i32;
        let first = (i32::from(area.height) - count * 2) / 2;
        let x = i32::from(area.width) - 3;
        for i in 0..count {
            let (glyph, style) = if i == marker {
                ("●", accent)
            } else {
                ("○", muted)
            };
            put(buf, area, x, first + i * 2, glyph, style);
        }

        if let Some(title) = host.spec().sections.get(marker as usize).map(|s| s.title.as_str()) {
            let label = fit(title, 24);
            let col = x - 2 - label.chars().count() as i32;
            put(buf, area, col, first + marker * 2, &label, muted);
        }
    }
}
