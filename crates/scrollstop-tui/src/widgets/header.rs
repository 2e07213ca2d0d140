use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use scrollstop_core::page::NavLink;

use super::canvas::{fill_row, put};
use crate::app::App;

/// Column span (start, width) of each nav label, right-aligned in `width`
pub fn link_columns(links: &[NavLink], width: u16) -> Vec<(u16, u16)> {
    let widths: Vec<u16> = links
        .iter()
        .map(|l| UnicodeWidthStr::width(l.label.as_str()) as u16 + 2)
        .collect();
    let total = widths.iter().sum::<u16>() + widths.len() as u16;
    let mut x = width.saturating_sub(total);
    widths
        .into_iter()
        .map(|w| {
            let span = (x, w);
            x += w + 1;
            span
        })
        .collect()
}

/// Nav link under column `col`
pub fn link_at(links: &[NavLink], width: u16, col: u16) -> Option<usize> {
    link_columns(links, width)
        .iter()
        .position(|&(start, w)| col >= start && col < start + w)
}

pub struct HeaderWidget;

impl HeaderWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 {
            return;
        }
        let theme = &app.theme;
        let base = Style::default().bg(theme.header).fg(theme.foreground);
        let buf = frame.buffer_mut();
        for row in 0..area.height {
            fill_row(buf, area, i32::from(row), base);
        }

        // Title and links share the middle row
        let row = i32::from(area.height / 2);
        let spec = app.host.spec();
        let title_style = base.fg(theme.accent).add_modifier(Modifier::BOLD);
        let title = if app.host.is_compact() {
            spec.title.clone()
        } else {
            format!("▚ {}", spec.title)
        };
        put(buf, area, 2, row, &title, title_style);

        let active = app.host.active_links();
        for (i, (start, _)) in link_columns(&spec.nav, area.width).into_iter().enumerate() {
            let style = if active.contains(&i) {
                base.fg(theme.background)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                base.fg(theme.muted)
            };
            let label = format!(" {} ", spec.nav[i].label);
            put(buf, area, i32::from(start), row, &label, style);
        }
    }
}
