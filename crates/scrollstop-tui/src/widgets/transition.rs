use ratatui::{layout::Rect, style::Style, Frame};

use scrollstop_core::transition::Scene;

use super::canvas::fill_row;
use crate::app::App;

/// Full-screen transition overlay
pub struct TransitionWidget;

impl TransitionWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, scene: &Scene) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let theme = &app.theme;
        let buf = frame.buffer_mut();

        for row in 0..area.height {
            let bg = match scene.flash {
                Some(alpha) => theme.flash_color(alpha),
                // Every other row is a darker scanline
                None if row % 2 == 1 => theme.scanline_color(),
                None => theme.background,
            };
            fill_row(buf, area, i32::from(row), Style::default().bg(bg));
        }

        let (width, height) = app.host.viewport();
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let sx = f64::from(area.width) / width;
        let sy = f64::from(area.height) / height;

        for sprite in &scene.sprites {
            if sprite.alpha <= 0.0 {
                continue;
            }
            let col = (sprite.x * sx).floor();
            let row = (sprite.y * sy).floor();
            if col < 0.0 || row < 0.0 || col >= f64::from(area.width) || row >= f64::from(area.height) {
                continue;
            }
            let position = (area.x + col as u16, area.y + row as u16);
            if let Some(cell) = buf.cell_mut(position) {
                cell.set_char(sprite.glyph)
                    .set_fg(theme.tint_color(sprite.tint, sprite.alpha));
            }
        }
    }
}
