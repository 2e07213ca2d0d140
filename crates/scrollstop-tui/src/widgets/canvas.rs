//! Clipped drawing at signed cell coordinates
//!
//! Page content scrolls past the edges of the terminal, so positions are
//! computed as signed offsets from the area origin and clipped here.

use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthChar;

/// Write `text` at (`col`, `row`) relative to `area`, dropping anything outside
pub fn put(buf: &mut Buffer, area: Rect, col: i32, row: i32, text: &str, style: Style) {
    if row < 0 || row >= i32::from(area.height) {
        return;
    }
    let y = area.y + row as u16;
    let mut x = col;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0) as i32;
        if width == 0 {
            continue;
        }
        if x >= 0 && x + width <= i32::from(area.width) {
            if let Some(cell) = buf.cell_mut((area.x + x as u16, y)) {
                cell.set_char(ch).set_style(style);
            }
        }
        x += width;
    }
}

/// Fill a whole row of `area` with `style`
pub fn fill_row(buf: &mut Buffer, area: Rect, row: i32, style: Style) {
    if row < 0 || row >= i32::from(area.height) {
        return;
    }
    let y = area.y + row as u16;
    for x in area.x..area.x + area.width {
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_char(' ').set_style(style);
        }
    }
}

/// Outlined box with a title on the top border and one line of body text
pub fn tile(
    buf: &mut Buffer,
    area: Rect,
    (col, row): (i32, i32),
    (width, height): (i32, i32),
    title: &str,
    body: &str,
    (border, text): (Style, Style),
) {
    if width < 4 || height < 2 {
        return;
    }
    let inner = (width - 2) as usize;
    let title = fit(title, inner.saturating_sub(2));
    let top = format!("┌ {} {}┐", title, "─".repeat(inner.saturating_sub(title.chars().count() + 2)));
    put(buf, area, col, row, &top, border);

    for r in 1..height - 1 {
        put(buf, area, col, row + r, "│", border);
        put(buf, area, col + width - 1, row + r, "│", border);
    }
    if height > 2 {
        put(buf, area, col + 2, row + height / 2, &fit(body, inner.saturating_sub(2)), text);
    }

    let bottom = format!("└{}┘", "─".repeat(inner));
    put(buf, area, col, row + height - 1, &bottom, border);
}

/// Truncate to `max` characters with an ellipsis
pub fn fit(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max <= 1 {
        s.chars().take(max).collect()
    } else {
        let truncated: String = s.chars().take(max - 1).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_put_clips_left_and_right() {
        let area = Rect::new(0, 0, 5, 2);
        let mut buf = Buffer::empty(area);
        put(&mut buf, area, -2, 0, "abcdefg", Style::default());
        assert_eq!(row_text(&buf, 0), "cdefg");
        put(&mut buf, area, 3, 1, "xyz", Style::default());
        assert_eq!(row_text(&buf, 1), "   xy");
        // Off-screen rows are ignored
        put(&mut buf, area, 0, 5, "zzz", Style::default());
        put(&mut buf, area, 0, -1, "zzz", Style::default());
    }

    #[test]
    fn test_tile_draws_outline() {
        let area = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(area);
        let style = Style::default();
        tile(&mut buf, area, (0, 0), (12, 4), "ig", "post", (style, style));
        assert_eq!(row_text(&buf, 0), "┌ ig ──────┐");
        assert_eq!(row_text(&buf, 2), "│ post     │");
        assert_eq!(row_text(&buf, 3), "└──────────┘");
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("hello", 10), "hello");
        assert_eq!(fit("hello world", 6), "hello…");
    }
}
