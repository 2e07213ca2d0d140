use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme::Theme;

const HELP: &[(&str, &str)] = &[
    ("j / ↓ / Space", "next section"),
    ("k / ↑", "previous section"),
    ("PgDn / PgUp", "next / previous section"),
    ("wheel, drag", "scroll and swipe"),
    ("n", "press the section's next button"),
    ("1-9", "follow a nav link"),
    ("p", "play"),
    ("o, click", "open the embedded post"),
    ("q / Esc", "quit"),
];

pub struct PopupWidget;

impl PopupWidget {
    /// Render the key help dialog
    pub fn render_help(frame: &mut Frame, theme: &Theme) {
        let area = frame.area();
        let popup_width = 50u16.min(area.width.saturating_sub(4));
        let popup_height = (HELP.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keys ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.header));

        let lines: Vec<Line> = HELP
            .iter()
            .map(|(keys, action)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:<16}", keys),
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*action, Style::default().fg(theme.foreground)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
