use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use scrollstop_core::config::NavigatorMode;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let host = &app.host;

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else if host.is_transitioning() {
            " PLAY".to_string()
        } else {
            let mode = match host.navigator().mode() {
                NavigatorMode::Chapter => "CHAPTER",
                NavigatorMode::Scan => "SCAN",
            };
            let count = host.spec().sections.len();
            format!(
                " {} | Section {}/{} | {}",
                mode,
                app.current_section() + 1,
                count,
                host.location().href()
            )
        };

        let help_hint = " q:quit j/k:sections n:next p:play o:open ?:help ";
        let padding_len = area
            .width
            .saturating_sub(status_text.chars().count() as u16 + help_hint.len() as u16)
            as usize;

        let bar = Style::default().bg(theme.header);
        let line = Line::from(vec![
            Span::styled(status_text, bar.fg(theme.foreground)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.muted)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
