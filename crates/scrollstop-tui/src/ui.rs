use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::App;
use crate::widgets::{HeaderWidget, PageWidget, PopupWidget, StatusBarWidget, TransitionWidget};

/// Draw one frame of the whole screen
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Main layout: page + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);
    let page_area = main_layout[0];

    if let Some(scene) = app.host.scene() {
        TransitionWidget::render(frame, page_area, app, scene);
    } else {
        PageWidget::render(frame, page_area, app);
        // The header is fixed over the top of the scrolling content
        let header_rows = app.header_rows().min(page_area.height);
        let header_area = Rect::new(page_area.x, page_area.y, page_area.width, header_rows);
        HeaderWidget::render(frame, header_area, app);
    }

    StatusBarWidget::render(frame, main_layout[1], app);

    if app.show_help {
        PopupWidget::render_help(frame, &app.theme);
    }
}
