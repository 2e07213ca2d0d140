use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use scrollstop_core::navigator::NavKey;
use scrollstop_core::PageInput;

use crate::app::App;
use crate::widgets::header::link_at;

/// Wheel delta reported for one notch of terminal scrolling
const WHEEL_NOTCH: f64 = 100.0;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Forward to the page
    Page(PageInput),
    /// Open the post behind the first visible embed
    OpenEmbed,
    ToggleHelp,
    None,
}

fn nav_key(key: NavKey) -> Action {
    Action::Page(PageInput::Key {
        key,
        in_text_input: false,
    })
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if app.show_help {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Action::ToggleHelp,
            _ => Action::None,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => nav_key(NavKey::ArrowDown),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => nav_key(NavKey::ArrowUp),
        (KeyCode::PageDown, _) => nav_key(NavKey::PageDown),
        (KeyCode::PageUp, _) => nav_key(NavKey::PageUp),
        (KeyCode::Char(' '), _) => nav_key(NavKey::Space),

        (KeyCode::Char('n'), _) => Action::Page(PageInput::NextButton {
            section: app.current_section(),
        }),
        (KeyCode::Char('p'), _) => Action::Page(PageInput::Click {
            href: app.config.transition.trigger_href.clone(),
        }),
        (KeyCode::Char(c @ '1'..='9'), _) => {
            let index = c as usize - '1' as usize;
            match app.host.spec().nav.get(index) {
                Some(link) => Action::Page(PageInput::Click {
                    href: link.href.clone(),
                }),
                None => Action::None,
            }
        }
        (KeyCode::Char('o'), _) => Action::OpenEmbed,
        (KeyCode::Char('?'), _) => Action::ToggleHelp,
        _ => Action::None,
    }
}

/// Handle a mouse event; tracks which embed a press started on
pub fn handle_mouse_event(mouse: MouseEvent, app: &mut App) -> Action {
    let y = app.row_to_px(mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollDown => Action::Page(PageInput::Wheel {
            delta_y: WHEEL_NOTCH,
        }),
        MouseEventKind::ScrollUp => Action::Page(PageInput::Wheel {
            delta_y: -WHEEL_NOTCH,
        }),
        MouseEventKind::Down(MouseButton::Left) => {
            if mouse.row < app.header_rows() {
                let links = &app.host.spec().nav;
                return match link_at(links, app.page_size.0, mouse.column) {
                    Some(index) => Action::Page(PageInput::Click {
                        href: links[index].href.clone(),
                    }),
                    None => Action::None,
                };
            }
            match app.embed_at(mouse.column, mouse.row) {
                Some(element) => {
                    app.pressed_embed = Some(element);
                    Action::Page(PageInput::EmbedTouchStart { element, y })
                }
                None => Action::Page(PageInput::TouchStart { y }),
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if app.pressed_embed.is_none() => {
            Action::Page(PageInput::TouchMove { y })
        }
        MouseEventKind::Up(MouseButton::Left) => match app.pressed_embed.take() {
            Some(element) => Action::Page(PageInput::EmbedTouchEnd { element, y }),
            None => Action::Page(PageInput::TouchEnd { y }),
        },
        MouseEventKind::Moved => Action::Page(PageInput::PointerMove {
            x: app.col_to_px(mouse.column),
            y,
        }),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{run_for, test_app};
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_navigation_keys() {
        let app = test_app();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('j')), &app),
            nav_key(NavKey::ArrowDown)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::PageUp), &app),
            nav_key(NavKey::PageUp)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char(' ')), &app),
            nav_key(NavKey::Space)
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), &app), Action::Quit);
    }

    #[test]
    fn test_play_and_link_keys() {
        let app = test_app();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('p')), &app),
            Action::Page(PageInput::Click {
                href: "game.html".into()
            })
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('2')), &app),
            Action::Page(PageInput::Click {
                href: "#work".into()
            })
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('9')), &app), Action::None);
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut app = test_app();
        app.show_help = true;
        assert_eq!(handle_key_event(key(KeyCode::Char('j')), &app), Action::None);
        assert_eq!(handle_key_event(key(KeyCode::Esc), &app), Action::ToggleHelp);
    }

    #[test]
    fn test_mouse_wheel_and_drag() {
        let mut app = test_app();
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollDown, 10, 10), &mut app),
            Action::Page(PageInput::Wheel { delta_y: 100.0 })
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 20), &mut app),
            Action::Page(PageInput::TouchStart { y: 320.0 })
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 15), &mut app),
            Action::Page(PageInput::TouchMove { y: 240.0 })
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 15), &mut app),
            Action::Page(PageInput::TouchEnd { y: 240.0 })
        );
    }

    #[test]
    fn test_press_on_embed_becomes_tap() {
        let mut app = test_app();
        app.apply(PageInput::Click {
            href: "#work".into(),
        });
        run_for(&mut app, 1000);
        let embed = app.first_visible_embed().unwrap();
        let rects = app.host.element_rects(app.now());
        let row = app.screen_row(rects[embed.0].top) as u16;

        let down = handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 1, row), &mut app);
        assert_eq!(
            down,
            Action::Page(PageInput::EmbedTouchStart {
                element: embed,
                y: app.row_to_px(row)
            })
        );
        // Dragging over an embed does not move the page
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 1, row), &mut app),
            Action::None
        );
        let up = handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 1, row), &mut app);
        assert!(matches!(up, Action::Page(PageInput::EmbedTouchEnd { .. })));
        assert!(app.pressed_embed.is_none());
    }
}
