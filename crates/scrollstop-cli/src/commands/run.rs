use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use scrollstop_core::page::PageEffect;
use scrollstop_core::{AppConfig, PageInput, PageSpec};
use scrollstop_tui::{
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event, Action},
    ui, App, Theme,
};

pub fn run(config: Arc<AppConfig>, page: PageSpec) -> Result<()> {
    info!(title = %page.title, sections = page.sections.len(), "Opening page");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Scrollstop"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config, page);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Arc<AppConfig>,
    page: PageSpec,
) -> Result<()> {
    let theme = Theme::from_overrides(&config.ui.theme);

    // The bottom row belongs to the status bar
    let size = terminal.size()?;
    let mut app = App::new(
        page,
        config.clone(),
        theme,
        size.width,
        size.height.saturating_sub(1),
    )?;

    // Create event handler with animation FPS support
    let event_handler = EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.fps);

    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = true;

    // Main loop
    loop {
        app.update();

        terminal.draw(|frame| ui::draw(frame, &app))?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    handle_action(&mut app, action);
                }
                AppEvent::Mouse(mouse) => {
                    let action = handle_mouse_event(mouse, &mut app);
                    handle_action(&mut app, action);
                }
                AppEvent::Resize(width, height) => {
                    app.resize(width, height.saturating_sub(1));
                }
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => {
            app.should_quit = true;
        }
        Action::Page(input) => {
            if let Some(effect) = app.apply(input) {
                handle_effect(app, effect);
            }
        }
        Action::OpenEmbed => match app.first_visible_embed() {
            Some(element) => {
                if let Some(effect) = app.apply(PageInput::EmbedClick { element }) {
                    handle_effect(app, effect);
                }
            }
            None => app.set_status("No post in view"),
        },
        Action::ToggleHelp => {
            app.show_help = !app.show_help;
        }
        Action::None => {}
    }
}

fn handle_effect(app: &mut App, effect: PageEffect) {
    match effect {
        PageEffect::OpenUrl(url) => {
            debug!(%url, "Opening post");
            match open::that(&url) {
                Ok(_) => app.set_status(format!("Opened in browser: {}", url)),
                Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
            }
        }
        PageEffect::Navigate(href) => {
            info!(%href, "Navigation requested");
            app.set_status(format!("Navigate: {}", href));
        }
    }
}
