use std::io::{self, Stdout};
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use fixsteps_core::AppConfig;
use fixsteps_tui::{
    app::{App, STATUS_BAR_HEIGHT},
    event::EventHandler,
    widgets::{DocumentViewWidget, StatusBarWidget},
    Document,
};

pub fn run(config: AppConfig, path: &Path) -> Result<()> {
    let document =
        Document::load(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let (width, height) = terminal_size()?;
    let mut app = App::new(config, document, width, height)?;

    let event_handler = EventHandler::with_frame_fps(
        app.config.navigator.tick_rate_ms,
        app.config.navigator.frame_fps,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("fixsteps"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("Opened {}", path.display());
    let result = main_loop(&mut terminal, &mut app, &event_handler);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    app.start();

    loop {
        app.frame();

        terminal.draw(|frame| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(STATUS_BAR_HEIGHT)])
                .split(frame.area());

            DocumentViewWidget::render(frame, rows[0], app);
            app.hit_areas = StatusBarWidget::render(frame, rows[1], app);
        })?;

        // Frame rate while something moves, idle tick otherwise
        let event = if app.needs_fast_tick() {
            event_handler.next_frame()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            app.handle_event(event)?;
        }

        if app.should_quit {
            break;
        }
    }

    app.stop();
    Ok(())
}
