use crate::ui::app::App;
use crate::ui::{draw, view};
use chrono::Local;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io;
use tracing::debug;

/// Runs the interactive tracker until the user quits. The terminal is
/// restored even when the loop fails.
pub fn run(app: &mut App) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

    let result = event_loop(app);

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;

    result
}

fn event_loop(app: &mut App) -> Result<(), String> {
    let backend = ratatui::backend::CrosstermBackend::new(io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)
        .map_err(|e| format!("Failed to initialize terminal: {}", e))?;

    loop {
        app.today = Local::now().date_naive();
        let screen = view::render(app);
        terminal
            .draw(|frame| draw::draw(frame, &screen))
            .map_err(|e| format!("Failed to draw terminal UI: {}", e))?;

        if event::poll(std::time::Duration::from_millis(200))
            .map_err(|e| format!("Failed to poll input: {}", e))?
        {
            match event::read().map_err(|e| format!("Failed to read input: {}", e))? {
                Event::Key(key) => {
                    if app.handle_key(key) {
                        debug!("Quit requested");
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    Ok(())
}
