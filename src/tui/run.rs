//! Viewer main loop.
//!
//! Takes over the terminal (raw mode, alternate screen, mouse capture,
//! hidden cursor) and restores it on every exit path, including panics.
//!
//! Each frame:
//! 1. Check the shutdown flag and the app's quit state
//! 2. Size the report viewport from the terminal and advance timers
//! 3. Render
//! 4. Poll for one input event
//! 5. Sleep out the rest of the ~60 FPS frame
//!
//! # Example
//!
//! ```no_run
//! use polaris::config::Config;
//! use polaris::tui::{run_tui, App};
//!
//! let mut app = App::from_config(&Config::default()).unwrap();
//! run_tui(&mut app, None).unwrap();
//! ```

use std::io::{self, Stdout};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use super::app::App;
use super::events::{AppEvent, EventHandler};
use super::ui::{render, report_viewport};

/// 60 FPS, rounded down.
const FRAME_DURATION: Duration = Duration::from_millis(16);

const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for viewer operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),

    /// The viewer was interrupted by a shutdown signal.
    #[error("interrupted by shutdown signal")]
    Interrupted,
}

/// Result type for viewer operations.
pub type TuiResult<T> = Result<T, TuiError>;

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the viewer until the user quits.
///
/// The terminal is restored even on error or panic.
///
/// # Errors
///
/// Returns [`TuiError::Io`] or [`TuiError::Event`] for terminal failures and
/// [`TuiError::Interrupted`] if `shutdown_flag` was raised.
pub fn run_tui(app: &mut App, shutdown_flag: Option<Arc<AtomicBool>>) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = setup_terminal().and_then(|mut terminal| {
        let result = run_loop(&mut terminal, app, shutdown_flag.as_deref());
        restore_terminal();
        result
    });

    let _ = panic::take_hook();
    result
}

fn run_loop(
    terminal: &mut Terminal,
    app: &mut App,
    shutdown_flag: Option<&AtomicBool>,
) -> TuiResult<()> {
    let event_handler = EventHandler::new();
    let mut last_render = Instant::now();

    loop {
        if shutdown_flag.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
            log::info!("Shutdown signal received, exiting viewer");
            app.quit();
            return Err(TuiError::Interrupted);
        }

        if app.should_quit() {
            log::debug!("App requested quit");
            break;
        }

        let size = terminal.size()?;
        let (width, rows) = report_viewport(Rect::new(0, 0, size.width, size.height));
        app.set_viewport(width, rows);
        app.tick(Instant::now());

        terminal.draw(|frame| render(frame, app))?;

        if let Some(event) = event_handler.poll(POLL_TIMEOUT)? {
            handle_event(app, event);
        }

        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }

    log::info!("Viewer exited normally");
    Ok(())
}

fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => app.handle_key(key, Instant::now()),
        AppEvent::Scroll(rows) => app.scroll_rows(rows),
        // The next frame re-measures the viewport
        AppEvent::Resize(width, height) => log::trace!("Resized to {}x{}", width, height),
    }
}

fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("Setting up terminal");

    terminal::enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        cursor::Hide
    )?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Best effort; every step runs even if an earlier one fails.
fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    );
    log::debug!("Terminal restored");
}
