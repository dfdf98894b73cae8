//! Terminal lifecycle and the main event loop.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::{App, AppMode};
use crate::config::Config;
use crate::infra::probe::MvtProbe;
use crate::ui;

pub mod mode;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);
const TICK_INTERVAL: Duration = Duration::from_millis(250);
const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Outcome of handling one key press.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventResult {
    Continue,
    Quit,
}

/// Runs the dashboard until the user quits, restoring the terminal on exit.
///
/// # Errors
/// Returns an error when the terminal cannot be set up or drawn.
pub async fn run(mut app: App, config: &Config) -> io::Result<()> {
    if config.skip_tool_check {
        app.skip_tool_check();
    } else {
        app.start_tool_check(Arc::new(MvtProbe::new()));
    }

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app).await;

    let restored = restore_terminal(&mut terminal);
    app.shutdown_jobs(JOB_SHUTDOWN_TIMEOUT).await;
    restored?;
    info!("mvtty exited");

    result
}

fn setup_terminal() -> io::Result<TuiTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);

    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut TuiTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

async fn event_loop(terminal: &mut TuiTerminal, app: &mut App) -> io::Result<()> {
    let mut input_rx = spawn_input_reader();
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            input = input_rx.recv() => {
                let Some(input) = input else {
                    return Ok(());
                };
                let Event::Key(key) = input? else {
                    continue;
                };
                if handle_key(app, key) == EventResult::Quit {
                    return Ok(());
                }
            }
            Some(event) = app.next_app_event() => {
                app.apply_app_events(event);
            }
            _ = tick.tick() => {
                app.process_pending_app_events();
            }
        }
    }
}

/// Forwards terminal events from a blocking reader thread.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<io::Result<Event>> {
    let (input_tx, input_rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        loop {
            match event::poll(INPUT_POLL_INTERVAL) {
                Ok(false) => {}
                Ok(true) => {
                    if input_tx.send(event::read()).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    let _ = input_tx.send(Err(error));
                    break;
                }
            }

            if input_tx.is_closed() {
                break;
            }
        }
    });

    input_rx
}

/// Routes a key press to the handler of the current mode.
pub(crate) fn handle_key(app: &mut App, key: KeyEvent) -> EventResult {
    if key.kind == KeyEventKind::Release {
        return EventResult::Continue;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        debug!("quit requested with ctrl-c");

        return EventResult::Quit;
    }

    match app.mode {
        AppMode::Normal => mode::normal::handle(app, key),
        AppMode::Editing { .. } => mode::edit::handle(app, key),
        AppMode::PathPicker(_) => mode::picker::handle(app, key),
        AppMode::Message { .. } => mode::message::handle(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::mode::test_support::new_test_app;

    #[test]
    fn test_handle_key_quits_on_ctrl_c_in_any_mode() {
        // Arrange
        let mut app = new_test_app();
        app.mode = AppMode::Editing {
            draft: "typing".to_string(),
        };

        // Act
        let event_result = handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );

        // Assert
        assert_eq!(event_result, EventResult::Quit);
    }

    #[test]
    fn test_handle_key_routes_to_edit_mode() {
        // Arrange
        let mut app = new_test_app();
        app.mode = AppMode::Editing {
            draft: String::new(),
        };

        // Act
        let event_result = handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
        );

        // Assert
        assert_eq!(event_result, EventResult::Continue);
        assert_eq!(
            app.mode,
            AppMode::Editing {
                draft: "q".to_string()
            }
        );
    }
}
