pub mod app;
pub mod input;
pub mod ui;

use std::io;
use std::time::{Duration, Instant};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::error;
use crate::clock::SystemClock;
use app::{App, InputMode};
use ui::ui;

pub fn run_tui(tick: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Box::new(SystemClock));

    let res = run_app(&mut terminal, &mut app, tick);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("TUI loop failed: {}", err);
        return Err(err.into());
    }

    Ok(())
}

/// Draws whenever the store published a change or a key was handled, and
/// at least once per `tick` so overdue highlighting keeps up with the clock.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, tick: Duration) -> io::Result<()> {
    let mut last_draw = Instant::now();
    loop {
        if app.take_dirty() || last_draw.elapsed() >= tick {
            terminal.draw(|f| ui(f, app))?;
            last_draw = Instant::now();
        }

        let timeout = tick.saturating_sub(last_draw.elapsed());
        if !event::poll(timeout)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !handle_key(app, key) {
                return Ok(());
            }
            app.mark_dirty();
        }
    }
}

/// Routes a key press to the app. Returns `false` when the user quits.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char(' ') => app.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('a') => app.start_add(),
            KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
            _ => {}
        },
        InputMode::Adding | InputMode::Editing => match key.code {
            KeyCode::Enter => app.submit(),
            KeyCode::Esc => app.leave_form(),
            KeyCode::Tab | KeyCode::BackTab => app.switch_field(),
            KeyCode::Char(c) => app.edit_input(|i| i.handle_char(c)),
            KeyCode::Backspace => app.edit_input(|i| i.handle_backspace()),
            KeyCode::Delete => app.edit_input(|i| i.handle_delete()),
            KeyCode::Left => app.edit_input(|i| i.move_cursor_left()),
            KeyCode::Right => app.edit_input(|i| i.move_cursor_right()),
            KeyCode::Home => app.edit_input(|i| i.move_home()),
            KeyCode::End => app.edit_input(|i| i.move_end()),
            _ => {}
        },
    }
    true
}
