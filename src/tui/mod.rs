// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard and mouse input, timer ticks)
// - Receiving the single fetch result and applying it to the app state

pub mod app;
pub mod theme;
pub mod ui;

use crate::config::Config;
use crate::logging::LogBuffer;
use crate::users::loader::{spawn_fetch, FetchResult};
use crate::users::{SortKey, UserClient};
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::oneshot;

/// Run the TUI
///
/// Starts the user fetch, sets up the terminal, runs the event loop, and
/// restores the terminal when done.
pub async fn run_tui(config: Config, log_buffer: LogBuffer) -> Result<()> {
    // Kick off the fetch before the first frame so the loading state is real
    let fetch_rx = spawn_fetch(UserClient::new(config.endpoint.clone()));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::with_config(log_buffer, &config);

    let result = run_event_loop(&mut terminal, &mut app, Some(fetch_rx)).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Wait for the fetch result; pends forever once it has been taken
async fn settled(
    rx: &mut Option<oneshot::Receiver<FetchResult>>,
) -> Result<FetchResult, oneshot::error::RecvError> {
    match rx {
        Some(rx) => rx.await,
        None => std::future::pending().await,
    }
}

/// Main event loop
///
/// Waits on terminal input, a redraw tick and the fetch result with
/// tokio::select!, and is the only place app state is mutated.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut fetch_rx: Option<oneshot::Receiver<FetchResult>>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard or mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            // Periodic tick for the spinner
            _ = tick_interval.tick() => {
                app.tick_animation();
            }

            // The one fetch result
            result = settled(&mut fetch_rx) => {
                fetch_rx = None;
                match result {
                    Ok(result) => app.apply_fetch_result(result),
                    Err(_) => app.fail("Error fetching users: loader task ended without a result"),
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Control chords → load state → table keys
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    // Some terminals report releases too
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    // Layer 1: Control chords work in every state
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        match key_event.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('t') => app.next_theme(),
            KeyCode::Char('u') if !app.is_loading() => app.clear_query(),
            _ => {}
        }
        return;
    }

    // Layer 2: nothing to interact with until the table is shown
    if app.is_loading() || app.load.error().is_some() {
        if matches!(key_event.code, KeyCode::Esc | KeyCode::Char('q')) {
            app.should_quit = true;
        }
        return;
    }

    // Layer 3: table and search input
    match key_event.code {
        KeyCode::Esc => {
            if app.directory.query().is_empty() {
                app.should_quit = true;
            } else {
                app.clear_query();
            }
        }
        KeyCode::F(n @ 1..=3) => app.activate_header(SortKey::all()[(n - 1) as usize]),
        KeyCode::Tab | KeyCode::Right => app.cursor_next(),
        KeyCode::BackTab | KeyCode::Left => app.cursor_prev(),
        KeyCode::Enter => app.activate_header(app.header_cursor),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::ALT) => {
            app.push_query_char(c)
        }
        _ => {}
    }
}

/// Handle mouse input: header clicks sort, the wheel moves the selection
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.click(mouse_event.column, mouse_event.row);
        }
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::theme::ThemeKind;
    use crate::users::tests::bob_and_alice;
    use crate::users::{LoadState, SortOrder};
    use ratatui::layout::Rect;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn loaded() -> App {
        let mut app = App::new(LogBuffer::new(), "http://test/users", ThemeKind::Dark);
        app.apply_fetch_result(Ok(bob_and_alice()));
        app
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            handle_key_event(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_filters() {
        let mut app = loaded();
        type_str(&mut app, "ALI");
        assert_eq!(app.directory.query(), "ALI");
        assert_eq!(app.directory.len(), 1);

        handle_key_event(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.directory.query(), "AL");
    }

    #[test]
    fn test_q_is_typed_not_quit_once_loaded() {
        let mut app = loaded();
        type_str(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.directory.query(), "q");
    }

    #[test]
    fn test_esc_clears_query_then_quits() {
        let mut app = loaded();
        type_str(&mut app, "bob");
        handle_key_event(&mut app, press(KeyCode::Esc));
        assert_eq!(app.directory.query(), "");
        assert!(!app.should_quit);

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_function_keys_sort() {
        let mut app = loaded();
        handle_key_event(&mut app, press(KeyCode::F(1)));
        assert_eq!(app.directory.sort().order, SortOrder::Descending);

        handle_key_event(&mut app, press(KeyCode::F(3)));
        assert_eq!(app.directory.sort().key, SortKey::Phone);
        assert_eq!(app.directory.sort().order, SortOrder::Ascending);
    }

    #[test]
    fn test_header_cursor_and_enter() {
        let mut app = loaded();
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.header_cursor, SortKey::Email);
        // Moving the cursor alone does not sort
        assert_eq!(app.directory.sort().key, SortKey::Name);

        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.directory.sort().key, SortKey::Email);

        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.directory.sort().order, SortOrder::Descending);

        handle_key_event(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.header_cursor, SortKey::Name);
    }

    #[test]
    fn test_keys_ignored_while_loading() {
        let mut app = App::new(LogBuffer::new(), "http://test/users", ThemeKind::Dark);
        type_str(&mut app, "abc");
        handle_key_event(&mut app, press(KeyCode::F(2)));
        assert_eq!(app.directory.query(), "");
        assert_eq!(app.directory.sort().key, SortKey::Name);

        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_in_any_state() {
        let mut app = loaded();
        handle_key_event(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_u_clears_and_ctrl_t_switches_theme() {
        let mut app = loaded();
        type_str(&mut app, "al");
        handle_key_event(&mut app, ctrl('u'));
        assert_eq!(app.directory.query(), "");

        handle_key_event(&mut app, ctrl('t'));
        assert_eq!(app.theme_kind, ThemeKind::Light);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = loaded();
        let mut release = press(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        handle_key_event(&mut app, release);
        assert_eq!(app.directory.query(), "");
    }

    #[test]
    fn test_mouse_click_on_header() {
        let mut app = loaded();
        app.header_hits = vec![(Rect::new(20, 7, 15, 1), SortKey::Email)];

        handle_mouse_event(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 25,
                row: 7,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert_eq!(app.directory.sort().key, SortKey::Email);
    }

    #[tokio::test]
    async fn test_settled_delivers_then_pends() {
        let (tx, rx) = oneshot::channel();
        let mut slot = Some(rx);
        tx.send(Ok(bob_and_alice())).unwrap();

        let result = settled(&mut slot).await.unwrap().unwrap();
        assert_eq!(result.len(), 2);

        slot = None;
        let pending = tokio::time::timeout(Duration::from_millis(20), settled(&mut slot)).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn test_dropped_sender_surfaces_as_failure() {
        let (tx, rx) = oneshot::channel::<FetchResult>();
        drop(tx);
        let mut slot = Some(rx);
        assert!(settled(&mut slot).await.is_err());

        let mut app = App::new(LogBuffer::new(), "http://test/users", ThemeKind::Dark);
        app.fail("Error fetching users: loader task ended without a result");
        assert!(matches!(app.load, LoadState::Failed(_)));
        assert!(!app.is_loading());
    }
}
