// TUI application state
//
// Owns the load state, the user directory (query, sort, derived view) and
// the bits of UI state the table needs: header cursor, row selection and the
// header hit boxes recorded during the last render.

use super::theme::{Theme, ThemeKind};
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::users::loader::FetchResult;
use crate::users::{Directory, LoadState, SortKey};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::TableState;

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: usize = 10;

/// Main application state for the TUI
pub struct App {
    /// Loading lifecycle; settles once
    pub load: LoadState,

    /// Source collection, query, sort and derived view
    pub directory: Directory,

    /// Header focused by keyboard navigation (Enter activates it)
    pub header_cursor: SortKey,

    /// Row selection for the table widget
    pub table_state: TableState,

    /// Header cell areas from the last frame, for mouse activation
    pub header_hits: Vec<(Rect, SortKey)>,

    /// Endpoint being loaded (shown in the title bar)
    pub endpoint: String,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Log buffer for the status bar
    pub log_buffer: LogBuffer,

    /// Current color theme
    pub theme_kind: ThemeKind,
    pub theme: Theme,

    /// Animation frame counter for the loading spinner
    animation_frame: usize,
}

impl App {
    pub fn new(log_buffer: LogBuffer, endpoint: impl Into<String>, theme_kind: ThemeKind) -> Self {
        Self {
            load: LoadState::Loading,
            directory: Directory::new(),
            header_cursor: SortKey::default(),
            table_state: TableState::default(),
            header_hits: Vec::new(),
            endpoint: endpoint.into(),
            should_quit: false,
            log_buffer,
            theme_kind,
            theme: theme_kind.theme(),
            animation_frame: 0,
        }
    }

    pub fn with_config(log_buffer: LogBuffer, config: &Config) -> Self {
        Self::new(
            log_buffer,
            config.endpoint.clone(),
            ThemeKind::from_name(&config.theme),
        )
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_loading()
    }

    /// Apply the settled fetch; later calls are ignored
    pub fn apply_fetch_result(&mut self, result: FetchResult) {
        if !self.is_loading() {
            tracing::warn!("Ignoring a second fetch result");
            return;
        }

        let (load, users) = LoadState::from_result(result);
        self.directory.set_users(users);
        self.load = load;
        self.reset_selection();
    }

    /// Settle into the failed state with a ready-made message
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.is_loading() {
            self.load = LoadState::Failed(message.into());
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Query and sort
    // ─────────────────────────────────────────────────────────────────────

    pub fn push_query_char(&mut self, c: char) {
        self.directory.push_query_char(c);
        self.reset_selection();
    }

    pub fn pop_query_char(&mut self) {
        if self.directory.pop_query_char() {
            self.reset_selection();
        }
    }

    pub fn clear_query(&mut self) {
        self.directory.clear_query();
        self.reset_selection();
    }

    /// Activate a column header and move the cursor onto it
    pub fn activate_header(&mut self, key: SortKey) {
        self.directory.select_sort(key);
        self.header_cursor = key;
        self.reset_selection();
    }

    /// Activate whichever header contains the given screen cell
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        let pos = Position::new(column, row);
        let hit = self
            .header_hits
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, key)| *key);

        match hit {
            Some(key) => {
                self.activate_header(key);
                true
            }
            None => false,
        }
    }

    pub fn cursor_next(&mut self) {
        self.header_cursor = self.header_cursor.next();
    }

    pub fn cursor_prev(&mut self) {
        self.header_cursor = self.header_cursor.prev();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Row selection
    // ─────────────────────────────────────────────────────────────────────

    fn reset_selection(&mut self) {
        let first = (!self.directory.is_empty()).then_some(0);
        self.table_state.select(first);
        *self.table_state.offset_mut() = 0;
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.directory.len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.move_selection(-1);
    }

    pub fn page_down(&mut self) {
        self.move_selection(PAGE_SIZE as isize);
    }

    pub fn page_up(&mut self) {
        self.move_selection(-(PAGE_SIZE as isize));
    }

    pub fn select_first(&mut self) {
        self.reset_selection();
    }

    pub fn select_last(&mut self) {
        self.table_state.select(self.directory.len().checked_sub(1));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Misc
    // ─────────────────────────────────────────────────────────────────────

    pub fn next_theme(&mut self) {
        self.theme_kind = self.theme_kind.next();
        self.theme = self.theme_kind.theme();
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    /// Get spinner character for current animation frame
    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
        SPINNER[self.animation_frame % SPINNER.len()]
    }
}
