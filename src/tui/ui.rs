// UI rendering
//
// Shell: title bar, content, status bar. The content slot shows the loading
// placeholder, the error message, or the search box above the user table.

use super::app::App;
use crate::users::SortKey;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

/// Relative column widths, in header order
const COLUMN_WIDTHS: [Constraint; 3] = [Constraint::Fill(3), Constraint::Fill(4), Constraint::Fill(3)];

/// Gap between table columns
const COLUMN_SPACING: u16 = 1;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.bg).fg(app.theme.fg));
    f.render_widget(bg_block, f.area());

    let [title_area, content_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(f.area());

    render_title(f, title_area, app);

    app.header_hits.clear();
    if app.is_loading() {
        render_loading(f, content_area, app);
    } else if let Some(message) = app.load.error() {
        let message = message.to_string();
        render_error(f, content_area, app, &message);
    } else {
        let [search_area, table_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(content_area);
        render_search(f, search_area, app);
        render_table(f, table_area, app);
    }

    render_status(f, status_area, app);
}

fn render_title(f: &mut Frame, area: Rect, app: &App) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(" Roster", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" ─ {}", app.endpoint), Style::default().fg(app.theme.muted)),
    ]))
    .style(Style::default().fg(app.theme.title))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.title)),
    );

    f.render_widget(title, area);
}

/// Vertically centered single block of text
fn centered(area: Rect, height: u16) -> Rect {
    let [middle] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    middle
}

fn render_loading(f: &mut Frame, area: Rect, app: &App) {
    let text = Paragraph::new(format!("{} Loading users...", app.spinner_char()))
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.spinner));

    f.render_widget(text, centered(area, 1));
}

fn render_error(f: &mut Frame, area: Rect, app: &App, message: &str) {
    let text = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD));

    let height = 3.min(area.height);
    f.render_widget(text, centered(area, height));
}

fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let query = app.directory.query();

    let line = if query.is_empty() {
        Line::from(Span::styled(
            format!("Search {} users...", app.directory.total()),
            Style::default().fg(app.theme.muted),
        ))
    } else {
        Line::from(query.to_string())
    };

    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focused))
            .title(" Search "),
    );
    f.render_widget(input, area);

    // Cursor after the typed text, clamped to the box
    let inner_width = area.width.saturating_sub(2);
    let typed = unicode_width::UnicodeWidthStr::width(query) as u16;
    f.set_cursor_position(Position::new(
        area.x + 1 + typed.min(inner_width.saturating_sub(1)),
        area.y + 1,
    ));
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let sort = app.directory.sort();

    let header = Row::new(SortKey::all().iter().map(|&key| {
        let label = match sort.indicator_for(key) {
            Some(arrow) => format!("{} {}", key.label(), arrow),
            None => key.label().to_string(),
        };
        let style = theme.header_style(sort.key == key, app.header_cursor == key);
        Cell::from(label).style(style)
    }));

    let rows: Vec<Row> = if app.directory.is_empty() {
        vec![Row::new(vec![Cell::from("No users match")])
            .style(Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC))]
    } else {
        app.directory
            .visible()
            .map(|user| {
                Row::new(vec![
                    Cell::from(user.name.as_str()),
                    Cell::from(user.email.as_str()),
                    Cell::from(user.phone.as_str()),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(format!(
            " Users ({}/{}) ",
            app.directory.len(),
            app.directory.total()
        ));
    let inner = block.inner(area);

    let table = Table::new(rows, COLUMN_WIDTHS)
        .header(header)
        .block(block)
        .column_spacing(COLUMN_SPACING)
        .flex(Flex::Legacy)
        .row_highlight_style(
            Style::default()
                .fg(theme.selected_fg)
                .bg(theme.selected_bg)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(table, area, &mut app.table_state);

    // Mirror the table's column layout to know where each header cell landed
    if inner.height > 0 {
        let columns = Layout::horizontal(COLUMN_WIDTHS)
            .flex(Flex::Legacy)
            .spacing(COLUMN_SPACING)
            .split(inner);
        app.header_hits = SortKey::all()
            .iter()
            .zip(columns.iter())
            .map(|(&key, col)| (Rect::new(col.x, inner.y, col.width, 1), key))
            .collect();
    }
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw(" ")];

    if !app.is_loading() && app.load.error().is_none() {
        spans.push(Span::raw(format!(
            "{}/{} users │ sort: {} │ ",
            app.directory.len(),
            app.directory.total(),
            app.directory.sort()
        )));
    }
    spans.push(Span::styled(
        "F1-F3/click sort · Tab+Enter header · Esc quit",
        Style::default().fg(app.theme.muted),
    ));

    if let Some(entry) = app.log_buffer.latest() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!(
                "{} {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.message
            ),
            app.theme.log_style(entry.level),
        ));
    }

    let status = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(app.theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogBuffer;
    use crate::tui::theme::ThemeKind;
    use crate::users::tests::bob_and_alice;
    use crate::users::loader::FetchError;
    use ratatui::{backend::TestBackend, Terminal};
    use reqwest::StatusCode;

    fn app() -> App {
        App::new(LogBuffer::new(), "http://test/users", ThemeKind::Dark)
    }

    /// Render one frame and return the screen as lines of text
    fn render(app: &mut App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn line_with<'a>(lines: &'a [String], needle: &str) -> Option<&'a String> {
        lines.iter().find(|l| l.contains(needle))
    }

    #[test]
    fn test_loading_placeholder() {
        let mut app = app();
        let lines = render(&mut app, 80, 20);
        assert!(line_with(&lines, "Loading users...").is_some());
        assert!(line_with(&lines, "Search").is_none());
        assert!(app.header_hits.is_empty());
    }

    #[test]
    fn test_error_replaces_table() {
        let mut app = app();
        app.apply_fetch_result(Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
        let lines = render(&mut app, 100, 20);

        assert!(line_with(&lines, "Error fetching users").is_some());
        assert!(line_with(&lines, "Email").is_none());
    }

    #[test]
    fn test_table_with_indicator_on_active_header() {
        let mut app = app();
        app.apply_fetch_result(Ok(bob_and_alice()));
        let lines = render(&mut app, 80, 20);

        assert!(line_with(&lines, "Search 2 users...").is_some());
        let header = line_with(&lines, "Email").expect("header row");
        assert!(header.contains("Name ▲"));
        assert!(!header.contains("Email ▲") && !header.contains("Email ▼"));

        // Alice renders above Bob
        let alice = lines.iter().position(|l| l.contains("Alice")).unwrap();
        let bob = lines.iter().position(|l| l.contains("Bob")).unwrap();
        assert!(alice < bob);

        assert_eq!(app.header_hits.len(), 3);
    }

    #[test]
    fn test_descending_indicator_after_toggle() {
        let mut app = app();
        app.apply_fetch_result(Ok(bob_and_alice()));
        app.activate_header(SortKey::Email);
        app.activate_header(SortKey::Email);
        let lines = render(&mut app, 80, 20);

        let header = line_with(&lines, "Phone").expect("header row");
        assert!(header.contains("Email ▼"));
        assert!(!header.contains("Name ▲"));
    }

    #[test]
    fn test_header_hits_route_clicks() {
        let mut app = app();
        app.apply_fetch_result(Ok(bob_and_alice()));
        render(&mut app, 80, 20);

        let (phone_rect, key) = app.header_hits[2];
        assert_eq!(key, SortKey::Phone);
        assert!(app.click(phone_rect.x, phone_rect.y));
        assert_eq!(app.directory.sort().key, SortKey::Phone);

        let lines = render(&mut app, 80, 20);
        let header = line_with(&lines, "Phone").unwrap();
        assert!(header.contains("Phone ▲"));
    }

    #[test]
    fn test_empty_result_message() {
        let mut app = app();
        app.apply_fetch_result(Ok(bob_and_alice()));
        app.push_query_char('q');
        let lines = render(&mut app, 80, 20);

        assert!(line_with(&lines, "No users match").is_some());
        assert!(line_with(&lines, "Users (0/2)").is_some());
    }
}
