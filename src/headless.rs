//! Headless listing: fetch once, print the derived view, exit
//!
//! Used by `roster list` and when the TUI is disabled. The table goes to
//! stdout; logs go to stderr.

use crate::config::Config;
use crate::users::{Directory, SortKey, SortState, UserClient};
use anyhow::{anyhow, Result};
use unicode_width::UnicodeWidthStr;

/// Gap between printed columns
const GUTTER: &str = "  ";

/// Options for one listing
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub query: String,
    pub sort: SortState,
}

/// Fetch the users and print the filtered, sorted table
pub async fn run(config: &Config, options: ListOptions) -> Result<()> {
    let client = UserClient::new(config.endpoint.clone());

    let users = client.fetch_users().await.map_err(|e| {
        tracing::error!("Failed to load users: {}", e);
        anyhow!(e.display_message())
    })?;
    tracing::info!("Loaded {} users", users.len());

    let directory = Directory::with_state(users, options.query, options.sort);
    print!("{}", render_table(&directory));
    Ok(())
}

/// Render the visible users as an aligned text table
pub fn render_table(directory: &Directory) -> String {
    let sort = directory.sort();

    let headers: Vec<String> = SortKey::all()
        .iter()
        .map(|&key| match sort.indicator_for(key) {
            Some(arrow) => format!("{} {}", key.label(), arrow),
            None => key.label().to_string(),
        })
        .collect();

    let rows: Vec<[&str; 3]> = directory
        .visible()
        .map(|u| [u.name.as_str(), u.email.as_str(), u.phone.as_str()])
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);

    if rows.is_empty() {
        out.push_str("No users match\n");
    }
    for row in &rows {
        push_line(&mut out, row.iter().copied(), &widths);
    }

    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            line.push_str(GUTTER);
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
