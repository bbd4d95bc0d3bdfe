//! User records and the filter → sort pipeline
//!
//! The pipeline is split into small pure stages so the TUI and the headless
//! listing derive exactly the same view:
//!
//! ```text
//! source (Vec<User>) ──▶ filter::filter_indices ──▶ sort::sort_indices ──▶ view (Vec<usize>)
//!                              ▲                          ▲
//!                            query                    SortState
//! ```
//!
//! [`Directory`] owns the state cells and re-runs both stages after every
//! mutation; [`loader`] fills the source collection exactly once.

pub mod directory;
pub mod filter;
pub mod loader;
pub mod sort;

pub use directory::Directory;
pub use loader::{LoadState, UserClient};

use serde::Deserialize;
use std::fmt;

/// One user entity as returned by the endpoint
///
/// Extra JSON fields (username, address, company...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl User {
    /// Field value used for sorting and display
    pub fn field(&self, key: SortKey) -> &str {
        match key {
            SortKey::Name => &self.name,
            SortKey::Email => &self.email,
            SortKey::Phone => &self.phone,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sort state
// ─────────────────────────────────────────────────────────────────────────────

/// Sortable columns, in header order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Name,
    Email,
    Phone,
}

impl SortKey {
    /// All columns in display order
    pub fn all() -> &'static [SortKey] {
        &[SortKey::Name, SortKey::Email, SortKey::Phone]
    }

    /// Header label
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Email => "Email",
            SortKey::Phone => "Phone",
        }
    }

    /// Position in [`SortKey::all`]
    pub fn index(&self) -> usize {
        match self {
            SortKey::Name => 0,
            SortKey::Email => 1,
            SortKey::Phone => 2,
        }
    }

    /// Next column, wrapping around
    pub fn next(self) -> Self {
        let keys = Self::all();
        keys[(self.index() + 1) % keys.len()]
    }

    /// Previous column, wrapping around
    pub fn prev(self) -> Self {
        let keys = Self::all();
        keys[(self.index() + keys.len() - 1) % keys.len()]
    }

    /// Parse a column name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "name" => Some(SortKey::Name),
            "email" => Some(SortKey::Email),
            "phone" => Some(SortKey::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn flip(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Header arrow for the active column
    pub fn indicator(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }
}

/// Active sort column and direction (exactly one of each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Activate a column header
    ///
    /// The active column flips direction; any other column becomes active
    /// in ascending order.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.order = self.order.flip();
        } else {
            self.key = key;
            self.order = SortOrder::Ascending;
        }
    }

    /// Indicator for a header cell, `None` for inactive columns
    pub fn indicator_for(&self, key: SortKey) -> Option<&'static str> {
        (self.key == key).then(|| self.order.indicator())
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        write!(f, "{} {}", self.key, dir)
    }
}
