//! State cells for the user table
//!
//! `Directory` holds the three inputs of the pipeline (source collection,
//! query, sort) and the derived view. The view is never edited directly:
//! every mutator ends in [`Directory::recompute`], which runs the filter and
//! then the sorter.

use super::filter::filter_indices;
use super::sort::sort_indices;
use super::{SortKey, SortState, User};

#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: Vec<User>,
    query: String,
    sort: SortState,
    /// Indices into `users`, filtered then sorted
    view: Vec<usize>,
}

impl Directory {
    /// Empty directory with the default query and sort
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory with an explicit query and sort (used by the headless listing)
    pub fn with_state(users: Vec<User>, query: impl Into<String>, sort: SortState) -> Self {
        let mut dir = Self {
            users,
            sort,
            ..Self::default()
        };
        dir.set_query(query);
        dir
    }

    /// Replace the source collection wholesale
    pub fn set_users(&mut self, users: Vec<User>) {
        self.users = users;
        self.recompute();
    }

    /// Replace the query wholesale
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.recompute();
    }

    /// Remove the last character; returns false if the query was already empty
    pub fn pop_query_char(&mut self) -> bool {
        if self.query.pop().is_some() {
            self.recompute();
            true
        } else {
            false
        }
    }

    pub fn clear_query(&mut self) {
        if !self.query.is_empty() {
            self.query.clear();
            self.recompute();
        }
    }

    /// Activate a column header (see [`SortState::select`])
    pub fn select_sort(&mut self, key: SortKey) {
        self.sort.select(key);
        self.recompute();
    }

    fn recompute(&mut self) {
        let mut view = filter_indices(&self.users, &self.query);
        sort_indices(&self.users, &mut view, self.sort);
        self.view = view;
    }

    /// Records in display order
    pub fn visible(&self) -> impl Iterator<Item = &User> + '_ {
        self.view.iter().map(|&i| &self.users[i])
    }

    /// Number of visible records
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Size of the source collection
    pub fn total(&self) -> usize {
        self.users.len()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }
}
