// Filter stage
//
// Keeps records where any field (id included) contains the query,
// case-insensitively. Source order is preserved.

use super::User;

/// Check a single record against an already-lowercased needle
pub fn matches(user: &User, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    user.id.to_string().contains(needle)
        || user.name.to_lowercase().contains(needle)
        || user.email.to_lowercase().contains(needle)
        || user.phone.to_lowercase().contains(needle)
}

/// Indices of the records matching `query`
pub fn filter_indices(users: &[User], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();

    users
        .iter()
        .enumerate()
        .filter(|(_, user)| matches(user, &needle))
        .map(|(i, _)| i)
        .collect()
}
