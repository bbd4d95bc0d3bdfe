// Sort stage
//
// Plain lexicographic ordering on the active column. `sort_by` is stable,
// so ties keep the order the filter produced.

use super::{SortOrder, SortState, User};
use std::cmp::Ordering;

/// Compare two records on the active column and direction
pub fn compare(a: &User, b: &User, sort: SortState) -> Ordering {
    let ord = a.field(sort.key).cmp(b.field(sort.key));
    match sort.order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
    }
}

/// Order `indices` (into `users`) in place
pub fn sort_indices(users: &[User], indices: &mut [usize], sort: SortState) {
    indices.sort_by(|&a, &b| compare(&users[a], &users[b], sort));
}
