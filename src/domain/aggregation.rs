//! Flat-row to tree reconstruction.
//!
//! A left outer join of a parent table to a child table yields one row per
//! child, or a single row with NULL child columns for parents without
//! children. [`group_by_key`] folds such a result set back into
//! `(parent, children)` groups.

use std::hash::Hash;

use indexmap::IndexMap;

/// Group `rows` by `key`, preserving the order in which keys are first seen.
///
/// The first row of every group provides the header through `header`. Every
/// row, the first included, offers a child through `child`; rows for which it
/// returns `None` (the NULL side of a left join) contribute no child. Children
/// keep row order.
pub fn group_by_key<R, K, H, C>(
    rows: impl IntoIterator<Item = R>,
    key: impl Fn(&R) -> K,
    header: impl Fn(&R) -> H,
    child: impl Fn(R) -> Option<C>,
) -> Vec<(H, Vec<C>)>
where
    K: Hash + Eq,
{
    let mut groups: IndexMap<K, (H, Vec<C>)> = IndexMap::new();

    for row in rows {
        let group = groups
            .entry(key(&row))
            .or_insert_with(|| (header(&row), Vec::new()));
        if let Some(c) = child(row) {
            group.1.push(c);
        }
    }

    groups.into_values().collect()
}
