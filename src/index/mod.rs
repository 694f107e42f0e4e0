//! # Index Utilities
//!
//! Dense-array helpers driven by sorted index lists. Every structural edit
//! in the graph store goes through these: an *expand* splices new slots in
//! at their post-insertion positions, a *collapse* drops slots, and both
//! produce a remap table that is then applied to every array holding
//! indices into the edited one.
//!
//! ```text
//! old:      [a, b, c]            inserted = [1, 3]
//! expand:   [a, _, b, _, c]      table    = [0, 2, 4]
//!
//! old:      [a, b, c, d]         removed  = [1]
//! collapse: [a, c, d]            table    = [0, MAX, 1, 2]
//! ```

pub mod bitset;

pub use bitset::BitSet;

/// Dense node index assigned by the graph store.
pub type NodeIndex = u32;

/// Dense edge index assigned by the graph store.
pub type EdgeIndex = u32;

/// Tombstone in remap tables and the "no node" sentinel everywhere else.
pub const INVALID_INDEX: u32 = u32::MAX;

/// `true` when `indices` is strictly ascending (sorted, no duplicates).
pub fn is_sorted_unique(indices: &[u32]) -> bool {
    indices.windows(2).all(|w| w[0] < w[1])
}

// ============================================================================
// Remap tables
// ============================================================================

/// Build the old → new table for an insertion.
///
/// `inserted` holds the indices the new elements occupy *after* the
/// insertion, sorted ascending. The returned table has `old_len` entries.
pub fn expand_table(old_len: usize, inserted: &[u32]) -> Vec<u32> {
    debug_assert!(is_sorted_unique(inserted), "inserted indices must be sorted and unique");
    let new_len = old_len + inserted.len();
    debug_assert!(
        inserted.last().is_none_or(|&i| (i as usize) < new_len),
        "inserted index out of range"
    );

    let mut table = Vec::with_capacity(old_len);
    let mut pending = inserted.iter().copied().peekable();
    for new_index in 0..new_len as u32 {
        if pending.peek() == Some(&new_index) {
            pending.next();
            continue;
        }
        table.push(new_index);
    }
    table
}

/// Build the old → new table for a removal. Removed slots map to
/// [`INVALID_INDEX`], survivors to their compacted position.
pub fn collapse_table(old_len: usize, removed: &[u32]) -> Vec<u32> {
    debug_assert!(is_sorted_unique(removed), "removed indices must be sorted and unique");
    debug_assert!(
        removed.last().is_none_or(|&i| (i as usize) < old_len),
        "removed index out of range"
    );

    let mut table = Vec::with_capacity(old_len);
    let mut pending = removed.iter().copied().peekable();
    let mut next_new = 0u32;
    for old_index in 0..old_len as u32 {
        if pending.peek() == Some(&old_index) {
            pending.next();
            table.push(INVALID_INDEX);
        } else {
            table.push(next_new);
            next_new += 1;
        }
    }
    table
}

/// Rewrite every index in `values` through `table`.
pub fn remap(values: &mut [u32], table: &[u32]) {
    for value in values.iter_mut() {
        *value = table[*value as usize];
    }
}

// ============================================================================
// Array splicing
// ============================================================================

/// Splice new elements into `values` at the post-insertion positions in
/// `inserted`. `make(k)` produces the element for `inserted[k]`.
pub fn expand<T>(values: &mut Vec<T>, inserted: &[u32], mut make: impl FnMut(usize) -> T) {
    debug_assert!(is_sorted_unique(inserted), "inserted indices must be sorted and unique");
    if inserted.is_empty() {
        return;
    }

    let old = std::mem::take(values);
    let new_len = old.len() + inserted.len();
    let mut out = Vec::with_capacity(new_len);
    let mut survivors = old.into_iter();
    let mut k = 0;

    for new_index in 0..new_len {
        if k < inserted.len() && inserted[k] as usize == new_index {
            out.push(make(k));
            k += 1;
        } else if let Some(value) = survivors.next() {
            out.push(value);
        }
    }

    debug_assert_eq!(out.len(), new_len, "inserted index out of range");
    *values = out;
}

/// Splice clones of `fill` into `values` at the positions in `inserted`.
pub fn expand_with<T: Clone>(values: &mut Vec<T>, inserted: &[u32], fill: T) {
    expand(values, inserted, |_| fill.clone());
}

/// Drop the elements at `removed` (sorted ascending) and close the gaps,
/// preserving the order of survivors.
pub fn collapse<T>(values: &mut Vec<T>, removed: &[u32]) {
    debug_assert!(is_sorted_unique(removed), "removed indices must be sorted and unique");
    if removed.is_empty() {
        return;
    }

    let mut k = 0;
    let mut index = 0u32;
    values.retain(|_| {
        let drop_it = k < removed.len() && removed[k] == index;
        if drop_it {
            k += 1;
        }
        index += 1;
        !drop_it
    });
    debug_assert_eq!(k, removed.len(), "removed index out of range");
}
