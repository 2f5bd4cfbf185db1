// SPDX-License-Identifier: MIT
// Copyright (c) 2024 Rishabh Dwivedi (rishabhdwivedi17@gmail.com)

//! The eight bulk-insert strategies (component D), plus the default
//! dispatch between them.

use std::cmp::Ordering;

use crate::algo::{
    lower_bound_biased_by, lower_bound_by, merge_inplace_no_buffer, union_into_tail,
    upper_bound_by,
};

use super::FlatSet;

/// Selects which bulk-insert algorithm [`FlatSet::bulk_insert`] runs.
///
/// The strategies trade comparisons, element moves, and allocator traffic
/// against one another; none changes the result, only how it is reached
/// (see [`FlatSet::bulk_insert_by`]'s postcondition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// D1: search and insert each batch element individually.
    OneAtATime,
    /// D2: append the whole batch, stable-sort everything, drop duplicates.
    StableSortAndUnique,
    /// D3: append the batch, sort just the new suffix, merge in place with
    /// no auxiliary allocation, then drop duplicates.
    FullInplaceMerge,
    /// D4: append only batch elements not already present, sort and
    /// dedup the suffix, then merge the whole set with a scratch buffer.
    CopyUniqueThenFullInplaceMerge,
    /// D5: as D4, but remember the leftmost position any new element
    /// would land at and skip merging the untouched prefix before it.
    CopyUniqueInplaceMergeCacheBegin,
    /// D6: as D4, but narrow the merge's left edge with a single
    /// `upper_bound` against the smallest new element.
    CopyUniqueInplaceMergeUpperBound,
    /// D7: as D4, but merges with no auxiliary allocation instead of a
    /// scratch buffer.
    CopyUniqueInplaceMergeNoBuffer,
    /// D8: grow the backing storage to stage the batch past the live
    /// data, then union the two halves into the tail in one pass.
    UseEndBuffer,
    /// Picks [`Strategy::UseEndBuffer`] when the batch fits in the set's
    /// current slack without reallocating, [`Strategy::CopyUniqueInplaceMergeCacheBegin`]
    /// otherwise.
    Auto,
}

pub(super) fn dispatch<T, I, Compare>(
    set: &mut FlatSet<T>,
    batch: I,
    strategy: Strategy,
    is_less: Compare,
) where
    T: Clone + Default,
    I: Iterator<Item = T>,
    Compare: Fn(&T, &T) -> bool + Clone,
{
    match strategy {
        Strategy::OneAtATime => one_at_a_time(set, batch, is_less),
        Strategy::StableSortAndUnique => stable_sort_and_unique(set, batch, is_less),
        Strategy::FullInplaceMerge => full_inplace_merge(set, batch, is_less),
        Strategy::CopyUniqueThenFullInplaceMerge => {
            copy_unique_full_inplace_merge(set, batch, is_less)
        }
        Strategy::CopyUniqueInplaceMergeCacheBegin => {
            copy_unique_inplace_merge_begin(set, batch, is_less)
        }
        Strategy::CopyUniqueInplaceMergeUpperBound => {
            copy_unique_inplace_merge_upper_bound(set, batch, is_less)
        }
        Strategy::CopyUniqueInplaceMergeNoBuffer => {
            copy_unique_inplace_merge_no_buffer(set, batch, is_less)
        }
        Strategy::UseEndBuffer => use_end_buffer(set, batch, is_less),
        Strategy::Auto => {
            let batch: Vec<T> = batch.collect();
            let slack = set.capacity().saturating_sub(set.len());
            if batch.len() <= slack {
                use_end_buffer(set, batch.into_iter(), is_less)
            } else {
                copy_unique_inplace_merge_begin(set, batch.into_iter(), is_less)
            }
        }
    }
}

fn to_ordering<T, Compare>(is_less: &Compare, a: &T, b: &T) -> Ordering
where
    Compare: Fn(&T, &T) -> bool,
{
    if is_less(a, b) {
        Ordering::Less
    } else if is_less(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Stable sort, used only by D2: the batch may be re-inserted in the same
/// call (idempotence, §8.3), so which of several batch-internal
/// equivalents survives must not depend on sort order there.
fn sort_stable_by_is_less<T, Compare>(s: &mut [T], is_less: &Compare)
where
    Compare: Fn(&T, &T) -> bool,
{
    s.sort_by(|a, b| to_ordering(is_less, a, b));
}

/// Unstable sort, used by D3-D8: which batch-internal equivalent survives
/// the later dedup is unspecified for these strategies (their suffix sort
/// need not be stable).
fn sort_unstable_by_is_less<T, Compare>(s: &mut [T], is_less: &Compare)
where
    Compare: Fn(&T, &T) -> bool,
{
    s.sort_unstable_by(|a, b| to_ordering(is_less, a, b));
}

/// Removes consecutive equivalent elements from `v[start..]`, keeping the
/// first of each run, via [`crate::algo::unique_by`].
fn dedup_from<T, Compare>(v: &mut Vec<T>, start: usize, is_less: &Compare)
where
    Compare: Fn(&T, &T) -> bool,
{
    let end = v.len();
    let new_end = crate::algo::unique_by(&mut v[..], start, end, |a, b| {
        !is_less(b, a) && !is_less(a, b)
    });
    v.truncate(new_end);
}

/// Appends `x` to `v` unless it is equivalent to an element already in
/// `v[..orig_len]`, a fixed "snapshot" prefix that does not grow as the
/// batch is consumed. Returns the position the lookup landed at when `x`
/// was appended.
fn append_unique_against_prefix<T, Compare>(
    v: &mut Vec<T>,
    orig_len: usize,
    x: T,
    is_less: &Compare,
) -> Option<usize>
where
    Compare: Fn(&T, &T) -> bool,
{
    let pos = lower_bound_by(&v[..orig_len], 0, orig_len, &x, is_less);
    if pos == orig_len || is_less(&x, &v[pos]) {
        v.push(x);
        Some(pos)
    } else {
        None
    }
}

/// Merges the adjacent sorted runs `v[..mid]` and `v[mid..]` by sorting
/// into a scratch buffer sized to the whole merge window and copying the
/// result back, trading one allocation for avoiding B's rotation cost.
fn buffered_inplace_merge<T, Compare>(v: &mut [T], mid: usize, is_less: &Compare)
where
    T: Clone,
    Compare: Fn(&T, &T) -> bool,
{
    let merged = {
        let (left, right) = v.split_at(mid);
        let mut merged = Vec::with_capacity(v.len());
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            if is_less(&right[j], &left[i]) {
                merged.push(right[j].clone());
                j += 1;
            } else {
                merged.push(left[i].clone());
                i += 1;
            }
        }
        merged.extend_from_slice(&left[i..]);
        merged.extend_from_slice(&right[j..]);
        merged
    };
    v.clone_from_slice(&merged);
}

fn one_at_a_time<T, I, Compare>(set: &mut FlatSet<T>, batch: I, is_less: Compare)
where
    I: Iterator<Item = T>,
    Compare: Fn(&T, &T) -> bool,
{
    for x in batch {
        let len = set.storage.len();
        let pos = lower_bound_biased_by(&set.storage[..], 0, len, &x, &is_less);
        if pos == len || is_less(&x, &set.storage[pos]) {
            set.storage.insert(pos, x);
        }
    }
}

fn stable_sort_and_unique<T, I, Compare>(set: &mut FlatSet<T>, batch: I, is_less: Compare)
where
    I: Iterator<Item = T>,
    Compare: Fn(&T, &T) -> bool,
{
    set.storage.extend(batch);
    sort_stable_by_is_less(&mut set.storage, &is_less);
    dedup_from(&mut set.storage, 0, &is_less);
}

fn full_inplace_merge<T, I, Compare>(set: &mut FlatSet<T>, batch: I, is_less: Compare)
where
    T: Clone,
    I: Iterator<Item = T>,
    Compare: Fn(&T, &T) -> bool + Clone,
{
    let orig_len = set.len();
    set.storage.extend(batch);
    sort_unstable_by_is_less(&mut set.storage[orig_len..], &is_less);
    let len = set.storage.len();
    merge_inplace_no_buffer(&mut set.storage[..], 0, orig_len, len, is_less.clone());
    dedup_from(&mut set.storage, 0, &is_less);
}

fn copy_unique_full_inplace_merge<T, I, Compare>(set: &mut FlatSet<T>, batch: I, is_less: Compare)
where
    T: Clone,
    I: Iterator<Item = T>,
    Compare: Fn(&T, &T) -> bool + Clone,
{
    let orig_len = set.len();
    for x in batch {
        append_unique_against_prefix(&mut set.storage, orig_len, x, &is_less);
    }
    sort_unstable_by_is_less(&mut set.storage[orig_len..], &is_less);
    dedup_from(&mut set.storage, orig_len, &is_less);
    buffered_inplace_merge(&mut set.storage[..], orig_len, &is_less);
}

fn copy_unique_inplace_merge_begin<T, I, Compare>(set: &mut FlatSet<T>, batch: I, is_less: Compare)
where
    T: Clone,
    I: Iterator<Item = T>,
    Compare: Fn(&T, &T) -> bool + Clone,
{
    let orig_len = set.len();
    let mut merge_begin = orig_len;
    for x in batch {
        if let Some(pos) = append_unique_against_prefix(&mut set.storage, orig_len, x, &is_less) {
            merge_begin = merge_begin.min(pos);
        }
    }
    sort_unstable_by_is_less(&mut set.storage[orig_len..], &is_less);
    dedup_from(&mut set.storage, orig_len, &is_less);
    buffered_inplace_merge(&mut set.storage[merge_begin..], orig_len - merge_begin, &is_less);
}

fn copy_unique_inplace_merge_upper_bound<T, I, Compare>(
    set: &mut FlatSet<T>,
    batch: I,
    is_less: Compare,
) where
    T: Clone,
    I: Iterator<Item = T>,
    Compare: Fn(&T, &T) -> bool + Clone,
{
    let orig_len = set.len();
    for x in batch {
        append_unique_against_prefix(&mut set.storage, orig_len, x, &is_less);
    }
    sort_unstable_by_is_less(&mut set.storage[orig_len..], &is_less);
    dedup_from(&mut set.storage, orig_len, &is_less);
    let len = set.storage.len();
    if orig_len == len {
        return;
    }
    let first_new = set.storage[orig_len].clone();
    let merge_begin = upper_bound_by(&set.storage[..orig_len], 0, orig_len, &first_new, &is_less);
    buffered_inplace_merge(&mut set.storage[merge_begin..], orig_len - merge_begin, &is_less);
}

fn copy_unique_inplace_merge_no_buffer<T, I, Compare>(
    set: &mut FlatSet<T>,
    batch: I,
    is_less: Compare,
) where
    T: Clone,
    I: Iterator<Item = T>,
    Compare: Fn(&T, &T) -> bool + Clone,
{
    let orig_len = set.len();
    for x in batch {
        append_unique_against_prefix(&mut set.storage, orig_len, x, &is_less);
    }
    sort_unstable_by_is_less(&mut set.storage[orig_len..], &is_less);
    dedup_from(&mut set.storage, orig_len, &is_less);
    let len = set.storage.len();
    if orig_len == len {
        return;
    }
    merge_inplace_no_buffer(&mut set.storage[..], 0, orig_len, len, is_less.clone());
}

/// D8. Stages the batch in a scratch region grown past the live data,
/// then runs the union-into-tail variant of component C to merge the two
/// halves from the high end down, so every surviving element moves at
/// most once.
fn use_end_buffer<T, I, Compare>(set: &mut FlatSet<T>, batch: I, is_less: Compare)
where
    T: Clone + Default,
    I: Iterator<Item = T>,
    Compare: Fn(&T, &T) -> bool + Clone,
{
    let mut staged: Vec<T> = batch.collect();
    let new_len = staged.len();
    if new_len == 0 {
        return;
    }
    sort_unstable_by_is_less(&mut staged, &is_less);
    dedup_from(&mut staged, 0, &is_less);

    let orig_len = set.len();
    set.storage.reserve(2 * new_len);
    set.storage.resize(orig_len + new_len, T::default());
    let gap_end = set.storage.len();
    set.storage.extend(staged);

    let (left, right) = set.storage.split_at_mut(gap_end);
    let start = union_into_tail(left, orig_len, right, &is_less);

    set.storage.truncate(gap_end);
    set.storage.drain(0..start);
}
