// SPDX-License-Identifier: MIT
// Copyright (c) 2024 Rishabh Dwivedi (rishabhdwivedi17@gmail.com)

use crate::{OutputRange, RandomAccessRange};

use super::copy;
use super::lower_bound_biased_by;

/// Adaptive set union (component C): merges two sorted, duplicate-free
/// ranges into a single sorted, duplicate-free range, writing the result
/// into `dest`.
///
/// Rather than comparing one element at a time, each side is advanced with
/// a biased (galloping) search for the other side's current element, and
/// the whole skipped run is bulk-copied in one go. When the two ranges
/// interleave tightly this degrades gracefully to an ordinary element-wise
/// merge; when one range has long runs that fall entirely before or after
/// the other's current position, those runs cost a single O(log run-length)
/// search plus one bulk copy instead of one comparison per element.
///
/// # Precondition
///   - `[start1, end1)` and `[start2, end2)` are each sorted and
///     duplicate-free wrt `is_less`.
///   - dest can accommodate up to n1 + n2 elements starting from out.
///
/// # Postcondition
///   - `dest` at `[out, result)` holds the sorted, duplicate-free union.
///   - For elements that compare equivalent between the two inputs, the
///     element from `rng1` is kept.
///   - Returns the position immediately after the last written element.
///
/// # Example
/// ```rust
/// use flatset::*;
///
/// let a = [1, 3, 4, 6, 7];
/// let b = [2, 4, 6];
/// let mut dest = [0; 8];
/// let out = dest.start();
/// let end = algo::set_union_unique(&a[..], a.start(), a.end(), &b[..], b.start(), b.end(), &mut dest, out);
/// assert_eq!(&dest[..end], &[1, 2, 3, 4, 6, 7]);
/// ```
pub fn set_union_unique_by<R1, R2, Dest, Compare>(
    rng1: &R1,
    mut start1: R1::Position,
    end1: R1::Position,
    rng2: &R2,
    mut start2: R2::Position,
    end2: R2::Position,
    dest: &mut Dest,
    mut out: Dest::Position,
    is_less: Compare,
) -> Dest::Position
where
    R1: RandomAccessRange + ?Sized,
    R2: RandomAccessRange<Element = R1::Element> + ?Sized,
    Dest: OutputRange<Element = R1::Element> + ?Sized,
    R1::Element: Clone,
    Compare: Fn(&R1::Element, &R1::Element) -> bool + Clone,
{
    loop {
        if start2 == end2 {
            return copy(rng1, start1, end1, dest, out);
        }
        let pivot = rng2.at(&start2).clone();
        let next1 = lower_bound_biased_by(rng1, start1.clone(), end1.clone(), &pivot, is_less.clone());
        out = copy(rng1, start1, next1.clone(), dest, out);
        start1 = next1;
        if start1 == end1 {
            return copy(rng2, start2, end2, dest, out);
        }

        let pivot = rng1.at(&start1).clone();
        let next2 = lower_bound_biased_by(rng2, start2.clone(), end2.clone(), &pivot, is_less.clone());
        out = copy(rng2, start2, next2.clone(), dest, out);
        start2 = next2;
        if start2 == end2 {
            continue;
        }

        let a = rng1.at(&start1);
        let b = rng2.at(&start2);
        if !is_less(a, b) && !is_less(b, a) {
            start2 = rng2.after(start2);
        }
    }
}

/// [`set_union_unique_by`] under `Ord`.
pub fn set_union_unique<R1, R2, Dest>(
    rng1: &R1,
    start1: R1::Position,
    end1: R1::Position,
    rng2: &R2,
    start2: R2::Position,
    end2: R2::Position,
    dest: &mut Dest,
    out: Dest::Position,
) -> Dest::Position
where
    R1: RandomAccessRange + ?Sized,
    R2: RandomAccessRange<Element = R1::Element> + ?Sized,
    Dest: OutputRange<Element = R1::Element> + ?Sized,
    R1::Element: Clone + Ord,
{
    set_union_unique_by(rng1, start1, end1, rng2, start2, end2, dest, out, |x, y| {
        x < y
    })
}

/// Union-into-tail variant of component C, specialized for the "reuse the
/// slack past the live data" bulk-insert strategy.
///
/// `left` holds the pre-existing sorted data in `left[0..orig_len)`
/// followed by scratch slots in `left[orig_len..]`; `right` holds a sorted,
/// duplicate-free batch with no relation in memory to `left` (typically a
/// disjoint tail region of the same backing `Vec`, split off with
/// `split_at_mut`). The merged union is written into the *end* of `left`,
/// walking both inputs from their high end down, so that a slot is only
/// overwritten after everything that still needs to be read from it has
/// been read. `left.len()` must be at least `orig_len + right.len()`.
///
/// # Postcondition
///   - Returns `start` such that `left[start..left.len())` holds the
///     sorted, duplicate-free union, with `left[0..start)` left as
///     unspecified leftover content.
///   - For elements that compare equivalent, the element from `left` (the
///     pre-existing side) is kept.
pub fn union_into_tail<T, Compare>(
    left: &mut [T],
    orig_len: usize,
    right: &mut [T],
    is_less: &Compare,
) -> usize
where
    Compare: Fn(&T, &T) -> bool,
{
    let mut i = orig_len;
    let mut j = right.len();
    let mut w = left.len();
    while i > 0 || j > 0 {
        if j == 0 {
            w -= 1;
            i -= 1;
            left.swap(w, i);
        } else if i == 0 {
            w -= 1;
            j -= 1;
            std::mem::swap(&mut left[w], &mut right[j]);
        } else if is_less(&left[i - 1], &right[j - 1]) {
            w -= 1;
            j -= 1;
            std::mem::swap(&mut left[w], &mut right[j]);
        } else if is_less(&right[j - 1], &left[i - 1]) {
            w -= 1;
            i -= 1;
            left.swap(w, i);
        } else {
            w -= 1;
            i -= 1;
            left.swap(w, i);
            j -= 1;
        }
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InputRange;

    #[test]
    fn union_matches_spec_scenarios() {
        let cases: Vec<(Vec<i32>, Vec<i32>, Vec<i32>)> = vec![
            (vec![], vec![], vec![]),
            (vec![1], vec![], vec![1]),
            (vec![], vec![1], vec![1]),
            (vec![1], vec![1], vec![1]),
            (vec![1, 3], vec![2], vec![1, 2, 3]),
            (vec![1, 3, 4], vec![2], vec![1, 2, 3, 4]),
            (vec![1, 3], vec![2, 4], vec![1, 2, 3, 4]),
            (vec![1, 3, 4], vec![2, 4], vec![1, 2, 3, 4]),
            (vec![1, 2, 3, 6, 7], vec![4, 6], vec![1, 2, 3, 4, 6, 7]),
        ];
        for (a, b, expected) in cases {
            let mut dest = vec![0; a.len() + b.len()];
            let out = dest.start();
            let end = set_union_unique(&a[..], a.start(), a.end(), &b[..], b.start(), b.end(), &mut dest, out);
            assert_eq!(&dest[..end], expected.as_slice(), "a={a:?} b={b:?}");
        }
    }

    #[test]
    fn union_prefers_first_input_on_ties() {
        let a = [(1, 'a'), (2, 'a')];
        let b = [(1, 'b'), (3, 'b')];
        let mut dest = [( 0, ' '); 4];
        let out = dest.start();
        let end = set_union_unique_by(
            &a[..], a.start(), a.end(),
            &b[..], b.start(), b.end(),
            &mut dest[..], out,
            |x: &(i32, char), y: &(i32, char)| x.0 < y.0,
        );
        assert_eq!(&dest[..end], &[(1, 'a'), (2, 'a'), (3, 'b')]);
    }

    #[test]
    fn union_into_tail_merges_without_extra_allocation() {
        let mut storage = vec![1, 3, 5, 7, 0, 0, 0, 2, 4, 6];
        let (left, right) = storage.split_at_mut(7);
        let start = union_into_tail(left, 4, right, &|a: &i32, b: &i32| a < b);
        assert_eq!(&left[start..], &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn union_into_tail_prefers_left_on_ties() {
        let mut storage = vec![(1, 'a'), (2, 'a'), (0, ' '), (0, ' '), (1, 'b'), (3, 'b')];
        let (left, right) = storage.split_at_mut(4);
        let start = union_into_tail(left, 2, right, &|a: &(i32, char), b: &(i32, char)| a.0 < b.0);
        assert_eq!(&left[start..], &[(1, 'a'), (2, 'a'), (3, 'b')]);
    }
}
