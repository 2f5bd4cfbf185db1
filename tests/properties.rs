// SPDX-License-Identifier: MIT
// Copyright (c) 2024 Rishabh Dwivedi (rishabhdwivedi17@gmail.com)

use quickcheck_macros::quickcheck;

use flatset::{algo, FlatSet, InputRange, Strategy};

const ALL: [Strategy; 9] = [
    Strategy::OneAtATime,
    Strategy::StableSortAndUnique,
    Strategy::FullInplaceMerge,
    Strategy::CopyUniqueThenFullInplaceMerge,
    Strategy::CopyUniqueInplaceMergeCacheBegin,
    Strategy::CopyUniqueInplaceMergeUpperBound,
    Strategy::CopyUniqueInplaceMergeNoBuffer,
    Strategy::UseEndBuffer,
    Strategy::Auto,
];

fn dedup_sort(mut v: Vec<i32>) -> Vec<i32> {
    v.sort_unstable();
    v.dedup();
    v
}

/// Law 1: set union — every element of `s` or `b` is present afterwards,
/// and nothing else is.
#[quickcheck]
fn law_set_union(s: Vec<i32>, b: Vec<i32>) -> bool {
    let set: FlatSet<i32> = s.iter().copied().collect();
    let expected = dedup_sort(s.into_iter().chain(b.iter().copied()).collect());
    for strategy in ALL {
        let mut set = set.clone();
        set.bulk_insert(b.iter().copied(), strategy);
        if set.as_slice() != expected.as_slice() {
            return false;
        }
    }
    true
}

/// Law 2: sortedness — result has no adjacent equivalents and is ascending.
#[quickcheck]
fn law_sortedness(s: Vec<i32>, b: Vec<i32>) -> bool {
    let mut set: FlatSet<i32> = s.into_iter().collect();
    set.bulk_insert(b, Strategy::Auto);
    set.as_slice().windows(2).all(|w| w[0] < w[1])
}

/// Law 3: idempotence — inserting the same batch twice is the same as once.
#[quickcheck]
fn law_idempotence(s: Vec<i32>, b: Vec<i32>) -> bool {
    for strategy in ALL {
        let mut once: FlatSet<i32> = s.iter().copied().collect();
        once.bulk_insert(b.iter().copied(), strategy);

        let mut twice: FlatSet<i32> = s.iter().copied().collect();
        twice.bulk_insert(b.iter().copied(), strategy);
        twice.bulk_insert(b.iter().copied(), strategy);

        if once.as_slice() != twice.as_slice() {
            return false;
        }
    }
    true
}

/// Law 4: identity — `insert(S, ∅) = S` and `insert(∅, B) = dedup_sort(B)`.
#[quickcheck]
fn law_identity(s: Vec<i32>, b: Vec<i32>) -> bool {
    for strategy in ALL {
        let mut with_empty_batch: FlatSet<i32> = s.iter().copied().collect();
        with_empty_batch.bulk_insert(std::iter::empty(), strategy);
        if with_empty_batch.as_slice() != dedup_sort(s.clone()).as_slice() {
            return false;
        }

        let mut from_empty_set: FlatSet<i32> = FlatSet::new();
        from_empty_set.bulk_insert(b.iter().copied(), strategy);
        if from_empty_set.as_slice() != dedup_sort(b.clone()).as_slice() {
            return false;
        }
    }
    true
}

/// Law 5: equivalence across strategies — every strategy agrees, element-wise.
#[quickcheck]
fn law_equivalence_across_strategies(s: Vec<i32>, b: Vec<i32>) -> bool {
    let mut results = Vec::new();
    for strategy in ALL {
        let mut set: FlatSet<i32> = s.iter().copied().collect();
        set.bulk_insert(b.iter().copied(), strategy);
        results.push(set.as_slice().to_vec());
    }
    results.windows(2).all(|w| w[0] == w[1])
}

/// Law 8: adaptive set-union equals the stable deduplicated union of its
/// two sorted inputs.
#[quickcheck]
fn law_adaptive_set_union_correctness(a: Vec<i32>, b: Vec<i32>) -> bool {
    let a = dedup_sort(a);
    let b = dedup_sort(b);
    let expected = dedup_sort(a.iter().copied().chain(b.iter().copied()).collect());

    let mut dest = vec![0; a.len() + b.len()];
    let out = dest.start();
    let end = algo::set_union_unique(
        &a[..],
        a.start(),
        a.end(),
        &b[..],
        b.start(),
        b.end(),
        &mut dest,
        out,
    );
    dest[..end] == expected[..]
}
