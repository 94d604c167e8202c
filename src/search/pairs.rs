//! Confirmed-pair sets and the sinks verification writes into.
//!
//! Two accumulation strategies sit behind [`PairSink`]:
//!
//! - **Thread-local**: every worker fills its own [`PairSet`]; the sets are
//!   merged once the parallel loop ends. No synchronization on the hot path.
//! - **Shared**: all workers insert into one [`SharedPairSet`] (a sharded
//!   `DashSet`, one lock per shard). Cheaper when few pairs are confirmed.
//!
//! Union is commutative and idempotent, so the final set does not depend on
//! merge order or thread count.

use dashmap::DashSet;
use serde::{Deserialize, Serialize};

use super::hash_utils::FastHashSet;

/// Pair of corpus indices, always stored as (min, max).
pub type Pair = (usize, usize);

/// Order a pair as (min, max).
#[inline]
pub fn normalize(a: usize, b: usize) -> Pair {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// How verification workers accumulate confirmed pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SinkKind {
    /// One set per worker, merged at the end.
    #[default]
    ThreadLocal,
    /// One concurrent set shared by all workers.
    Shared,
}

/// Anything confirmed pairs can be written into.
pub trait PairSink {
    /// Insert the pair normalized to (min, max). Repeated insertion is a no-op.
    fn insert_pair(&mut self, a: usize, b: usize);
}

/// Deduplicated set of confirmed pairs (plus optional self-pairs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairSet {
    pairs: FastHashSet<Pair>,
}

impl PairSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (min(a,b), max(a,b)); returns false if it was already present.
    pub fn insert(&mut self, a: usize, b: usize) -> bool {
        self.pairs.insert(normalize(a, b))
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.pairs.contains(&normalize(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs (i, j) with i != j.
    pub fn distinct_pair_count(&self) -> usize {
        self.pairs.iter().filter(|(a, b)| a != b).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter()
    }

    /// Union `other` into `self`, iterating the smaller of the two.
    pub fn merge(&mut self, mut other: PairSet) {
        if other.pairs.len() > self.pairs.len() {
            std::mem::swap(&mut self.pairs, &mut other.pairs);
        }
        self.pairs.extend(other.pairs);
    }

    /// Union of two sets; the reduce step of thread-local accumulation.
    pub fn merged(mut self, other: PairSet) -> PairSet {
        self.merge(other);
        self
    }

    /// Add (i, i) for every index, marking each as considered.
    pub fn add_self_pairs<I>(&mut self, indices: I)
    where
        I: IntoIterator<Item = usize>,
    {
        self.pairs.extend(indices.into_iter().map(|i| (i, i)));
    }

    /// Pairs in ascending order; iteration order of the set itself is
    /// unspecified.
    pub fn to_sorted_vec(&self) -> Vec<Pair> {
        let mut pairs: Vec<Pair> = self.pairs.iter().copied().collect();
        pairs.sort_unstable();
        pairs
    }
}

impl PairSink for PairSet {
    fn insert_pair(&mut self, a: usize, b: usize) {
        self.insert(a, b);
    }
}

impl FromIterator<Pair> for PairSet {
    fn from_iter<I: IntoIterator<Item = Pair>>(iter: I) -> Self {
        let mut set = PairSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Pair> for PairSet {
    fn extend<I: IntoIterator<Item = Pair>>(&mut self, iter: I) {
        for (a, b) in iter {
            self.insert(a, b);
        }
    }
}

impl IntoIterator for PairSet {
    type Item = Pair;
    type IntoIter = <FastHashSet<Pair> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

/// Concurrent pair set shared by all verification workers.
#[derive(Debug, Default)]
pub struct SharedPairSet {
    pairs: DashSet<Pair>,
}

impl SharedPairSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, a: usize, b: usize) -> bool {
        self.pairs.insert(normalize(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Move every pair into `out`.
    pub fn merge_into(self, out: &mut PairSet) {
        out.pairs.extend(self.pairs);
    }
}

impl PairSink for &SharedPairSet {
    fn insert_pair(&mut self, a: usize, b: usize) {
        self.insert(a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_insert_normalizes_and_dedups() {
        let mut set = PairSet::new();
        assert!(set.insert(5, 2));
        assert!(!set.insert(2, 5));
        assert!(set.contains(5, 2));
        assert_eq!(set.to_sorted_vec(), vec![(2, 5)]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a: PairSet = [(0, 1), (1, 2)].into_iter().collect();
        let mut merged = a.clone();
        merged.merge(a.clone());
        assert_eq!(merged, a);
    }

    #[test]
    fn test_merge_order_irrelevant() {
        let a: PairSet = [(0, 1), (3, 4)].into_iter().collect();
        let b: PairSet = [(3, 4), (2, 9), (7, 7)].into_iter().collect();
        let c: PairSet = [(1, 8)].into_iter().collect();

        let left = a.clone().merged(b.clone()).merged(c.clone());
        let right = c.merged(b).merged(a);
        assert_eq!(left, right);
        assert_eq!(left.len(), 5);
        assert_eq!(left.distinct_pair_count(), 4);
    }

    #[test]
    fn test_self_pairs() {
        let mut set = PairSet::new();
        set.add_self_pairs(0..3);
        set.insert(0, 1);
        assert_eq!(set.to_sorted_vec(), vec![(0, 0), (0, 1), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_shared_and_local_sinks_agree() {
        let pairs: Vec<Pair> = (0..500).map(|i| (i % 37, (i * 7) % 53)).collect();

        let shared = SharedPairSet::new();
        pairs.par_iter().for_each(|&(a, b)| {
            let mut sink = &shared;
            sink.insert_pair(a, b);
        });
        let mut from_shared = PairSet::new();
        shared.merge_into(&mut from_shared);

        let from_local = pairs
            .par_iter()
            .fold(PairSet::new, |mut set, &(a, b)| {
                set.insert_pair(a, b);
                set
            })
            .reduce(PairSet::new, PairSet::merged);

        assert_eq!(from_shared, from_local);
    }
}
