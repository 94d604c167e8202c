//! Pattern → bucket index.
//!
//! Two build disciplines:
//!
//! - [`build_serial`]: one map, filled in input order.
//! - [`build_parallel`]: map-reduce without locks on the hot path.
//!   1. The input is split into one slice per worker; each worker fills a
//!      private partial index.
//!   2. Every distinct key is collected exactly once: worker `w` contributes
//!      the keys that no worker `< w` has.
//!   3. A second parallel pass, partitioned by key, concatenates the
//!      sub-buckets of every partial index into the final bucket.
//!
//! Either way, a bucket holds exactly the indices that generated its key,
//! each once.

use std::time::Instant;

use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::debug;

use super::hash_utils::{map_with_capacity, FastHashMap};
use super::patterns::deletion_patterns_up_to;
use super::region::{region_pattern, region_remainder, Region};

/// Indices of the strings sharing one pattern.
pub type Bucket = SmallVec<[usize; 4]>;

/// Below this many strings per worker the parallel build falls back to the
/// serial one.
const MIN_STRINGS_PER_WORKER: usize = 64;

/// How each string is turned into index keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScheme {
    /// Deletion patterns (up to `depth` deletions) of the string's remainder
    /// under `region`.
    Deletions { depth: usize, region: Region },
    /// A single key per string: its region pattern.
    Region(Region),
}

impl KeyScheme {
    /// Distinct keys for `s`.
    pub fn keys(&self, s: &str) -> Vec<String> {
        match *self {
            KeyScheme::Deletions { depth, region } => {
                let mut patterns = deletion_patterns_up_to(region_remainder(s, region), depth);
                patterns.sort_unstable();
                patterns.dedup();
                patterns
            }
            KeyScheme::Region(region) => vec![region_pattern(s, region).into_owned()],
        }
    }
}

/// Mapping from pattern to the bucket of string indices that produced it.
#[derive(Debug, Clone, Default)]
pub struct PatternIndex {
    buckets: FastHashMap<String, Bucket>,
}

impl PatternIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty index with room for about `capacity` patterns.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: map_with_capacity(capacity),
        }
    }

    /// Record that string `idx` produced `pattern`.
    pub fn insert(&mut self, pattern: String, idx: usize) {
        self.buckets.entry(pattern).or_default().push(idx);
    }

    pub fn get(&self, pattern: &str) -> Option<&[usize]> {
        self.buckets.get(pattern).map(|b| b.as_slice())
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total (pattern, index) entries across all buckets.
    pub fn total_entries(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    pub fn largest_bucket(&self) -> usize {
        self.buckets.values().map(|b| b.len()).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.buckets.iter().map(|(k, b)| (k.as_str(), b.as_slice()))
    }

    /// Consume the index, keeping only the buckets. Keys are freed here,
    /// before verification starts.
    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets.into_values().collect()
    }
}

impl FromIterator<(String, Bucket)> for PatternIndex {
    fn from_iter<I: IntoIterator<Item = (String, Bucket)>>(iter: I) -> Self {
        Self {
            buckets: iter.into_iter().collect(),
        }
    }
}

fn fill(index: &mut PatternIndex, strings: &[String], indices: &[usize], scheme: KeyScheme) {
    for &idx in indices {
        for key in scheme.keys(&strings[idx]) {
            index.insert(key, idx);
        }
    }
}

/// Build the index on the calling thread, in input order.
pub fn build_serial(strings: &[String], indices: &[usize], scheme: KeyScheme) -> PatternIndex {
    let started = Instant::now();
    let mut index = PatternIndex::with_capacity(indices.len());
    fill(&mut index, strings, indices, scheme);

    debug!(
        target: "simsearch::index",
        strings = indices.len(),
        patterns = index.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Built pattern index (serial)"
    );
    index
}

/// Build the index with `workers` private partial indices and a key-partitioned
/// merge. Must run inside the worker pool so the parallel loops use it.
pub fn build_parallel(
    strings: &[String],
    indices: &[usize],
    scheme: KeyScheme,
    workers: usize,
) -> PatternIndex {
    if workers <= 1 || indices.len() < workers * MIN_STRINGS_PER_WORKER {
        return build_serial(strings, indices, scheme);
    }

    let started = Instant::now();
    let chunk = indices.len().div_ceil(workers);

    let partials: Vec<PatternIndex> = indices
        .par_chunks(chunk)
        .map(|slice| {
            let mut local = PatternIndex::with_capacity(slice.len());
            fill(&mut local, strings, slice, scheme);
            local
        })
        .collect();
    let inserted = started.elapsed();

    let partials_ref = &partials;
    let owned_keys: Vec<&str> = partials
        .par_iter()
        .enumerate()
        .flat_map_iter(|(worker, partial)| {
            partial.buckets.keys().map(String::as_str).filter(move |key| {
                partials_ref[..worker]
                    .iter()
                    .all(|earlier| earlier.get(key).is_none())
            })
        })
        .collect();

    let merged: Vec<(String, Bucket)> = owned_keys
        .par_iter()
        .map(|&key| {
            let mut bucket = Bucket::new();
            for partial in partials_ref {
                if let Some(sub) = partial.get(key) {
                    bucket.extend_from_slice(sub);
                }
            }
            (key.to_string(), bucket)
        })
        .collect();
    drop(owned_keys);
    drop(partials);

    let index: PatternIndex = merged.into_iter().collect();
    debug!(
        target: "simsearch::index",
        strings = indices.len(),
        workers,
        patterns = index.len(),
        insert_ms = inserted.as_millis() as u64,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Built pattern index (map-reduce)"
    );
    index
}
