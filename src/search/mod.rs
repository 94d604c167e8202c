//! Near-duplicate search by bounded deletion patterns.
//!
//! Pipeline per call: derive keys per string → group strings sharing a key
//! into buckets → confirm pairs inside each bucket with a bounded distance
//! predicate → merge into one deduplicated pair set.
//!
//! **Distance**: both predicates answer "distance ≤ k" without computing the
//! full distance. Levenshtein uses a banded furthest-reaching diagonal
//! expansion over 2k + 1 diagonals, so a check costs O(k · min(|a|, |b|)).
//!
//! **Keys**: whole-string search keys each string by every pattern with up
//! to `min(k, 2)` deleted chars; two strings within distance 2 always share
//! one. Structural searches key each string by one region (prefix, suffix or
//! middle span) instead.
//!
//! **Parallelism**: all loops run on one fixed [`WorkerPool`]. Index building
//! uses private per-worker partial indices merged by key; verification
//! writes into per-worker pair sets (or one sharded set) merged at the end.

mod distance;
mod hash_utils;
mod index;
mod pairs;
mod patterns;
mod region;
mod searcher;
mod thread_pool;
mod verify;


pub use distance::{within_edit_distance, within_hamming_distance, DistanceFn, Metric};
pub use hash_utils::{FastHashMap, FastHashSet};
pub use index::{build_parallel, build_serial, Bucket, KeyScheme, PatternIndex};
pub use pairs::{normalize, Pair, PairSet, PairSink, SharedPairSet, SinkKind};
pub use patterns::{deletion_pattern_count, deletion_patterns, deletion_patterns_up_to, MAX_DELETIONS};
pub use region::{region_pattern, region_remainder, Region, TrimDirection};
pub use searcher::SimSearch;
pub use thread_pool::{default_threads, WorkerPool};
pub use verify::{verify_buckets, verify_buckets_with, verify_pairwise, PairCheck};
