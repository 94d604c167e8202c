//! simsearch - near-duplicate string search
//!
//! Finds every pair of strings in a corpus whose Levenshtein (or Hamming)
//! distance is at most a small cutoff `k`, without comparing all N² pairs.
//!
//! # Architecture
//!
//! A search call is one linear pipeline:
//!
//! 1. **Key generation** (`search::patterns`, `search::region`)
//!    - Deletion patterns: the string with up to `min(k, 2)` chars deleted
//!    - Region keys: a prefix, a suffix, or the string minus a middle span
//!
//! 2. **Indexing** (`search::index`)
//!    - Maps every key to the bucket of strings that produced it
//!    - Serial build, or a lock-free map-reduce over per-worker partial indices
//!
//! 3. **Verification** (`search::verify`, `search::distance`)
//!    - Bounded distance predicates decide `distance ≤ k` in O(k·L)
//!    - Small buckets are checked pairwise; large ones recurse into a
//!      semi-pattern search restricted to the bucket
//!
//! 4. **Merging** (`search::pairs`)
//!    - Per-worker pair sets merged at the end, or one sharded concurrent set
//!
//! # Example
//!
//! ```rust
//! use simsearch::{Metric, SearchConfig, SimSearch};
//!
//! let corpus: Vec<String> = ["cat", "bat", "cats", "dog"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let config = SearchConfig::new(1, Metric::Levenshtein).with_include_eye(false);
//! let search = SimSearch::new(&corpus, config).unwrap();
//! let pairs = search.semi_pattern_search(None).unwrap();
//!
//! assert_eq!(pairs.to_sorted_vec(), vec![(0, 1), (0, 2)]);
//! ```
//!
//! # Strategies
//!
//! - **Patterns**: one region key per string, confirmed on the full strings
//! - **Semi-patterns**: deletion patterns over the whole string (general case)
//! - **Part-patterns**: region keys with size-adaptive bucket verification

pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod search;

pub use config::{SearchConfig, Strategy};
pub use corpus::Corpus;
pub use error::{SearchError, SearchResult};
pub use output::{output_file_name, write_pairs, write_pairs_to_path};
pub use search::{
    within_edit_distance, within_hamming_distance, Metric, Pair, PairSet, Region, SimSearch,
    SinkKind, TrimDirection,
};
