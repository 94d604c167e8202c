//! Hash container aliases used by the pattern index and pair sets.
//!
//! With the `ahash-hasher` feature, `FastHashMap`/`FastHashSet` use ahash
//! (AES-NI on x86_64) instead of SipHash. Pattern keys are short strings
//! hashed tens of millions of times per search, so the hasher shows up
//! directly in the indexing phase.
//!
//! Without the feature these are plain std aliases.

#[cfg(feature = "ahash-hasher")]
pub use ahash::{AHashMap as FastHashMap, AHashSet as FastHashSet};

#[cfg(not(feature = "ahash-hasher"))]
pub use std::collections::{HashMap as FastHashMap, HashSet as FastHashSet};

/// Map with a pre-sized table. Both aliases implement `Default`, so the
/// hasher is built the same way regardless of feature.
pub fn map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V>
where
    K: std::hash::Hash + Eq,
{
    let mut map = FastHashMap::default();
    map.reserve(capacity);
    map
}
