//! Structural regions of a string.
//!
//! A [`Region`] splits every string into a *key* part (equal keys put two
//! strings in the same bucket) and a *remainder* (what is left to compare
//! once the keys are known to be equal). Sizes and offsets count chars, and
//! strings shorter than the region are clipped rather than rejected.
//!
//! | region             | key (`region_pattern`)    | remainder               |
//! |--------------------|---------------------------|-------------------------|
//! | `None`             | whole string              | whole string            |
//! | `Prefix(n)`        | first `n` chars           | chars after the prefix  |
//! | `Suffix(n)`        | last `n` chars            | chars before the suffix |
//! | `Middle{start,len}`| string minus the span     | the span itself         |

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::distance::Metric;

/// Which part of a string a [`Region`] cuts out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimDirection {
    None,
    Prefix,
    Suffix,
    Middle,
}

/// A trim direction together with its size or span.
///
/// In TOML: `region = "none"`, `region = { prefix = 4 }`,
/// `region = { middle = { start = 3, len = 5 } }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    None,
    Prefix(usize),
    Suffix(usize),
    Middle { start: usize, len: usize },
}

impl Region {
    pub fn direction(&self) -> TrimDirection {
        match self {
            Region::None => TrimDirection::None,
            Region::Prefix(_) => TrimDirection::Prefix,
            Region::Suffix(_) => TrimDirection::Suffix,
            Region::Middle { .. } => TrimDirection::Middle,
        }
    }

    /// Whether, for two strings with equal keys, the distance between their
    /// remainders equals the distance between the full strings.
    ///
    /// Equal keys mean a shared prefix and/or suffix. Levenshtein distance is
    /// unchanged by stripping either. Hamming distance is aligned from the
    /// start, so a shared prefix is exact, and so is a middle span: equal
    /// middle keys force either equal-length spans or empty tails. Removing a
    /// shared suffix from strings of different lengths shifts the alignment.
    pub fn remainder_is_exact(&self, metric: Metric) -> bool {
        !matches!((self, metric), (Region::Suffix(_), Metric::Hamming))
    }
}

/// Byte offset of the `chars`-th char of `s`, clipped to `s.len()`.
fn byte_offset(s: &str, chars: usize) -> usize {
    if s.is_ascii() {
        return chars.min(s.len());
    }
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

fn char_len(s: &str) -> usize {
    if s.is_ascii() {
        s.len()
    } else {
        s.chars().count()
    }
}

/// Byte range of the region's cut within `s`.
fn cut_range(s: &str, region: Region) -> (usize, usize) {
    match region {
        Region::None => (0, s.len()),
        Region::Prefix(n) => (0, byte_offset(s, n)),
        Region::Suffix(n) => (byte_offset(s, char_len(s).saturating_sub(n)), s.len()),
        Region::Middle { start, len } => {
            (byte_offset(s, start), byte_offset(s, start.saturating_add(len)))
        }
    }
}

/// The key derived from `s` by `region`.
pub fn region_pattern(s: &str, region: Region) -> Cow<'_, str> {
    let (from, to) = cut_range(s, region);
    match region {
        Region::None | Region::Prefix(_) | Region::Suffix(_) => Cow::Borrowed(&s[from..to]),
        Region::Middle { .. } => {
            if from == to {
                return Cow::Borrowed(s);
            }
            let mut key = String::with_capacity(s.len() - (to - from));
            key.push_str(&s[..from]);
            key.push_str(&s[to..]);
            Cow::Owned(key)
        }
    }
}

/// What is left of `s` once the key is taken out.
pub fn region_remainder(s: &str, region: Region) -> &str {
    let (from, to) = cut_range(s, region);
    match region {
        Region::None => s,
        Region::Prefix(_) => &s[to..],
        Region::Suffix(_) => &s[..from],
        Region::Middle { .. } => &s[from..to],
    }
}
