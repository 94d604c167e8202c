//! Bounded distance predicates.
//!
//! Both predicates answer "is the distance between `a` and `b` at most `k`?"
//! without computing the exact distance. They are the only place in the
//! crate where strings are compared character by character; everything
//! else treats strings as opaque keys.
//!
//! Distances are counted in Unicode scalar values. ASCII inputs (the common
//! case for sequence data) are compared as bytes; other inputs are decoded
//! into stack-backed buffers first.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::error::{SearchError, SearchResult};

/// Strings up to this many chars are decoded without touching the heap.
const INLINE_CHARS: usize = 64;

type CharBuf = SmallVec<[char; INLINE_CHARS]>;

/// Row value of a diagonal the current generation has not reached.
///
/// Far below any valid row, so the `+ 1` steps of the recurrence never turn
/// it into something that looks reachable.
const UNREACHED: isize = isize::MIN / 2;

/// Signature shared by both predicates.
pub type DistanceFn = fn(&str, &str, usize) -> bool;

/// Distance used to confirm candidate pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Metric {
    /// Levenshtein distance (insertions, deletions, substitutions)
    Levenshtein,
    /// Position-wise mismatches plus the length difference
    Hamming,
}

impl Metric {
    /// Parse the single-character selector used on the command line and in
    /// output file names.
    pub fn from_selector(selector: char) -> SearchResult<Self> {
        match selector {
            'L' => Ok(Metric::Levenshtein),
            'H' => Ok(Metric::Hamming),
            other => Err(SearchError::InvalidMetric(other)),
        }
    }

    /// The selector character (`L` or `H`).
    pub fn selector(self) -> char {
        match self {
            Metric::Levenshtein => 'L',
            Metric::Hamming => 'H',
        }
    }

    /// The predicate for this metric. Resolve it once per search and call
    /// the returned function in the hot loop.
    pub fn oracle(self) -> DistanceFn {
        match self {
            Metric::Levenshtein => within_edit_distance,
            Metric::Hamming => within_hamming_distance,
        }
    }

    /// Convenience wrapper around [`Metric::oracle`].
    pub fn within(self, a: &str, b: &str, k: usize) -> bool {
        (self.oracle())(a, b, k)
    }
}

impl TryFrom<String> for Metric {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Metric::from_selector(c),
            _ => Err(SearchError::InvalidConfig(format!(
                "metric must be a single character ('L' or 'H'), got '{}'",
                value
            ))),
        }
    }
}

impl From<Metric> for String {
    fn from(metric: Metric) -> Self {
        metric.selector().to_string()
    }
}

/// Is the Levenshtein distance between `a` and `b` at most `k`?
///
/// Runs in O(k · min(|a|, |b|)) time using a band of 2k + 1 diagonals.
pub fn within_edit_distance(a: &str, b: &str, k: usize) -> bool {
    if a == b {
        return true;
    }
    if a.is_ascii() && b.is_ascii() {
        return edit_within(a.as_bytes(), b.as_bytes(), k);
    }
    let a: CharBuf = a.chars().collect();
    let b: CharBuf = b.chars().collect();
    edit_within(&a, &b, k)
}

/// Is the Hamming distance between `a` and `b` at most `k`?
///
/// The length difference counts as mismatches; the common-length prefix is
/// compared position by position.
pub fn within_hamming_distance(a: &str, b: &str, k: usize) -> bool {
    if a == b {
        return true;
    }
    if a.is_ascii() && b.is_ascii() {
        return hamming_within(a.bytes(), b.bytes(), a.len(), b.len(), k);
    }
    hamming_within(a.chars(), b.chars(), a.chars().count(), b.chars().count(), k)
}

fn hamming_within<I, T>(a: I, b: I, len_a: usize, len_b: usize, k: usize) -> bool
where
    I: Iterator<Item = T>,
    T: PartialEq,
{
    let mut mismatches = len_a.abs_diff(len_b);
    if mismatches > k {
        return false;
    }
    for (x, y) in a.zip(b) {
        if x != y {
            mismatches += 1;
            if mismatches > k {
                return false;
            }
        }
    }
    true
}

fn edit_within<T: Copy + Eq>(a: &[T], b: &[T], k: usize) -> bool {
    let (mut a, mut b) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if b.len() - a.len() > k {
        return false;
    }

    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    a = &a[..a.len() - suffix];
    b = &b[..b.len() - suffix];

    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    a = &a[prefix..];
    b = &b[prefix..];

    // Only insertions remain, and the length check above bounds them by k.
    if a.is_empty() {
        return true;
    }
    // Rewriting b from scratch costs at most |b| edits.
    if b.len() <= k {
        return true;
    }

    banded_within(a, b, k)
}

/// Furthest-reaching diagonal search (Ukkonen / Landau-Vishkin).
///
/// Diagonal `d` holds cells `(i, i + d)` with `i` indexing the shorter
/// string `a`. Generation `e` stores, per diagonal, the furthest row
/// reachable with exactly `e` edits after sliding over equal characters.
/// The search succeeds when diagonal `|b| - |a|` reaches row `|a|`.
///
/// Requires `|a| <= |b|`.
fn banded_within<T: Copy + Eq>(a: &[T], b: &[T], k: usize) -> bool {
    let m = a.len() as isize;
    let n = b.len() as isize;
    let k_signed = k as isize;
    let target = n - m;

    // Diagonals -k..=k live at d + k + 1; slots 0 and 2k + 2 stay UNREACHED
    // so neighbours of the band edges read as unreachable.
    let width = 2 * k + 3;
    let slot = |d: isize| (d + k_signed + 1) as usize;

    let slide = |d: isize, mut row: isize| -> isize {
        while row < m && row + d < n && a[row as usize] == b[(row + d) as usize] {
            row += 1;
        }
        row
    };

    let mut current: SmallVec<[isize; 16]> = smallvec![UNREACHED; width];
    let mut next: SmallVec<[isize; 16]> = smallvec![UNREACHED; width];

    current[slot(0)] = slide(0, 0);
    if target == 0 && current[slot(0)] >= m {
        return true;
    }

    for edits in 1..=k_signed {
        let lo = (-edits).max(-m);
        let hi = edits.min(n);

        for d in lo..=hi {
            let idx = slot(d);

            // Leaving diagonal d for the target costs |target - d| more edits.
            if edits + (target - d).abs() > k_signed {
                next[idx] = UNREACHED;
                continue;
            }

            let substitute = current[idx] + 1;
            let insert = current[idx - 1];
            let delete = current[idx + 1] + 1;
            let row = substitute.max(insert).max(delete).min(m).min(n - d);

            next[idx] = if row < 0 || row + d < 0 {
                UNREACHED
            } else {
                slide(d, row)
            };
        }

        if next[slot(target)] >= m {
            return true;
        }
        std::mem::swap(&mut current, &mut next);
    }

    false
}
