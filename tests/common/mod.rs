//! Shared helpers for search integration tests: deterministic synthetic
//! corpora and brute-force reference results.

#![allow(dead_code)]

use std::collections::BTreeSet;

use simsearch::search::region_pattern;
use simsearch::{Metric, Region};

/// Small deterministic PRNG (xorshift64*), so corpora are stable across runs.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        XorShift(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

const ALPHABET: &[u8] = b"acgt";

fn random_word(rng: &mut XorShift, min_len: usize, max_len: usize) -> Vec<u8> {
    let len = min_len + rng.below(max_len - min_len + 1);
    (0..len).map(|_| ALPHABET[rng.below(ALPHABET.len())]).collect()
}

/// Apply one random insertion, deletion or substitution.
fn mutate(rng: &mut XorShift, word: &mut Vec<u8>) {
    let c = ALPHABET[rng.below(ALPHABET.len())];
    match rng.below(3) {
        0 => {
            let at = rng.below(word.len() + 1);
            word.insert(at, c);
        }
        1 if word.len() > 1 => {
            let at = rng.below(word.len());
            word.remove(at);
        }
        _ => {
            if !word.is_empty() {
                let at = rng.below(word.len());
                word[at] = c;
            }
        }
    }
}

/// `n` distinct strings over a 4-letter alphabet. About half are planted
/// 1-3 edits away from an earlier string, so every cutoff has matches.
pub fn synthetic_corpus(n: usize, seed: u64) -> Vec<String> {
    let mut rng = XorShift::new(seed);
    let mut seen = BTreeSet::new();
    let mut out: Vec<String> = Vec::with_capacity(n);

    while out.len() < n {
        let word = if !out.is_empty() && rng.below(2) == 0 {
            let mut word = out[rng.below(out.len())].clone().into_bytes();
            for _ in 0..1 + rng.below(3) {
                mutate(&mut rng, &mut word);
            }
            word
        } else {
            random_word(&mut rng, 5, 10)
        };
        let word = String::from_utf8(word).expect("ascii alphabet");
        if seen.insert(word.clone()) {
            out.push(word);
        }
    }
    out
}

/// Plain O(|a|·|b|) Levenshtein distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        cur[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Position-wise mismatches plus the length difference.
pub fn hamming(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mismatches = a.iter().zip(&b).filter(|(x, y)| x != y).count();
    mismatches + a.len().abs_diff(b.len())
}

pub fn distance(metric: Metric, a: &str, b: &str) -> usize {
    match metric {
        Metric::Levenshtein => levenshtein(a, b),
        Metric::Hamming => hamming(a, b),
    }
}

fn all_pairs_where<F>(strings: &[String], include_eye: bool, mut keep: F) -> Vec<(usize, usize)>
where
    F: FnMut(usize, usize) -> bool,
{
    let mut pairs = Vec::new();
    for i in 0..strings.len() {
        if include_eye {
            pairs.push((i, i));
        }
        for j in i + 1..strings.len() {
            if keep(i, j) {
                pairs.push((i, j));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// Every pair (i < j) within `cutoff`, plus (i, i) for all i when
/// `include_eye`.
pub fn brute_force(
    strings: &[String],
    cutoff: usize,
    metric: Metric,
    include_eye: bool,
) -> Vec<(usize, usize)> {
    all_pairs_where(strings, include_eye, |i, j| {
        distance(metric, &strings[i], &strings[j]) <= cutoff
    })
}

/// Like [`brute_force`], restricted to strings with equal `region` keys.
pub fn brute_force_keyed(
    strings: &[String],
    cutoff: usize,
    metric: Metric,
    region: Region,
    include_eye: bool,
) -> Vec<(usize, usize)> {
    let keys: Vec<String> = strings
        .iter()
        .map(|s| region_pattern(s, region).into_owned())
        .collect();
    all_pairs_where(strings, include_eye, |i, j| {
        keys[i] == keys[j] && distance(metric, &strings[i], &strings[j]) <= cutoff
    })
}
