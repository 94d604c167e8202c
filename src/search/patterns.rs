//! Candidate-key generation by bounded deletion.
//!
//! Two strings within edit distance `d ≤ 2` always share at least one key
//! when both sides generate every pattern with up to `d` deletions
//! (symmetric deletion). Region keys live in [`super::region`].

/// Deepest deletion level generated. Patterns grow as O(L^depth), and the
/// recall argument only holds up to this depth anyway.
pub const MAX_DELETIONS: usize = 2;

/// Number of patterns [`deletion_patterns_up_to`] yields for a string of
/// `len` chars, before deduplication.
pub fn deletion_pattern_count(len: usize, depth: usize) -> usize {
    match depth.min(MAX_DELETIONS) {
        0 => 1,
        1 => 1 + len,
        _ => 1 + len + len * len.saturating_sub(1) / 2,
    }
}

/// The string itself plus every pattern obtained by deleting one or two
/// chars: 1 + L + L(L-1)/2 patterns before deduplication.
pub fn deletion_patterns(s: &str) -> Vec<String> {
    deletion_patterns_up_to(s, MAX_DELETIONS)
}

/// Like [`deletion_patterns`] with the deletion depth capped at `depth`
/// (itself capped at [`MAX_DELETIONS`]).
///
/// The same pattern can appear more than once (deleting either `a` of "aa"
/// gives "a"); callers that need a set must deduplicate.
pub fn deletion_patterns_up_to(s: &str, depth: usize) -> Vec<String> {
    let depth = depth.min(MAX_DELETIONS);
    let spans: Vec<(usize, usize)> = s
        .char_indices()
        .map(|(start, c)| (start, start + c.len_utf8()))
        .collect();

    let mut patterns = Vec::with_capacity(deletion_pattern_count(spans.len(), depth));

    if depth >= 1 {
        for (i, &(start_i, end_i)) in spans.iter().enumerate() {
            let mut single = String::with_capacity(s.len());
            single.push_str(&s[..start_i]);
            single.push_str(&s[end_i..]);
            patterns.push(single);

            if depth >= 2 {
                for &(start_j, end_j) in &spans[i + 1..] {
                    let mut double = String::with_capacity(s.len());
                    double.push_str(&s[..start_i]);
                    double.push_str(&s[end_i..start_j]);
                    double.push_str(&s[end_j..]);
                    patterns.push(double);
                }
            }
        }
    }

    patterns.push(s.to_string());
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_pattern_count() {
        // The string, L single deletions, C(L, 2) double deletions
        for len in 0..10 {
            let s: String = "abcdefghij"[..len].to_string();
            let patterns = deletion_patterns(&s);
            assert_eq!(
                patterns.len(),
                1 + len + len * len.saturating_sub(1) / 2,
                "len={}",
                len
            );
            assert_eq!(patterns.len(), deletion_pattern_count(len, 2));
        }
    }

    #[test]
    fn test_single_char_has_two_patterns() {
        assert_eq!(deletion_patterns("a"), vec![String::new(), "a".to_string()]);
        assert_eq!(deletion_pattern_count(1, 2), 2);
        assert_eq!(deletion_pattern_count(2, 2), 4);
    }

    #[test]
    fn test_patterns_for_short_string() {
        let patterns: BTreeSet<String> = deletion_patterns("abc").into_iter().collect();
        let expected: BTreeSet<String> = ["abc", "bc", "ac", "ab", "a", "b", "c"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(patterns, expected);
    }

    #[test]
    fn test_depth_limits() {
        assert_eq!(deletion_patterns_up_to("abcd", 0), vec!["abcd".to_string()]);
        let single = deletion_patterns_up_to("abcd", 1);
        assert_eq!(single.len(), 5);
        assert!(single.iter().all(|p| p.len() >= 3));
        // Depth above the cap behaves like the cap
        assert_eq!(
            deletion_patterns_up_to("abcd", 5),
            deletion_patterns_up_to("abcd", 2)
        );
    }

    #[test]
    fn test_deletion_reachable_strings_share_a_pattern() {
        let long: BTreeSet<String> = deletion_patterns("kitten").into_iter().collect();
        // Two deletions from "kitten"
        assert!(long.contains("kten"));
        // One deletion each side: "kitten" and "mitten" meet at "itten"
        let other: BTreeSet<String> = deletion_patterns("mitten").into_iter().collect();
        assert!(long.intersection(&other).any(|p| p == "itten"));
    }

    #[test]
    fn test_multibyte_deletions() {
        let patterns = deletion_patterns_up_to("añb", 1);
        assert!(patterns.contains(&"ab".to_string()));
        assert!(patterns.contains(&"ñb".to_string()));
        assert!(patterns.contains(&"añ".to_string()));
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(deletion_patterns(""), vec![String::new()]);
    }
}
