//! String similarity metrics used by ranking, the result cache and the
//! request coordinator. All functions are pure.

use std::collections::HashSet;
use strsim::normalized_levenshtein;

/// Character-level similarity in `0.0..=1.0` (normalized edit distance)
pub fn string_similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

/// Similarity between two normalized query keys in `0.0..=1.0`.
///
/// Containment ratio when one key contains the other, otherwise shared
/// whitespace-separated words over the larger word count.
pub fn key_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    if a.contains(b) || b.contains(a) {
        return a_len.min(b_len) as f64 / a_len.max(b_len) as f64;
    }

    let a_words: HashSet<&str> = a.split_whitespace().collect();
    let b_words: HashSet<&str> = b.split_whitespace().collect();
    let larger = a_words.len().max(b_words.len());
    if larger == 0 {
        return 0.0;
    }
    a_words.intersection(&b_words).count() as f64 / larger as f64
}

/// Whether a new search for `incoming` should cancel a pending search for `existing`.
///
/// Equal keys, one key's words being a leading run of the other's (the user
/// kept typing or backspaced), or key similarity at or above `threshold`.
pub fn is_superseding(existing: &str, incoming: &str, threshold: f64) -> bool {
    existing == incoming
        || is_word_prefix(existing, incoming)
        || is_word_prefix(incoming, existing)
        || key_similarity(existing, incoming) >= threshold
}

/// Whether every word of `prefix` matches the leading words of `key`, in order
fn is_word_prefix(prefix: &str, key: &str) -> bool {
    let mut key_words = key.split_whitespace();
    let mut matched = false;
    for word in prefix.split_whitespace() {
        if key_words.next() != Some(word) {
            return false;
        }
        matched = true;
    }
    matched
}
