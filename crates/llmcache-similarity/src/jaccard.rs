//! Token-set Jaccard similarity used throughout this crate (§4.6).

use std::collections::HashSet;

/// Jaccard similarity over lowercase whitespace tokens.
///
/// Both empty strings are defined as fully similar (`1.0`); exactly one
/// empty and the other not is fully dissimilar (`0.0`). Equal strings
/// always score `1.0` (a direct consequence of identical token sets, but
/// called out here since it's an explicit invariant, not an accident of
/// the general formula).
pub fn jaccard(a: &str, b: &str) -> f64 {
    let a_empty = a.trim().is_empty();
    let b_empty = b.trim().is_empty();
    match (a_empty, b_empty) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let lower_a = a.to_lowercase();
    let lower_b = b.to_lowercase();
    let tokens_a: HashSet<&str> = lower_a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = lower_b.split_whitespace().collect();

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_empty_is_fully_similar() {
        assert_eq!(jaccard("", "   "), 1.0);
    }

    #[test]
    fn one_empty_is_fully_dissimilar() {
        assert_eq!(jaccard("", "hello world"), 0.0);
        assert_eq!(jaccard("hello world", ""), 0.0);
    }

    #[test]
    fn equal_strings_score_one() {
        assert_eq!(jaccard("git push origin main", "git push origin main"), 1.0);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(jaccard("Git Push", "git push"), 1.0);
    }

    #[test]
    fn partial_overlap() {
        let score = jaccard("rejected non-fast-forward", "rejected");
        // {rejected, non-fast-forward} vs {rejected}: 1/2.
        assert_eq!(score, 0.5);
    }

    #[test]
    fn disjoint_tokens_score_zero() {
        assert_eq!(jaccard("foo bar", "baz qux"), 0.0);
    }
}
