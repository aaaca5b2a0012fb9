//! Approximate term matching
//!
//! Damerau-Levenshtein distance (optimal string alignment, adjacent
//! transpositions count as one edit) with an early exit for clearly distant
//! strings, and a ranked "did you mean" builder on top of it.

use crate::catalog::pretty_term;

/// Diagonal value above which the distance computation gives up
pub const DEFAULT_EARLY_ABORT: usize = 4;
/// Terms strictly closer than this are suggested
pub const DEFAULT_MAX_DISTANCE: usize = 3;
/// Maximum number of suggestions shown
pub const DEFAULT_MAX_SUGGESTIONS: usize = 6;

/// Edit distance between `a` and `b` with the default early exit
pub fn distance(a: &str, b: &str) -> usize {
    bounded_distance(a, b, DEFAULT_EARLY_ABORT)
}

/// Edit distance between `a` and `b`.
///
/// As soon as a diagonal cell exceeds `abort_above`, the length of the longer
/// string is returned instead of the exact distance.
pub fn bounded_distance(a: &str, b: &str, abort_above: usize) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());
    let longest = n.max(m);

    if n == 0 || m == 0 {
        return longest;
    }

    let mut d = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        d[0][j] = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut cell = (d[i - 1][j] + 1).min(d[i][j - 1] + 1).min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                cell = cell.min(d[i - 2][j - 2] + cost);
            }
            d[i][j] = cell;

            if i == j && cell > abort_above {
                return longest;
            }
        }
    }

    d[n][m]
}

/// A vocabulary term close to the searched one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub term: String,
    pub distance: usize,
}

/// Ranked suggestion builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatcher {
    max_distance: usize,
    max_suggestions: usize,
    early_abort: usize,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            early_abort: DEFAULT_EARLY_ABORT,
        }
    }
}

impl FuzzyMatcher {
    pub fn new(max_distance: usize, max_suggestions: usize, early_abort: usize) -> Self {
        Self {
            max_distance,
            max_suggestions,
            early_abort,
        }
    }

    /// All terms closer than the threshold, sorted by distance then name and capped
    pub fn suggestions<'a, I>(&self, needle: &str, terms: I) -> Vec<Suggestion>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut found: Vec<Suggestion> = terms
            .into_iter()
            .filter_map(|term| {
                let distance = bounded_distance(needle, term, self.early_abort);
                (distance < self.max_distance).then(|| Suggestion {
                    term: term.clone(),
                    distance,
                })
            })
            .collect();

        found.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.term.cmp(&b.term)));
        found.dedup_by(|a, b| a.term == b.term);
        found.truncate(self.max_suggestions);
        found
    }

    /// Display form of the suggestions (`"name, game, map"`), `None` when nothing is close
    pub fn suggestion_list<'a, I>(&self, needle: &str, terms: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let found = self.suggestions(needle, terms);
        if found.is_empty() {
            return None;
        }
        Some(
            found
                .iter()
                .map(|s| pretty_term(&s.term))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn terms(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| format!("schema:{}", n)).collect()
    }

    #[test]
    fn test_distance_basics() {
        assert_eq!(distance("name", "name"), 0);
        assert_eq!(distance("nam", "name"), 1);
        assert_eq!(distance("Persn", "Person"), 1);
        assert_eq!(distance("nmae", "name"), 1);
        assert_eq!(distance("nam", "map"), 2);
        assert_eq!(distance("", "abc"), 3);
    }

    #[test]
    fn test_early_exit_returns_longest_length() {
        // Diagonal passes 4 before the end of the shorter string.
        assert_eq!(distance("abcdefgh", "zyxwvuts"), 8);
        assert_eq!(bounded_distance("abcdefgh", "zyxwvuts", 100), 8);
        assert_eq!(distance("abcdefghij", "zyxwvutsrqponm"), 14);
    }

    #[test]
    fn test_suggestions_ranked_and_capped() {
        let vocabulary = terms(&["map", "nsn", "name", "game", "url", "description"]);
        let matcher = FuzzyMatcher::default();

        let found = matcher.suggestions("schema:nam", &vocabulary);
        let names: Vec<_> = found.iter().map(|s| s.term.as_str()).collect();
        assert_eq!(names, vec!["schema:name", "schema:game", "schema:map", "schema:nsn"]);
        assert_eq!(
            matcher.suggestion_list("schema:nam", &vocabulary),
            Some("name, game, map, nsn".to_string())
        );

        let capped = FuzzyMatcher::new(3, 2, 4).suggestions("schema:nam", &vocabulary);
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn test_no_suggestion() {
        let vocabulary = terms(&["Person", "Thing"]);
        assert_eq!(FuzzyMatcher::default().suggestion_list("schema:TheMVP", &vocabulary), None);
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric(a in "[a-zA-Z]{0,12}", b in "[a-zA-Z]{0,12}") {
            prop_assert_eq!(distance(&a, &b), distance(&b, &a));
        }

        #[test]
        fn prop_distance_bounds(a in "[a-z ]{0,15}", b in "[a-z ]{0,15}") {
            let d = distance(&a, &b);
            prop_assert!(d <= a.chars().count().max(b.chars().count()));
            prop_assert_eq!(d == 0, a == b);
        }
    }
}
