use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::prompts::MAX_RECOMMENDATIONS;
use crate::types::{RecommendationResult, Track};

// Maximal ASCII digit runs for the fallback scan
static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("invalid regex"));

/// Which path produced the candidate indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// Reply was a well-formed JSON array of integers
    Json,
    /// Reply was not valid JSON; indices were scraped from digit runs
    DigitScan,
}

/// Raw 1-based indices pulled from a model reply, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIndices {
    pub indices: Vec<i64>,
    pub source: IndexSource,
}

/// Extract candidate indices from a completion reply.
///
/// Tries the trimmed text as a JSON integer array first. Otherwise takes the
/// first five digit runs in order of appearance; these can come from
/// unrelated prose ("top 5"), so this path is a last resort only.
pub fn extract_indices(raw: &str) -> ParsedIndices {
    match serde_json::from_str::<Vec<i64>>(raw.trim()) {
        Ok(indices) => ParsedIndices {
            indices,
            source: IndexSource::Json,
        },
        Err(e) => {
            let indices: Vec<i64> = DIGIT_RUN_RE
                .find_iter(raw)
                .take(MAX_RECOMMENDATIONS)
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            tracing::warn!(
                error = %e,
                recovered = indices.len(),
                "Completion was not a JSON index array, fell back to digit scan"
            );
            ParsedIndices {
                indices,
                source: IndexSource::DigitScan,
            }
        }
    }
}

/// Resolve 1-based indices against the candidate list.
///
/// Out-of-range indices are dropped and repeats collapse to their first
/// occurrence. At most [`MAX_RECOMMENDATIONS`] tracks are returned, in the
/// order the indices appeared.
pub fn resolve_indices(indices: &[i64], unrated: &[Track]) -> Vec<Track> {
    let mut seen = HashSet::new();
    let mut tracks = Vec::new();

    for &index in indices {
        let Some(track) = usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| unrated.get(i))
        else {
            tracing::debug!(index, candidates = unrated.len(), "Dropping out-of-range index");
            continue;
        };

        if !seen.insert(index) {
            tracing::debug!(index, "Dropping repeated index");
            continue;
        }

        tracks.push(track.clone());
        if tracks.len() == MAX_RECOMMENDATIONS {
            break;
        }
    }

    tracks
}

/// Turn a raw completion into a bounded recommendation list.
///
/// Never fails: malformed replies degrade to fewer (or zero) tracks, and the
/// raw text is always returned verbatim as `reasoning`.
pub fn interpret(raw: &str, unrated: &[Track]) -> RecommendationResult {
    let parsed = extract_indices(raw);
    let recommendations = resolve_indices(&parsed.indices, unrated);

    tracing::debug!(
        source = ?parsed.source,
        extracted = parsed.indices.len(),
        resolved = recommendations.len(),
        "Interpreted completion"
    );

    RecommendationResult {
        recommendations,
        reasoning: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(n: usize) -> Vec<Track> {
        (1..=n)
            .map(|i| Track::unrated(format!("t{i}"), format!("Track {i}")))
            .collect()
    }

    fn ids(result: &RecommendationResult) -> Vec<&str> {
        result.recommendations.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_interpret_json_array() {
        let result = interpret("[1, 3, 7]", &candidates(10));
        assert_eq!(ids(&result), vec!["t1", "t3", "t7"]);
    }

    #[test]
    fn test_interpret_json_with_whitespace() {
        let result = interpret("\n  [4, 2]  \n", &candidates(10));
        assert_eq!(ids(&result), vec!["t4", "t2"]);
    }

    #[test]
    fn test_interpret_drops_out_of_range() {
        let result = interpret("[1, 99, 3]", &candidates(10));
        assert_eq!(ids(&result), vec!["t1", "t3"]);
    }

    #[test]
    fn test_interpret_drops_zero_and_negative() {
        let result = interpret("[0, -2, 10, 11]", &candidates(10));
        assert_eq!(ids(&result), vec!["t10"]);
    }

    #[test]
    fn test_interpret_fallback_digit_scan() {
        let result = interpret("I recommend tracks 2 and 5 and 9", &candidates(10));
        assert_eq!(ids(&result), vec!["t2", "t5", "t9"]);
    }

    #[test]
    fn test_extract_indices_reports_source() {
        assert_eq!(extract_indices("[2]").source, IndexSource::Json);
        assert_eq!(extract_indices("Try 2").source, IndexSource::DigitScan);
    }

    #[test]
    fn test_fallback_takes_first_five_runs_only() {
        // 99 is the third run; 6 and 7 are beyond the first five
        let parsed = extract_indices("Picks: 1, 2, 99, 3, 4, 6, 7");
        assert_eq!(parsed.indices, vec![1, 2, 99, 3, 4]);
        let result = interpret("Picks: 1, 2, 99, 3, 4, 6, 7", &candidates(10));
        assert_eq!(ids(&result), vec!["t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn test_fallback_on_prose_wrapped_json() {
        let result = interpret("Here you go: [3, 1]", &candidates(10));
        assert_eq!(ids(&result), vec!["t3", "t1"]);
    }

    #[test]
    fn test_non_integer_json_falls_back() {
        let parsed = extract_indices(r#"["2", "4"]"#);
        assert_eq!(parsed.source, IndexSource::DigitScan);
        assert_eq!(parsed.indices, vec![2, 4]);
    }

    #[test]
    fn test_interpret_caps_at_five() {
        let result = interpret("[1, 2, 3, 4, 5, 6, 7, 8]", &candidates(10));
        assert_eq!(ids(&result), vec!["t1", "t2", "t3", "t4", "t5"]);
    }

    #[test]
    fn test_interpret_cap_applies_after_validation() {
        let result = interpret("[42, 1, 2, 3, 4, 5, 6]", &candidates(10));
        assert_eq!(ids(&result), vec!["t1", "t2", "t3", "t4", "t5"]);
    }

    #[test]
    fn test_interpret_collapses_duplicates() {
        let result = interpret("[2, 2, 5, 2, 1]", &candidates(10));
        assert_eq!(ids(&result), vec!["t2", "t5", "t1"]);
    }

    #[test]
    fn test_interpret_garbage_is_empty() {
        let raw = "garbage text with no numbers";
        let result = interpret(raw, &candidates(10));
        assert!(result.recommendations.is_empty());
        assert_eq!(result.reasoning, raw);
    }

    #[test]
    fn test_interpret_keeps_reasoning_verbatim() {
        let raw = "  [1]\n";
        let result = interpret(raw, &candidates(3));
        assert_eq!(result.reasoning, raw);
    }

    #[test]
    fn test_interpret_empty_candidates() {
        let result = interpret("[1, 2]", &[]);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_empty_json_array() {
        let parsed = extract_indices("[]");
        assert_eq!(parsed.source, IndexSource::Json);
        assert!(parsed.indices.is_empty());
    }

    #[test]
    fn test_overflowing_digit_run_is_skipped() {
        let parsed = extract_indices("pick 99999999999999999999999 or 3");
        assert_eq!(parsed.indices, vec![3]);
    }
}
