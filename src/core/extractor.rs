use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::scoring::ScoringError;
use crate::models::{MAX_SUB_SCORE, MIN_SUB_SCORE};

// Digits are ASCII-only (`[0-9]`): `\d` in `regex` also matches other
// Unicode decimal digits, which `f64::from_str` cannot parse.

/// Matchers for general "score" / "rating" commentary, highest priority first
pub const RATING_PATTERNS: [&str; 4] = [
    r"score[:\s]+([0-9]+(?:\.[0-9]+)?)",
    r"([0-9]+(?:\.[0-9]+)?)[/\s]*(?:out of |/)?\s*10",
    r"rating[:\s]+([0-9]+(?:\.[0-9]+)?)",
    r"([0-9]+(?:\.[0-9]+)?)[/\s]*10",
];

/// Matchers for keyword research commentary, highest priority first
pub const COMMERCIAL_VALUE_PATTERNS: [&str; 3] = [
    r"commercial value[:\s]+([0-9]+(?:\.[0-9]+)?)",
    r"value[:\s]+([0-9]+(?:\.[0-9]+)?)",
    r"([0-9]+(?:\.[0-9]+)?)[/\s]*(?:out of |/)?\s*10",
];

static RATING_EXTRACTOR: Lazy<ScoreExtractor> = Lazy::new(|| {
    ScoreExtractor::new(&RATING_PATTERNS).expect("rating patterns are valid")
});

static COMMERCIAL_VALUE_EXTRACTOR: Lazy<ScoreExtractor> = Lazy::new(|| {
    ScoreExtractor::new(&COMMERCIAL_VALUE_PATTERNS).expect("commercial value patterns are valid")
});

/// A score recovered from text, with the index of the matcher that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedScore {
    pub value: f64,
    pub pattern_index: usize,
}

/// Recovers a 1-10 rating from free-form text.
///
/// Patterns are tried in order, each against the whole lowercased text; the
/// first pattern whose first match parses as a number wins. Matched values
/// are clamped into [1, 10].
#[derive(Debug, Clone)]
pub struct ScoreExtractor {
    patterns: Vec<Regex>,
}

impl ScoreExtractor {
    /// Compile an ordered pattern list. Every pattern needs a capture group
    /// holding the number.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ScoringError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let regex = Regex::new(p.as_ref())
                    .map_err(|e| ScoringError::InvalidPattern(e.to_string()))?;
                if regex.captures_len() < 2 {
                    return Err(ScoringError::InvalidPattern(format!(
                        "pattern has no capture group: {}",
                        p.as_ref()
                    )));
                }
                Ok(regex)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Shared extractor for "score" / "rating" text
    pub fn rating() -> &'static ScoreExtractor {
        &RATING_EXTRACTOR
    }

    /// Shared extractor for "commercial value" text
    pub fn commercial_value() -> &'static ScoreExtractor {
        &COMMERCIAL_VALUE_EXTRACTOR
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Find the first matching pattern and return its clamped value
    pub fn extract_match(&self, text: &str) -> Option<ExtractedScore> {
        let lowered = text.to_lowercase();

        for (pattern_index, pattern) in self.patterns.iter().enumerate() {
            let Some(captures) = pattern.captures(&lowered) else {
                continue;
            };
            let Some(group) = captures.get(1) else {
                continue;
            };

            // Overlong digit runs parse to infinity and clamp to the maximum
            match group.as_str().parse::<f64>() {
                Ok(value) => {
                    return Some(ExtractedScore {
                        value: value.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE),
                        pattern_index,
                    });
                }
                _ => {
                    tracing::trace!("Unparseable score token {:?}, trying next pattern", group.as_str());
                    continue;
                }
            }
        }

        None
    }

    /// Extract a score, falling back to `default` (returned as-is) when no
    /// pattern matches
    pub fn extract(&self, text: &str, default: f64) -> f64 {
        self.extract_match(text)
            .map(|found| found.value)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_score_label() {
        let extractor = ScoreExtractor::rating();
        assert_eq!(extractor.extract("Trend score: 7", 5.0), 7.0);
        assert_eq!(extractor.extract("SCORE 8.5 overall", 5.0), 8.5);
    }

    #[test]
    fn test_out_of_ten_suffix() {
        let extractor = ScoreExtractor::rating();
        assert_eq!(extractor.extract("I'd give it 8/10.", 5.0), 8.0);
        assert_eq!(extractor.extract("Roughly 6 out of 10", 5.0), 6.0);
    }

    #[test]
    fn test_rating_label() {
        // "rating" only wins when nothing earlier in the list matches
        let extractor = ScoreExtractor::rating();
        let found = extractor.extract_match("Rating: 4").unwrap();
        assert_eq!(found.value, 4.0);
        assert_eq!(found.pattern_index, 2);
    }

    #[test]
    fn test_patterns_tried_before_positions() {
        // "7/10" appears first in the text but the score label has priority
        let extractor = ScoreExtractor::rating();
        let found = extractor.extract_match("Looks like 7/10 to me. Final score: 3").unwrap();
        assert_eq!(found.value, 3.0);
        assert_eq!(found.pattern_index, 0);
    }

    #[test]
    fn test_first_match_of_pattern_wins() {
        let extractor = ScoreExtractor::rating();
        assert_eq!(extractor.extract("score: 2 ... score: 9", 5.0), 2.0);
    }

    #[test]
    fn test_clamps_out_of_range() {
        let extractor = ScoreExtractor::rating();
        assert_eq!(extractor.extract("score: 15", 5.0), 10.0);
        assert_eq!(extractor.extract("score: 0", 5.0), 1.0);
        assert_eq!(extractor.extract("score: 0.5", 5.0), 1.0);
    }

    #[test]
    fn test_no_match_returns_default_unclamped() {
        let extractor = ScoreExtractor::rating();
        assert_eq!(extractor.extract("", 5.0), 5.0);
        assert_eq!(extractor.extract("No numbers here at all", 42.0), 42.0);
        assert_eq!(extractor.extract("Connection error", -3.0), -3.0);
        assert!(extractor.extract_match("nothing").is_none());
    }

    #[test]
    fn test_commercial_value_preset() {
        let extractor = ScoreExtractor::commercial_value();
        assert_eq!(extractor.pattern_count(), 3);
        assert_eq!(extractor.extract("Commercial value: 8", 5.0), 8.0);
        assert_eq!(extractor.extract("Overall value 6.5", 5.0), 6.5);
        assert_eq!(extractor.extract("about 7 out of 10", 5.0), 7.0);
        assert_eq!(extractor.extract("commercial value: 12", 5.0), 10.0);
        assert_eq!(extractor.extract("no signal", 5.0), 5.0);
    }

    #[test]
    fn test_custom_patterns_keep_order() {
        let extractor = ScoreExtractor::new(&[r"alpha (\d+)", r"beta (\d+)"]).unwrap();
        let found = extractor.extract_match("beta 3 alpha 4").unwrap();
        assert_eq!(found.value, 4.0);
        assert_eq!(found.pattern_index, 0);
    }

    #[test]
    fn test_unparseable_capture_falls_through() {
        // first pattern captures a non-number, second still gets a chance
        let extractor = ScoreExtractor::new(&[r"grade ([a-z]+)", r"score (\d+)"]).unwrap();
        let found = extractor.extract_match("grade b, score 6").unwrap();
        assert_eq!(found.value, 6.0);
        assert_eq!(found.pattern_index, 1);
    }

    #[test]
    fn test_overlong_number_clamps_to_max() {
        let text = format!("score: {}", "9".repeat(400));
        let found = ScoreExtractor::rating().extract_match(&text).unwrap();
        assert_eq!(found.value, 10.0);
        assert_eq!(found.pattern_index, 0);
    }

    #[test]
    fn test_non_ascii_digits_not_matched() {
        let extractor = ScoreExtractor::rating();
        // Arabic-Indic seven
        assert!(extractor.extract_match("score: \u{0667}").is_none());
        assert_eq!(extractor.extract("score: \u{0667}", 5.0), 5.0);
        assert_eq!(extractor.extract("score: \u{0667}, rating: 6", 5.0), 6.0);
    }

    #[test]
    fn test_invalid_patterns_rejected() {
        assert!(ScoreExtractor::new(&[r"score (\d+"]).is_err());
        assert!(ScoreExtractor::new(&[r"score \d+"]).is_err());
    }

    #[test]
    fn test_deterministic() {
        let text = "Demand score: 6.2 with rating 9";
        let extractor = ScoreExtractor::rating();
        assert_eq!(
            extractor.extract(text, 5.0).to_bits(),
            extractor.extract(text, 5.0).to_bits()
        );
    }
}
