use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of key terms pulled from a title
pub const MAX_KEY_TERMS: usize = 5;

/// Maximum number of keywords collected per response section
pub const MAX_SECTION_KEYWORDS: usize = 5;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "new", "used",
];

static TITLE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("title word pattern is valid"));

static KEYWORD_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z\s]{2,30}\b").expect("keyword phrase pattern is valid"));

/// Pull the leading meaningful words out of a product title
pub fn extract_key_terms(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();

    TITLE_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| !STOP_WORDS.contains(word))
        .take(MAX_KEY_TERMS)
        .map(str::to_string)
        .collect()
}

/// Collect keywords listed after the first line mentioning `section`.
///
/// Scanning continues across following non-empty lines (including lines
/// naming other sections) until enough phrases are gathered.
pub fn extract_keyword_section(response: &str, section: &str) -> Vec<String> {
    let lowered = response.to_lowercase();
    let section = section.to_lowercase();
    let mut keywords = Vec::new();
    let mut capturing = false;

    for line in lowered.lines() {
        if line.contains(&section) {
            capturing = true;
            continue;
        }

        if capturing && !line.trim().is_empty() {
            keywords.extend(
                KEYWORD_PHRASE
                    .find_iter(line)
                    .map(|m| m.as_str().trim())
                    .filter(|phrase| phrase.len() > 2)
                    .map(str::to_string),
            );

            if keywords.len() >= MAX_SECTION_KEYWORDS {
                break;
            }
        }
    }

    keywords.truncate(MAX_SECTION_KEYWORDS);
    keywords
}
