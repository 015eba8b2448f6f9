use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::keyword_tables::{CATEGORY_PATTERNS, MEDIA_TYPE_HINTS, STOP_WORDS, TEMPORAL_MODIFIERS};
use crate::modules::catalog::MediaType;
use crate::modules::search::domain::value_objects::QueryIntent;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year pattern is valid"));

/// Turns free text into a [`QueryIntent`].
///
/// Pure and deterministic: the cache, the request coordinator and the ranker
/// all re-derive intents from raw text and must agree.
///
/// Steps run in order, each consuming the text it matched:
/// 1. year (1900-2099)
/// 2. temporal modifier ("latest", "new", ...)
/// 3. media-type hint ("movies", "tv series", ...)
/// 4. region/franchise categories, all occurrences
/// 5. tokenization with stop-word removal
pub struct QueryAnalyzer;

impl QueryAnalyzer {
    pub fn analyze(raw_query: &str) -> QueryIntent {
        let mut working = raw_query.to_lowercase();
        let mut intent = QueryIntent::default();

        if let Some(found) = YEAR_PATTERN.find(&working) {
            intent.year = found.as_str().parse().ok();
            let range = found.range();
            working.replace_range(range, " ");
        }

        if let Some(range) = earliest_match(&working, TEMPORAL_MODIFIERS.iter().copied()) {
            intent.is_latest = true;
            working.replace_range(range, " ");
        }

        if let Some((range, media_type)) = Self::detect_media_type(&working) {
            intent.media_type_hint = Some(media_type);
            working.replace_range(range, " ");
        }

        for pattern in CATEGORY_PATTERNS {
            while let Some(range) = find_phrase(&working, pattern.phrase) {
                intent.categories.insert(pattern.tag);
                intent
                    .languages
                    .extend(pattern.languages.iter().map(|code| code.to_string()));
                working.replace_range(range, " ");
            }
        }

        let tokens = tokenize(&working);
        intent.normalized_text = tokens.join(" ");
        intent.keywords = tokens
            .into_iter()
            .filter(|token| token.chars().count() > 1)
            .collect();

        intent
    }

    /// Earliest hint in the text wins; on a tie the longer phrase wins
    fn detect_media_type(text: &str) -> Option<(Range<usize>, MediaType)> {
        MEDIA_TYPE_HINTS
            .iter()
            .filter_map(|(phrase, media_type)| {
                find_phrase(text, phrase).map(|range| (range, *media_type))
            })
            .min_by(|(a, _), (b, _)| a.start.cmp(&b.start).then(b.len().cmp(&a.len())))
    }
}

/// Cache and de-duplication key: lowercased, punctuation stripped, whitespace collapsed.
///
/// Unlike [`QueryIntent::normalized_text`] nothing is consumed, so
/// "latest hindi movies" and "hindi movies" stay distinct keys.
pub fn normalize_query_key(raw_query: &str) -> String {
    strip_special_chars(&raw_query.to_lowercase())
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Whole-phrase containment check on lowercase text
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    find_phrase(text, phrase).is_some()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn find_phrase(text: &str, phrase: &str) -> Option<Range<usize>> {
    if phrase.is_empty() {
        return None;
    }
    text.match_indices(phrase).find_map(|(start, matched)| {
        let end = start + matched.len();
        let before_ok = text[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
        let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
        (before_ok && after_ok).then_some(start..end)
    })
}

fn earliest_match<'a>(text: &str, phrases: impl Iterator<Item = &'a str>) -> Option<Range<usize>> {
    phrases
        .filter_map(|phrase| find_phrase(text, phrase))
        .min_by(|a, b| a.start.cmp(&b.start).then(b.len().cmp(&a.len())))
}

fn strip_special_chars(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    strip_special_chars(text)
        .split_whitespace()
        .map(|token| token.trim_matches('-'))
        .filter(|token| !token.is_empty() && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}
