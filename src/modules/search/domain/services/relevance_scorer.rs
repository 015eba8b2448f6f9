use chrono::{Datelike, Utc};
use serde::Serialize;

use super::keyword_tables::{
    regional_keyword, CATEGORY_PATTERNS, DC_KEYWORDS, MARVEL_KEYWORDS, SOUTH_INDIAN_KEYWORDS,
};
use super::query_analyzer::contains_phrase;
use super::similarity::string_similarity;
use crate::modules::catalog::CatalogRecord;
use crate::modules::search::domain::value_objects::{CategoryTag, QueryIntent};

// Title match
const EXACT_TITLE_SCORE: f64 = 40.0;
const STRONG_FUZZY_THRESHOLD: f64 = 0.7;
const STRONG_FUZZY_RANGE: (f64, f64) = (20.0, 35.0);
const WEAK_FUZZY_THRESHOLD: f64 = 0.5;
const WEAK_FUZZY_RANGE: (f64, f64) = (10.0, 20.0);

// Keyword coverage
const TITLE_KEYWORD_WEIGHT: f64 = 25.0;
const OVERVIEW_KEYWORD_WEIGHT: f64 = 10.0;
const PARTIAL_KEYWORD_THRESHOLD: f64 = 0.6;

const YEAR_NEAR_SCORE: f64 = 10.0;
const YEAR_CLOSE_SCORE: f64 = 5.0;
const MEDIA_TYPE_MATCH_SCORE: f64 = 5.0;

// Quality signals
const VOTE_AVERAGE_WEIGHT: f64 = 7.0;
const VOTE_COUNT_DIVISOR: f64 = 1000.0;
const VOTE_COUNT_CAP: f64 = 5.0;
const POPULARITY_DIVISOR: f64 = 100.0;
const POPULARITY_CAP: f64 = 10.0;

// Category boosts
const HINDI_BOOST: f64 = 30.0;
const SOUTH_INDIAN_BOOST: f64 = 25.0;
const REGIONAL_TEXT_BOOST: f64 = 15.0;
const ENGLISH_BOOST: f64 = 20.0;
const FRANCHISE_KEYWORD_BOOST: f64 = 30.0;
const FRANCHISE_ENGLISH_BOOST: f64 = 10.0;
const LANGUAGE_CATEGORY_BOOST: f64 = 25.0;
const LANGUAGE_SET_BOOST: f64 = 15.0;

/// Scores within this distance are tied and ordered by popularity
pub const SCORE_TIE_EPSILON: f64 = 0.5;

/// A record together with its relevance to one query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord {
    pub record: CatalogRecord,
    pub score: f64,
}

/// Weighted additive relevance model.
///
/// The reference year anchors every "years since release" signal so scoring
/// stays a pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer {
    reference_year: i32,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(Utc::now().year())
    }
}

impl RelevanceScorer {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn score(&self, record: &CatalogRecord, intent: &QueryIntent) -> f64 {
        let title = record.display_title().to_lowercase();
        let original_title = record
            .original_display_title()
            .unwrap_or_default()
            .to_lowercase();
        let overview = record.overview_text().to_lowercase();
        let years_since = self.years_since_release(record);

        let mut score = 0.0;

        if !intent.normalized_text.is_empty() {
            score += title_match_score(&intent.normalized_text, &title)
                .max(title_match_score(&intent.normalized_text, &original_title));
        }

        if !intent.keywords.is_empty() {
            score += keyword_coverage(&intent.keywords, &title) * TITLE_KEYWORD_WEIGHT;
            score += keyword_coverage(&intent.keywords, &overview) * OVERVIEW_KEYWORD_WEIGHT;
        }

        if let (Some(wanted), Some(actual)) = (intent.year, record.release_year()) {
            let distance = (wanted - actual).abs();
            if distance <= 1 {
                score += YEAR_NEAR_SCORE;
            } else if distance <= 5 {
                score += YEAR_CLOSE_SCORE;
            }
        }

        if let Some(hint) = intent.media_type_hint {
            if record.is_media_type(hint) {
                score += MEDIA_TYPE_MATCH_SCORE;
            }
        }

        score += quality_score(record, years_since);
        score += (record.popularity.max(0.0) / POPULARITY_DIVISOR).min(POPULARITY_CAP);

        let language = record.language().map(str::to_lowercase);
        for tag in &intent.categories {
            score += category_boost(*tag, language.as_deref(), &title, &overview);
        }

        if let Some(language) = &language {
            if intent.languages.contains(language) {
                score += LANGUAGE_SET_BOOST;
            }
        }

        if intent.is_latest {
            score += latest_boost(years_since);
        }

        score.max(0.0)
    }

    /// Score every record and sort by relevance
    pub fn rank(&self, records: Vec<CatalogRecord>, intent: &QueryIntent) -> Vec<ScoredRecord> {
        let mut scored: Vec<ScoredRecord> = records
            .into_iter()
            .map(|record| {
                let score = self.score(&record, intent);
                ScoredRecord { record, score }
            })
            .collect();
        sort_scored(&mut scored);
        scored
    }

    /// Whole years between release and the reference year; future releases count as 0
    fn years_since_release(&self, record: &CatalogRecord) -> Option<i32> {
        record
            .release_year()
            .map(|year| (self.reference_year - year).max(0))
    }
}

/// True when `a` must be placed before `b`
pub fn ranks_before(a: &ScoredRecord, b: &ScoredRecord) -> bool {
    if (a.score - b.score).abs() <= SCORE_TIE_EPSILON {
        a.record.popularity > b.record.popularity
    } else {
        a.score > b.score
    }
}

/// Descending by score with the popularity tie-break folded into the comparator.
///
/// The tie window makes the order non-transitive, which `sort_by` may reject,
/// so this is an insertion sort: stable, and a no-op on already sorted input.
pub fn sort_scored(records: &mut [ScoredRecord]) {
    for i in 1..records.len() {
        let mut j = i;
        while j > 0 && ranks_before(&records[j], &records[j - 1]) {
            records.swap(j, j - 1);
            j -= 1;
        }
    }
}

fn title_match_score(query: &str, title: &str) -> f64 {
    if title.is_empty() {
        return 0.0;
    }
    if title.contains(query) || query.contains(title) {
        return EXACT_TITLE_SCORE;
    }

    let similarity = string_similarity(query, title);
    if similarity > STRONG_FUZZY_THRESHOLD {
        scale(similarity, STRONG_FUZZY_THRESHOLD, 1.0, STRONG_FUZZY_RANGE)
    } else if similarity > WEAK_FUZZY_THRESHOLD {
        scale(similarity, WEAK_FUZZY_THRESHOLD, STRONG_FUZZY_THRESHOLD, WEAK_FUZZY_RANGE)
    } else {
        0.0
    }
}

fn scale(value: f64, from: f64, to: f64, (low, high): (f64, f64)) -> f64 {
    low + (value - from) / (to - from) * (high - low)
}

/// Fraction of keywords found in `text`, with partial credit for near-miss words
fn keyword_coverage(keywords: &[String], text: &str) -> f64 {
    if keywords.is_empty() || text.is_empty() {
        return 0.0;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let credit: f64 = keywords
        .iter()
        .map(|keyword| {
            if text.contains(keyword.as_str()) {
                return 1.0;
            }
            let best = words
                .iter()
                .map(|word| string_similarity(keyword, word))
                .fold(0.0, f64::max);
            if best >= PARTIAL_KEYWORD_THRESHOLD {
                best
            } else {
                0.0
            }
        })
        .sum();

    credit / keywords.len() as f64
}

fn quality_score(record: &CatalogRecord, years_since: Option<i32>) -> f64 {
    let rating = (record.vote_average.clamp(0.0, 10.0) / 10.0) * VOTE_AVERAGE_WEIGHT;
    let votes = (record.vote_count as f64 / VOTE_COUNT_DIVISOR).min(VOTE_COUNT_CAP);
    let recency = match years_since {
        Some(0..=2) => 3.0,
        Some(3..=5) => 2.0,
        Some(6..=10) => 1.0,
        _ => 0.0,
    };
    rating + votes + recency
}

fn latest_boost(years_since: Option<i32>) -> f64 {
    match years_since {
        Some(0) => 20.0,
        Some(1) => 15.0,
        Some(2) => 10.0,
        Some(3..=5) => 5.0,
        _ => 0.0,
    }
}

/// Language codes a category stands for, as declared in the category table
fn tag_languages(tag: CategoryTag) -> &'static [&'static str] {
    CATEGORY_PATTERNS
        .iter()
        .find(|pattern| pattern.tag == tag)
        .map(|pattern| pattern.languages)
        .unwrap_or(&[])
}

fn mentions_any(title: &str, overview: &str, keywords: &[&str]) -> bool {
    keywords
        .iter()
        .any(|keyword| contains_phrase(title, keyword) || contains_phrase(overview, keyword))
}

fn category_boost(tag: CategoryTag, language: Option<&str>, title: &str, overview: &str) -> f64 {
    let language_matches = |codes: &[&str]| language.is_some_and(|lang| codes.contains(&lang));

    match tag {
        CategoryTag::Bollywood | CategoryTag::Hindi => {
            if language_matches(&["hi"]) {
                HINDI_BOOST
            } else {
                0.0
            }
        }
        CategoryTag::SouthIndian
        | CategoryTag::Tamil
        | CategoryTag::Telugu
        | CategoryTag::Malayalam
        | CategoryTag::Kannada => {
            let mut boost = 0.0;
            if language_matches(tag_languages(tag)) {
                boost += SOUTH_INDIAN_BOOST;
            }
            let mentioned = match regional_keyword(tag) {
                Some(keyword) => mentions_any(title, overview, &[keyword]),
                None => mentions_any(title, overview, SOUTH_INDIAN_KEYWORDS),
            };
            if mentioned {
                boost += REGIONAL_TEXT_BOOST;
            }
            boost
        }
        CategoryTag::Hollywood | CategoryTag::English => {
            if language_matches(&["en"]) {
                ENGLISH_BOOST
            } else {
                0.0
            }
        }
        CategoryTag::Marvel | CategoryTag::Dc => {
            let keywords = if tag == CategoryTag::Marvel {
                MARVEL_KEYWORDS
            } else {
                DC_KEYWORDS
            };
            if mentions_any(title, overview, keywords) {
                FRANCHISE_KEYWORD_BOOST
            } else if language_matches(&["en"]) {
                FRANCHISE_ENGLISH_BOOST
            } else {
                0.0
            }
        }
        CategoryTag::Korean
        | CategoryTag::Anime
        | CategoryTag::Japanese
        | CategoryTag::Chinese
        | CategoryTag::Spanish
        | CategoryTag::French => {
            if language_matches(tag_languages(tag)) {
                LANGUAGE_CATEGORY_BOOST
            } else {
                0.0
            }
        }
    }
}
