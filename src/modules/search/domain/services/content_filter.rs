//! Local safety filter for search results.
//!
//! Searches request adult records from upstream and prune them here, so
//! mainstream mature titles survive while explicit material is dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::modules::catalog::CatalogRecord;

/// Mainstream titles containing the word "sex"; never blocked by the keyword rules
const ALLOWED_TITLES: &[&str] = &[
    "sex education",
    "sex and the city",
    "sex and the city 2",
    "sex and the city: the movie",
    "the sex lives of college girls",
    "masters of sex",
    "sex/life",
    "sex, lies, and videotape",
    "sex drive",
    "sex tape",
    "sex appeal",
];

static EXPLICIT_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(porn|porno|pornographic|pornography|hentai|bukkake|gangbang|milf|camgirl|onlyfans|blowjob|creampie|deepthroat|threesome porn|nsfw)\b")
        .expect("explicit keyword pattern is valid")
});

static STANDALONE_SEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsex\b").expect("sex word pattern is valid"));

static EXPLICIT_SEX_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(sex (tape|film|movie|video|scene|content|show|series|with)|(explicit|graphic|hardcore) sex)\b")
        .expect("explicit phrase pattern is valid")
});

static ADULT_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(xxx|\bporn(ography)?\b|\bhardcore\b|\bsex (tape|film|movie)\b|\badult (film|movie|video)\b|\bx-rated\b|\bhentai\b|\becchi\b|\bgangbang\b|\borgy\b|\buncensored sex\b|\bsoftcore porn\b|\berotic (film|movie)\b)")
        .expect("adult pattern is valid")
});

// Engagement floors under which sex/adult content is treated as explicit
const LOW_ENGAGEMENT_VOTES: u64 = 100;
const LOW_ENGAGEMENT_POPULARITY: f64 = 10.0;
const ADULT_MIN_VOTES: u64 = 50;
const ADULT_MIN_POPULARITY: f64 = 5.0;

pub struct ContentFilter;

impl ContentFilter {
    /// Whether `record` must be removed before ranking
    pub fn is_blocked(record: &CatalogRecord) -> bool {
        if Self::is_allowed_title(record) {
            return false;
        }

        let text = format!("{} {}", record.display_title(), record.overview_text());

        if EXPLICIT_KEYWORDS.is_match(&text) {
            return true;
        }

        if STANDALONE_SEX.is_match(&text) {
            if record.adult {
                return true;
            }
            if record.vote_count < LOW_ENGAGEMENT_VOTES && record.popularity < LOW_ENGAGEMENT_POPULARITY {
                return true;
            }
            if EXPLICIT_SEX_PHRASES.is_match(&text) {
                return true;
            }
        }

        if record.adult {
            if record.vote_count < ADULT_MIN_VOTES && record.popularity < ADULT_MIN_POPULARITY {
                return true;
            }
            if ADULT_PATTERNS.is_match(&text) {
                return true;
            }
        }

        false
    }

    /// Keep only records that pass [`ContentFilter::is_blocked`]
    pub fn filter_safe(records: Vec<CatalogRecord>) -> Vec<CatalogRecord> {
        let before = records.len();
        let kept: Vec<CatalogRecord> = records
            .into_iter()
            .filter(|record| !Self::is_blocked(record))
            .collect();

        if kept.len() < before {
            log::debug!("Content filter removed {} of {} records", before - kept.len(), before);
        }
        kept
    }

    fn is_allowed_title(record: &CatalogRecord) -> bool {
        let title = record.display_title().trim().to_lowercase();
        let original = record
            .original_display_title()
            .map(|t| t.trim().to_lowercase());

        ALLOWED_TITLES
            .iter()
            .any(|allowed| title == *allowed || original.as_deref() == Some(*allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::MediaType;

    fn record(title: &str, overview: &str, adult: bool, votes: u64, popularity: f64) -> CatalogRecord {
        let mut record = CatalogRecord::new(1, MediaType::Movie, title);
        record.overview = Some(overview.to_string());
        record.adult = adult;
        record.vote_count = votes;
        record.popularity = popularity;
        record
    }

    #[test]
    fn test_mainstream_mature_titles_are_kept() {
        let drama = record("Oppenheimer", "The story of the atomic bomb.", false, 9000, 120.0);
        let thriller = record("Gone Girl", "A violent, disturbing thriller.", false, 15000, 60.0);
        assert!(!ContentFilter::is_blocked(&drama));
        assert!(!ContentFilter::is_blocked(&thriller));
    }

    #[test]
    fn test_allow_list_overrides_every_rule() {
        let show = record("Sex Education", "Teen sex therapist.", true, 3, 1.0);
        assert!(!ContentFilter::is_blocked(&show));

        let city = record("SEX AND THE CITY", "", false, 10, 1.0);
        assert!(!ContentFilter::is_blocked(&city));
    }

    #[test]
    fn test_explicit_keywords_block() {
        let explicit = record("Some Title", "A hentai collection", false, 5000, 50.0);
        assert!(ContentFilter::is_blocked(&explicit));
    }

    #[test]
    fn test_sex_word_rules() {
        // adult flag
        assert!(ContentFilter::is_blocked(&record("Sex Stories", "", true, 500, 50.0)));
        // low engagement
        assert!(ContentFilter::is_blocked(&record("Sex Stories", "", false, 20, 2.0)));
        // explicit phrase even with engagement
        assert!(ContentFilter::is_blocked(&record("Night", "A leaked sex tape", false, 500, 50.0)));
        // mainstream overview mention survives
        assert!(!ContentFilter::is_blocked(&record(
            "Marriage Story",
            "A couple navigates sex, love and divorce.",
            false,
            5000,
            40.0
        )));
    }

    #[test]
    fn test_sex_must_be_a_standalone_word() {
        let sussex = record("Sussex Stories", "Essex countryside.", false, 1, 0.1);
        assert!(!ContentFilter::is_blocked(&sussex));
    }

    #[test]
    fn test_adult_low_engagement_blocks() {
        assert!(ContentFilter::is_blocked(&record("Obscure", "", true, 10, 1.0)));
        assert!(!ContentFilter::is_blocked(&record("Obscure", "", true, 400, 1.0)));
    }

    #[test]
    fn test_adult_patterns_block() {
        assert!(ContentFilter::is_blocked(&record("XXXtreme", "", true, 400, 30.0)));
        assert!(ContentFilter::is_blocked(&record("Nights", "An erotic film", true, 400, 30.0)));
        // same text without the adult flag is kept
        assert!(!ContentFilter::is_blocked(&record("Nights", "An erotic film", false, 400, 30.0)));
    }

    #[test]
    fn test_filter_safe_preserves_order() {
        let records = vec![
            record("Oppenheimer", "", false, 9000, 120.0),
            record("Obscure", "", true, 1, 0.1),
            record("Gone Girl", "", false, 15000, 60.0),
        ];
        let kept = ContentFilter::filter_safe(records);
        let titles: Vec<&str> = kept.iter().map(|r| r.display_title()).collect();
        assert_eq!(titles, vec!["Oppenheimer", "Gone Girl"]);
    }
}
