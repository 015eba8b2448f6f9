//! Static lookup tables shared by the query analyzer and the relevance scorer.
//!
//! Tables are ordered lists; multi-word phrases precede the single words they
//! contain so the longer reading wins.

use crate::modules::catalog::MediaType;
use crate::modules::search::domain::value_objects::CategoryTag;

pub struct CategoryPattern {
    pub phrase: &'static str,
    pub tag: CategoryTag,
    pub languages: &'static [&'static str],
}

const SOUTH_INDIAN_LANGUAGES: &[&str] = &["ta", "te", "ml", "kn"];

#[rustfmt::skip]
pub static CATEGORY_PATTERNS: &[CategoryPattern] = &[
    // Multi-word phrases
    CategoryPattern { phrase: "south indian", tag: CategoryTag::SouthIndian, languages: SOUTH_INDIAN_LANGUAGES },
    CategoryPattern { phrase: "k drama", tag: CategoryTag::Korean, languages: &["ko"] },
    CategoryPattern { phrase: "k-drama", tag: CategoryTag::Korean, languages: &["ko"] },
    CategoryPattern { phrase: "marvel cinematic universe", tag: CategoryTag::Marvel, languages: &["en"] },
    CategoryPattern { phrase: "dc comics", tag: CategoryTag::Dc, languages: &["en"] },
    CategoryPattern { phrase: "dc universe", tag: CategoryTag::Dc, languages: &["en"] },
    // Single words
    CategoryPattern { phrase: "bollywood", tag: CategoryTag::Bollywood, languages: &["hi"] },
    CategoryPattern { phrase: "hindi", tag: CategoryTag::Hindi, languages: &["hi"] },
    CategoryPattern { phrase: "tollywood", tag: CategoryTag::Telugu, languages: &["te"] },
    CategoryPattern { phrase: "telugu", tag: CategoryTag::Telugu, languages: &["te"] },
    CategoryPattern { phrase: "kollywood", tag: CategoryTag::Tamil, languages: &["ta"] },
    CategoryPattern { phrase: "tamil", tag: CategoryTag::Tamil, languages: &["ta"] },
    CategoryPattern { phrase: "mollywood", tag: CategoryTag::Malayalam, languages: &["ml"] },
    CategoryPattern { phrase: "malayalam", tag: CategoryTag::Malayalam, languages: &["ml"] },
    CategoryPattern { phrase: "sandalwood", tag: CategoryTag::Kannada, languages: &["kn"] },
    CategoryPattern { phrase: "kannada", tag: CategoryTag::Kannada, languages: &["kn"] },
    CategoryPattern { phrase: "hollywood", tag: CategoryTag::Hollywood, languages: &["en"] },
    CategoryPattern { phrase: "english", tag: CategoryTag::English, languages: &["en"] },
    CategoryPattern { phrase: "marvel", tag: CategoryTag::Marvel, languages: &["en"] },
    CategoryPattern { phrase: "mcu", tag: CategoryTag::Marvel, languages: &["en"] },
    CategoryPattern { phrase: "dc", tag: CategoryTag::Dc, languages: &["en"] },
    CategoryPattern { phrase: "dceu", tag: CategoryTag::Dc, languages: &["en"] },
    CategoryPattern { phrase: "korean", tag: CategoryTag::Korean, languages: &["ko"] },
    CategoryPattern { phrase: "kdrama", tag: CategoryTag::Korean, languages: &["ko"] },
    CategoryPattern { phrase: "anime", tag: CategoryTag::Anime, languages: &["ja"] },
    CategoryPattern { phrase: "japanese", tag: CategoryTag::Japanese, languages: &["ja"] },
    CategoryPattern { phrase: "chinese", tag: CategoryTag::Chinese, languages: &["zh"] },
    CategoryPattern { phrase: "spanish", tag: CategoryTag::Spanish, languages: &["es"] },
    CategoryPattern { phrase: "french", tag: CategoryTag::French, languages: &["fr"] },
];

pub static TEMPORAL_MODIFIERS: &[&str] = &["latest", "new", "recent", "recently"];

pub static MEDIA_TYPE_HINTS: &[(&str, MediaType)] = &[
    // Multi-word phrases
    ("tv shows", MediaType::Tv),
    ("tv show", MediaType::Tv),
    ("tv series", MediaType::Tv),
    ("web series", MediaType::Tv),
    ("feature film", MediaType::Movie),
    // Single words
    ("movies", MediaType::Movie),
    ("movie", MediaType::Movie),
    ("films", MediaType::Movie),
    ("film", MediaType::Movie),
    ("cinema", MediaType::Movie),
    ("webseries", MediaType::Tv),
    ("series", MediaType::Tv),
    ("shows", MediaType::Tv),
    ("show", MediaType::Tv),
    ("tv", MediaType::Tv),
    ("episodes", MediaType::Tv),
    ("episode", MediaType::Tv),
    ("seasons", MediaType::Tv),
    ("season", MediaType::Tv),
];

pub static STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "in", "on", "at", "to", "for", "with", "from", "by",
    "is", "are", "me", "some",
];

/// Words that mark a record as belonging to the south-Indian regional family
pub static SOUTH_INDIAN_KEYWORDS: &[&str] = &[
    "south indian", "tamil", "telugu", "malayalam", "kannada", "tollywood", "kollywood",
    "mollywood", "sandalwood",
];

pub static MARVEL_KEYWORDS: &[&str] = &[
    "marvel", "avengers", "iron man", "captain america", "thor", "hulk", "spider-man",
    "spiderman", "black panther", "black widow", "doctor strange", "guardians of the galaxy",
    "ant-man", "captain marvel", "x-men", "wolverine", "deadpool", "loki", "wandavision",
    "shang-chi", "eternals", "fantastic four",
];

pub static DC_KEYWORDS: &[&str] = &[
    "dc", "batman", "superman", "wonder woman", "justice league", "aquaman", "joker",
    "the flash", "shazam", "suicide squad", "green lantern", "man of steel", "gotham",
    "peacemaker", "black adam",
];

/// Word that must literally appear in a record for the regional text bonus
pub fn regional_keyword(tag: CategoryTag) -> Option<&'static str> {
    match tag {
        CategoryTag::Tamil => Some("tamil"),
        CategoryTag::Telugu => Some("telugu"),
        CategoryTag::Malayalam => Some("malayalam"),
        CategoryTag::Kannada => Some("kannada"),
        _ => None,
    }
}
