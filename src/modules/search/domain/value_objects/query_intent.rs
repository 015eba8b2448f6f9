use crate::modules::catalog::MediaType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Region/franchise/language category a query can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTag {
    Bollywood,
    Hindi,
    SouthIndian,
    Tamil,
    Telugu,
    Malayalam,
    Kannada,
    Hollywood,
    English,
    Marvel,
    Dc,
    Korean,
    Anime,
    Japanese,
    Chinese,
    Spanish,
    French,
}

impl CategoryTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::Bollywood => "bollywood",
            CategoryTag::Hindi => "hindi",
            CategoryTag::SouthIndian => "south_indian",
            CategoryTag::Tamil => "tamil",
            CategoryTag::Telugu => "telugu",
            CategoryTag::Malayalam => "malayalam",
            CategoryTag::Kannada => "kannada",
            CategoryTag::Hollywood => "hollywood",
            CategoryTag::English => "english",
            CategoryTag::Marvel => "marvel",
            CategoryTag::Dc => "dc",
            CategoryTag::Korean => "korean",
            CategoryTag::Anime => "anime",
            CategoryTag::Japanese => "japanese",
            CategoryTag::Chinese => "chinese",
            CategoryTag::Spanish => "spanish",
            CategoryTag::French => "french",
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured reading of a free-text query.
///
/// Derived once per raw query and never cached on its own; analyzing the
/// same text twice yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryIntent {
    /// Remaining free text after modifiers, hints and categories were consumed
    pub normalized_text: String,
    /// Tokens of `normalized_text` longer than one character, in query order
    pub keywords: Vec<String>,
    pub year: Option<i32>,
    pub media_type_hint: Option<MediaType>,
    pub is_latest: bool,
    pub categories: BTreeSet<CategoryTag>,
    /// ISO-639-1 codes implied by the matched categories
    pub languages: BTreeSet<String>,
}

impl QueryIntent {
    pub fn has_category(&self, tag: CategoryTag) -> bool {
        self.categories.contains(&tag)
    }

    /// True when nothing but structure (language, type, year, recency) was asked for
    pub fn is_structural_only(&self) -> bool {
        self.normalized_text.is_empty()
            && (!self.languages.is_empty()
                || self.media_type_hint.is_some()
                || self.year.is_some()
                || self.is_latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tag_serializes_as_snake_case() {
        let json = serde_json::to_string(&CategoryTag::SouthIndian).unwrap();
        assert_eq!(json, "\"south_indian\"");
        assert_eq!(CategoryTag::SouthIndian.as_str(), "south_indian");
    }

    #[test]
    fn test_structural_only() {
        let mut intent = QueryIntent::default();
        assert!(!intent.is_structural_only());

        intent.languages.insert("hi".to_string());
        assert!(intent.is_structural_only());

        intent.normalized_text = "dangal".to_string();
        assert!(!intent.is_structural_only());
    }
}
