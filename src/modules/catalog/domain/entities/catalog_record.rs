use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Media type as tagged by the upstream catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Person,
    #[serde(other)]
    Unknown,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Person => "person",
            MediaType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One movie/show entry as returned by the upstream catalog.
///
/// Movies carry `title`/`original_title`/`release_date`; shows carry
/// `name`/`original_name`/`first_air_date`. Accessors hide the difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub last_air_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl CatalogRecord {
    /// Bare record, mostly useful for tests and fixtures
    pub fn new(id: u64, media_type: MediaType, title: &str) -> Self {
        let (movie_title, show_name) = match media_type {
            MediaType::Tv => (None, Some(title.to_string())),
            _ => (Some(title.to_string()), None),
        };
        Self {
            id,
            media_type: Some(media_type),
            title: movie_title,
            name: show_name,
            original_title: None,
            original_name: None,
            overview: None,
            original_language: None,
            popularity: 0.0,
            vote_average: 0.0,
            vote_count: 0,
            release_date: None,
            first_air_date: None,
            last_air_date: None,
            adult: false,
            poster_path: None,
            backdrop_path: None,
        }
    }

    /// Title for movies, name for shows
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.name))
            .unwrap_or("")
    }

    pub fn original_display_title(&self) -> Option<&str> {
        non_empty(&self.original_title).or_else(|| non_empty(&self.original_name))
    }

    pub fn overview_text(&self) -> &str {
        self.overview.as_deref().unwrap_or("")
    }

    pub fn language(&self) -> Option<&str> {
        non_empty(&self.original_language)
    }

    /// Release date for movies, first air date for shows
    pub fn primary_date(&self) -> Option<&str> {
        non_empty(&self.release_date).or_else(|| non_empty(&self.first_air_date))
    }

    pub fn release_year(&self) -> Option<i32> {
        let date = self.primary_date()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| d.year())
            .ok()
            .or_else(|| date.get(..4).and_then(|year| year.parse().ok()))
    }

    pub fn is_media_type(&self, media_type: MediaType) -> bool {
        self.media_type == Some(media_type)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of upstream results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<CatalogRecord>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl CatalogPage {
    pub fn single(results: Vec<CatalogRecord>) -> Self {
        let total_results = results.len() as u32;
        Self {
            page: 1,
            results,
            total_pages: 1,
            total_results,
        }
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}
