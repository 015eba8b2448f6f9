use crate::modules::catalog::domain::entities::{CatalogRecord, MediaType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Upstream list endpoint a shelf is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryEndpoint {
    Trending,
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    AiringToday,
    OnTheAir,
    Discover,
}

impl CategoryEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryEndpoint::Trending => "trending",
            CategoryEndpoint::Popular => "popular",
            CategoryEndpoint::TopRated => "top_rated",
            CategoryEndpoint::NowPlaying => "now_playing",
            CategoryEndpoint::Upcoming => "upcoming",
            CategoryEndpoint::AiringToday => "airing_today",
            CategoryEndpoint::OnTheAir => "on_the_air",
            CategoryEndpoint::Discover => "discover",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Parameters of one upstream list request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryParams {
    pub endpoint: CategoryEndpoint,
    /// Declared media type; `None` means "all" and is only meaningful for trending
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub time_window: TimeWindow,
    pub page: u32,
    /// Extra query parameters, e.g. `with_original_language`
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

impl CategoryParams {
    fn for_endpoint(endpoint: CategoryEndpoint, media_type: Option<MediaType>) -> Self {
        Self {
            endpoint,
            media_type,
            time_window: TimeWindow::default(),
            page: 1,
            filters: BTreeMap::new(),
        }
    }

    pub fn trending(media_type: Option<MediaType>, time_window: TimeWindow) -> Self {
        Self {
            time_window,
            ..Self::for_endpoint(CategoryEndpoint::Trending, media_type)
        }
    }

    pub fn popular(media_type: MediaType) -> Self {
        Self::for_endpoint(CategoryEndpoint::Popular, Some(media_type))
    }

    pub fn top_rated(media_type: MediaType) -> Self {
        Self::for_endpoint(CategoryEndpoint::TopRated, Some(media_type))
    }

    pub fn now_playing() -> Self {
        Self::for_endpoint(CategoryEndpoint::NowPlaying, Some(MediaType::Movie))
    }

    pub fn upcoming() -> Self {
        Self::for_endpoint(CategoryEndpoint::Upcoming, Some(MediaType::Movie))
    }

    pub fn airing_today() -> Self {
        Self::for_endpoint(CategoryEndpoint::AiringToday, Some(MediaType::Tv))
    }

    pub fn on_the_air() -> Self {
        Self::for_endpoint(CategoryEndpoint::OnTheAir, Some(MediaType::Tv))
    }

    pub fn discover(media_type: MediaType) -> Self {
        Self::for_endpoint(CategoryEndpoint::Discover, Some(media_type))
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_filter(mut self, key: &str, value: impl Into<String>) -> Self {
        self.filters.insert(key.to_string(), value.into());
        self
    }
}

impl fmt::Display for CategoryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let media = self.media_type.map(|m| m.as_str()).unwrap_or("all");
        write!(f, "{}/{}?page={}", self.endpoint.as_str(), media, self.page)?;
        if self.endpoint == CategoryEndpoint::Trending {
            write!(f, "&window={}", self.time_window.as_str())?;
        }
        for (key, value) in &self.filters {
            write!(f, "&{}={}", key, value)?;
        }
        Ok(())
    }
}

/// A labeled shelf request for a browsing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub label: String,
    pub params: CategoryParams,
    pub visible: bool,
}

impl CategoryRequest {
    pub fn new(label: impl Into<String>, params: CategoryParams) -> Self {
        Self {
            label: label.into(),
            params,
            visible: true,
        }
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// One shelf of results, in the slot of the request that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedResult {
    pub title: String,
    pub shows: Vec<CatalogRecord>,
    pub visible: bool,
}

impl CategorizedResult {
    pub fn empty(request: &CategoryRequest) -> Self {
        Self {
            title: request.label.clone(),
            shows: Vec::new(),
            visible: request.visible,
        }
    }
}
