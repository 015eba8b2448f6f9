use crate::{
    modules::catalog::{
        domain::{
            CatalogClient, CatalogPage, CategoryEndpoint, CategoryParams, MediaType,
        },
        infrastructure::http_client::RateLimitClient,
    },
    shared::{
        config::AppConfig,
        errors::{AppError, AppResult},
    },
};
use async_trait::async_trait;

const USER_AGENT: &str = "reelshelf/0.1";

/// TMDB (The Movie Database) catalog client over the v3 REST API
pub struct TmdbCatalogClient {
    http_client: RateLimitClient,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbCatalogClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let http_client = RateLimitClient::new(
            "TMDB",
            config.requests_per_second,
            config.http_timeout,
            USER_AGENT,
        )?;
        Ok(Self::with_client(
            http_client,
            &config.tmdb_base_url,
            &config.tmdb_api_key,
            &config.tmdb_language,
        ))
    }

    /// Create client with custom HTTP client (for testing)
    pub fn with_client(
        http_client: RateLimitClient,
        base_url: &str,
        api_key: &str,
        language: &str,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
        }
    }

    /// Build URL with API key and additional query parameters
    fn build_url_with_params(&self, endpoint: &str, params: &[(String, String)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}&language={}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language)
        );
        for (key, value) in params {
            if key != "api_key" && key != "language" {
                url.push_str(&format!(
                    "&{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                ));
            }
        }
        url
    }

    /// Map a category request onto its TMDB path
    pub fn endpoint_path(params: &CategoryParams) -> AppResult<String> {
        let required_media = || -> AppResult<&'static str> {
            match params.media_type {
                Some(MediaType::Movie) => Ok("movie"),
                Some(MediaType::Tv) => Ok("tv"),
                other => Err(AppError::ValidationError(format!(
                    "{} requires a movie or tv media type, got {:?}",
                    params.endpoint.as_str(),
                    other
                ))),
            }
        };

        let path = match params.endpoint {
            CategoryEndpoint::Trending => {
                let media = match params.media_type {
                    Some(MediaType::Movie) => "movie",
                    Some(MediaType::Tv) => "tv",
                    _ => "all",
                };
                format!("/trending/{}/{}", media, params.time_window.as_str())
            }
            CategoryEndpoint::Popular => format!("/{}/popular", required_media()?),
            CategoryEndpoint::TopRated => format!("/{}/top_rated", required_media()?),
            CategoryEndpoint::NowPlaying => "/movie/now_playing".to_string(),
            CategoryEndpoint::Upcoming => "/movie/upcoming".to_string(),
            CategoryEndpoint::AiringToday => "/tv/airing_today".to_string(),
            CategoryEndpoint::OnTheAir => "/tv/on_the_air".to_string(),
            CategoryEndpoint::Discover => format!("/discover/{}", required_media()?),
        };
        Ok(path)
    }
}

#[async_trait]
impl CatalogClient for TmdbCatalogClient {
    async fn fetch_category(&self, params: &CategoryParams) -> AppResult<CatalogPage> {
        let path = Self::endpoint_path(params)?;

        let mut query: Vec<(String, String)> = params
            .filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        query.push(("page".to_string(), params.page.to_string()));

        let url = self.build_url_with_params(&path, &query);
        let page: CatalogPage = self.http_client.get(&params.to_string(), &url).await?;

        log::debug!(
            "TMDB: {} returned {} records (page {}/{})",
            params,
            page.results.len(),
            page.page,
            page.total_pages
        );
        Ok(page)
    }

    async fn fetch_search(&self, query: &str, page: u32) -> AppResult<CatalogPage> {
        if query.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Search query cannot be empty".to_string(),
            ));
        }

        let params = vec![
            ("query".to_string(), query.trim().to_string()),
            ("page".to_string(), page.max(1).to_string()),
            // Filtering happens locally; the upstream flag hides too much
            ("include_adult".to_string(), "true".to_string()),
        ];
        let url = self.build_url_with_params("/search/multi", &params);

        let endpoint = format!("search/multi?query={}&page={}", query.trim(), page);
        let result: CatalogPage = self.http_client.get(&endpoint, &url).await?;

        log::debug!(
            "TMDB: Found {} results for '{}' (page {})",
            result.results.len(),
            query,
            page
        );
        Ok(result)
    }
}
