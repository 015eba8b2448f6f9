//! Process configuration loaded from the environment (and `.env`, if present)

use crate::shared::errors::{AppError, AppResult};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_language: String,
    pub requests_per_second: u32,
    pub http_timeout: Duration,
    pub search_cache_ttl: Duration,
    pub search_pages: u32,
}

impl AppConfig {
    /// Load configuration, reading `.env` first when one exists
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let tmdb_api_key = env::var("TMDB_API_KEY").map_err(|_| {
            AppError::ConfigError("TMDB_API_KEY environment variable not set".to_string())
        })?;
        if tmdb_api_key.trim().is_empty() {
            return Err(AppError::ConfigError("TMDB_API_KEY is empty".to_string()));
        }

        let config = Self {
            tmdb_api_key,
            tmdb_base_url: env::var("TMDB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TMDB_BASE_URL.to_string()),
            tmdb_language: env::var("TMDB_LANGUAGE").unwrap_or_else(|_| "en-US".to_string()),
            requests_per_second: parse_var("TMDB_REQUESTS_PER_SECOND", 20)?,
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 10)?),
            search_cache_ttl: Duration::from_secs(parse_var("SEARCH_CACHE_TTL_SECS", 300)?),
            search_pages: parse_var("SEARCH_PAGES", 1)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.requests_per_second == 0 {
            return Err(AppError::ConfigError(
                "TMDB_REQUESTS_PER_SECOND must be > 0".to_string(),
            ));
        }
        if self.search_pages == 0 {
            return Err(AppError::ConfigError("SEARCH_PAGES must be > 0".to_string()));
        }
        if self.http_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "HTTP_TIMEOUT_SECS must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| {
            AppError::ConfigError(format!("{} has invalid value '{}': {}", name, raw, e))
        }),
        Err(_) => Ok(default),
    }
}
