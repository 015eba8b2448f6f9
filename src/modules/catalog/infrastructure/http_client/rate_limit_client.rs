//! Rate-limited HTTP client for the upstream catalog
//!
//! Requests wait on a `governor` quota before hitting the network. Status and
//! transport failures are translated into the crate error taxonomy; retrying is
//! left to the caller so each caller can apply its own cancellation.

use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

/// HTTP client that handles rate limiting and error classification
pub struct RateLimitClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    provider_name: String,
}

impl RateLimitClient {
    pub fn new(
        provider_name: &str,
        requests_per_second: u32,
        timeout: Duration,
        user_agent: &str,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter: Self::create_rate_limiter(requests_per_second)?,
            provider_name: provider_name.to_string(),
        })
    }

    /// Create a rate limiter allowing `requests_per_second` with the same burst size
    fn create_rate_limiter(requests_per_second: u32) -> AppResult<DirectRateLimiter> {
        let rate = NonZeroU32::new(requests_per_second).ok_or_else(|| {
            AppError::ConfigError("Rate limit must allow at least one request per second".to_string())
        })?;
        Ok(GovernorRateLimiter::direct(Quota::per_second(rate)))
    }

    /// GET `url` and decode the JSON body.
    ///
    /// `endpoint` is the loggable form of the request; `url` may carry credentials.
    pub async fn get<T>(&self, endpoint: &str, url: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        self.rate_limiter.until_ready().await;

        LogContext::api_call(endpoint, "started", None);
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        LogContext::api_call(
            endpoint,
            status.as_str(),
            Some(started.elapsed().as_millis() as u64),
        );

        if !status.is_success() {
            return Err(self.status_error(response).await);
        }

        self.parse_response(response).await
    }

    async fn status_error(&self, response: Response) -> AppError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        // TMDB error bodies look like {"status_code": 7, "status_message": "..."}
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("status_message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("{} API returned error", self.provider_name));

        AppError::status(status, message)
    }

    async fn parse_response<T>(&self, response: Response) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response_text = response.text().await?;

        serde_json::from_str(&response_text).map_err(|e| {
            AppError::SerializationError(format!(
                "Failed to parse {} response: {}. Response: {}",
                self.provider_name,
                e,
                truncate(&response_text, 200)
            ))
        })
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
