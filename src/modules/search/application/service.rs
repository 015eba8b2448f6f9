use crate::modules::catalog::{CatalogClient, CatalogRecord, CategoryParams, MediaType};
use crate::modules::search::domain::services::{ContentFilter, QueryAnalyzer, RelevanceScorer};
use crate::modules::search::domain::value_objects::QueryIntent;
use crate::modules::search::infrastructure::{CacheStats, RequestCoordinator, ResultCache, SearchTicket};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::shared::utils::retry::{RetryPolicy, RetryUtil};
use crate::log_debug;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Tunables for the search pipeline
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) resolve empty without an upstream call
    pub min_query_length: usize,
    /// Upstream result pages fetched per search
    pub search_pages: u32,
    pub retry: RetryPolicy,
    pub cache_ttl: Duration,
    /// Key similarity used for fuzzy cache hits and for superseding pending searches
    pub similarity_threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_length: 2,
            search_pages: 1,
            retry: RetryPolicy::default(),
            cache_ttl: Duration::from_secs(5 * 60),
            similarity_threshold: 0.85,
        }
    }
}

impl SearchConfig {
    pub fn with_search_pages(mut self, search_pages: u32) -> Self {
        self.search_pages = search_pages;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.search_pages == 0 {
            return Err(AppError::ConfigError(
                "Search must fetch at least one page".to_string(),
            ));
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(AppError::ConfigError(format!(
                "Similarity threshold must be in (0, 1], got {}",
                self.similarity_threshold
            )));
        }
        self.retry.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Resolved,
    /// Superseded by a newer similar search, or cancelled explicitly
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub request_id: String,
    pub query: String,
    pub status: SearchStatus,
    pub from_cache: bool,
    pub results: Vec<CatalogRecord>,
}

impl SearchResponse {
    fn resolved(request_id: String, query: &str, results: Vec<CatalogRecord>, from_cache: bool) -> Self {
        Self {
            request_id,
            query: query.to_string(),
            status: SearchStatus::Resolved,
            from_cache,
            results,
        }
    }

    fn cancelled(ticket: &SearchTicket) -> Self {
        Self {
            request_id: ticket.request_id.clone(),
            query: ticket.raw_query.clone(),
            status: SearchStatus::Cancelled,
            from_cache: false,
            results: Vec::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == SearchStatus::Cancelled
    }
}

/// A search that has been started but not necessarily resolved
#[derive(Debug)]
pub struct SearchHandle {
    request_id: String,
    stage: SearchStage,
}

#[derive(Debug)]
enum SearchStage {
    Ready(SearchResponse),
    Pending(SearchTicket),
}

impl SearchHandle {
    fn ready(response: SearchResponse) -> Self {
        Self {
            request_id: response.request_id.clone(),
            stage: SearchStage::Ready(response),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Whether the response is already known (short query or cache hit)
    pub fn is_ready(&self) -> bool {
        matches!(self.stage, SearchStage::Ready(_))
    }
}

/// Search orchestrator: cache check, superseding, upstream fetch, safety
/// filter, ranking and cache write.
pub struct SearchService {
    client: Arc<dyn CatalogClient>,
    cache: ResultCache,
    coordinator: RequestCoordinator,
    scorer: RelevanceScorer,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(client: Arc<dyn CatalogClient>, config: SearchConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            client,
            cache: ResultCache::new(config.cache_ttl, config.similarity_threshold),
            coordinator: RequestCoordinator::new(config.similarity_threshold),
            scorer: RelevanceScorer::default(),
            config,
        })
    }

    /// Pin the year used for recency signals
    pub fn with_scorer(mut self, scorer: RelevanceScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub async fn search(&self, raw_query: &str) -> AppResult<SearchResponse> {
        let handle = self.start_search(raw_query).await;
        self.resolve(handle).await
    }

    /// Register a search and hand back its id before any upstream work starts.
    ///
    /// Short queries and cache hits come back already resolved. Pass the handle
    /// to [`SearchService::resolve`]; `cancel(handle.request_id())` may be called
    /// from elsewhere in the meantime.
    pub async fn start_search(&self, raw_query: &str) -> SearchHandle {
        let query = raw_query.trim();

        if query.chars().count() < self.config.min_query_length {
            log_debug!("Search: '{}' is below the minimum length, skipping", query);
            return SearchHandle::ready(SearchResponse::resolved(
                new_request_id(),
                query,
                Vec::new(),
                false,
            ));
        }

        if let Some(records) = self.cache.get(query) {
            return SearchHandle::ready(SearchResponse::resolved(
                new_request_id(),
                query,
                records,
                true,
            ));
        }

        let ticket = self.coordinator.register(query).await;
        LogContext::search_operation(query, &ticket.request_id, None);
        SearchHandle {
            request_id: ticket.request_id.clone(),
            stage: SearchStage::Pending(ticket),
        }
    }

    /// Drive a started search to completion
    pub async fn resolve(&self, handle: SearchHandle) -> AppResult<SearchResponse> {
        let ticket = match handle.stage {
            SearchStage::Ready(response) => return Ok(response),
            SearchStage::Pending(ticket) => ticket,
        };
        let query = ticket.raw_query.as_str();
        let timer = TimedOperation::new(&format!("search '{}'", query));

        let intent = QueryAnalyzer::analyze(query);
        let fetched = self.fetch_records(query, &intent, &ticket.token).await;

        let records = match fetched {
            Ok(records) => records,
            Err(error) => {
                self.coordinator.complete(&ticket).await;
                if error.is_cancelled() {
                    log_debug!("Search: '{}' [{}] cancelled", query, ticket.request_id);
                    return Ok(SearchResponse::cancelled(&ticket));
                }
                LogContext::error_with_context(&error, &format!("Search for '{}' failed", query));
                return Err(error);
            }
        };

        let safe = ContentFilter::filter_safe(prepare_records(records));
        let ranked: Vec<CatalogRecord> = self
            .scorer
            .rank(safe, &intent)
            .into_iter()
            .map(|scored| scored.record)
            .collect();

        // Re-check after the awaits above; a superseded search must not touch the cache
        if !self.coordinator.complete(&ticket).await {
            log_debug!(
                "Search: '{}' [{}] superseded, discarding {} results",
                query,
                ticket.request_id,
                ranked.len()
            );
            return Ok(SearchResponse::cancelled(&ticket));
        }

        self.cache.set(query, ranked.clone());
        LogContext::search_operation(query, &ticket.request_id, Some(ranked.len()));
        timer.finish_with_info(&format!("{} results", ranked.len()));

        Ok(SearchResponse::resolved(ticket.request_id.clone(), query, ranked, false))
    }

    /// Best-effort cancellation of a started search; false once it has finished
    pub async fn cancel(&self, request_id: &str) -> bool {
        self.coordinator.cancel(request_id).await
    }

    pub async fn pending_count(&self) -> usize {
        self.coordinator.pending_count().await
    }

    pub fn cached_results(&self, query: &str) -> Option<Vec<CatalogRecord>> {
        self.cache.get(query)
    }

    pub fn cache_results(&self, query: &str, records: Vec<CatalogRecord>) {
        self.cache.set(query, records);
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn fetch_records(
        &self,
        query: &str,
        intent: &QueryIntent,
        token: &CancellationToken,
    ) -> AppResult<Vec<CatalogRecord>> {
        if intent.is_structural_only() {
            let params = discover_params(intent, Utc::now().date_naive());
            return self.fetch_discover(params, token).await;
        }

        let text = if intent.normalized_text.is_empty() {
            query
        } else {
            intent.normalized_text.as_str()
        };

        let mut records = Vec::new();
        for page in 1..=self.config.search_pages {
            let result = RetryUtil::with_retry_cancellable(
                || self.client.fetch_search(text, page),
                &self.config.retry,
                &format!("search '{}' page {}", text, page),
                token,
            )
            .await?;

            let has_more = result.has_more();
            records.extend(result.results);
            if !has_more {
                break;
            }
        }
        Ok(records)
    }

    async fn fetch_discover(
        &self,
        params: CategoryParams,
        token: &CancellationToken,
    ) -> AppResult<Vec<CatalogRecord>> {
        let media_type = params.media_type;
        let mut records = Vec::new();

        for page in 1..=self.config.search_pages {
            let page_params = params.clone().with_page(page);
            let result = RetryUtil::with_retry_cancellable(
                || self.client.fetch_category(&page_params),
                &self.config.retry,
                &page_params.to_string(),
                token,
            )
            .await?;

            let has_more = result.has_more();
            records.extend(result.results);
            if !has_more {
                break;
            }
        }

        // Discover payloads do not tag records
        for record in &mut records {
            if record.media_type.is_none() {
                record.media_type = media_type;
            }
        }
        Ok(records)
    }
}

fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Discover request for a query that only names structure (language, type, year, recency)
pub fn discover_params(intent: &QueryIntent, today: NaiveDate) -> CategoryParams {
    let media_type = match intent.media_type_hint {
        Some(MediaType::Tv) => MediaType::Tv,
        _ => MediaType::Movie,
    };
    let (year_field, date_field) = match media_type {
        MediaType::Tv => ("first_air_date_year", "first_air_date"),
        _ => ("primary_release_year", "primary_release_date"),
    };

    let mut params = CategoryParams::discover(media_type);

    if !intent.languages.is_empty() {
        let languages: Vec<&str> = intent.languages.iter().map(String::as_str).collect();
        params = params.with_filter("with_original_language", languages.join("|"));
    }

    if let Some(year) = intent.year {
        params = params.with_filter(year_field, year.to_string());
    }

    if intent.is_latest {
        params = params
            .with_filter("sort_by", format!("{}.desc", date_field))
            .with_filter(
                &format!("{}.lte", date_field),
                today.format("%Y-%m-%d").to_string(),
            );
    } else {
        params = params.with_filter("sort_by", "popularity.desc");
    }

    params
}

/// Drop people and untitled records, then de-duplicate by (media type, id)
fn prepare_records(records: Vec<CatalogRecord>) -> Vec<CatalogRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| !record.is_media_type(MediaType::Person))
        .filter(|record| !record.display_title().is_empty())
        .filter(|record| seen.insert((record.media_type, record.id)))
        .collect()
}
