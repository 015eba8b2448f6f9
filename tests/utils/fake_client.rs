/// Scriptable in-memory upstream
///
/// Responses, failures and gates are keyed by `CategoryParams::to_string()` for
/// category requests and by the query text for searches.
use async_trait::async_trait;
use reelshelf::modules::catalog::{CatalogClient, CatalogPage, CategoryParams};
use reelshelf::shared::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    Started(String),
    Finished(String),
}

struct ScriptedFailure {
    remaining: Option<usize>,
    error: AppError,
}

#[derive(Default)]
pub struct FakeCatalogClient {
    pages: Mutex<HashMap<String, CatalogPage>>,
    failures: Mutex<HashMap<String, ScriptedFailure>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    events: Mutex<Vec<CallEvent>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    latency: Duration,
}

impl FakeCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long, so concurrent calls overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn key(params: &CategoryParams) -> String {
        params.to_string()
    }

    pub fn respond(&self, key: &str, page: CatalogPage) {
        self.pages.lock().unwrap().insert(key.to_string(), page);
    }

    pub fn fail_always(&self, key: &str, error: AppError) {
        self.failures.lock().unwrap().insert(
            key.to_string(),
            ScriptedFailure {
                remaining: None,
                error,
            },
        );
    }

    /// Fail the next `times` calls, then fall back to the scripted page
    pub fn fail_times(&self, key: &str, times: usize, error: AppError) {
        self.failures.lock().unwrap().insert(
            key.to_string(),
            ScriptedFailure {
                remaining: Some(times),
                error,
            },
        );
    }

    /// Calls for `key` block until the returned gate is notified
    pub fn gate(&self, key: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn calls_for(&self, key: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| matches!(event, CallEvent::Started(k) if k == key))
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| matches!(event, CallEvent::Started(_)))
            .count()
    }

    pub fn events(&self) -> Vec<CallEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn respond_to(&self, key: String) -> AppResult<CatalogPage> {
        self.events
            .lock()
            .unwrap()
            .push(CallEvent::Started(key.clone()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = match self.next_failure(&key) {
            Some(error) => Err(error),
            None => Ok(self
                .pages
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .unwrap_or_else(|| CatalogPage::single(Vec::new()))),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(CallEvent::Finished(key));
        result
    }

    fn next_failure(&self, key: &str) -> Option<AppError> {
        let mut failures = self.failures.lock().unwrap();
        let failure = failures.get_mut(key)?;
        match &mut failure.remaining {
            None => Some(failure.error.clone()),
            Some(0) => None,
            Some(remaining) => {
                *remaining -= 1;
                Some(failure.error.clone())
            }
        }
    }
}

#[async_trait]
impl CatalogClient for FakeCatalogClient {
    async fn fetch_category(&self, params: &CategoryParams) -> AppResult<CatalogPage> {
        self.respond_to(Self::key(params)).await
    }

    async fn fetch_search(&self, query: &str, _page: u32) -> AppResult<CatalogPage> {
        self.respond_to(query.to_string()).await
    }
}
