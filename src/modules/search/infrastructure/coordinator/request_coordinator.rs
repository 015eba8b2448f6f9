use crate::modules::search::domain::services::{is_superseding, normalize_query_key};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Handle for one registered search; the token is cancelled when a newer
/// similar search supersedes it or when it is cancelled explicitly.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    pub request_id: String,
    pub raw_query: String,
    pub key: String,
    pub token: CancellationToken,
}

impl SearchTicket {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
struct PendingSearch {
    key: String,
    token: CancellationToken,
    started_at: Instant,
}

/// Registry of in-flight searches.
///
/// At most one live search exists per family of similar keys: registering a
/// query cancels every pending search it supersedes.
#[derive(Debug)]
pub struct RequestCoordinator {
    pending: Mutex<HashMap<String, PendingSearch>>,
    similarity_threshold: f64,
}

impl RequestCoordinator {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            similarity_threshold,
        }
    }

    /// Cancel superseded searches and register a new one
    pub async fn register(&self, raw_query: &str) -> SearchTicket {
        let key = normalize_query_key(raw_query);
        let mut pending = self.pending.lock().await;

        let superseded: Vec<String> = pending
            .iter()
            .filter(|(_, search)| is_superseding(&search.key, &key, self.similarity_threshold))
            .map(|(request_id, _)| request_id.clone())
            .collect();

        for request_id in superseded {
            if let Some(search) = pending.remove(&request_id) {
                search.token.cancel();
                debug!(
                    "Search {} for '{}' superseded by '{}' after {:?}",
                    request_id,
                    search.key,
                    key,
                    search.started_at.elapsed()
                );
            }
        }

        let ticket = SearchTicket {
            request_id: Uuid::new_v4().to_string(),
            raw_query: raw_query.to_string(),
            key: key.clone(),
            token: CancellationToken::new(),
        };
        pending.insert(
            ticket.request_id.clone(),
            PendingSearch {
                key,
                token: ticket.token.clone(),
                started_at: Instant::now(),
            },
        );

        ticket
    }

    /// Whether the ticket is still the live search for its key
    pub async fn is_current(&self, ticket: &SearchTicket) -> bool {
        let pending = self.pending.lock().await;
        !ticket.is_cancelled() && pending.contains_key(&ticket.request_id)
    }

    /// Remove a finished search; returns false if it was superseded or cancelled meanwhile
    pub async fn complete(&self, ticket: &SearchTicket) -> bool {
        let mut pending = self.pending.lock().await;
        let was_registered = pending.remove(&ticket.request_id).is_some();
        was_registered && !ticket.is_cancelled()
    }

    /// Cancel a pending search by id
    pub async fn cancel(&self, request_id: &str) -> bool {
        let mut pending = self.pending.lock().await;
        match pending.remove(request_id) {
            Some(search) => {
                search.token.cancel();
                debug!("Search {} for '{}' cancelled", request_id, search.key);
                true
            }
            None => false,
        }
    }

    pub async fn cancel_all(&self) -> usize {
        let mut pending = self.pending.lock().await;
        let count = pending.len();
        for (_, search) in pending.drain() {
            search.token.cancel();
        }
        count
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}
