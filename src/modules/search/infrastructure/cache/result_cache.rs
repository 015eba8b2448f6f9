use crate::modules::catalog::CatalogRecord;
use crate::modules::search::domain::services::{key_similarity, normalize_query_key};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Ranked results for one normalized query
#[derive(Debug, Clone)]
struct CacheEntry {
    records: Vec<CatalogRecord>,
    created_at: Instant,
}

impl CacheEntry {
    fn new(records: Vec<CatalogRecord>) -> Self {
        Self {
            records,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub fuzzy_hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub expired_evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Search result cache with TTL and fuzzy key lookup.
///
/// Expired entries are evicted lazily by `get`; there is no background sweep.
#[derive(Debug)]
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    fuzzy_threshold: f64,
    max_entries: usize,
    hits: AtomicU64,
    fuzzy_hits: AtomicU64,
    misses: AtomicU64,
    expired_evictions: AtomicU64,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL, DEFAULT_FUZZY_THRESHOLD)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration, fuzzy_threshold: f64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            fuzzy_threshold,
            max_entries: DEFAULT_MAX_ENTRIES,
            hits: AtomicU64::new(0),
            fuzzy_hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired_evictions: AtomicU64::new(0),
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Results for `query`, or for the most similar fresh key above the fuzzy threshold
    pub fn get(&self, query: &str) -> Option<Vec<CatalogRecord>> {
        let key = normalize_query_key(query);

        // Copy out before any removal; a live DashMap ref would deadlock `remove`
        let exact = self
            .entries
            .get(&key)
            .map(|entry| (entry.is_expired(self.ttl), entry.records.clone()));

        match exact {
            Some((false, records)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for key: {}", key);
                return Some(records);
            }
            Some((true, _)) => {
                if self
                    .entries
                    .remove_if(&key, |_, entry| entry.is_expired(self.ttl))
                    .is_some()
                {
                    self.expired_evictions.fetch_add(1, Ordering::Relaxed);
                    debug!("Removed expired cache entry for key: {}", key);
                }
            }
            None => {}
        }

        if let Some((matched_key, records)) = self.best_fuzzy_match(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.fuzzy_hits.fetch_add(1, Ordering::Relaxed);
            debug!("Fuzzy cache hit for key: {} (matched '{}')", key, matched_key);
            return Some(records);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache miss for key: {}", key);
        None
    }

    /// Store results under the normalized key, replacing any previous entry
    pub fn set(&self, query: &str, records: Vec<CatalogRecord>) {
        let key = normalize_query_key(query);

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        debug!("Cached {} results for key: {}", records.len(), key);
        self.entries.insert(key, CacheEntry::new(records));
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.fuzzy_hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.expired_evictions.store(0, Ordering::Relaxed);
        info!("Search cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a fresh entry exists under exactly this normalized key
    pub fn contains_fresh(&self, query: &str) -> bool {
        let key = normalize_query_key(query);
        self.entries
            .get(&key)
            .is_some_and(|entry| !entry.is_expired(self.ttl))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            fuzzy_hits: self.fuzzy_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
            expired_evictions: self.expired_evictions.load(Ordering::Relaxed),
        }
    }

    /// Highest-similarity fresh entry; ties resolve to the lexicographically smallest key
    fn best_fuzzy_match(&self, key: &str) -> Option<(String, Vec<CatalogRecord>)> {
        if key.is_empty() {
            return None;
        }

        let mut best: Option<(f64, String)> = None;
        for entry in self.entries.iter() {
            if entry.key() == key || entry.value().is_expired(self.ttl) {
                continue;
            }
            let similarity = key_similarity(key, entry.key());
            if similarity <= self.fuzzy_threshold {
                continue;
            }
            let better = match &best {
                None => true,
                Some((best_score, best_key)) => {
                    similarity > *best_score
                        || (similarity == *best_score && entry.key() < best_key)
                }
            };
            if better {
                best = Some((similarity, entry.key().clone()));
            }
        }

        let (_, matched_key) = best?;
        let records = self.entries.get(&matched_key)?.records.clone();
        Some((matched_key, records))
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().created_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            debug!("Evicted oldest cache entry: {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::MediaType;

    fn records(ids: &[u64]) -> Vec<CatalogRecord> {
        ids.iter()
            .map(|id| CatalogRecord::new(*id, MediaType::Movie, &format!("Movie {}", id)))
            .collect()
    }

    fn ids(records: &[CatalogRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_exact_hit_uses_normalized_key() {
        let cache = ResultCache::default();
        cache.set("The Dark Knight", records(&[1, 2]));

        let hit = cache.get("  the DARK knight!! ").unwrap();
        assert_eq!(ids(&hit), vec![1, 2]);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = ResultCache::default();
        cache.set("dune", records(&[1]));
        cache.set("Dune", records(&[2, 3]));
        assert_eq!(ids(&cache.get("dune").unwrap()), vec![2, 3]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_fuzzy_hit_above_threshold() {
        let cache = ResultCache::default();
        cache.set("latest hindi movies", records(&[7]));

        // same words in another order, similarity 1.0
        let hit = cache.get("hindi latest movies").unwrap();
        assert_eq!(ids(&hit), vec![7]);
        assert_eq!(cache.stats().fuzzy_hits, 1);
    }

    #[test]
    fn test_fuzzy_miss_below_threshold() {
        let cache = ResultCache::default();
        cache.set("batman begins", records(&[1]));
        assert!(cache.get("batman").is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_fuzzy_prefers_most_similar_entry() {
        let cache = ResultCache::new(DEFAULT_CACHE_TTL, 0.5);
        cache.set("star wars empire", records(&[1]));
        cache.set("star wars empire strikes", records(&[2]));

        let hit = cache.get("star wars empire strikes back").unwrap();
        assert_eq!(ids(&hit), vec![2]);
    }

    #[test]
    fn test_expired_entries_are_never_served() {
        let cache = ResultCache::new(Duration::from_millis(20), DEFAULT_FUZZY_THRESHOLD);
        cache.set("dune", records(&[1]));
        cache.set("dune part two", records(&[2]));
        std::thread::sleep(Duration::from_millis(40));

        assert!(cache.get("dune").is_none());
        // word-order variant would match "dune part two" if it were fresh
        assert!(cache.get("two part dune").is_none());

        let stats = cache.stats();
        assert_eq!(stats.expired_evictions, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let cache = ResultCache::default();
        cache.set("dune", records(&[1]));
        cache.get("dune");
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_oldest_entry_evicted_when_full() {
        let cache = ResultCache::default().with_max_entries(2);
        cache.set("first", records(&[1]));
        std::thread::sleep(Duration::from_millis(2));
        cache.set("second", records(&[2]));
        std::thread::sleep(Duration::from_millis(2));
        cache.set("third", records(&[3]));

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_fresh("first"));
        assert!(cache.contains_fresh("third"));
    }
}
