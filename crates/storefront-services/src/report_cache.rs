//! # Report Cache
//!
//! Process-local keyed cache for earnings reports.
//!
//! ## Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  key ──► (report, stored_at)                                            │
//! │                                                                         │
//! │  get(key):                                                              │
//! │    fresh entry  → return the stored report verbatim                    │
//! │    stale entry  → evict lazily, report a miss                          │
//! │    no entry     → miss                                                 │
//! │                                                                         │
//! │  Writes NEVER invalidate entries: an order completing inside the TTL   │
//! │  window is not reflected until expiry. That staleness is part of the   │
//! │  contract, not a bug.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No single-flight de-duplication: concurrent misses for the same key may
//! both recompute. With a 10-minute TTL and day/month keys the duplicate
//! work is bounded.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;

use storefront_core::Report;

/// Cache key: the exact query parameters.
///
/// `top_selling` has no key here - it is deliberately not cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportKey {
    /// Daily earnings for a UTC date.
    Daily(NaiveDate),
    /// Monthly earnings for a month/year pair.
    Monthly { month: u32, year: i32 },
}

struct CacheEntry {
    report: Report,
    stored_at: Instant,
}

/// TTL-bounded report cache.
pub struct ReportCache {
    ttl: Duration,
    entries: RwLock<HashMap<ReportKey, CacheEntry>>,
}

impl ReportCache {
    /// Creates a cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        ReportCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached report for `key` if present and fresh.
    ///
    /// Expired entries are evicted here, on read; nothing sweeps the map in
    /// the background.
    pub async fn get(&self, key: &ReportKey) -> Option<Report> {
        let mut entries = self.entries.write().await;

        let expired = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!(?key, "Report cache hit");
                return Some(entry.report.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!(?key, "Report cache entry expired, evicting");
            entries.remove(key);
        }

        None
    }

    /// Stores a freshly computed report.
    pub async fn insert(&self, key: ReportKey, report: Report) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                report,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, fresh or not (diagnostics).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ReportKey {
        ReportKey::Daily(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[tokio::test]
    async fn test_hit_returns_stored_report_verbatim() {
        let cache = ReportCache::new(Duration::from_secs(600));
        let report = Report::empty(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        cache.insert(key(), report.clone()).await;

        let hit = cache.get(&key()).await.unwrap();
        assert_eq!(hit, report);
    }

    #[tokio::test]
    async fn test_miss_on_absent_key() {
        let cache = ReportCache::new(Duration::from_secs(600));
        assert!(cache.get(&key()).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted_on_read() {
        let cache = ReportCache::new(Duration::from_millis(20));
        let report = Report::empty(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        cache.insert(key(), report).await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(cache.get(&key()).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_keys_are_parameter_exact() {
        let cache = ReportCache::new(Duration::from_secs(600));
        let may = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        cache.insert(ReportKey::Daily(may), Report::empty(may)).await;

        assert!(cache.get(&ReportKey::Daily(june)).await.is_none());
        assert!(cache
            .get(&ReportKey::Monthly {
                month: 5,
                year: 2024
            })
            .await
            .is_none());
        assert!(cache.get(&ReportKey::Daily(may)).await.is_some());
    }
}
