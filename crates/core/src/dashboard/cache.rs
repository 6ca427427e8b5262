//! Dashboard caching using Moka.
//!
//! Figures are cached per society and dropped whenever a write in this
//! process touches that society's ledger. Each entry also remembers the
//! [`RowFingerprint`] it was computed against, so rows inserted by another
//! process turn it stale on the next read.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use society_shared::types::SocietyId;

use super::types::{DashboardSummary, RowFingerprint};

/// Default cache capacity (number of societies).
const DEFAULT_CACHE_CAPACITY: u64 = 1_000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

#[derive(Clone)]
struct Entry {
    fingerprint: RowFingerprint,
    summary: Arc<DashboardSummary>,
}

/// Per-society cache of dashboard summaries. Cheap to clone.
#[derive(Clone)]
pub struct DashboardCache {
    cache: Cache<SocietyId, Entry>,
}

impl DashboardCache {
    /// Creates a cache with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Cached summary for a society, if it was computed against `current`.
    ///
    /// A mismatched entry is evicted.
    pub fn get(
        &self,
        society_id: SocietyId,
        current: RowFingerprint,
    ) -> Option<Arc<DashboardSummary>> {
        let entry = self.cache.get(&society_id)?;
        if entry.fingerprint == current {
            Some(entry.summary)
        } else {
            self.cache.invalidate(&society_id);
            None
        }
    }

    /// Stores a summary computed while the rows matched `fingerprint`.
    pub fn insert(
        &self,
        summary: DashboardSummary,
        fingerprint: RowFingerprint,
    ) -> Arc<DashboardSummary> {
        let summary = Arc::new(summary);
        self.cache.insert(
            summary.society_id,
            Entry {
                fingerprint,
                summary: Arc::clone(&summary),
            },
        );
        summary
    }

    /// Drops the cached summary for a society.
    pub fn invalidate(&self, society_id: SocietyId) {
        self.cache.invalidate(&society_id);
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance so counts reflect recent writes.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for DashboardCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DashboardCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardCache")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceInputs;
    use crate::dashboard::DashboardFigures;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn summary(society_id: SocietyId) -> DashboardSummary {
        let figures = DashboardFigures {
            balance: BalanceInputs {
                opening_balance: dec!(100000),
                total_expenses: dec!(20000),
                total_maintenance_charged: dec!(10000),
                total_penalties: dec!(1500),
            },
            ..DashboardFigures::default()
        };
        DashboardSummary::from_figures(society_id, &figures, Utc::now())
    }

    #[test]
    fn test_summary_final_balance() {
        assert_eq!(summary(SocietyId::new()).final_balance, dec!(91500));
    }

    const ROWS: RowFingerprint = RowFingerprint {
        dues: 1,
        penalties: 1,
        ledger_entries: 1,
    };

    #[test]
    fn test_insert_get_invalidate() {
        let cache = DashboardCache::new();
        let society = SocietyId::new();
        assert!(cache.get(society, ROWS).is_none());

        cache.insert(summary(society), ROWS);
        assert_eq!(cache.get(society, ROWS).unwrap().society_id, society);

        cache.invalidate(society);
        assert!(cache.get(society, ROWS).is_none());
    }

    #[test]
    fn test_rows_added_elsewhere_make_entry_stale() {
        let cache = DashboardCache::new();
        let society = SocietyId::new();
        cache.insert(summary(society), ROWS);

        let after_generation = RowFingerprint {
            dues: ROWS.dues + 4,
            ..ROWS
        };
        assert!(cache.get(society, after_generation).is_none());
        // Evicted, so the old fingerprint no longer matches either.
        assert!(cache.get(society, ROWS).is_none());
    }

    #[test]
    fn test_invalidation_is_per_society() {
        let cache = DashboardCache::with_config(10, 60);
        let a = SocietyId::new();
        let b = SocietyId::new();
        cache.insert(summary(a), ROWS);
        cache.insert(summary(b), ROWS);

        cache.invalidate(a);
        assert!(cache.get(a, ROWS).is_none());
        assert!(cache.get(b, ROWS).is_some());
    }

    #[test]
    fn test_entry_count() {
        let cache = DashboardCache::new();
        cache.insert(summary(SocietyId::new()), ROWS);
        cache.run_pending_tasks();
        assert_eq!(cache.entry_count(), 1);
    }
}
