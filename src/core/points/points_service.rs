// This is the points module - the ledger and the daily cap tracker.
// Like every core module it has no Discord-specific code: members are plain
// u64 ids and the configuration is passed in by the caller.

use super::day_clock::DayClock;
use crate::core::community_config::CommunityConfig;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PointsError {
    // Only persistent backends fail; the in-memory store never does.
    #[allow(dead_code)]
    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Storage for point totals and per-day counters.
///
/// Point totals are keyed by member only; member ids are globally unique, so
/// a member who sits in several communities has a single total.
#[async_trait]
pub trait PointsStore: Send + Sync {
    /// Current total. Unknown members have 0.
    async fn get_points(&self, member_id: u64) -> Result<i64, PointsError>;

    /// Add `delta` (which may be negative) and return the new total.
    /// The stored total is floored at zero, atomically per member.
    async fn add_points(&self, member_id: u64, delta: i64) -> Result<i64, PointsError>;

    /// Overwrite the total, floored at zero. Returns the stored value.
    async fn set_points(&self, member_id: u64, points: i64) -> Result<i64, PointsError>;

    /// Points counted toward the daily cap for `day`.
    async fn get_daily(&self, member_id: u64, day: &str) -> Result<i64, PointsError>;

    /// Increment the counter for `day` and return the new count.
    async fn add_daily(&self, member_id: u64, day: &str, amount: i64) -> Result<i64, PointsError>;

    /// Drop every daily counter that doesn't belong to `keep_day`.
    /// Returns how many counters were removed.
    async fn prune_daily(&self, keep_day: &str) -> Result<usize, PointsError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Points ledger plus daily cap tracking.
pub struct PointsService<S: PointsStore> {
    store: S,
    clock: Arc<dyn DayClock>,
}

impl<S: PointsStore> PointsService<S> {
    pub fn new(store: S, clock: Arc<dyn DayClock>) -> Self {
        Self { store, clock }
    }

    pub async fn get(&self, member_id: u64) -> Result<i64, PointsError> {
        self.store.get_points(member_id).await
    }

    /// Returns `max(current + delta, 0)`, which is also what gets stored.
    pub async fn add(&self, member_id: u64, delta: i64) -> Result<i64, PointsError> {
        self.store.add_points(member_id, delta).await
    }

    /// Start a member off at a fixed total (used when they join).
    pub async fn seed(&self, member_id: u64, points: i64) -> Result<i64, PointsError> {
        self.store.set_points(member_id, points).await
    }

    /// The current day key.
    pub fn today(&self) -> String {
        self.clock.today()
    }

    /// How many more passive points the member may earn today.
    pub async fn remaining_today(
        &self,
        member_id: u64,
        config: &CommunityConfig,
    ) -> Result<i64, PointsError> {
        let earned = self.store.get_daily(member_id, &self.today()).await?;
        Ok(config.max_daily_points.saturating_sub(earned).max(0))
    }

    /// Count `amount` toward today's cap.
    ///
    /// No clamping happens here: the caller is expected to have limited
    /// `amount` to `remaining_today` already.
    pub async fn grant_today(&self, member_id: u64, amount: i64) -> Result<i64, PointsError> {
        self.store.add_daily(member_id, &self.today(), amount).await
    }

    /// Forget counters from previous days. They can never matter again.
    pub async fn prune_stale_counters(&self) -> Result<usize, PointsError> {
        self.store.prune_daily(&self.today()).await
    }
}
