// In-memory implementation of PointsStore.
//
// Point totals and daily counters live in two DashMaps. The entry API gives
// atomic read-modify-write per key, which is what keeps the zero floor
// intact when several events for the same member land at once.

use crate::core::points::{PointsError, PointsStore};
use async_trait::async_trait;
use dashmap::DashMap;

/// Composite key for the daily counters: one counter per member per day.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
struct DailyKey {
    member_id: u64,
    day: String,
}

impl DailyKey {
    fn new(member_id: u64, day: &str) -> Self {
        Self {
            member_id,
            day: day.to_string(),
        }
    }
}

pub struct InMemoryPointsStore {
    /// Maps member_id -> point total (never negative)
    points: DashMap<u64, i64>,
    /// Maps (member_id, day) -> points counted toward that day's cap
    daily: DashMap<DailyKey, i64>,
}

impl InMemoryPointsStore {
    pub fn new() -> Self {
        Self {
            points: DashMap::new(),
            daily: DashMap::new(),
        }
    }
}

#[async_trait]
impl PointsStore for InMemoryPointsStore {
    async fn get_points(&self, member_id: u64) -> Result<i64, PointsError> {
        Ok(self.points.get(&member_id).map(|entry| *entry).unwrap_or(0))
    }

    async fn add_points(&self, member_id: u64, delta: i64) -> Result<i64, PointsError> {
        let mut entry = self.points.entry(member_id).or_insert(0);
        let updated = entry.saturating_add(delta).max(0);
        *entry = updated;
        Ok(updated)
    }

    async fn set_points(&self, member_id: u64, points: i64) -> Result<i64, PointsError> {
        let stored = points.max(0);
        self.points.insert(member_id, stored);
        Ok(stored)
    }

    async fn get_daily(&self, member_id: u64, day: &str) -> Result<i64, PointsError> {
        Ok(self
            .daily
            .get(&DailyKey::new(member_id, day))
            .map(|entry| *entry)
            .unwrap_or(0))
    }

    async fn add_daily(&self, member_id: u64, day: &str, amount: i64) -> Result<i64, PointsError> {
        let mut entry = self.daily.entry(DailyKey::new(member_id, day)).or_insert(0);
        *entry = entry.saturating_add(amount);
        Ok(*entry)
    }

    async fn prune_daily(&self, keep_day: &str) -> Result<usize, PointsError> {
        let mut removed = 0;
        self.daily.retain(|key, _| {
            let keep = key.day == keep_day;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}

impl Default for InMemoryPointsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryPointsStore::new();

        assert_eq!(store.get_points(123).await.unwrap(), 0);

        assert_eq!(store.add_points(123, 100).await.unwrap(), 100);
        assert_eq!(store.add_points(123, -30).await.unwrap(), 70);
        assert_eq!(store.add_points(123, -500).await.unwrap(), 0);
        assert_eq!(store.get_points(123).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn daily_counters_are_separate_per_day() {
        let store = InMemoryPointsStore::new();

        store.add_daily(1, "Mon Oct 19 2026", 6).await.unwrap();
        store.add_daily(1, "Tue Oct 20 2026", 2).await.unwrap();

        assert_eq!(store.get_daily(1, "Mon Oct 19 2026").await.unwrap(), 6);
        assert_eq!(store.get_daily(1, "Tue Oct 20 2026").await.unwrap(), 2);
        assert_eq!(store.get_daily(2, "Mon Oct 19 2026").await.unwrap(), 0);

        // The daily counter never touches the total
        assert_eq!(store.get_points(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_decrements_never_go_negative() {
        let store = Arc::new(InMemoryPointsStore::new());
        store.set_points(9, 50).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.add_points(9, -5).await.unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap() >= 0);
        }

        assert_eq!(store.get_points(9).await.unwrap(), 0);
    }
}
