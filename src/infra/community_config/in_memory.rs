// In-memory implementation of ConfigStore.
//
// Configuration is volatile on purpose: nothing survives a restart. The
// DashMap entry API gives us a per-community lock for read-modify-write, so
// two admins changing settings at once can't clobber each other.

use crate::core::community_config::{CommunityConfig, ConfigError, ConfigStore};
use async_trait::async_trait;
use dashmap::DashMap;

pub struct InMemoryConfigStore {
    /// Maps community_id -> configuration record
    configs: DashMap<u64, CommunityConfig>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self {
            configs: DashMap::new(),
        }
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get_or_insert(
        &self,
        community_id: u64,
        default: CommunityConfig,
    ) -> Result<CommunityConfig, ConfigError> {
        Ok(self
            .configs
            .entry(community_id)
            .or_insert(default)
            .value()
            .clone())
    }

    async fn modify<F, R>(
        &self,
        community_id: u64,
        default: CommunityConfig,
        f: F,
    ) -> Result<R, ConfigError>
    where
        F: FnOnce(&mut CommunityConfig) -> R + Send,
        R: Send,
    {
        // The entry guard holds the shard lock until the closure is done
        let mut entry = self.configs.entry(community_id).or_insert(default);
        Ok(f(entry.value_mut()))
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_happens_only_once() {
        let store = InMemoryConfigStore::new();

        let first = store
            .get_or_insert(1, CommunityConfig::default())
            .await
            .unwrap();
        assert_eq!(first.max_daily_points, 40);

        let custom = CommunityConfig {
            max_daily_points: 99,
            ..Default::default()
        };
        let second = store.get_or_insert(1, custom).await.unwrap();
        assert_eq!(second.max_daily_points, 40);
    }

    #[tokio::test]
    async fn modify_creates_missing_records() {
        let store = InMemoryConfigStore::new();

        let old = store
            .modify(3, CommunityConfig::default(), |config| {
                let old = config.event_points;
                config.event_points = 1;
                old
            })
            .await
            .unwrap();

        assert_eq!(old, 30);
        let stored = store
            .get_or_insert(3, CommunityConfig::default())
            .await
            .unwrap();
        assert_eq!(stored.event_points, 1);
    }
}
