// Decay scheduler - the recurring sweep that takes points away from everyone.
//
// The sweep is the only piece of work that walks the whole member population.
// It goes member by member, taking each member's lock only for their own
// update, so normal events keep being handled while a sweep is running.

use crate::core::activity::ActivityService;
use crate::core::community_config::ConfigStore;
use crate::core::platform::CommunityGateway;
use crate::core::points::PointsStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Seven days.
pub const DEFAULT_DECAY_PERIOD: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// What a single sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecayReport {
    pub communities: usize,
    pub members_decayed: usize,
    pub failures: usize,
    pub counters_pruned: usize,
    pub locks_released: usize,
}

pub struct DecayScheduler<P: PointsStore, C: ConfigStore> {
    activity: Arc<ActivityService<P, C>>,
    period: Duration,
}

impl<P, C> DecayScheduler<P, C>
where
    P: PointsStore + 'static,
    C: ConfigStore + 'static,
{
    pub fn new(activity: Arc<ActivityService<P, C>>, period: Duration) -> Self {
        Self { activity, period }
    }

    /// Run one decay pass over every member of every community.
    ///
    /// Failures are logged and counted; one bad member or community never
    /// stops the rest of the sweep.
    pub async fn sweep(&self, gateway: &dyn CommunityGateway) -> DecayReport {
        let mut report = DecayReport::default();

        let communities = match gateway.communities().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Decay sweep could not list communities: {}", e);
                report.failures += 1;
                return report;
            }
        };

        for community_id in communities {
            let config = match self.activity.config().get_or_create(community_id).await {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(community_id, "Failed to load config for decay: {}", e);
                    report.failures += 1;
                    continue;
                }
            };

            let members = match gateway.members(community_id).await {
                Ok(members) => members,
                Err(e) => {
                    tracing::error!(community_id, "Failed to list members for decay: {}", e);
                    report.failures += 1;
                    continue;
                }
            };
            report.communities += 1;

            for member in members.into_iter().filter(|m| !m.is_bot) {
                match self
                    .activity
                    .decay_member(gateway, community_id, member.member_id, &config)
                    .await
                {
                    Ok(_) => report.members_decayed += 1,
                    Err(e) => {
                        tracing::warn!(
                            community_id,
                            member_id = member.member_id,
                            "Decay failed for member: {}",
                            e
                        );
                        report.failures += 1;
                    }
                }
            }
        }

        match self.activity.points().prune_stale_counters().await {
            Ok(pruned) => report.counters_pruned = pruned,
            Err(e) => {
                tracing::warn!("Failed to prune daily counters: {}", e);
                report.failures += 1;
            }
        }
        report.locks_released = self.activity.release_idle_locks();

        report
    }

    /// Sweep once per period, forever. The first sweep happens one full
    /// period after this is called, not immediately.
    pub fn spawn<G>(self, gateway: G) -> JoinHandle<()>
    where
        G: CommunityGateway + 'static,
    {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                tracing::info!("Decay sweep starting");

                let report = self.sweep(&gateway).await;
                tracing::info!(
                    communities = report.communities,
                    members = report.members_decayed,
                    failures = report.failures,
                    counters_pruned = report.counters_pruned,
                    locks_released = report.locks_released,
                    "Decay sweep completed"
                );
            }
        })
    }
}
