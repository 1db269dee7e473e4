// The activity service - the single entry point for everything that can
// change a member's points.
//
// The Discord layer turns platform events into a `CommunityEvent` and hands
// it to `dispatch`. From there the flow is always the same:
// configuration lookup -> ledger mutation -> role reconciliation.
//
// All mutations for one member happen under that member's lock, so the
// "check cap, grant, bump counter, fix roles" sequence can't interleave with
// another event (or the decay sweep) for the same member.

use super::authorization::{Actor, Authorizer, Capability};
use super::commands::Command;
use crate::core::community_config::{
    CommunityConfig, ConfigError, ConfigService, ConfigStore, SettingOutcome,
};
use crate::core::platform::{CommunityGateway, GatewayError};
use crate::core::points::{PointsError, PointsService, PointsStore};
use crate::core::tiers::{reconcile_roles, Tier};
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

// ============================================================================
// EVENTS
// ============================================================================

/// Everything the points system reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommunityEvent {
    /// A member joined the community.
    Joined { community_id: u64, member_id: u64 },
    /// A member's voice channel changed. `None` means "not in a channel".
    VoiceTransition {
        community_id: u64,
        member_id: u64,
        from: Option<u64>,
        to: Option<u64>,
    },
    /// A prefixed chat command.
    Command {
        community_id: u64,
        channel_id: u64,
        actor: Actor,
        command: Command,
    },
    /// Any other chat message.
    Message {
        community_id: u64,
        channel_id: u64,
        channel_name: Option<String>,
        author_id: u64,
    },
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error(transparent)]
    Points(#[from] PointsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ActivityService<P: PointsStore, C: ConfigStore> {
    points: PointsService<P>,
    config: ConfigService<C>,
    authorizer: Arc<dyn Authorizer>,
    /// Reply when a privileged command is refused, instead of ignoring it.
    announce_denials: bool,
    member_locks: DashMap<u64, Arc<Mutex<()>>>,
}

impl<P: PointsStore, C: ConfigStore> ActivityService<P, C> {
    pub fn new(
        points: PointsService<P>,
        config: ConfigService<C>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            points,
            config,
            authorizer,
            announce_denials: true,
            member_locks: DashMap::new(),
        }
    }

    pub fn announce_denials(mut self, announce: bool) -> Self {
        self.announce_denials = announce;
        self
    }

    pub fn points(&self) -> &PointsService<P> {
        &self.points
    }

    pub fn config(&self) -> &ConfigService<C> {
        &self.config
    }

    fn member_lock(&self, member_id: u64) -> Arc<Mutex<()>> {
        self.member_locks.entry(member_id).or_default().clone()
    }

    /// Drop lock entries nobody is holding or waiting on. Returns how many
    /// were released.
    pub fn release_idle_locks(&self) -> usize {
        let before = self.member_locks.len();
        // Clones are only handed out under the shard lock that retain holds,
        // so a count of 1 means no task can reach this mutex any more.
        self.member_locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before.saturating_sub(self.member_locks.len())
    }

    /// Route an event to its handler.
    pub async fn dispatch(
        &self,
        gateway: &dyn CommunityGateway,
        event: CommunityEvent,
    ) -> Result<(), ActivityError> {
        match event {
            CommunityEvent::Joined {
                community_id,
                member_id,
            } => {
                self.handle_join(gateway, community_id, member_id).await?;
            }
            CommunityEvent::VoiceTransition {
                community_id,
                member_id,
                from,
                to,
            } => {
                self.handle_voice(gateway, community_id, member_id, from, to)
                    .await?;
            }
            CommunityEvent::Command {
                community_id,
                channel_id,
                actor,
                command,
            } => {
                self.handle_command(gateway, community_id, channel_id, &actor, command)
                    .await?;
            }
            CommunityEvent::Message {
                community_id,
                channel_id: _,
                channel_name,
                author_id,
            } => {
                self.handle_message(gateway, community_id, author_id, channel_name.as_deref())
                    .await?;
            }
        }
        Ok(())
    }

    /// New member: start them at the configured initial points.
    pub async fn handle_join(
        &self,
        gateway: &dyn CommunityGateway,
        community_id: u64,
        member_id: u64,
    ) -> Result<i64, ActivityError> {
        let config = self.config.get_or_create(community_id).await?;
        let lock = self.member_lock(member_id);
        let _guard = lock.lock().await;

        let total = self.points.seed(member_id, config.initial_points).await?;
        tracing::info!(community_id, member_id, points = total, "Member joined");

        self.reconcile(gateway, community_id, member_id, total, &config)
            .await?;
        Ok(total)
    }

    /// Voice state change. Only "no channel -> some channel" earns points,
    /// and those points don't count toward the daily cap.
    ///
    /// Returns the new total if points were granted.
    pub async fn handle_voice(
        &self,
        gateway: &dyn CommunityGateway,
        community_id: u64,
        member_id: u64,
        from: Option<u64>,
        to: Option<u64>,
    ) -> Result<Option<i64>, ActivityError> {
        if from.is_some() || to.is_none() {
            return Ok(None);
        }

        let config = self.config.get_or_create(community_id).await?;
        let lock = self.member_lock(member_id);
        let _guard = lock.lock().await;

        let total = self
            .points
            .add(member_id, config.voice_channel_join_points)
            .await?;
        tracing::info!(
            community_id,
            member_id,
            granted = config.voice_channel_join_points,
            points = total,
            "Voice join points granted"
        );

        self.reconcile(gateway, community_id, member_id, total, &config)
            .await?;
        Ok(Some(total))
    }

    /// Ordinary chat message: earn message points up to the daily cap.
    ///
    /// Returns how many points were granted (0 once the cap is reached).
    pub async fn handle_message(
        &self,
        gateway: &dyn CommunityGateway,
        community_id: u64,
        member_id: u64,
        channel_name: Option<&str>,
    ) -> Result<i64, ActivityError> {
        let config = self.config.get_or_create(community_id).await?;
        let lock = self.member_lock(member_id);
        let _guard = lock.lock().await;

        let remaining = self.points.remaining_today(member_id, &config).await?;
        if remaining <= 0 {
            tracing::debug!(community_id, member_id, "Daily cap reached");
            return Ok(0);
        }

        let base = match channel_name {
            Some(name) if config.is_special_channel(name) => config.special_message_points,
            _ => config.message_points,
        };
        let granted = base.clamp(0, remaining);

        let total = self.points.add(member_id, granted).await?;
        self.points.grant_today(member_id, granted).await?;
        tracing::debug!(community_id, member_id, granted, points = total, "Message points granted");

        self.reconcile(gateway, community_id, member_id, total, &config)
            .await?;
        Ok(granted)
    }

    pub async fn handle_command(
        &self,
        gateway: &dyn CommunityGateway,
        community_id: u64,
        channel_id: u64,
        actor: &Actor,
        command: Command,
    ) -> Result<(), ActivityError> {
        match command {
            Command::Points => {
                let points = self.points.get(actor.member_id).await?;
                let reply = format!(
                    "{}, you currently have {} points.",
                    actor.display_name, points
                );
                gateway.send_message(channel_id, &reply).await?;
            }
            Command::GrantEvent { target } => {
                if !self
                    .authorized(gateway, channel_id, actor, Capability::ManageRoles)
                    .await?
                {
                    return Ok(());
                }

                let Some(target) = target else {
                    gateway
                        .send_message(channel_id, "Mention the member to reward, e.g. `event @member`.")
                        .await?;
                    return Ok(());
                };

                let (granted, total) = self
                    .grant_event_points(gateway, community_id, target)
                    .await?;
                let reply = format!(
                    "Granted {} event points to <@{}>. They now have {} points.",
                    granted, target, total
                );
                gateway.send_message(channel_id, &reply).await?;
            }
            Command::Config { setting, value } => {
                if !self
                    .authorized(gateway, channel_id, actor, Capability::Administrator)
                    .await?
                {
                    return Ok(());
                }

                let outcome = match setting {
                    Some(setting) => {
                        self.config
                            .apply_setting(gateway, community_id, &setting, value.as_deref())
                            .await?
                    }
                    None => SettingOutcome::Invalid,
                };
                gateway.send_message(channel_id, &outcome.reply()).await?;
            }
        }
        Ok(())
    }

    /// Staff-granted event points. Not subject to the daily cap.
    ///
    /// Returns the amount granted and the member's new total.
    pub async fn grant_event_points(
        &self,
        gateway: &dyn CommunityGateway,
        community_id: u64,
        member_id: u64,
    ) -> Result<(i64, i64), ActivityError> {
        let config = self.config.get_or_create(community_id).await?;
        let lock = self.member_lock(member_id);
        let _guard = lock.lock().await;

        let total = self.points.add(member_id, config.event_points).await?;
        tracing::info!(
            community_id,
            member_id,
            granted = config.event_points,
            points = total,
            "Event points granted"
        );

        self.reconcile(gateway, community_id, member_id, total, &config)
            .await?;
        Ok((config.event_points, total))
    }

    /// One member's share of a decay sweep.
    pub async fn decay_member(
        &self,
        gateway: &dyn CommunityGateway,
        community_id: u64,
        member_id: u64,
        config: &CommunityConfig,
    ) -> Result<Tier, ActivityError> {
        let lock = self.member_lock(member_id);
        let _guard = lock.lock().await;

        let total = self
            .points
            .add(member_id, -config.weekly_point_deduction)
            .await?;
        let tier = self
            .reconcile(gateway, community_id, member_id, total, config)
            .await?;
        Ok(tier)
    }

    async fn authorized(
        &self,
        gateway: &dyn CommunityGateway,
        channel_id: u64,
        actor: &Actor,
        capability: Capability,
    ) -> Result<bool, ActivityError> {
        match self.authorizer.authorize(actor, capability) {
            Ok(()) => Ok(true),
            Err(denial) => {
                tracing::debug!(
                    member_id = actor.member_id,
                    ?capability,
                    reason = %denial.reason,
                    "Privileged command refused"
                );
                if self.announce_denials {
                    gateway.send_message(channel_id, &denial.reason).await?;
                }
                Ok(false)
            }
        }
    }

    async fn reconcile(
        &self,
        gateway: &dyn CommunityGateway,
        community_id: u64,
        member_id: u64,
        total: i64,
        config: &CommunityConfig,
    ) -> Result<Tier, ActivityError> {
        Ok(reconcile_roles(gateway, community_id, member_id, total, &config.role_names).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::activity::PermissionAuthorizer;
    use crate::core::platform::RoleRef;
    use crate::core::testing::{FixedDayClock, RecordingGateway};
    use crate::infra::community_config::InMemoryConfigStore;
    use crate::infra::points::InMemoryPointsStore;

    const GUILD: u64 = 1;
    const CHANNEL: u64 = 500;
    const TOP: RoleRef = RoleRef(11);
    const MID: RoleRef = RoleRef(12);
    const BOTTOM: RoleRef = RoleRef(13);

    type Service = ActivityService<InMemoryPointsStore, InMemoryConfigStore>;

    fn make_service() -> (Service, Arc<FixedDayClock>) {
        let clock = Arc::new(FixedDayClock::new("Mon Oct 19 2026"));
        let service = ActivityService::new(
            PointsService::new(InMemoryPointsStore::new(), clock.clone()),
            ConfigService::new(InMemoryConfigStore::new(), CommunityConfig::default()),
            Arc::new(PermissionAuthorizer),
        );
        (service, clock)
    }

    fn gateway() -> RecordingGateway {
        RecordingGateway::new()
            .with_tier_roles(GUILD)
            .with_channel(GUILD, "general")
            .with_channel(GUILD, "showcase")
    }

    fn actor(member_id: u64, can_manage_roles: bool, is_administrator: bool) -> Actor {
        Actor {
            member_id,
            display_name: format!("member{}", member_id),
            can_manage_roles,
            is_administrator,
        }
    }

    fn message(author_id: u64, channel_name: &str) -> CommunityEvent {
        CommunityEvent::Message {
            community_id: GUILD,
            channel_id: CHANNEL,
            channel_name: Some(channel_name.to_string()),
            author_id,
        }
    }

    fn command(actor: Actor, command: Command) -> CommunityEvent {
        CommunityEvent::Command {
            community_id: GUILD,
            channel_id: CHANNEL,
            actor,
            command,
        }
    }

    fn config_command(setting: &str, value: &str) -> Command {
        Command::Config {
            setting: Some(setting.to_string()),
            value: Some(value.to_string()),
        }
    }

    #[tokio::test]
    async fn joining_grants_initial_points() {
        let (service, _) = make_service();
        let gateway = gateway();

        service
            .dispatch(
                &gateway,
                CommunityEvent::Joined {
                    community_id: GUILD,
                    member_id: 7,
                },
            )
            .await
            .unwrap();

        let config = service.config().get_or_create(GUILD).await.unwrap();
        assert_eq!(service.points().get(7).await.unwrap(), config.initial_points);
        assert_eq!(gateway.roles_of(GUILD, 7), vec![MID]);
    }

    #[tokio::test]
    async fn join_uses_the_configured_initial_points() {
        let (service, _) = make_service();
        let gateway = gateway();

        service
            .dispatch(&gateway, command(actor(1, false, true), config_command("initialPoints", "120")))
            .await
            .unwrap();
        let total = service.handle_join(&gateway, GUILD, 8).await.unwrap();

        assert_eq!(total, 120);
        assert_eq!(gateway.roles_of(GUILD, 8), vec![TOP]);
    }

    #[tokio::test]
    async fn twenty_first_message_hits_the_daily_cap() {
        let (service, _) = make_service();
        let gateway = gateway();

        for _ in 0..20 {
            service.dispatch(&gateway, message(3, "general")).await.unwrap();
        }
        assert_eq!(service.points().get(3).await.unwrap(), 40);

        let granted = service
            .handle_message(&gateway, GUILD, 3, Some("general"))
            .await
            .unwrap();
        assert_eq!(granted, 0);
        assert_eq!(service.points().get(3).await.unwrap(), 40);
    }

    #[tokio::test]
    async fn cap_resets_on_a_new_day() {
        let (service, clock) = make_service();
        let gateway = gateway();

        for _ in 0..25 {
            service.dispatch(&gateway, message(3, "general")).await.unwrap();
        }
        clock.set("Tue Oct 20 2026");

        let granted = service
            .handle_message(&gateway, GUILD, 3, Some("general"))
            .await
            .unwrap();
        assert_eq!(granted, 2);
        assert_eq!(service.points().get(3).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn special_channels_pay_more_but_respect_the_cap() {
        let (service, _) = make_service();
        let gateway = gateway();

        service
            .dispatch(&gateway, command(actor(1, false, true), config_command("specialChannels", "showcase")))
            .await
            .unwrap();

        let granted = service
            .handle_message(&gateway, GUILD, 4, Some("showcase"))
            .await
            .unwrap();
        assert_eq!(granted, 5);

        let granted = service
            .handle_message(&gateway, GUILD, 4, Some("general"))
            .await
            .unwrap();
        assert_eq!(granted, 2);

        // 7 earned so far; 33 more is six special messages plus a partial one
        for _ in 0..6 {
            service.handle_message(&gateway, GUILD, 4, Some("showcase")).await.unwrap();
        }
        let granted = service
            .handle_message(&gateway, GUILD, 4, Some("showcase"))
            .await
            .unwrap();
        assert_eq!(granted, 3);
        assert_eq!(service.points().get(4).await.unwrap(), 40);
    }

    #[tokio::test]
    async fn unknown_channel_name_earns_normal_points() {
        let (service, _) = make_service();
        let gateway = gateway();

        service
            .dispatch(
                &gateway,
                CommunityEvent::Message {
                    community_id: GUILD,
                    channel_id: CHANNEL,
                    channel_name: None,
                    author_id: 4,
                },
            )
            .await
            .unwrap();

        assert_eq!(service.points().get(4).await.unwrap(), 2);
        assert_eq!(gateway.roles_of(GUILD, 4), vec![MID]);
    }

    #[tokio::test]
    async fn only_joining_voice_earns_points() {
        let (service, _) = make_service();
        let gateway = gateway();

        let joined = service.handle_voice(&gateway, GUILD, 5, None, Some(900)).await.unwrap();
        let moved = service.handle_voice(&gateway, GUILD, 5, Some(900), Some(901)).await.unwrap();
        let left = service.handle_voice(&gateway, GUILD, 5, Some(901), None).await.unwrap();

        assert_eq!(joined, Some(10));
        assert_eq!(moved, None);
        assert_eq!(left, None);
        assert_eq!(service.points().get(5).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn voice_points_ignore_the_daily_cap() {
        let (service, _) = make_service();
        let gateway = gateway();

        for _ in 0..20 {
            service.handle_message(&gateway, GUILD, 5, Some("general")).await.unwrap();
        }
        service
            .dispatch(
                &gateway,
                CommunityEvent::VoiceTransition {
                    community_id: GUILD,
                    member_id: 5,
                    from: None,
                    to: Some(900),
                },
            )
            .await
            .unwrap();

        assert_eq!(service.points().get(5).await.unwrap(), 50);
    }

    #[tokio::test]
    async fn event_command_rewards_the_target() {
        let (service, _) = make_service();
        let gateway = gateway();
        service.handle_join(&gateway, GUILD, 20).await.unwrap();

        for _ in 0..3 {
            service
                .dispatch(
                    &gateway,
                    command(actor(1, true, false), Command::GrantEvent { target: Some(20) }),
                )
                .await
                .unwrap();
        }

        // 25 + 3 * 30, and the target (not the invoker) gets the role update
        assert_eq!(service.points().get(20).await.unwrap(), 115);
        assert_eq!(gateway.roles_of(GUILD, 20), vec![TOP]);
        assert!(gateway.roles_of(GUILD, 1).is_empty());
        assert_eq!(service.points().get(1).await.unwrap(), 0);

        let (_, last) = gateway.sent_messages().pop().unwrap();
        assert_eq!(last, "Granted 30 event points to <@20>. They now have 115 points.");
    }

    #[tokio::test]
    async fn event_grant_returns_the_amount_it_applied() {
        let (service, _) = make_service();
        let gateway = gateway();
        service
            .config()
            .apply_setting(&gateway, GUILD, "eventPoints", Some("15"))
            .await
            .unwrap();
        service.points().add(20, 10).await.unwrap();

        let (granted, total) = service.grant_event_points(&gateway, GUILD, 20).await.unwrap();

        // A later config change must not affect what this grant reports
        service
            .config()
            .apply_setting(&gateway, GUILD, "eventPoints", Some("99"))
            .await
            .unwrap();
        assert_eq!((granted, total), (15, 25));
        assert_eq!(service.points().get(20).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn event_command_without_target_explains_usage() {
        let (service, _) = make_service();
        let gateway = gateway();

        service
            .dispatch(&gateway, command(actor(1, true, false), Command::grant_event(Some("bob"))))
            .await
            .unwrap();

        let sent = gateway.sent_messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("event @member"));
    }

    #[tokio::test]
    async fn denied_commands_change_nothing() {
        let (service, _) = make_service();
        let gateway = gateway();

        service
            .dispatch(&gateway, command(actor(2, false, false), Command::GrantEvent { target: Some(2) }))
            .await
            .unwrap();
        service
            .dispatch(&gateway, command(actor(2, true, false), config_command("eventPoints", "500")))
            .await
            .unwrap();

        assert_eq!(service.points().get(2).await.unwrap(), 0);
        assert_eq!(service.config().get_or_create(GUILD).await.unwrap().event_points, 30);

        let sent = gateway.sent_messages();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].1.contains("Manage Roles"));
        assert!(sent[1].1.contains("Administrator"));
    }

    #[tokio::test]
    async fn denials_can_be_silent() {
        let (service, _) = make_service();
        let service = service.announce_denials(false);
        let gateway = gateway();

        service
            .dispatch(&gateway, command(actor(2, false, false), Command::GrantEvent { target: Some(2) }))
            .await
            .unwrap();

        assert!(gateway.sent_messages().is_empty());
        assert_eq!(service.points().get(2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn points_command_reports_without_changing_anything() {
        let (service, _) = make_service();
        let gateway = gateway();
        service.handle_join(&gateway, GUILD, 9).await.unwrap();

        service
            .dispatch(&gateway, command(actor(9, false, false), Command::Points))
            .await
            .unwrap();

        assert_eq!(
            gateway.sent_messages(),
            vec![(CHANNEL, "member9, you currently have 25 points.".to_string())]
        );
        assert_eq!(service.points().get(9).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn config_special_channels_toggles() {
        let (service, _) = make_service();
        let gateway = gateway();
        let admin = actor(1, false, true);

        service
            .dispatch(&gateway, command(admin.clone(), config_command("specialChannels", "general")))
            .await
            .unwrap();
        assert!(service.config().get_or_create(GUILD).await.unwrap().is_special_channel("general"));

        service
            .dispatch(&gateway, command(admin, config_command("specialChannels", "general")))
            .await
            .unwrap();
        assert!(!service.config().get_or_create(GUILD).await.unwrap().is_special_channel("general"));

        let replies: Vec<String> = gateway.sent_messages().into_iter().map(|(_, text)| text).collect();
        assert_eq!(
            replies,
            vec!["Updated special channels: general", "Updated special channels: "]
        );
    }

    #[tokio::test]
    async fn config_without_setting_is_invalid() {
        let (service, _) = make_service();
        let gateway = gateway();

        service
            .dispatch(
                &gateway,
                command(
                    actor(1, false, true),
                    Command::Config {
                        setting: None,
                        value: None,
                    },
                ),
            )
            .await
            .unwrap();

        assert_eq!(gateway.sent_messages()[0].1, "Invalid setting or value");
    }

    #[tokio::test]
    async fn platform_failure_keeps_committed_points() {
        let (service, _) = make_service();
        let gateway = gateway();
        gateway.fail_role_changes_for(6);

        let result = service.handle_message(&gateway, GUILD, 6, Some("general")).await;

        assert!(matches!(result, Err(ActivityError::Gateway(_))));
        assert_eq!(service.points().get(6).await.unwrap(), 2);

        // Other members are unaffected
        service.handle_message(&gateway, GUILD, 7, Some("general")).await.unwrap();
        assert_eq!(gateway.roles_of(GUILD, 7), vec![MID]);
    }

    #[tokio::test]
    async fn decay_floors_and_demotes() {
        let (service, _) = make_service();
        let gateway = gateway();
        service.points().add(30, 3).await.unwrap();
        gateway.grant_existing_role(GUILD, 30, MID);

        let config = service.config().get_or_create(GUILD).await.unwrap();
        let tier = service.decay_member(&gateway, GUILD, 30, &config).await.unwrap();

        assert_eq!(tier, Tier::Bottom);
        assert_eq!(service.points().get(30).await.unwrap(), 0);
        assert_eq!(gateway.roles_of(GUILD, 30), vec![BOTTOM]);
    }

    #[tokio::test]
    async fn idle_member_locks_are_released() {
        let (service, _) = make_service();
        let gateway = gateway();
        service.handle_join(&gateway, GUILD, 40).await.unwrap();
        service.handle_join(&gateway, GUILD, 41).await.unwrap();

        // Someone still holds member 41's lock
        let held = service.member_lock(41);
        assert_eq!(service.release_idle_locks(), 1);
        assert!(service.member_locks.contains_key(&41));

        drop(held);
        assert_eq!(service.release_idle_locks(), 1);
        assert!(service.member_locks.is_empty());

        // A released member can still be locked and updated
        service.handle_join(&gateway, GUILD, 40).await.unwrap();
        assert_eq!(service.points().get(40).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn concurrent_messages_never_exceed_the_cap() {
        let (service, _) = make_service();
        let service = Arc::new(service);
        let gateway = Arc::new(gateway());

        let mut handles = Vec::new();
        for _ in 0..50 {
            let service = Arc::clone(&service);
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move {
                service
                    .handle_message(gateway.as_ref(), GUILD, 11, Some("general"))
                    .await
                    .unwrap()
            }));
        }

        let mut total_granted = 0;
        for handle in handles {
            total_granted += handle.await.unwrap();
        }

        assert_eq!(total_granted, 40);
        assert_eq!(service.points().get(11).await.unwrap(), 40);
    }
}
