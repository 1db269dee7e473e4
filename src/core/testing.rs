// Test doubles shared by the core test modules.

use crate::core::platform::{CommunityGateway, GatewayError, MemberSummary, RoleRef};
use crate::core::points::day_clock::DayClock;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A day clock that only moves when told to.
pub struct FixedDayClock {
    day: Mutex<String>,
}

impl FixedDayClock {
    pub fn new(day: &str) -> Self {
        Self {
            day: Mutex::new(day.to_string()),
        }
    }

    pub fn set(&self, day: &str) {
        *self.day.lock().unwrap() = day.to_string();
    }
}

impl DayClock for FixedDayClock {
    fn today(&self) -> String {
        self.day.lock().unwrap().clone()
    }
}

/// In-memory stand-in for the chat platform that records what the core did.
///
/// Role adds and removes behave like Discord's: adding a held role or
/// removing a missing one quietly succeeds.
pub struct RecordingGateway {
    roles: DashMap<(u64, String), u64>,
    channels: DashSet<(u64, String)>,
    held: DashMap<(u64, u64), BTreeSet<u64>>,
    members: DashMap<u64, Vec<MemberSummary>>,
    sent: Mutex<Vec<(u64, String)>>,
    failing_members: DashSet<u64>,
    fail_roles: AtomicBool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            roles: DashMap::new(),
            channels: DashSet::new(),
            held: DashMap::new(),
            members: DashMap::new(),
            sent: Mutex::new(Vec::new()),
            failing_members: DashSet::new(),
            fail_roles: AtomicBool::new(false),
        }
    }

    pub fn with_role(self, community_id: u64, role_id: u64, name: &str) -> Self {
        self.roles.insert((community_id, name.to_string()), role_id);
        self
    }

    /// Registers the default tier roles (11 = top, 12 = mid, 13 = bottom).
    pub fn with_tier_roles(self, community_id: u64) -> Self {
        self.with_role(community_id, 11, "Regulars")
            .with_role(community_id, 12, "Casuals")
            .with_role(community_id, 13, "Deeply Missed")
    }

    pub fn with_channel(self, community_id: u64, name: &str) -> Self {
        self.channels.insert((community_id, name.to_string()));
        self
    }

    pub fn with_member(self, community_id: u64, member_id: u64, is_bot: bool) -> Self {
        self.members
            .entry(community_id)
            .or_default()
            .push(MemberSummary { member_id, is_bot });
        self
    }

    pub fn grant_existing_role(&self, community_id: u64, member_id: u64, role: RoleRef) {
        self.held
            .entry((community_id, member_id))
            .or_default()
            .insert(role.0);
    }

    pub fn roles_of(&self, community_id: u64, member_id: u64) -> Vec<RoleRef> {
        self.held
            .get(&(community_id, member_id))
            .map(|roles| roles.iter().copied().map(RoleRef).collect())
            .unwrap_or_default()
    }

    pub fn sent_messages(&self) -> Vec<(u64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_role_changes(&self) {
        self.fail_roles.store(true, Ordering::SeqCst);
    }

    /// Role changes for this member fail, everyone else is unaffected.
    pub fn fail_role_changes_for(&self, member_id: u64) {
        self.failing_members.insert(member_id);
    }

    fn check_role_change(&self, member_id: u64) -> Result<(), GatewayError> {
        if self.fail_roles.load(Ordering::SeqCst) || self.failing_members.contains(&member_id) {
            return Err(GatewayError::Request("role change rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CommunityGateway for RecordingGateway {
    async fn find_role(
        &self,
        community_id: u64,
        name: &str,
    ) -> Result<Option<RoleRef>, GatewayError> {
        Ok(self
            .roles
            .get(&(community_id, name.to_string()))
            .map(|id| RoleRef(*id)))
    }

    async fn add_role(
        &self,
        community_id: u64,
        member_id: u64,
        role: RoleRef,
    ) -> Result<(), GatewayError> {
        self.check_role_change(member_id)?;
        self.grant_existing_role(community_id, member_id, role);
        Ok(())
    }

    async fn remove_role(
        &self,
        community_id: u64,
        member_id: u64,
        role: RoleRef,
    ) -> Result<(), GatewayError> {
        self.check_role_change(member_id)?;
        if let Some(mut roles) = self.held.get_mut(&(community_id, member_id)) {
            roles.remove(&role.0);
        }
        Ok(())
    }

    async fn has_channel_named(&self, community_id: u64, name: &str) -> Result<bool, GatewayError> {
        Ok(self.channels.contains(&(community_id, name.to_string())))
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<(), GatewayError> {
        self.sent
            .lock()
            .unwrap()
            .push((channel_id, content.to_string()));
        Ok(())
    }

    async fn communities(&self) -> Result<Vec<u64>, GatewayError> {
        let mut ids: Vec<u64> = self.members.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn members(&self, community_id: u64) -> Result<Vec<MemberSummary>, GatewayError> {
        self.members
            .get(&community_id)
            .map(|members| members.clone())
            .ok_or_else(|| GatewayError::Request(format!("unknown community {community_id}")))
    }
}
