// The platform port - everything the points core needs from the chat platform.
//
// The core never talks to serenity directly. It asks for roles, channels and
// member lists through this trait, and the Discord layer provides the actual
// implementation. Tests use a recording fake instead of a live connection.

use async_trait::async_trait;
use thiserror::Error;

/// An opaque reference to a role that exists in a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleRef(pub u64);

/// Minimal view of a community member, enough for the decay sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberSummary {
    pub member_id: u64,
    pub is_bot: bool,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Platform request failed: {0}")]
    Request(String),
}

/// Calls the core makes back into the chat platform.
///
/// `add_role` on a role the member already holds, and `remove_role` on a role
/// they don't hold, must both succeed without doing anything. Role
/// reconciliation relies on that to stay idempotent.
#[async_trait]
pub trait CommunityGateway: Send + Sync {
    /// Look up a role by its display name. `None` if the community has no such role.
    async fn find_role(&self, community_id: u64, name: &str)
        -> Result<Option<RoleRef>, GatewayError>;

    async fn add_role(
        &self,
        community_id: u64,
        member_id: u64,
        role: RoleRef,
    ) -> Result<(), GatewayError>;

    async fn remove_role(
        &self,
        community_id: u64,
        member_id: u64,
        role: RoleRef,
    ) -> Result<(), GatewayError>;

    /// Does the community have a channel with exactly this name?
    async fn has_channel_named(&self, community_id: u64, name: &str)
        -> Result<bool, GatewayError>;

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<(), GatewayError>;

    /// Every community the bot is currently part of.
    async fn communities(&self) -> Result<Vec<u64>, GatewayError>;

    /// Every member of a community, bots included.
    async fn members(&self, community_id: u64) -> Result<Vec<MemberSummary>, GatewayError>;
}
