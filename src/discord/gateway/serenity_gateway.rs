// Serenity-backed implementation of the core's CommunityGateway.
//
// Lookups go to the cache first and fall back to the HTTP API when the guild
// isn't cached. Cache references are never held across an await: they are
// not Send, and the core's futures have to be.

use crate::core::platform::{CommunityGateway, GatewayError, MemberSummary, RoleRef};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

const AUDIT_LOG_REASON: &str = "Activity points tier update";

/// Discord caps member list pages at 1000.
const MEMBER_PAGE_SIZE: u64 = 1000;

#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<serenity::Http>,
    cache: Arc<serenity::Cache>,
}

impl SerenityGateway {
    pub fn new(ctx: &serenity::Context) -> Self {
        Self {
            http: Arc::clone(&ctx.http),
            cache: Arc::clone(&ctx.cache),
        }
    }
}

fn request_error(err: serenity::Error) -> GatewayError {
    GatewayError::Request(err.to_string())
}

#[async_trait]
impl CommunityGateway for SerenityGateway {
    async fn find_role(
        &self,
        community_id: u64,
        name: &str,
    ) -> Result<Option<RoleRef>, GatewayError> {
        let guild_id = serenity::GuildId::new(community_id);

        let cached = self.cache.guild(guild_id).map(|guild| {
            guild
                .roles
                .values()
                .find(|role| role.name == name)
                .map(|role| RoleRef(role.id.get()))
        });
        if let Some(found) = cached {
            return Ok(found);
        }

        let roles = guild_id.roles(&self.http).await.map_err(request_error)?;
        Ok(roles
            .values()
            .find(|role| role.name == name)
            .map(|role| RoleRef(role.id.get())))
    }

    async fn add_role(
        &self,
        community_id: u64,
        member_id: u64,
        role: RoleRef,
    ) -> Result<(), GatewayError> {
        // Discord treats adding a held role as a no-op
        self.http
            .add_member_role(
                serenity::GuildId::new(community_id),
                serenity::UserId::new(member_id),
                serenity::RoleId::new(role.0),
                Some(AUDIT_LOG_REASON),
            )
            .await
            .map_err(request_error)
    }

    async fn remove_role(
        &self,
        community_id: u64,
        member_id: u64,
        role: RoleRef,
    ) -> Result<(), GatewayError> {
        self.http
            .remove_member_role(
                serenity::GuildId::new(community_id),
                serenity::UserId::new(member_id),
                serenity::RoleId::new(role.0),
                Some(AUDIT_LOG_REASON),
            )
            .await
            .map_err(request_error)
    }

    async fn has_channel_named(&self, community_id: u64, name: &str) -> Result<bool, GatewayError> {
        let guild_id = serenity::GuildId::new(community_id);

        let cached = self
            .cache
            .guild(guild_id)
            .map(|guild| guild.channels.values().any(|channel| channel.name == name));
        if let Some(found) = cached {
            return Ok(found);
        }

        let channels = guild_id.channels(&self.http).await.map_err(request_error)?;
        Ok(channels.values().any(|channel| channel.name == name))
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<(), GatewayError> {
        serenity::ChannelId::new(channel_id)
            .say(&self.http, content)
            .await
            .map(|_| ())
            .map_err(request_error)
    }

    async fn communities(&self) -> Result<Vec<u64>, GatewayError> {
        Ok(self.cache.guilds().iter().map(|id| id.get()).collect())
    }

    async fn members(&self, community_id: u64) -> Result<Vec<MemberSummary>, GatewayError> {
        let guild_id = serenity::GuildId::new(community_id);
        let mut summaries = Vec::new();
        let mut after: Option<serenity::UserId> = None;

        // Fetch over HTTP so large guilds aren't limited to what the cache holds
        loop {
            let page = guild_id
                .members(&self.http, Some(MEMBER_PAGE_SIZE), after)
                .await
                .map_err(request_error)?;

            let page_len = page.len() as u64;
            after = page.last().map(|member| member.user.id);
            summaries.extend(page.into_iter().map(|member| MemberSummary {
                member_id: member.user.id.get(),
                is_bot: member.user.bot,
            }));

            if page_len < MEMBER_PAGE_SIZE || after.is_none() {
                break;
            }
        }

        Ok(summaries)
    }
}
