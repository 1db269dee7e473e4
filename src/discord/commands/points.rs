// Prefix commands for the points system.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types (who ran it, what they may do)
// 2. Hand a core `Command` to the activity service
// 3. The service replies through the gateway
//
// Permission checks live in the core authorizer, not in
// `required_permissions`, so refusals are explained the same way everywhere.

use crate::core::activity::{Actor, ActivityService, Command, CommunityEvent};
use crate::discord::gateway::SerenityGateway;
use crate::infra::community_config::InMemoryConfigStore;
use crate::infra::points::InMemoryPointsStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub type PointsActivity = ActivityService<InMemoryPointsStore, InMemoryConfigStore>;

/// Data that's shared across all commands and event handlers.
pub struct Data {
    pub activity: Arc<PointsActivity>,
    pub command_prefix: String,
}

/// Grant the configured event points to a member.
///
/// **Command syntax:** `!event @member`
#[poise::command(prefix_command, guild_only)]
pub async fn event(ctx: Context<'_>, member: Option<String>) -> Result<(), Error> {
    run(ctx, Command::grant_event(member.as_deref())).await
}

/// Show how many points you have.
#[poise::command(prefix_command, guild_only)]
pub async fn points(ctx: Context<'_>) -> Result<(), Error> {
    run(ctx, Command::Points).await
}

/// Change a community setting.
///
/// **Command syntax:** `!config messagePoints 3` or `!config specialChannels #art`
#[poise::command(prefix_command, guild_only)]
pub async fn config(
    ctx: Context<'_>,
    setting: Option<String>,
    value: Option<String>,
) -> Result<(), Error> {
    run(ctx, Command::Config { setting, value }).await
}

async fn run(ctx: Context<'_>, command: Command) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let event = CommunityEvent::Command {
        community_id: guild_id,
        channel_id: ctx.channel_id().get(),
        actor: actor_for(ctx).await,
        command,
    };

    let gateway = SerenityGateway::new(ctx.serenity_context());
    ctx.data().activity.dispatch(&gateway, event).await?;
    Ok(())
}

/// Describe the invoking member in core terms.
async fn actor_for(ctx: Context<'_>) -> Actor {
    let author = ctx.author();

    let permissions = match ctx.author_member().await {
        Some(member) => ctx
            .guild()
            .map(|guild| guild.member_permissions(&member))
            .unwrap_or_else(serenity::Permissions::empty),
        None => serenity::Permissions::empty(),
    };

    Actor {
        member_id: author.id.get(),
        display_name: author.name.clone(),
        can_manage_roles: permissions.manage_roles(),
        is_administrator: permissions.administrator(),
    }
}
