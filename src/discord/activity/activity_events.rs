// Translates serenity events into core `CommunityEvent`s.
//
// Bots never earn or lose points, so they're filtered out here before the
// core sees anything. Commands are handled by poise, so prefixed messages are
// skipped as well.

use crate::core::activity::CommunityEvent;
use crate::discord::gateway::SerenityGateway;
use crate::discord::Data;
use anyhow::Result;
use poise::serenity_prelude::{self as serenity, Context};

/// An ordinary chat message earns message points.
pub async fn handle_message(ctx: &Context, data: &Data, msg: &serenity::Message) -> Result<()> {
    if msg.author.bot || msg.content.starts_with(&data.command_prefix) {
        return Ok(());
    }

    let guild_id = match msg.guild_id {
        Some(id) => id,
        None => return Ok(()),
    };

    let event = CommunityEvent::Message {
        community_id: guild_id.get(),
        channel_id: msg.channel_id.get(),
        channel_name: channel_name(ctx, guild_id, msg.channel_id).await,
        author_id: msg.author.id.get(),
    };

    dispatch(ctx, data, event).await
}

pub async fn handle_member_join(
    ctx: &Context,
    data: &Data,
    member: &serenity::Member,
) -> Result<()> {
    if member.user.bot {
        return Ok(());
    }

    let event = CommunityEvent::Joined {
        community_id: member.guild_id.get(),
        member_id: member.user.id.get(),
    };

    dispatch(ctx, data, event).await
}

pub async fn handle_voice_state_update(
    ctx: &Context,
    data: &Data,
    old: Option<&serenity::VoiceState>,
    new: &serenity::VoiceState,
) -> Result<()> {
    let guild = match new.guild_id {
        Some(id) => id,
        None => return Ok(()),
    };

    if new.member.as_ref().is_some_and(|m| m.user.bot) {
        return Ok(());
    }

    let guild_id = guild.get();
    let member_id = new.user_id.get();
    let guild_cached = ctx.cache.guild(guild).is_some();
    let old_channel = old.map(|state| state.channel_id.map(|id| id.get()));
    let Some(from) = previous_channel(old_channel, guild_cached) else {
        tracing::debug!(guild_id, member_id, "Voice update before guild cached, skipping");
        return Ok(());
    };

    let event = CommunityEvent::VoiceTransition {
        community_id: guild_id,
        member_id,
        from,
        to: new.channel_id.map(|id| id.get()),
    };

    dispatch(ctx, data, event).await
}

/// The channel the member was in before this update, or `None` if that
/// can't be known.
///
/// Serenity only hands us the old state when it's cached. Voice states are
/// cached from guild create, so with the guild cached a missing old state
/// really means "not in a channel". Without it, a move between channels would
/// look like a fresh join.
fn previous_channel(old_channel: Option<Option<u64>>, guild_cached: bool) -> Option<Option<u64>> {
    match old_channel {
        Some(channel) => Some(channel),
        None if guild_cached => Some(None),
        None => None,
    }
}

async fn dispatch(ctx: &Context, data: &Data, event: CommunityEvent) -> Result<()> {
    let gateway = SerenityGateway::new(ctx);
    data.activity.dispatch(&gateway, event).await?;
    Ok(())
}

/// Name of a guild channel, from the cache if possible.
async fn channel_name(
    ctx: &Context,
    guild_id: serenity::GuildId,
    channel_id: serenity::ChannelId,
) -> Option<String> {
    let cached = ctx
        .cache
        .guild(guild_id)
        .and_then(|guild| guild.channels.get(&channel_id).map(|c| c.name.clone()));
    if cached.is_some() {
        return cached;
    }

    match channel_id.to_channel(ctx).await {
        Ok(channel) => channel.guild().map(|c| c.name),
        Err(e) => {
            tracing::debug!("Could not resolve channel {}: {}", channel_id, e);
            None
        }
    }
}
