// This module handles bot presence.
//
// Discord-layer glue only: we set a presence that tells members how to check
// their points, using the configured command prefix.

use poise::serenity_prelude as serenity;

/// Called once the bot is ready so members can see the query command
/// in the bot's status.
pub fn on_ready(ctx: &serenity::Context, command_prefix: &str) {
    let activity = serenity::ActivityData::watching(format!("{}points", command_prefix));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
