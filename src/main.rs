// This is the entry point of the points bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic): ledger, daily cap, tiers, decay
// - `infra/` = Implementations of core traits (in-memory stores)
// - `discord/` = Discord-specific adapters (commands, events, gateway)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Start the decay scheduler

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod app_config;

use crate::app_config::AppConfig;
use crate::core::activity::{ActivityService, PermissionAuthorizer};
use crate::core::community_config::ConfigService;
use crate::core::decay::DecayScheduler;
use crate::core::points::PointsService;
use crate::discord::activity::activity_events;
use crate::discord::commands::presence;
use crate::discord::gateway::SerenityGateway;
use crate::discord::{Data, Error};
use crate::infra::community_config::InMemoryConfigStore;
use crate::infra::points::InMemoryPointsStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
/// Messages, joins and voice changes all feed the points system.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = activity_events::handle_message(ctx, data, new_message).await {
                tracing::error!(
                    message_id = new_message.id.get(),
                    "Error awarding message points: {}",
                    e
                );
            }
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            if let Err(e) = activity_events::handle_member_join(ctx, data, new_member).await {
                tracing::error!(
                    member_id = new_member.user.id.get(),
                    "Error handling member join: {}",
                    e
                );
            }
        }
        serenity::FullEvent::VoiceStateUpdate { old, new } => {
            if let Err(e) =
                activity_events::handle_voice_state_update(ctx, data, old.as_ref(), new).await
            {
                tracing::error!(
                    member_id = new.user_id.get(),
                    "Error handling voice state update: {}",
                    e
                );
            }
        }

        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists) before anything
    // reads them, RUST_LOG included
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid bot configuration");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let points_service = PointsService::new(
        InMemoryPointsStore::new(),
        Arc::new(config.day_clock()),
    );
    let config_service = ConfigService::new(
        InMemoryConfigStore::new(),
        config.community_defaults.clone(),
    );
    let activity = Arc::new(
        ActivityService::new(points_service, config_service, Arc::new(PermissionAuthorizer))
            .announce_denials(config.announce_denials),
    );

    let data = Data {
        activity: Arc::clone(&activity),
        command_prefix: config.command_prefix.clone(),
    };
    let decay_period = config.decay_period;

    tracing::info!(
        prefix = %config.command_prefix,
        decay_period_secs = decay_period.as_secs(),
        timezone = ?config.timezone,
        "Configuration loaded"
    );

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::commands::points::event(),
                discord::commands::points::points(),
                discord::commands::points::config(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                case_insensitive_commands: true,
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "Bot is ready");
                presence::on_ready(ctx, &data.command_prefix);

                // Weekly decay runs for the life of the process
                let scheduler = DecayScheduler::new(Arc::clone(&data.activity), decay_period);
                scheduler.spawn(SerenityGateway::new(ctx));

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
