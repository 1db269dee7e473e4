// Process configuration, read from the environment (and `.env` via dotenv).
//
// Everything except the bot token has a default. Bad values fail start-up
// with a message that names the variable, instead of being silently ignored.

use crate::core::community_config::CommunityConfig;
use crate::core::decay::DEFAULT_DECAY_PERIOD;
use crate::core::points::CalendarClock;
use anyhow::{bail, Context as _, Result};
use chrono_tz::Tz;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_COMMAND_PREFIX: &str = "!";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_token: String,
    pub command_prefix: String,
    /// Time between decay sweeps.
    pub decay_period: Duration,
    /// Zone whose calendar day drives the daily cap. `None` = host local time.
    pub timezone: Option<Tz>,
    /// Reply when a privileged command is refused.
    pub announce_denials: bool,
    /// Starting configuration for every new community.
    pub community_defaults: CommunityConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key -> value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN").context(
            "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
        )?;

        let command_prefix = get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());

        let decay_period = match get("DECAY_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("DECAY_INTERVAL_SECS must be a number of seconds, got {raw:?}"))?;
                if secs == 0 {
                    bail!("DECAY_INTERVAL_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_DECAY_PERIOD,
        };

        let timezone = match get("POINTS_TIMEZONE") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<Tz>()
                    .map_err(|e| anyhow::anyhow!("POINTS_TIMEZONE {raw:?} is not a known timezone: {e}"))?,
            ),
            None => None,
        };

        let announce_denials = match get("ANNOUNCE_DENIALS") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .with_context(|| format!("ANNOUNCE_DENIALS must be true or false, got {raw:?}"))?,
            None => true,
        };

        let community_defaults = match get("COMMUNITY_DEFAULTS_FILE") {
            Some(path) => load_community_defaults(Path::new(path.trim()))?,
            None => CommunityConfig::default(),
        };

        Ok(Self {
            discord_token,
            command_prefix,
            decay_period,
            timezone,
            announce_denials,
            community_defaults,
        })
    }

    pub fn day_clock(&self) -> CalendarClock {
        match self.timezone {
            Some(zone) => CalendarClock::in_zone(zone),
            None => CalendarClock::local(),
        }
    }
}

/// Read community defaults from a JSON file. Missing fields keep the
/// built-in defaults.
pub fn load_community_defaults(path: &Path) -> Result<CommunityConfig> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open community defaults at {}", path.display()))?;
    let config = serde_json::from_reader(file)
        .with_context(|| format!("Invalid community defaults in {}", path.display()))?;
    Ok(config)
}
