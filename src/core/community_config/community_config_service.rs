// Configuration service - lazy creation and the `config` command's rules.
//
// The service owns the defaults every new community starts from and turns a
// raw `config <name> <value>` pair into either a change or a rejection. A
// rejection is a normal outcome here, not an error: the caller just shows it.

use super::community_config_models::{CommunityConfig, NumericSetting, SPECIAL_CHANNELS};
use crate::core::platform::{CommunityGateway, GatewayError};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    // Only persistent backends fail; the in-memory store never does.
    #[allow(dead_code)]
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Storage for community configuration records.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Return the stored record, inserting `default` first if there is none.
    async fn get_or_insert(
        &self,
        community_id: u64,
        default: CommunityConfig,
    ) -> Result<CommunityConfig, ConfigError>;

    /// Mutate a record in place, inserting `default` first if there is none.
    /// Implementations must not let two concurrent calls lose an update.
    async fn modify<F, R>(
        &self,
        community_id: u64,
        default: CommunityConfig,
        f: F,
    ) -> Result<R, ConfigError>
    where
        F: FnOnce(&mut CommunityConfig) -> R + Send,
        R: Send;
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// What happened when someone ran `config <name> <value>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingOutcome {
    Updated { setting: &'static str, value: i64 },
    SpecialChannels(Vec<String>),
    InvalidChannel,
    Invalid,
}

impl SettingOutcome {
    /// The chat reply for this outcome.
    pub fn reply(&self) -> String {
        match self {
            SettingOutcome::Updated { setting, value } => {
                format!("Setting `{}` updated to {}", setting, value)
            }
            SettingOutcome::SpecialChannels(channels) => {
                format!("Updated special channels: {}", channels.join(", "))
            }
            SettingOutcome::InvalidChannel => "Invalid channel name".to_string(),
            SettingOutcome::Invalid => "Invalid setting or value".to_string(),
        }
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ConfigService<S: ConfigStore> {
    store: S,
    defaults: CommunityConfig,
}

impl<S: ConfigStore> ConfigService<S> {
    pub fn new(store: S, defaults: CommunityConfig) -> Self {
        Self { store, defaults }
    }

    /// Fetch a community's configuration, creating it from the defaults the
    /// first time the community is seen.
    pub async fn get_or_create(&self, community_id: u64) -> Result<CommunityConfig, ConfigError> {
        self.store
            .get_or_insert(community_id, self.defaults.clone())
            .await
    }

    /// Apply a `config` command.
    ///
    /// Numeric settings take any integer. `specialChannels` toggles a channel
    /// name (a leading `#` is ignored) that must exist in the community.
    pub async fn apply_setting(
        &self,
        gateway: &dyn CommunityGateway,
        community_id: u64,
        setting: &str,
        raw_value: Option<&str>,
    ) -> Result<SettingOutcome, ConfigError> {
        let Some(raw_value) = raw_value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(SettingOutcome::Invalid);
        };

        if setting == SPECIAL_CHANNELS {
            let channel_name = raw_value.strip_prefix('#').unwrap_or(raw_value);
            if !gateway.has_channel_named(community_id, channel_name).await? {
                return Ok(SettingOutcome::InvalidChannel);
            }

            let channels = self
                .store
                .modify(community_id, self.defaults.clone(), |config| {
                    config.toggle_special_channel(channel_name);
                    config.special_channels.clone()
                })
                .await?;

            tracing::info!(
                community_id,
                channel = channel_name,
                "Special channel list updated"
            );
            return Ok(SettingOutcome::SpecialChannels(channels));
        }

        let (Some(numeric), Ok(value)) = (
            NumericSetting::from_name(setting),
            raw_value.parse::<i64>(),
        ) else {
            return Ok(SettingOutcome::Invalid);
        };

        self.store
            .modify(community_id, self.defaults.clone(), |config| {
                numeric.apply(config, value)
            })
            .await?;

        tracing::info!(community_id, setting, value, "Community setting updated");
        Ok(SettingOutcome::Updated {
            setting: numeric.name(),
            value,
        })
    }
}
