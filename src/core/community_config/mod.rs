// Per-community configuration: tunable point values and tier role names.

mod community_config_models;
mod community_config_service;

pub use community_config_models::{CommunityConfig, RoleNames};
pub use community_config_service::{ConfigError, ConfigService, ConfigStore, SettingOutcome};
