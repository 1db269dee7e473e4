// Community configuration models.
//
// These are pure domain types. The setting names accepted by the `config`
// command are the camelCase names below, which also double as the JSON keys
// of the optional defaults file.

use serde::{Deserialize, Serialize};

/// Setting name for the special-channel toggle. It is not numeric, so it gets
/// special handling in the service.
pub const SPECIAL_CHANNELS: &str = "specialChannels";

/// Display names of the three tier roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleNames {
    pub top: String,
    pub mid: String,
    pub bottom: String,
}

impl Default for RoleNames {
    fn default() -> Self {
        Self {
            top: "Regulars".to_string(),
            mid: "Casuals".to_string(),
            bottom: "Deeply Missed".to_string(),
        }
    }
}

/// Tunable values for a single community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommunityConfig {
    /// Points a member starts with when they join.
    pub initial_points: i64,
    /// Points granted by the `event` command.
    pub event_points: i64,
    /// Points per ordinary message.
    pub message_points: i64,
    /// Points per message in one of the special channels.
    pub special_message_points: i64,
    /// Points removed from everyone on each decay sweep.
    pub weekly_point_deduction: i64,
    /// Channel names that earn `special_message_points`. Insertion order is kept.
    pub special_channels: Vec<String>,
    pub voice_channel_join_points: i64,
    /// Ceiling on message points per member per day.
    pub max_daily_points: i64,
    pub role_names: RoleNames,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            initial_points: 25,
            event_points: 30,
            message_points: 2,
            special_message_points: 5,
            weekly_point_deduction: 5,
            special_channels: Vec::new(),
            voice_channel_join_points: 10,
            max_daily_points: 40,
            role_names: RoleNames::default(),
        }
    }
}

impl CommunityConfig {
    pub fn is_special_channel(&self, channel_name: &str) -> bool {
        self.special_channels.iter().any(|name| name == channel_name)
    }

    /// Add the channel if it's missing, remove it if it's present.
    /// Returns `true` if the channel is special after the toggle.
    pub fn toggle_special_channel(&mut self, channel_name: &str) -> bool {
        if self.is_special_channel(channel_name) {
            self.special_channels.retain(|name| name != channel_name);
            false
        } else {
            self.special_channels.push(channel_name.to_string());
            true
        }
    }
}

/// The integer-valued settings that `config <name> <value>` can overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericSetting {
    InitialPoints,
    EventPoints,
    MessagePoints,
    SpecialMessagePoints,
    WeeklyPointDeduction,
    VoiceChannelJoinPoints,
    MaxDailyPoints,
}

impl NumericSetting {
    pub const ALL: [NumericSetting; 7] = [
        NumericSetting::InitialPoints,
        NumericSetting::EventPoints,
        NumericSetting::MessagePoints,
        NumericSetting::SpecialMessagePoints,
        NumericSetting::WeeklyPointDeduction,
        NumericSetting::VoiceChannelJoinPoints,
        NumericSetting::MaxDailyPoints,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumericSetting::InitialPoints => "initialPoints",
            NumericSetting::EventPoints => "eventPoints",
            NumericSetting::MessagePoints => "messagePoints",
            NumericSetting::SpecialMessagePoints => "specialMessagePoints",
            NumericSetting::WeeklyPointDeduction => "weeklyPointDeduction",
            NumericSetting::VoiceChannelJoinPoints => "voiceChannelJoinPoints",
            NumericSetting::MaxDailyPoints => "maxDailyPoints",
        }
    }

    /// Setting names are matched exactly, the same way they're documented.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|setting| setting.name() == name)
    }

    pub fn apply(&self, config: &mut CommunityConfig, value: i64) {
        let field = match self {
            NumericSetting::InitialPoints => &mut config.initial_points,
            NumericSetting::EventPoints => &mut config.event_points,
            NumericSetting::MessagePoints => &mut config.message_points,
            NumericSetting::SpecialMessagePoints => &mut config.special_message_points,
            NumericSetting::WeeklyPointDeduction => &mut config.weekly_point_deduction,
            NumericSetting::VoiceChannelJoinPoints => &mut config.voice_channel_join_points,
            NumericSetting::MaxDailyPoints => &mut config.max_daily_points,
        };
        *field = value;
    }
}
