// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "platform/mod.rs"]
pub mod platform;

#[path = "community_config/mod.rs"]
pub mod community_config;

#[path = "points/mod.rs"]
pub mod points;

#[path = "tiers/mod.rs"]
pub mod tiers;

#[path = "activity/mod.rs"]
pub mod activity;

#[path = "decay/mod.rs"]
pub mod decay;

#[cfg(test)]
#[path = "testing.rs"]
pub mod testing;
