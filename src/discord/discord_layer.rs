// Discord layer - commands, event translation and the platform gateway.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "activity/mod.rs"]
pub mod activity;

#[path = "gateway/mod.rs"]
pub mod gateway;

// Re-export command types for convenience
pub use commands::points::{Data, Error};
