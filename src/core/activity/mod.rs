// Activity handling: events in, points and roles out.

pub mod activity_service;
pub mod authorization;
pub mod commands;

pub use activity_service::{ActivityService, CommunityEvent};
pub use authorization::{Actor, PermissionAuthorizer};
pub use commands::Command;
