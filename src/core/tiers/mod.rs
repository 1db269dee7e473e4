mod tier_resolver;

pub use tier_resolver::{reconcile_roles, Tier};
