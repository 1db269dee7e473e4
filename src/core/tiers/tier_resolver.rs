// Tier resolution - maps a point total onto exactly one of three roles and
// brings a member's roles in line with it.

use crate::core::community_config::RoleNames;
use crate::core::platform::{CommunityGateway, GatewayError, RoleRef};
use std::fmt;

/// Points at or above this are the top tier.
pub const TOP_TIER_THRESHOLD: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// 100 points or more
    Top,
    /// 1 to 99 points
    Mid,
    /// 0 points (or less)
    Bottom,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Top, Tier::Mid, Tier::Bottom];

    pub fn for_points(points: i64) -> Self {
        if points >= TOP_TIER_THRESHOLD {
            Tier::Top
        } else if points > 0 {
            Tier::Mid
        } else {
            Tier::Bottom
        }
    }

    pub fn role_name<'a>(&self, names: &'a RoleNames) -> &'a str {
        match self {
            Tier::Top => &names.top,
            Tier::Mid => &names.mid,
            Tier::Bottom => &names.bottom,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Top => write!(f, "Top"),
            Tier::Mid => write!(f, "Mid"),
            Tier::Bottom => write!(f, "Bottom"),
        }
    }
}

/// Give the member the role for their current tier and take away the other two.
///
/// A tier whose role doesn't exist in the community is skipped. Running this
/// twice with the same points changes nothing the second time.
pub async fn reconcile_roles(
    gateway: &dyn CommunityGateway,
    community_id: u64,
    member_id: u64,
    points: i64,
    names: &RoleNames,
) -> Result<Tier, GatewayError> {
    let current = Tier::for_points(points);

    for tier in Tier::ALL {
        let name = tier.role_name(names);
        let Some(role) = gateway.find_role(community_id, name).await? else {
            tracing::warn!(community_id, role = name, "Tier role not found, skipping");
            continue;
        };

        apply(gateway, community_id, member_id, role, tier == current).await?;
    }

    tracing::debug!(community_id, member_id, points, tier = %current, "Roles reconciled");
    Ok(current)
}

async fn apply(
    gateway: &dyn CommunityGateway,
    community_id: u64,
    member_id: u64,
    role: RoleRef,
    should_hold: bool,
) -> Result<(), GatewayError> {
    if should_hold {
        gateway.add_role(community_id, member_id, role).await
    } else {
        gateway.remove_role(community_id, member_id, role).await
    }
}
