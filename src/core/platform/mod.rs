mod platform_port;

pub use platform_port::{CommunityGateway, GatewayError, MemberSummary, RoleRef};
