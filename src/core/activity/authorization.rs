// Authorization for the privileged commands.
//
// The Discord layer fills in what the actor is allowed to do; the predicate
// here decides, and explains itself when the answer is no.

/// The member who ran a command, as far as the core cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub member_id: u64,
    pub display_name: String,
    pub can_manage_roles: bool,
    pub is_administrator: bool,
}

/// What a command needs from its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageRoles,
    Administrator,
}

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub reason: String,
}

pub trait Authorizer: Send + Sync {
    fn authorize(&self, actor: &Actor, capability: Capability) -> Result<(), Denial>;
}

/// Checks the actor's platform permissions. Administrators can do everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissionAuthorizer;

impl Authorizer for PermissionAuthorizer {
    fn authorize(&self, actor: &Actor, capability: Capability) -> Result<(), Denial> {
        let allowed = match capability {
            Capability::ManageRoles => actor.can_manage_roles || actor.is_administrator,
            Capability::Administrator => actor.is_administrator,
        };

        if allowed {
            return Ok(());
        }

        let needed = match capability {
            Capability::ManageRoles => "Manage Roles",
            Capability::Administrator => "Administrator",
        };
        Err(Denial {
            reason: format!(
                "{}, you need the {} permission to do that.",
                actor.display_name, needed
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(can_manage_roles: bool, is_administrator: bool) -> Actor {
        Actor {
            member_id: 1,
            display_name: "sam".to_string(),
            can_manage_roles,
            is_administrator,
        }
    }

    #[test]
    fn administrators_pass_every_check() {
        let admin = actor(false, true);
        assert!(PermissionAuthorizer
            .authorize(&admin, Capability::ManageRoles)
            .is_ok());
        assert!(PermissionAuthorizer
            .authorize(&admin, Capability::Administrator)
            .is_ok());
    }

    #[test]
    fn role_managers_are_not_administrators() {
        let manager = actor(true, false);
        assert!(PermissionAuthorizer
            .authorize(&manager, Capability::ManageRoles)
            .is_ok());

        let denial = PermissionAuthorizer
            .authorize(&manager, Capability::Administrator)
            .unwrap_err();
        assert_eq!(
            denial.reason,
            "sam, you need the Administrator permission to do that."
        );
    }

    #[test]
    fn plain_members_are_denied() {
        let member = actor(false, false);
        let denial = PermissionAuthorizer
            .authorize(&member, Capability::ManageRoles)
            .unwrap_err();
        assert!(denial.reason.contains("Manage Roles"));
    }
}
