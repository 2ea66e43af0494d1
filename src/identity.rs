//! Participants as seen by the coordinator: an id plus granted roles
use super::error::RideError;
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Rider,
    Driver,
}

/// An authenticated participant. Credentials never reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: String,
    roles: BTreeSet<Role>,
}

/// Anything that can answer "which roles were granted?"
pub trait RoleBearer {
    fn roles(&self) -> &BTreeSet<Role>;
}

/// Resolves the caller of the current request, if any
pub trait IdentityContext {
    fn current_identity(&self) -> Option<Identity>;
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Rider => "ROLE_USER",
            Role::Driver => "ROLE_DRIVER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RideError;

    // accepts both the wire names and the plain ones
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROLE_USER" | "RIDER" => Ok(Role::Rider),
            "ROLE_DRIVER" | "DRIVER" => Ok(Role::Driver),
            _ => Err(RideError::Validation(format!(
                "invalid role '{s}', must be ROLE_USER or ROLE_DRIVER"
            ))),
        }
    }
}

impl Identity {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self::with_roles(id, [role])
    }
    pub fn with_roles(id: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id: id.into(),
            roles: roles.into_iter().collect(),
        }
    }
    pub fn rider(id: impl Into<String>) -> Self {
        Self::new(id, Role::Rider)
    }
    pub fn driver(id: impl Into<String>) -> Self {
        Self::new(id, Role::Driver)
    }
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl RoleBearer for Identity {
    fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }
}

// a caller resolved ahead of time
impl IdentityContext for Option<Identity> {
    fn current_identity(&self) -> Option<Identity> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_from_wire_and_plain_names() {
        assert_eq!("ROLE_USER".parse::<Role>().unwrap(), Role::Rider);
        assert_eq!("rider".parse::<Role>().unwrap(), Role::Rider);
        assert_eq!("ROLE_DRIVER".parse::<Role>().unwrap(), Role::Driver);
        assert_eq!(" driver ".parse::<Role>().unwrap(), Role::Driver);
        assert!(matches!(
            "ROLE_ADMIN".parse::<Role>(),
            Err(RideError::Validation(_))
        ));
        for unlisted in ["ROLE_RIDER", "user"] {
            assert!(unlisted.parse::<Role>().is_err(), "{unlisted} parsed");
        }
    }

    #[test]
    fn role_display_is_wire_name() {
        assert_eq!(Role::Rider.to_string(), "ROLE_USER");
        assert_eq!(Role::Driver.to_string(), "ROLE_DRIVER");
    }

    #[test]
    fn identity_collects_roles() {
        let both = Identity::with_roles("x", [Role::Rider, Role::Driver, Role::Rider]);
        assert_eq!(both.roles().len(), 2);

        let rider = Identity::rider("r1");
        assert_eq!(rider.id(), "r1");
        assert!(rider.roles().contains(&Role::Rider));
        assert!(!rider.roles().contains(&Role::Driver));
    }

    #[test]
    fn resolved_caller_is_its_own_context() {
        let ctx = Some(Identity::driver("d1"));
        assert_eq!(ctx.current_identity(), Some(Identity::driver("d1")));

        let anonymous: Option<Identity> = None;
        assert_eq!(anonymous.current_identity(), None);
    }
}
