//! Participant registration and lookup.
//!
//! Usernames are the identity ids the coordinator sees. Passwords and tokens
//! belong to whatever authenticates callers in front of this crate.
use super::error::RideError;
use super::identity::{Identity, IdentityContext, Role};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: RwLock<HashMap<String, Identity>>,
}

/// The caller of one request, resolved lazily against a registry
#[derive(Debug)]
pub struct Session<'a> {
    registry: &'a ParticipantRegistry,
    username: Option<String>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant. The role is fixed from here on.
    pub fn register(&self, username: &str, role: Role) -> Result<Identity, RideError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RideError::Validation("username is required".into()));
        }

        // every write is a single insert, so a poisoned map is still whole
        let mut participants = self
            .participants
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if participants.contains_key(username) {
            return Err(RideError::Conflict("username is already taken".into()));
        }

        let identity = Identity::new(username, role);
        participants.insert(username.to_string(), identity.clone());
        tracing::info!(username, %role, "participant registered");

        Ok(identity)
    }

    /// Same as [`register`](Self::register), for roles arriving as text
    pub fn register_with_role_name(
        &self,
        username: &str,
        role_name: &str,
    ) -> Result<Identity, RideError> {
        let role = role_name.parse::<Role>()?;
        self.register(username, role)
    }

    pub fn resolve(&self, username: &str) -> Option<Identity> {
        self.participants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned()
    }

    pub fn session(&self, username: Option<&str>) -> Session<'_> {
        Session {
            registry: self,
            username: username.map(str::to_string),
        }
    }
}

impl IdentityContext for Session<'_> {
    fn current_identity(&self) -> Option<Identity> {
        self.username
            .as_deref()
            .and_then(|u| self.registry.resolve(u))
    }
}
