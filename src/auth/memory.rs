//! In-memory reference backends. No persistence and no hashing on purpose:
//! they exist so the dispatcher can be exercised (tests, demos, small
//! fixed-account deployments) without any external infrastructure.

use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::identity::{Attrs, Principal, RequestContext};

use super::backend::{AuthBackend, AuthOutcome, Credentials};

/// Username/password backend over a fixed in-memory account map. Unknown
/// users and wrong passwords are both a quiet no-match; locked accounts are
/// denied outright, which stops the whole dispatch pass.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    users: HashMap<String, String>,
    locked: HashSet<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.add_user(username, password);
        self
    }

    pub fn add_user(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.users.insert(username.into(), password.into());
    }

    /// Mark an account so that any attempt against it is authoritatively
    /// denied rather than passed over.
    pub fn lock_user(&mut self, username: impl Into<String>) {
        self.locked.insert(username.into());
    }
}

impl AuthBackend for MemoryBackend {
    fn required_fields(&self) -> &[&str] {
        &["username", "password"]
    }

    fn authenticate(
        &self,
        context: &RequestContext,
        credentials: &Credentials,
    ) -> Result<AuthOutcome> {
        let (Some(username), Some(password)) =
            (credentials.get_str("username"), credentials.get_str("password"))
        else {
            return Ok(AuthOutcome::NoMatch);
        };
        if self.locked.contains(username) {
            return Ok(AuthOutcome::Denied { reason: format!("account '{}' is locked", username) });
        }
        match self.users.get(username) {
            Some(stored) if stored == password => Ok(AuthOutcome::Authenticated(Principal {
                user_id: username.to_string(),
                attrs: Attrs { ip: context.remote_addr.clone(), ..Attrs::default() },
                ..Principal::default()
            })),
            _ => Ok(AuthOutcome::NoMatch),
        }
    }
}

/// Bearer-token backend over a fixed token → user map.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenBackend {
    tokens: HashMap<String, String>,
}

impl StaticTokenBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), user_id.into());
        self
    }
}

impl AuthBackend for StaticTokenBackend {
    fn required_fields(&self) -> &[&str] {
        &["token"]
    }

    fn authenticate(
        &self,
        context: &RequestContext,
        credentials: &Credentials,
    ) -> Result<AuthOutcome> {
        let Some(token) = credentials.get_str("token") else {
            return Ok(AuthOutcome::NoMatch);
        };
        match self.tokens.get(token) {
            Some(user_id) => Ok(AuthOutcome::Authenticated(Principal {
                user_id: user_id.clone(),
                attrs: Attrs { ip: context.remote_addr.clone(), ..Attrs::default() },
                ..Principal::default()
            })),
            None => Ok(AuthOutcome::NoMatch),
        }
    }
}
