//! The pluggable authenticator contract. A backend declares which credential
//! fields it understands and reports one of three outcomes: a principal, a
//! non-match, or an authoritative denial.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::{Principal, RequestContext};

use super::events::{is_sensitive_field, CLEANSED_SUBSTITUTE};

/// Named credential values (a username/password pair, a token string, ...),
/// passed to backends without inspection by the dispatcher. Values are
/// opaque JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Credentials(BTreeMap<String, Value>);

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy with every sensitive field value masked. Field names matching
    /// the sensitive pattern (api/token/key/secret/password/signature,
    /// case-insensitive) are replaced with the cleansed substitute before
    /// the credentials leave the dispatcher in a notification.
    pub fn redacted(&self) -> Credentials {
        Credentials(
            self.0
                .iter()
                .map(|(field, value)| {
                    if is_sensitive_field(field) {
                        (field.clone(), Value::from(CLEANSED_SUBSTITUTE))
                    } else {
                        (field.clone(), value.clone())
                    }
                })
                .collect(),
        )
    }
}

/// Result of one backend attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// The backend verified the credentials and produced a principal.
    Authenticated(Principal),
    /// The backend could not verify these credentials; the dispatcher moves
    /// on to the next backend.
    NoMatch,
    /// Authoritative rejection. The dispatcher stops immediately; no later
    /// backend gets a chance to override it.
    Denied { reason: String },
}

/// A pluggable authenticator. Implementations are identified by a path
/// string in the settings and resolved through the backend registry.
pub trait AuthBackend: Send + Sync {
    /// Credential fields this backend cannot work without.
    fn required_fields(&self) -> &[&str];

    /// Additional fields this backend understands but does not require.
    fn optional_fields(&self) -> &[&str] {
        &[]
    }

    /// Whether these credentials bind to this backend's declared fields:
    /// every required field present, no field outside required ∪ optional.
    /// A non-binding credential set is skipped, not failed.
    fn accepts(&self, credentials: &Credentials) -> bool {
        let required = self.required_fields();
        let optional = self.optional_fields();
        required.iter().all(|field| credentials.contains(field))
            && credentials
                .fields()
                .all(|field| required.contains(&field) || optional.contains(&field))
    }

    /// Attempt to produce a principal from the request context and the
    /// supplied credentials. Unexpected failures (store offline, ...) are
    /// returned as errors and propagate unmodified through the dispatcher.
    fn authenticate(
        &self,
        context: &RequestContext,
        credentials: &Credentials,
    ) -> Result<AuthOutcome>;
}
