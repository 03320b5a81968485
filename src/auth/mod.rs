//!
//! Credential authentication dispatch
//! ----------------------------------
//! A single synchronous pass over an ordered list of pluggable backends:
//! skip backends the credential fields don't bind to, stop on the first
//! principal or on an authoritative denial, and notify listeners exactly
//! once when the pass ends without a principal.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::identity::{Principal, RequestContext};
use crate::settings::Settings;
use crate::time;

mod backend;
mod events;
mod loader;
mod memory;

pub use backend::{AuthBackend, AuthOutcome, Credentials};
pub use events::{is_sensitive_field, LoginFailed, LoginFailureLog, LoginListener, CLEANSED_SUBSTITUTE};
pub use loader::{load_backends, BackendRegistry};
pub use memory::{MemoryBackend, StaticTokenBackend};

/// Tries configured backends in order against supplied credentials and owns
/// the observer list for login failures.
pub struct Dispatcher {
    settings: Settings,
    backends: Vec<(String, Arc<dyn AuthBackend>)>,
    listeners: Vec<Arc<dyn LoginListener>>,
}

impl Dispatcher {
    /// Build from already-resolved `(path, backend)` pairs, kept in order.
    pub fn new(settings: Settings, backends: Vec<(String, Arc<dyn AuthBackend>)>) -> Self {
        Self { settings, backends, listeners: Vec::new() }
    }

    /// Resolve the settings' backend list through the registry and build a
    /// dispatcher over it. Fails on an empty list or an unknown path.
    pub fn from_settings(
        settings: &Settings,
        registry: &BackendRegistry,
    ) -> Result<Self, ConfigError> {
        let backends = load_backends(settings, registry)?;
        Ok(Self::new(settings.clone(), backends))
    }

    /// Register a login-failure observer. Listeners are meant to be attached
    /// at construction time, before the dispatcher is shared.
    pub fn add_listener(&mut self, listener: Arc<dyn LoginListener>) {
        self.listeners.push(listener);
    }

    /// Configured backend paths in dispatch order.
    pub fn backend_paths(&self) -> impl Iterator<Item = &str> {
        self.backends.iter().map(|(path, _)| path.as_str())
    }

    /// Try each backend in configured order. First principal wins and is
    /// annotated with the winning backend's path; an authoritative denial
    /// stops the pass immediately. `Ok(None)` — no backend matched or one
    /// denied — is a normal outcome, not an error, and is preceded by
    /// exactly one login-failed notification. Backend-internal errors
    /// propagate unmodified and skip the notification.
    pub fn authenticate(
        &self,
        context: &RequestContext,
        credentials: &Credentials,
    ) -> Result<Option<Principal>> {
        for (path, backend) in &self.backends {
            if !backend.accepts(credentials) {
                debug!(target: "auth", "skip backend={}: credential fields do not bind", path);
                continue;
            }
            match backend.authenticate(context, credentials)? {
                AuthOutcome::Authenticated(mut principal) => {
                    principal.backend = Some(path.clone());
                    debug!(target: "auth", "authenticated user={} backend={}", principal.user_id, path);
                    return Ok(Some(principal));
                }
                AuthOutcome::NoMatch => {
                    debug!(target: "auth", "no match backend={}", path);
                }
                AuthOutcome::Denied { reason } => {
                    // Authoritative: no later backend may override it.
                    info!(target: "auth", "denied backend={} reason={}", path, reason);
                    break;
                }
            }
        }
        self.notify_login_failed(context, credentials);
        Ok(None)
    }

    fn notify_login_failed(&self, context: &RequestContext, credentials: &Credentials) {
        let event = LoginFailed {
            credentials: credentials.redacted(),
            context: context.clone(),
            at: time::aware_utcnow(&self.settings),
        };
        info!(target: "auth", "{}", event.summary());
        for listener in &self.listeners {
            listener.on_login_failed(&event);
        }
    }
}
