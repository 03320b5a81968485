//! Login-failure notification: the event payload, the observer contract and
//! a small bundled listener that retains recent failures in memory.

use std::collections::VecDeque;
use std::fmt::Display;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;

use crate::fmt::format_lazy;
use crate::identity::RequestContext;
use crate::time::Moment;

use super::backend::Credentials;

// Field names matching this never leave the dispatcher unmasked.
static SENSITIVE_FIELDS: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)api|token|key|secret|password|signature").unwrap());

/// Replacement value for masked credential fields.
pub const CLEANSED_SUBSTITUTE: &str = "********************";

/// Whether a credential field name counts as sensitive for redaction.
pub fn is_sensitive_field(name: &str) -> bool {
    SENSITIVE_FIELDS.is_match(name)
}

/// Emitted once per failed authentication pass (all backends exhausted, or
/// one of them denied). Credentials are already redacted.
#[derive(Debug, Clone)]
pub struct LoginFailed {
    pub credentials: Credentials,
    pub context: RequestContext,
    pub at: Moment,
}

impl LoginFailed {
    /// One-line description for logs, rendered lazily. Field names only —
    /// values never appear, masked or otherwise.
    pub fn summary(&self) -> impl Display + '_ {
        format_lazy(move |f| {
            f.write_str("login failed: fields [")?;
            for (i, name) in self.credentials.fields().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
            }
            f.write_str("]")?;
            if let Some(request_id) = &self.context.request_id {
                write!(f, " request_id={}", request_id)?;
            }
            if let Some(remote_addr) = &self.context.remote_addr {
                write!(f, " remote_addr={}", remote_addr)?;
            }
            Ok(())
        })
    }
}

/// Observer of login failures. Listeners are registered on the dispatcher
/// at construction time.
pub trait LoginListener: Send + Sync {
    fn on_login_failed(&self, event: &LoginFailed);
}

/// Bundled listener keeping the most recent failure events, oldest dropped
/// first. Handy for operational inspection of a misbehaving deployment.
pub struct LoginFailureLog {
    capacity: usize,
    events: RwLock<VecDeque<LoginFailed>>,
}

impl LoginFailureLog {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, events: RwLock::new(VecDeque::new()) }
    }

    /// Retained events, oldest first.
    pub fn recent(&self) -> Vec<LoginFailed> {
        self.events.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl LoginListener for LoginFailureLog {
    fn on_login_failed(&self, event: &LoginFailed) {
        let mut events = self.events.write();
        events.push_back(event.clone());
        while events.len() > self.capacity {
            events.pop_front();
        }
    }
}
