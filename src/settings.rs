//! Crate configuration. There is no ambient global: callers build a
//! `Settings` value (directly, via serde, or from the environment) and pass
//! it by reference into every function that needs it.

use serde::{Deserialize, Serialize};

/// Configuration consumed by the time normalizer, the identity resolver and
/// the backend dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// When set, every moment produced by this crate is timezone-aware UTC.
    pub use_tz: bool,
    /// Namespaced reference (`namespace.TypeName`) to the record type that
    /// represents an authenticated principal.
    pub identity_type: String,
    /// Ordered backend paths. Order is significant: the dispatcher tries
    /// them first to last and stops on the first success.
    pub backends: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_tz: true,
            identity_type: "auth.User".to_string(),
            backends: vec!["tokengate.MemoryBackend".to_string()],
        }
    }
}

impl Settings {
    /// Read settings from `TOKENGATE_USE_TZ`, `TOKENGATE_IDENTITY_TYPE` and
    /// `TOKENGATE_BACKENDS` (comma-separated), falling back to the defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let use_tz = std::env::var("TOKENGATE_USE_TZ")
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(defaults.use_tz);
        let identity_type =
            std::env::var("TOKENGATE_IDENTITY_TYPE").unwrap_or(defaults.identity_type);
        let backends = std::env::var("TOKENGATE_BACKENDS")
            .ok()
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.backends);
        Self { use_tz, identity_type, backends }
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
