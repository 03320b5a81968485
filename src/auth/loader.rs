//! Resolution of configured backend paths to live backend objects. The
//! registry is populated at process start; `load_backends` resolves the
//! ordered list from the settings at call time.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::settings::Settings;

use super::backend::AuthBackend;

/// Explicit map from backend path strings to live authenticator objects.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn AuthBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: impl Into<String>, backend: Arc<dyn AuthBackend>) {
        self.backends.insert(path.into(), backend);
    }

    pub fn get(&self, path: &str) -> Option<Arc<dyn AuthBackend>> {
        self.backends.get(path).cloned()
    }
}

/// Resolve every configured backend path, preserving the configured order.
/// An empty list is a configuration error: at least one backend is
/// mandatory. So is a path with no registration.
pub fn load_backends(
    settings: &Settings,
    registry: &BackendRegistry,
) -> Result<Vec<(String, Arc<dyn AuthBackend>)>, ConfigError> {
    if settings.backends.is_empty() {
        return Err(ConfigError::NoBackends);
    }
    let mut resolved = Vec::with_capacity(settings.backends.len());
    for path in &settings.backends {
        let backend =
            registry.get(path).ok_or_else(|| ConfigError::UnknownBackend(path.clone()))?;
        resolved.push((path.clone(), backend));
    }
    Ok(resolved)
}
