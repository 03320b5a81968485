//! Resolution of a configured `namespace.TypeName` reference to a concrete
//! identity type. The registry is an explicit map populated at process
//! start; lookups are performed per call, never cached here.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::settings::Settings;

use super::principal::Principal;

/// A registered identity type: its namespaced name plus a factory that
/// materializes a [`Principal`] of that type from a user id.
#[derive(Clone)]
pub struct IdentityDescriptor {
    namespace: String,
    name: String,
    factory: Arc<dyn Fn(&str) -> Principal + Send + Sync>,
}

impl IdentityDescriptor {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        factory: impl Fn(&str) -> Principal + Send + Sync + 'static,
    ) -> Self {
        Self { namespace: namespace.into(), name: name.into(), factory: Arc::new(factory) }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `namespace.TypeName` form this descriptor registers under.
    pub fn reference(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn instantiate(&self, user_id: &str) -> Principal {
        (self.factory)(user_id)
    }
}

impl fmt::Debug for IdentityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityDescriptor")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Explicit map from namespaced references to identity descriptors.
/// Namespaces match exactly; type names match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    types: HashMap<(String, String), IdentityDescriptor>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: IdentityDescriptor) {
        let key = (descriptor.namespace.clone(), descriptor.name.to_lowercase());
        self.types.insert(key, descriptor);
    }

    /// Resolve a `namespace.TypeName` reference. A reference that does not
    /// split into exactly two dot-separated parts is malformed; a reference
    /// that parses but matches nothing is not-registered.
    pub fn resolve(&self, reference: &str) -> Result<&IdentityDescriptor, ConfigError> {
        let mut parts = reference.split('.');
        let (namespace, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(name), None) => (namespace, name),
            _ => return Err(ConfigError::MalformedIdentityRef(reference.to_string())),
        };
        self.types
            .get(&(namespace.to_string(), name.to_lowercase()))
            .ok_or_else(|| ConfigError::IdentityNotRegistered(reference.to_string()))
    }
}

/// Resolve the identity type named by `settings.identity_type`.
pub fn get_identity_type<'a>(
    settings: &Settings,
    registry: &'a IdentityRegistry,
) -> Result<&'a IdentityDescriptor, ConfigError> {
    registry.resolve(&settings.identity_type)
}
