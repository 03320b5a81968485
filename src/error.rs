//! Error kinds surfaced by this crate.
//! `ConfigError` marks deployment/setup mistakes and is never recovered
//! locally; backend-internal failures travel as `anyhow::Error` instead.

use thiserror::Error;

/// A configuration problem detected at call time. Each variant carries its
/// own message, but callers should treat the whole kind as fatal setup error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured identity-type reference does not split into exactly
    /// `namespace.TypeName`.
    #[error("identity type reference '{0}' must be of the form 'namespace.TypeName'")]
    MalformedIdentityRef(String),

    /// The reference parsed, but no matching type is registered.
    #[error("identity type reference '{0}' refers to a type that has not been registered")]
    IdentityNotRegistered(String),

    /// The ordered backend list in the settings is empty.
    #[error("no authentication backends are configured; at least one is required")]
    NoBackends,

    /// A configured backend path has no registration.
    #[error("authentication backend '{0}' is not registered")]
    UnknownBackend(String),
}

/// Malformed time input. The only way to hand this crate a bad instant is an
/// epoch value outside the representable calendar range.
#[derive(Debug, Error)]
pub enum TimeError {
    #[error("epoch timestamp {0} is outside the representable datetime range")]
    EpochOutOfRange(i64),
}
