//! Utility core for a token-based authentication add-on: timezone-safe
//! datetime conversion, lazy string formatting, identity-type resolution and
//! ordered dispatch over pluggable credential backends.

pub mod auth;
pub mod error;
pub mod fmt;
pub mod identity;
pub mod settings;
pub mod time;
