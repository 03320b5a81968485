//! Identity types shared across the authentication surface: the principal
//! record, the opaque per-request context, and the registry that resolves a
//! configured `namespace.TypeName` reference to a concrete identity type.

mod principal;
mod registry;
mod request_context;

pub use principal::{Attrs, Principal};
pub use registry::{get_identity_type, IdentityDescriptor, IdentityRegistry};
pub use request_context::RequestContext;
