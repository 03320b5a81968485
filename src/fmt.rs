//! Deferred string formatting: a `Display` value that runs its closure only
//! when actually rendered. There is no caching — every render re-evaluates.

use std::fmt::{self, Display, Formatter};

/// A string-like value whose interpolation is deferred until it is forced
/// (rendered, concatenated, logged). Build one with [`format_lazy`] or the
/// [`lazy_format!`](crate::lazy_format) macro.
pub struct LazyFormat<F> {
    render: F,
}

/// Wrap a render closure into a deferred [`Display`] value.
pub fn format_lazy<F>(render: F) -> LazyFormat<F>
where
    F: Fn(&mut Formatter<'_>) -> fmt::Result,
{
    LazyFormat { render }
}

impl<F> Display for LazyFormat<F>
where
    F: Fn(&mut Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        (self.render)(f)
    }
}

impl<F> fmt::Debug for LazyFormat<F>
where
    F: Fn(&mut Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        (self.render)(f)
    }
}

/// `format!`-style sugar over [`format_lazy`]. The arguments are captured by
/// move and interpolated on every render.
#[macro_export]
macro_rules! lazy_format {
    ($($arg:tt)*) => {
        $crate::fmt::format_lazy(move |f| write!(f, $($arg)*))
    };
}
