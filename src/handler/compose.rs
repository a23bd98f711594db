use std::sync::Arc;

use crate::context::Context;

/// A composed request-handling unit.
pub type HandlerFn = Arc<dyn Fn(&Context) + Send + Sync>;

/// Transformation from one request-handling unit to another.
pub type Decorator = Arc<dyn Fn(HandlerFn) -> HandlerFn + Send + Sync>;

/// Wrap a closure as a [`HandlerFn`].
pub fn handler_fn<F>(f: F) -> HandlerFn
where
    F: Fn(&Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`Decorator`].
///
/// ```rust
/// use izroute::handler::{decorator, handler_fn};
///
/// let stamp = decorator(|next| {
///     handler_fn(move |ctx| {
///         ctx.set("stamped", true);
///         next(ctx);
///     })
/// });
/// # let _ = stamp;
/// ```
pub fn decorator<F>(f: F) -> Decorator
where
    F: Fn(HandlerFn) -> HandlerFn + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap `raw` in `decorators`, first-declared outermost.
///
/// For `[A, B, C]` the result is `A(B(C(raw)))`: at dispatch `A` is entered
/// first and left last. No decorators yields `raw` unchanged.
#[must_use]
pub fn compose(raw: HandlerFn, decorators: &[Decorator]) -> HandlerFn {
    decorators
        .iter()
        .rev()
        .fold(raw, |inner, decorate| decorate(inner))
}
