use tracing::{info, info_span};

use crate::handler::{decorator, handler_fn, Decorator};

/// Decorator that runs the wrapped unit inside a `request` span and logs
/// the outcome.
///
/// This is a decorator rather than a [`Middleware`](super::Middleware)
/// because the span has to stay entered across the inner call.
#[must_use]
pub fn tracing_decorator(handler_name: impl Into<String>) -> Decorator {
    let handler_name: String = handler_name.into();
    decorator(move |next| {
        let handler_name = handler_name.clone();
        handler_fn(move |ctx| {
            let span = info_span!(
                "request",
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                handler = %handler_name,
                status = tracing::field::Empty,
            );
            span.in_scope(|| {
                let start = std::time::Instant::now();
                next(ctx);
                let status = ctx.response().map_or(0, |r| r.status);
                span.record("status", status);
                info!(
                    status = status,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Request handled"
                );
            });
        })
    })
}
