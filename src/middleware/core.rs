use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::{Context, HandlerResponse};
use crate::handler::{decorator, handler_fn, Decorator};

/// Before/after hooks around a handler.
///
/// `before` may short-circuit by returning a response, in which case the
/// wrapped handler never runs and `after` is skipped. `after` sees the
/// response the inner chain wrote, if any, and the elapsed time.
pub trait Middleware: Send + Sync {
    fn before(&self, _ctx: &Context) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _ctx: &Context, _res: &mut HandlerResponse, _latency: Duration) {}
}

/// Adapt a middleware into a [`Decorator`].
pub fn into_decorator<M>(middleware: M) -> Decorator
where
    M: Middleware + 'static,
{
    from_shared(Arc::new(middleware))
}

/// Adapt a shared middleware, keeping a handle for inspection (counters and
/// the like).
pub fn from_shared<M>(middleware: Arc<M>) -> Decorator
where
    M: Middleware + 'static,
{
    decorator(move |next| {
        let middleware = Arc::clone(&middleware);
        handler_fn(move |ctx| {
            if let Some(early) = middleware.before(ctx) {
                ctx.respond(early);
                return;
            }
            let start = Instant::now();
            next(ctx);
            let latency = start.elapsed();
            if let Some(mut res) = ctx.take_response() {
                middleware.after(ctx, &mut res, latency);
                ctx.respond(res);
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::compose;
    use http::Method;
    use serde_json::json;

    struct Gate;

    impl Middleware for Gate {
        fn before(&self, ctx: &Context) -> Option<HandlerResponse> {
            ctx.header("x-open").is_none().then(|| HandlerResponse::error(403, "closed"))
        }

        fn after(&self, _ctx: &Context, res: &mut HandlerResponse, _latency: Duration) {
            res.set_header("x-gate", "passed".to_string());
        }
    }

    fn inner() -> crate::handler::HandlerFn {
        handler_fn(|ctx| ctx.json(200, json!({"ok": true})))
    }

    #[test]
    fn test_before_short_circuits() {
        let handler = compose(inner(), &[into_decorator(Gate)]);
        let ctx = Context::builder(Method::GET, "/").build();
        handler(&ctx);
        let res = ctx.take_response().unwrap();
        assert_eq!(res.status, 403);
        assert_eq!(res.get_header("x-gate"), None);
    }

    #[test]
    fn test_after_sees_inner_response() {
        let handler = compose(inner(), &[into_decorator(Gate)]);
        let ctx = Context::builder(Method::GET, "/").header("x-open", "1").build();
        handler(&ctx);
        let res = ctx.take_response().unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.get_header("x-gate"), Some("passed"));
    }
}
