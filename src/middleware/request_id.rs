use std::time::Duration;

use super::Middleware;
use crate::context::{Context, HandlerResponse};
use crate::ids::REQUEST_ID_HEADER;

/// Ambient key the request id is stored under.
pub const REQUEST_ID_KEY: &str = "request_id";

/// Publishes the request id to the ambient store, where request types can
/// bind it with `#[bind(from = "ctx", mapping = "request_id")]`, and echoes
/// it on the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdMiddleware;

impl Middleware for RequestIdMiddleware {
    fn before(&self, ctx: &Context) -> Option<HandlerResponse> {
        ctx.set(REQUEST_ID_KEY, ctx.request_id().to_string());
        None
    }

    fn after(&self, ctx: &Context, res: &mut HandlerResponse, _latency: Duration) {
        res.set_header(REQUEST_ID_HEADER, ctx.request_id().to_string());
    }
}
