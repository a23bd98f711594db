//! # Hook Pipeline
//!
//! Two ordered chains that post-process what an endpoint's `execute`
//! produced before it reaches the client:
//!
//! - the **error chain** sees every [`ApiError`],
//! - the **success chain** sees every serialised response body.
//!
//! Hooks are appended while the registry is open and iterated in *reverse*
//! registration order, so the most recently registered hook runs first. A
//! hook returns [`ControlFlow::Continue`] with the (possibly replaced) value
//! to pass it on, or [`ControlFlow::Break`] to stop the chain; a hook that
//! breaks is responsible for writing the response itself.
//!
//! When a chain runs to completion the terminal writer answers with
//! `{"code", "message"}` and the error's status, or `200` with the body.
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use izroute::hooks::HookPipeline;
//!
//! let mut hooks = HookPipeline::new();
//! hooks.register_success_hook(|_ctx, mut body| {
//!     body["served_by"] = "izroute".into();
//!     ControlFlow::Continue(body)
//! });
//! assert_eq!(hooks.success_hook_count(), 1);
//! ```

use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::ops::ControlFlow;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::context::{Context, HandlerResponse};
use crate::error::ApiError;

/// Error chain entry.
pub type ErrorHook = Arc<dyn Fn(&Context, ApiError) -> ControlFlow<(), ApiError> + Send + Sync>;

/// Success chain entry.
pub type SuccessHook = Arc<dyn Fn(&Context, Value) -> ControlFlow<(), Value> + Send + Sync>;

/// The error and success chains of one registry.
#[derive(Clone, Default)]
pub struct HookPipeline {
    error_hooks: Vec<ErrorHook>,
    success_hooks: Vec<SuccessHook>,
}

impl fmt::Debug for HookPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookPipeline")
            .field("error_hooks", &self.error_hooks.len())
            .field("success_hooks", &self.success_hooks.len())
            .finish()
    }
}

impl HookPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_error_hook<F>(&mut self, hook: F)
    where
        F: Fn(&Context, ApiError) -> ControlFlow<(), ApiError> + Send + Sync + 'static,
    {
        self.error_hooks.push(Arc::new(hook));
    }

    pub fn register_success_hook<F>(&mut self, hook: F)
    where
        F: Fn(&Context, Value) -> ControlFlow<(), Value> + Send + Sync + 'static,
    {
        self.success_hooks.push(Arc::new(hook));
    }

    #[must_use]
    pub fn error_hook_count(&self) -> usize {
        self.error_hooks.len()
    }

    #[must_use]
    pub fn success_hook_count(&self) -> usize {
        self.success_hooks.len()
    }

    /// Run the error chain, then write the surviving error unless a hook
    /// stopped the chain.
    pub fn on_error(&self, ctx: &Context, err: ApiError) {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let mut err = err;
            for hook in self.error_hooks.iter().rev() {
                match hook(ctx, err) {
                    ControlFlow::Continue(next) => err = next,
                    ControlFlow::Break(()) => return None,
                }
            }
            Some(err)
        }));

        match outcome {
            Ok(Some(err)) => {
                debug!(
                    request_id = %ctx.request_id(),
                    code = err.code,
                    status = err.status,
                    "Writing error response"
                );
                ctx.json(err.status, err.body());
            }
            Ok(None) => {
                debug!(request_id = %ctx.request_id(), "Error chain stopped by hook");
            }
            Err(panic) => hook_panicked(ctx, "error", &*panic),
        }
    }

    /// Run the success chain, then write the surviving body with `200`
    /// unless a hook stopped the chain.
    pub fn on_success(&self, ctx: &Context, body: Value) {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let mut body = body;
            for hook in self.success_hooks.iter().rev() {
                match hook(ctx, body) {
                    ControlFlow::Continue(next) => body = next,
                    ControlFlow::Break(()) => return None,
                }
            }
            Some(body)
        }));

        match outcome {
            Ok(Some(body)) => ctx.json(200, body),
            Ok(None) => {
                debug!(request_id = %ctx.request_id(), "Success chain stopped by hook");
            }
            Err(panic) => hook_panicked(ctx, "success", &*panic),
        }
    }
}

fn hook_panicked(ctx: &Context, chain: &str, panic: &(dyn Any + Send)) {
    error!(
        request_id = %ctx.request_id(),
        chain = chain,
        panic_message = %panic_message(panic),
        "Hook panicked"
    );
    ctx.respond(HandlerResponse::error(500, "Internal Server Error"));
}

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Error hook that records every error with `tracing` and passes it on.
#[must_use]
pub fn logging_error_hook() -> impl Fn(&Context, ApiError) -> ControlFlow<(), ApiError> + Send + Sync + 'static
{
    |ctx: &Context, err: ApiError| {
        warn!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            code = err.code,
            status = err.status,
            message = %err.message,
            "Request failed"
        );
        ControlFlow::Continue(err)
    }
}
