use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::error;

use super::inspect::{resolve_verb, run_init, CapabilitySet};
use crate::binding::TypeShape;
use crate::context::Context;
use crate::error::{ApiError, RegistrationError};
use crate::handler::{
    assemble, handler_fn, BuildOptions, Decorator, HandlerDescriptor, HandlerFn,
    RequestDescriptor, ResponseDescriptor,
};

type RawExecute = Arc<dyn Fn(&Context) -> Result<Value, ApiError> + Send + Sync>;
type RawInit = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// Capability record for a context-level endpoint built from closures.
///
/// Any capability may be missing, execute included; a missing execute is
/// reported when the record is built into a handler.
///
/// ```rust
/// use izroute::endpoint::RawEndpoint;
/// use serde_json::json;
///
/// let health = RawEndpoint::new("Health")
///     .execute(|_ctx| json!({"status": "ok"}))
///     .build()
///     .unwrap();
/// assert_eq!(health.verb().as_str(), "GET");
/// ```
#[derive(Default)]
pub struct RawEndpoint {
    name: Option<String>,
    summary: Option<String>,
    execute: Option<RawExecute>,
    init: Option<RawInit>,
    verb: Option<String>,
    decorators: Option<Vec<Decorator>>,
}

impl fmt::Debug for RawEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawEndpoint")
            .field("name", &self.name)
            .field("execute", &self.execute.is_some())
            .field("init", &self.init.is_some())
            .field("verb", &self.verb)
            .field("decorators", &self.decorators.as_ref().map(Vec::len))
            .finish()
    }
}

impl RawEndpoint {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Infallible execute capability.
    #[must_use]
    pub fn execute<F>(self, f: F) -> Self
    where
        F: Fn(&Context) -> Value + Send + Sync + 'static,
    {
        self.try_execute(move |ctx| Ok(f(ctx)))
    }

    /// Execute capability returning a response or an error.
    #[must_use]
    pub fn try_execute<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        self.execute = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn init<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.init = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = Some(verb.into());
        self
    }

    #[must_use]
    pub fn decorators(mut self, decorators: Vec<Decorator>) -> Self {
        self.decorators = Some(decorators);
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Inspect and compose with default options.
    ///
    /// # Errors
    ///
    /// See [`RawEndpoint::build_with`].
    pub fn build(self) -> Result<HandlerDescriptor, RegistrationError> {
        self.build_with(&BuildOptions::default())
    }

    /// Inspect the record and compose it into a handler.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::MissingExecute`] without an execute capability
    /// (checked before init runs), otherwise the init and verb failures of
    /// [`inspect`](super::inspect).
    pub fn build_with(self, options: &BuildOptions) -> Result<HandlerDescriptor, RegistrationError> {
        let name = options
            .display_name
            .clone()
            .or(self.name)
            .unwrap_or_else(|| "RawEndpoint".to_string());

        let Some(execute) = self.execute else {
            error!(handler_name = %name, "Handler has no execute capability");
            return Err(RegistrationError::missing_execute(name));
        };
        let has_init = run_init(&name, self.init.map(|init| init()))?;
        let verb = resolve_verb(&name, self.verb.as_deref())?;

        let caps = CapabilitySet {
            declared_verb: self.verb.is_some(),
            summary: self.summary,
            decorators: self.decorators,
            has_init,
            verb,
            name,
        };
        let request = RequestDescriptor {
            type_name: "Context",
            specs: Arc::from(Vec::new()),
        };
        let response = ResponseDescriptor {
            type_name: "Value",
            shape: TypeShape::Any,
        };
        Ok(assemble(caps, raw_unit(execute), request, response))
    }
}

fn raw_unit(execute: RawExecute) -> HandlerFn {
    handler_fn(move |ctx| {
        let pipeline = ctx.pipeline();
        match execute(ctx) {
            Ok(body) => pipeline.on_success(ctx, body),
            Err(err) => pipeline.on_error(ctx, err),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_missing_execute_fails_before_init() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let result = RawEndpoint::new("Broken")
            .init(move || {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .build();
        assert!(matches!(result, Err(RegistrationError::MissingExecute { ref name }) if name == "Broken"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_defaults() {
        let desc = RawEndpoint::new("Ping")
            .execute(|_| json!("pong"))
            .build()
            .unwrap();
        assert_eq!(desc.verb(), &Method::GET);
        assert_eq!(desc.decorator_count(), 0);
        assert!(!desc.has_init());
        assert_eq!(desc.display_name(), "Ping");
    }

    #[test]
    fn test_try_execute_routes_errors() {
        let desc = RawEndpoint::new("Fail")
            .verb("post")
            .try_execute(|_| Err(ApiError::new(42, "nope")))
            .build()
            .unwrap();
        assert_eq!(desc.verb(), &Method::POST);
        let ctx = Context::builder(Method::POST, "/fail").build();
        desc.call(&ctx);
        let resp = ctx.take_response().unwrap();
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, json!({"code": 42, "message": "nope"}));
    }

    #[test]
    fn test_init_runs_once_at_build() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let desc = RawEndpoint::new("Warm")
            .init(move || {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .execute(|_| json!({}))
            .build()
            .unwrap();
        assert!(desc.has_init());
        let ctx = Context::builder(Method::GET, "/").build();
        desc.call(&ctx);
        desc.call(&ctx);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
