use http::Method;
use std::fmt;
use std::sync::Arc;

use super::HandlerFn;
use crate::binding::{FieldBindingSpec, TypeShape};
use crate::context::Context;

/// Request-side type metadata of a handler.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub type_name: &'static str,
    /// Binding table shared with the compiled handler.
    pub specs: Arc<[FieldBindingSpec]>,
}

/// Response-side type metadata of a handler.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    pub type_name: &'static str,
    pub shape: TypeShape,
}

/// Frozen record of one registered handler: its verb, the compiled
/// request-handling unit and the type metadata the schema generator reads.
#[derive(Clone)]
pub struct HandlerDescriptor {
    pub(crate) verb: Method,
    pub(crate) handler: HandlerFn,
    pub(crate) display_name: String,
    pub(crate) summary: Option<String>,
    pub(crate) decorator_count: usize,
    pub(crate) has_init: bool,
    pub(crate) request: RequestDescriptor,
    pub(crate) response: ResponseDescriptor,
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("verb", &self.verb)
            .field("display_name", &self.display_name)
            .field("decorators", &self.decorator_count)
            .field("request", &self.request.type_name)
            .field("response", &self.response.type_name)
            .finish_non_exhaustive()
    }
}

impl HandlerDescriptor {
    #[must_use]
    pub fn verb(&self) -> &Method {
        &self.verb
    }

    #[must_use]
    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Number of decorators wrapped around the raw execute unit.
    #[must_use]
    pub fn decorator_count(&self) -> usize {
        self.decorator_count
    }

    #[must_use]
    pub fn has_init(&self) -> bool {
        self.has_init
    }

    #[must_use]
    pub fn request(&self) -> &RequestDescriptor {
        &self.request
    }

    #[must_use]
    pub fn response(&self) -> &ResponseDescriptor {
        &self.response
    }

    /// Run the compiled handler against `ctx`.
    pub fn call(&self, ctx: &Context) {
        (self.handler)(ctx);
    }
}
