use http::Method;
use serde_json::{json, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::{DocsConfig, ServiceConfig};
use crate::context::{Context, HandlerResponse};
use crate::error::RegistrationError;
use crate::hooks::{panic_message, HookPipeline};
use crate::registry::FrozenRegistry;
use crate::router::Router;
use crate::schema::{render_docs_page, SchemaDocument, SchemaError, SchemaGenerator};

/// Documentation endpoints, prepared once at startup.
#[derive(Debug)]
struct DocsEndpoints {
    json_path: String,
    docs_path: String,
    document: Value,
    page: String,
}

impl DocsEndpoints {
    fn new(config: &DocsConfig, doc: &SchemaDocument) -> Result<Self, SchemaError> {
        Ok(Self {
            json_path: config.json_path.clone(),
            docs_path: config.docs_path.clone(),
            document: serde_json::to_value(doc)?,
            page: render_docs_page(&config.json_path, &config.title, config.icon.as_deref())?,
        })
    }
}

/// Request dispatch surface handed to a transport.
///
/// A transport adapter turns each incoming request into a [`Context`],
/// calls [`AppService::call`] and writes the returned [`HandlerResponse`].
/// The service answers the schema document and viewer page itself and
/// routes everything else to the registered handlers.
#[derive(Debug, Clone)]
pub struct AppService {
    router: Arc<Router>,
    hooks: Arc<HookPipeline>,
    schema: Arc<SchemaDocument>,
    docs: Option<Arc<DocsEndpoints>>,
}

impl AppService {
    /// Compile the routing table and generate the schema document.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::Route`] for an invalid path pattern and
    /// [`RegistrationError::Schema`] when a handler uses a type the schema
    /// cannot express.
    pub fn new(registry: FrozenRegistry, config: &ServiceConfig) -> Result<Self, RegistrationError> {
        let router = Router::new(&registry)?;
        let schema = SchemaGenerator::generate(config.docs.info(), &registry)
            .inspect_err(|e| error!(error = %e, "Schema generation failed"))?;

        let docs = if config.docs.enabled {
            Some(Arc::new(DocsEndpoints::new(&config.docs, &schema)?))
        } else {
            None
        };

        info!(
            routes = router.len(),
            docs_enabled = docs.is_some(),
            json_path = %config.docs.json_path,
            docs_path = %config.docs.docs_path,
            "Service ready"
        );

        Ok(Self {
            router: Arc::new(router),
            hooks: registry.hooks(),
            schema: Arc::new(schema),
            docs,
        })
    }

    /// The generated schema document.
    #[must_use]
    pub fn schema(&self) -> &SchemaDocument {
        &self.schema
    }

    /// Handle one request.
    #[must_use]
    pub fn call(&self, ctx: &Context) -> HandlerResponse {
        let start = Instant::now();
        let method = ctx.method().clone();
        let path = ctx.path().to_string();

        if let Some(response) = self.docs_response(&method, &path) {
            return response;
        }

        let Some(route) = self.router.route(&method, &path) else {
            debug!(method = %method, path = %path, "No handler for request");
            return HandlerResponse::json(
                404,
                json!({ "error": "Not Found", "method": method.as_str(), "path": path }),
            );
        };

        ctx.set_path_params(route.path_params.clone());
        ctx.attach_pipeline(Arc::clone(&self.hooks));

        let handler_name = route.descriptor.display_name();
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| route.descriptor.call(ctx))) {
            error!(
                request_id = %ctx.request_id(),
                handler_name = %handler_name,
                panic_message = %panic_message(&*panic),
                "Handler panicked"
            );
            return HandlerResponse::error(500, "Internal Server Error");
        }

        let response = ctx.take_response().unwrap_or_else(|| {
            error!(
                request_id = %ctx.request_id(),
                handler_name = %handler_name,
                "Handler produced no response"
            );
            HandlerResponse::error(500, "handler produced no response")
        });

        debug!(
            request_id = %ctx.request_id(),
            method = %method,
            path = %path,
            route_pattern = %route.pattern,
            handler_name = %handler_name,
            status = response.status,
            latency_ms = start.elapsed().as_millis() as u64,
            "Request handled"
        );
        response
    }

    fn docs_response(&self, method: &Method, path: &str) -> Option<HandlerResponse> {
        let docs = self.docs.as_ref()?;
        if method != Method::GET {
            return None;
        }
        if path == docs.json_path {
            Some(HandlerResponse::json(200, docs.document.clone()))
        } else if path == docs.docs_path {
            Some(HandlerResponse::html(200, docs.page.clone()))
        } else {
            None
        }
    }
}
