//! # Route Registry
//!
//! Path → [`HandlerDescriptor`] mapping plus the hook chains, with an
//! explicit two-phase lifecycle:
//!
//! 1. **Open** ([`RouteRegistry`]): routes and hooks are registered. Each
//!    path holds one descriptor; registering a path again replaces the
//!    earlier descriptor (logged as a warning).
//! 2. **Frozen** ([`FrozenRegistry`]): produced by
//!    [`RouteRegistry::freeze`]. Read-only and cheap to clone; this is what
//!    the router, the schema generator and the service consume.
//!
//! The process-wide variant lives in [`global`].
//!
//! ```rust
//! use izroute::endpoint::RawEndpoint;
//! use izroute::registry::RouteRegistry;
//! use serde_json::json;
//!
//! let mut registry = RouteRegistry::new();
//! registry
//!     .register_raw("/health", RawEndpoint::new("Health").execute(|_| json!({"ok": true})))
//!     .unwrap();
//! let frozen = registry.freeze();
//! assert!(frozen.get("/health").is_some());
//! ```

pub mod global;

use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::binding::BindingPolicy;
use crate::config::ServiceConfig;
use crate::context::Context;
use crate::endpoint::{Endpoint, RawEndpoint};
use crate::error::{ApiError, RegistrationError};
use crate::handler::{build_handler_with, BuildOptions, HandlerDescriptor};
use crate::hooks::HookPipeline;

type RouteMap = BTreeMap<String, Arc<HandlerDescriptor>>;

/// Registry in its open, setup phase.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: RouteMap,
    hooks: HookPipeline,
    policy: BindingPolicy,
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose typed endpoints bind with `policy`.
    #[must_use]
    pub fn with_policy(policy: BindingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::with_policy(config.binding)
    }

    #[must_use]
    pub fn policy(&self) -> BindingPolicy {
        self.policy
    }

    /// Applies to endpoints registered after the call.
    pub fn set_policy(&mut self, policy: BindingPolicy) {
        self.policy = policy;
    }

    /// Store a descriptor under `path`, returning the one it replaced.
    pub fn register_route(
        &mut self,
        path: impl Into<String>,
        descriptor: HandlerDescriptor,
    ) -> Option<Arc<HandlerDescriptor>> {
        let path = path.into();
        let handler_name = descriptor.display_name().to_string();
        let verb = descriptor.verb().clone();

        let replaced = self.routes.insert(path.clone(), Arc::new(descriptor));
        if let Some(old) = &replaced {
            warn!(
                path = %path,
                handler_name = %handler_name,
                replaced_handler = %old.display_name(),
                "Replaced existing route"
            );
        }
        info!(
            path = %path,
            verb = %verb,
            handler_name = %handler_name,
            total_routes = self.routes.len(),
            "Route registered"
        );
        replaced
    }

    /// Inspect, compose and register a typed endpoint.
    ///
    /// # Errors
    ///
    /// Any [`RegistrationError`] from inspection; the route is not added.
    pub fn register<E: Endpoint>(
        &mut self,
        path: impl Into<String>,
        endpoint: E,
    ) -> Result<(), RegistrationError> {
        let path = path.into();
        let descriptor = build_handler_with(endpoint, &BuildOptions::with_policy(self.policy))
            .inspect_err(|e| log_failure(&path, e))?;
        self.register_route(path, descriptor);
        Ok(())
    }

    /// Inspect, compose and register a closure-built endpoint.
    ///
    /// # Errors
    ///
    /// Any [`RegistrationError`] from inspection; the route is not added.
    pub fn register_raw(
        &mut self,
        path: impl Into<String>,
        endpoint: RawEndpoint,
    ) -> Result<(), RegistrationError> {
        let path = path.into();
        let descriptor = endpoint
            .build_with(&BuildOptions::with_policy(self.policy))
            .inspect_err(|e| log_failure(&path, e))?;
        self.register_route(path, descriptor);
        Ok(())
    }

    pub fn register_error_hook<F>(&mut self, hook: F)
    where
        F: Fn(&Context, ApiError) -> ControlFlow<(), ApiError> + Send + Sync + 'static,
    {
        self.hooks.register_error_hook(hook);
    }

    pub fn register_success_hook<F>(&mut self, hook: F)
    where
        F: Fn(&Context, Value) -> ControlFlow<(), Value> + Send + Sync + 'static,
    {
        self.hooks.register_success_hook(hook);
    }

    #[must_use]
    pub fn hooks(&self) -> &HookPipeline {
        &self.hooks
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Arc<HandlerDescriptor>> {
        self.routes.get(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// End the setup phase.
    #[must_use]
    pub fn freeze(self) -> FrozenRegistry {
        info!(
            total_routes = self.routes.len(),
            error_hooks = self.hooks.error_hook_count(),
            success_hooks = self.hooks.success_hook_count(),
            "Route registry frozen"
        );
        FrozenRegistry {
            routes: Arc::new(self.routes),
            hooks: Arc::new(self.hooks),
        }
    }
}

fn log_failure(path: &str, err: &RegistrationError) {
    error!(path = %path, error = %err, "Route registration failed");
}

/// Read-only registry snapshot shared by everything that serves requests.
#[derive(Debug, Clone)]
pub struct FrozenRegistry {
    routes: Arc<RouteMap>,
    hooks: Arc<HookPipeline>,
}

impl FrozenRegistry {
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Arc<HandlerDescriptor>> {
        self.routes.get(path)
    }

    /// Routes in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<HandlerDescriptor>)> {
        self.routes.iter().map(|(path, desc)| (path.as_str(), desc))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Hook chains to attach to each request context.
    #[must_use]
    pub fn hooks(&self) -> Arc<HookPipeline> {
        Arc::clone(&self.hooks)
    }
}
