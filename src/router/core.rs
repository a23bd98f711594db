use http::Method;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

use crate::context::ParamVec;
use crate::error::RegistrationError;
use crate::handler::HandlerDescriptor;
use crate::registry::FrozenRegistry;

/// Result of matching a request to a registered route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Path pattern the route was registered under (e.g. `/pets/{id}`).
    pub pattern: Arc<str>,
    pub descriptor: Arc<HandlerDescriptor>,
    /// Values captured for the pattern's parameters, in pattern order.
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Path parameter by name. Later occurrences win.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct CompiledRoute {
    pattern: Arc<str>,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    descriptor: Arc<HandlerDescriptor>,
}

/// Matches request paths against the patterns of a frozen registry.
///
/// Patterns use `{name}` or `:name` segments. Routes without parameters are
/// tried before parameterised ones, so `/pets/new` wins over `/pets/{id}`.
#[derive(Clone)]
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let patterns: Vec<&str> = self.routes.iter().map(|r| r.pattern.as_ref()).collect();
        f.debug_struct("Router").field("routes", &patterns).finish()
    }
}

impl Router {
    /// Compile every route of `registry`.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::Route`] for a pattern that does not compile.
    pub fn new(registry: &FrozenRegistry) -> Result<Self, RegistrationError> {
        let mut routes = registry
            .iter()
            .map(|(pattern, descriptor)| -> Result<CompiledRoute, RegistrationError> {
                let (regex, param_names) =
                    Self::path_to_regex(pattern).map_err(|source| RegistrationError::Route {
                        path: pattern.to_string(),
                        source,
                    })?;
                Ok(CompiledRoute {
                    pattern: Arc::from(pattern),
                    regex,
                    param_names,
                    descriptor: Arc::clone(descriptor),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        routes.sort_by_key(|r| r.param_names.len());

        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| format!("{} {}", r.descriptor.verb(), r.pattern))
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Self { routes })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the route for `method` and `path`. A path registered under
    /// another verb does not match.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        for route in &self.routes {
            if route.descriptor.verb() != method {
                continue;
            }
            let Some(caps) = route.regex.captures(path) else {
                continue;
            };
            let mut path_params = ParamVec::new();
            for (name, value) in route.param_names.iter().zip(caps.iter().skip(1)) {
                if let Some(value) = value {
                    path_params.push((Arc::clone(name), value.as_str().to_string()));
                }
            }
            debug!(
                method = %method,
                path = %path,
                route_pattern = %route.pattern,
                handler_name = %route.descriptor.display_name(),
                path_params = ?path_params,
                "Route matched"
            );
            return Some(RouteMatch {
                pattern: Arc::clone(&route.pattern),
                descriptor: Arc::clone(&route.descriptor),
                path_params,
            });
        }

        debug!(method = %method, path = %path, "No route matched");
        None
    }

    /// Compile a route pattern into an anchored regex and its parameter
    /// names: `/users/{id}` becomes `^/users/([^/]+)$` with `["id"]`.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<Arc<str>>), regex::Error> {
        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::new();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match param_name(segment) {
                Some(name) => {
                    pattern.push_str("/([^/]+)");
                    param_names.push(Arc::from(name));
                }
                None => {
                    pattern.push('/');
                    pattern.push_str(&regex::escape(segment));
                }
            }
        }

        if param_names.is_empty() && pattern.len() == 1 {
            pattern.push('/');
        }
        pattern.push('$');
        Ok((Regex::new(&pattern)?, param_names))
    }
}

/// Parameter name of a `{name}` or `:name` segment.
pub(crate) fn param_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .or_else(|| segment.strip_prefix(':'))
        .filter(|name| !name.is_empty())
}
