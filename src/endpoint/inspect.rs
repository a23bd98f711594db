use http::Method;
use std::fmt;
use tracing::{debug, error, info};

use super::Endpoint;
use crate::error::RegistrationError;
use crate::handler::Decorator;

/// Methods a verb capability may name.
pub const KNOWN_VERBS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
    Method::HEAD,
    Method::TRACE,
    Method::CONNECT,
];

/// Which optional capabilities an endpoint turned out to have, resolved
/// once at registration.
#[derive(Clone)]
pub struct CapabilitySet {
    pub name: String,
    pub summary: Option<String>,
    pub verb: Method,
    /// The verb capability was present.
    pub declared_verb: bool,
    /// The init capability was present (and succeeded).
    pub has_init: bool,
    /// `None` when the decorators capability is absent.
    pub decorators: Option<Vec<Decorator>>,
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitySet")
            .field("name", &self.name)
            .field("verb", &self.verb)
            .field("declared_verb", &self.declared_verb)
            .field("has_init", &self.has_init)
            .field("decorators", &self.decorators.as_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}

impl CapabilitySet {
    #[must_use]
    pub fn decorator_slice(&self) -> &[Decorator] {
        self.decorators.as_deref().unwrap_or(&[])
    }
}

/// Resolve an endpoint's capabilities: run init, then read verb and
/// decorators.
///
/// # Errors
///
/// [`RegistrationError::Init`] if init fails,
/// [`RegistrationError::MalformedVerb`] for an unknown verb.
pub fn inspect<E: Endpoint>(endpoint: &mut E) -> Result<CapabilitySet, RegistrationError> {
    let name = endpoint
        .display_name()
        .map_or_else(|| short_type_name::<E>().to_string(), str::to_owned);

    let has_init = run_init(&name, endpoint.init())?;
    let verb = resolve_verb(&name, endpoint.verb())?;

    Ok(CapabilitySet {
        summary: endpoint.summary().map(str::to_owned),
        declared_verb: endpoint.verb().is_some(),
        decorators: endpoint.decorators(),
        has_init,
        verb,
        name,
    })
}

pub(crate) fn run_init(
    name: &str,
    outcome: Option<anyhow::Result<()>>,
) -> Result<bool, RegistrationError> {
    match outcome {
        None => Ok(false),
        Some(Ok(())) => {
            info!(handler_name = %name, "Handler init completed");
            Ok(true)
        }
        Some(Err(e)) => {
            error!(handler_name = %name, error = %format!("{e:#}"), "Handler init failed");
            Err(RegistrationError::init(name, e))
        }
    }
}

/// Verb capability → method. Absent means `GET`; matching is
/// case-insensitive.
///
/// # Errors
///
/// [`RegistrationError::MalformedVerb`] for anything outside
/// [`KNOWN_VERBS`].
pub fn resolve_verb(name: &str, verb: Option<&str>) -> Result<Method, RegistrationError> {
    let Some(raw) = verb else {
        return Ok(Method::GET);
    };
    let upper = raw.trim().to_ascii_uppercase();
    match KNOWN_VERBS.iter().find(|m| m.as_str() == upper) {
        Some(method) => {
            debug!(handler_name = %name, verb = %method, "Resolved verb capability");
            Ok(method.clone())
        }
        None => {
            error!(handler_name = %name, verb = %raw, "Unknown HTTP verb");
            Err(RegistrationError::malformed_verb(name, raw))
        }
    }
}

/// Last path segment of a type name, generics stripped:
/// `my_app::routes::GetPet<T>` → `GetPet`.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
