//! Process-wide registry.
//!
//! Mirrors the open/frozen lifecycle of [`RouteRegistry`] for applications
//! whose generated route files register themselves into shared state.
//! Everything registered before [`freeze_global`] is served; anything after
//! is rejected with [`RegistrationError::Frozen`].

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::Value;
use std::ops::ControlFlow;
use tracing::error;

use super::{FrozenRegistry, RouteRegistry};
use crate::binding::BindingPolicy;
use crate::context::Context;
use crate::endpoint::{Endpoint, RawEndpoint};
use crate::error::{ApiError, RegistrationError};
use crate::handler::{build_handler_with, BuildOptions, HandlerDescriptor};

enum State {
    Open(RouteRegistry),
    Frozen(FrozenRegistry),
}

static GLOBAL: Lazy<Mutex<State>> = Lazy::new(|| Mutex::new(State::Open(RouteRegistry::new())));

fn with_open<T>(
    target: &str,
    f: impl FnOnce(&mut RouteRegistry) -> T,
) -> Result<T, RegistrationError> {
    match &mut *GLOBAL.lock() {
        State::Open(registry) => Ok(f(registry)),
        State::Frozen(_) => {
            error!(registration = %target, "Registration after freeze rejected");
            Err(RegistrationError::frozen(target))
        }
    }
}

/// Policy for a new route, or `Frozen` before its init capability can run.
fn open_policy(path: &str) -> Result<BindingPolicy, RegistrationError> {
    with_open(&format!("route `{path}`"), |registry| registry.policy())
}

/// Set the binding policy for endpoints registered from now on.
///
/// # Errors
///
/// [`RegistrationError::Frozen`] after [`freeze_global`].
pub fn set_binding_policy(policy: BindingPolicy) -> Result<(), RegistrationError> {
    with_open("binding policy", |registry| registry.set_policy(policy))
}

/// # Errors
///
/// [`RegistrationError::Frozen`] after [`freeze_global`].
pub fn register_route(
    path: impl Into<String>,
    descriptor: HandlerDescriptor,
) -> Result<(), RegistrationError> {
    let path = path.into();
    with_open(&format!("route `{path}`"), |registry| {
        registry.register_route(path.clone(), descriptor);
    })
}

/// Build and register a typed endpoint. The endpoint is inspected (and its
/// init run) without holding the registry lock, and only while the registry
/// is still open.
///
/// # Errors
///
/// Inspection failures, or [`RegistrationError::Frozen`].
pub fn register<E: Endpoint>(path: impl Into<String>, endpoint: E) -> Result<(), RegistrationError> {
    let path = path.into();
    let options = BuildOptions::with_policy(open_policy(&path)?);
    let descriptor = build_handler_with(endpoint, &options).inspect_err(|e| {
        error!(path = %path, error = %e, "Route registration failed");
    })?;
    register_route(path, descriptor)
}

/// Build and register a closure-built endpoint.
///
/// # Errors
///
/// Inspection failures, or [`RegistrationError::Frozen`].
pub fn register_raw(path: impl Into<String>, endpoint: RawEndpoint) -> Result<(), RegistrationError> {
    let path = path.into();
    let options = BuildOptions::with_policy(open_policy(&path)?);
    let descriptor = endpoint.build_with(&options).inspect_err(|e| {
        error!(path = %path, error = %e, "Route registration failed");
    })?;
    register_route(path, descriptor)
}

/// # Errors
///
/// [`RegistrationError::Frozen`] after [`freeze_global`].
pub fn register_error_hook<F>(hook: F) -> Result<(), RegistrationError>
where
    F: Fn(&Context, ApiError) -> ControlFlow<(), ApiError> + Send + Sync + 'static,
{
    with_open("error hook", |registry| registry.register_error_hook(hook))
}

/// # Errors
///
/// [`RegistrationError::Frozen`] after [`freeze_global`].
pub fn register_success_hook<F>(hook: F) -> Result<(), RegistrationError>
where
    F: Fn(&Context, Value) -> ControlFlow<(), Value> + Send + Sync + 'static,
{
    with_open("success hook", |registry| registry.register_success_hook(hook))
}

/// Freeze the process-wide registry. Calling it again returns the same
/// snapshot.
pub fn freeze_global() -> FrozenRegistry {
    let mut state = GLOBAL.lock();
    let frozen = match std::mem::replace(&mut *state, State::Open(RouteRegistry::new())) {
        State::Open(registry) => registry.freeze(),
        State::Frozen(frozen) => frozen,
    };
    *state = State::Frozen(frozen.clone());
    frozen
}

#[must_use]
pub fn is_frozen() -> bool {
    matches!(&*GLOBAL.lock(), State::Frozen(_))
}
