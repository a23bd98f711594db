use std::sync::Arc;
use tracing::{error, info};

use super::{compose, handler_fn, HandlerDescriptor, HandlerFn, RequestDescriptor, ResponseDescriptor};
use crate::binding::{Bindable, BindingPolicy, Described, FieldBindingSpec};
use crate::context::HandlerResponse;
use crate::endpoint::{inspect, short_type_name, CapabilitySet, Endpoint};
use crate::error::{IntoApiError, RegistrationError};

/// Registration-time options for [`build_handler_with`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Policy the compiled handler binds requests with.
    pub policy: BindingPolicy,
    /// Overrides the endpoint's display name.
    pub display_name: Option<String>,
}

impl BuildOptions {
    #[must_use]
    pub fn with_policy(policy: BindingPolicy) -> Self {
        Self {
            policy,
            display_name: None,
        }
    }
}

/// Inspect `endpoint` and compose it into a handler with default options.
///
/// # Errors
///
/// See [`build_handler_with`].
pub fn build_handler<E: Endpoint>(endpoint: E) -> Result<HandlerDescriptor, RegistrationError> {
    build_handler_with(endpoint, &BuildOptions::default())
}

/// Inspect `endpoint`, run its init capability, and compose its execute
/// capability with its decorators into a [`HandlerDescriptor`].
///
/// The request type's binding table is resolved here, once, and shared by
/// the compiled handler and the descriptor.
///
/// # Errors
///
/// [`RegistrationError::Init`] or [`RegistrationError::MalformedVerb`].
pub fn build_handler_with<E: Endpoint>(
    mut endpoint: E,
    options: &BuildOptions,
) -> Result<HandlerDescriptor, RegistrationError> {
    let mut caps = inspect(&mut endpoint)?;
    if let Some(name) = &options.display_name {
        caps.name.clone_from(name);
    }

    let specs: Arc<[FieldBindingSpec]> = E::Request::binding_specs().into();
    let request = RequestDescriptor {
        type_name: short_type_name::<E::Request>(),
        specs: Arc::clone(&specs),
    };
    let response = ResponseDescriptor {
        type_name: short_type_name::<E::Response>(),
        shape: E::Response::describe(),
    };
    let raw = execute_unit(Arc::new(endpoint), specs, options.policy);
    Ok(assemble(caps, raw, request, response))
}

/// Wrap the raw unit in the endpoint's decorators and freeze the result.
pub(crate) fn assemble(
    caps: CapabilitySet,
    raw: HandlerFn,
    request: RequestDescriptor,
    response: ResponseDescriptor,
) -> HandlerDescriptor {
    let handler = compose(raw, caps.decorator_slice());
    let decorator_count = caps.decorator_slice().len();
    info!(
        handler_name = %caps.name,
        verb = %caps.verb,
        decorators = decorator_count,
        has_init = caps.has_init,
        request_type = request.type_name,
        "Handler composed"
    );
    HandlerDescriptor {
        verb: caps.verb,
        handler,
        display_name: caps.name,
        summary: caps.summary,
        decorator_count,
        has_init: caps.has_init,
        request,
        response,
    }
}

/// The raw execute unit: bind, execute, hand the outcome to the hook
/// pipeline attached to the context.
fn execute_unit<E: Endpoint>(
    endpoint: Arc<E>,
    specs: Arc<[FieldBindingSpec]>,
    policy: BindingPolicy,
) -> HandlerFn {
    handler_fn(move |ctx| {
        let pipeline = ctx.pipeline();
        let request = match E::Request::bind(ctx, &specs, policy) {
            Ok(request) => request,
            Err(e) => {
                pipeline.on_error(ctx, e.into_api_error());
                return;
            }
        };
        match endpoint.execute(request) {
            Ok(response) => match serde_json::to_value(&response) {
                Ok(body) => pipeline.on_success(ctx, body),
                Err(e) => {
                    error!(
                        request_id = %ctx.request_id(),
                        response_type = short_type_name::<E::Response>(),
                        error = %e,
                        "Failed to serialize response"
                    );
                    ctx.respond(HandlerResponse::error(500, "Internal Server Error"));
                }
            },
            Err(err) => pipeline.on_error(ctx, err.into_api_error()),
        }
    })
}
