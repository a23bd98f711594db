//! # Handler Module
//!
//! The handler composer: turns an endpoint's execute capability into one
//! dispatchable request-handling unit.
//!
//! ## Composition
//!
//! ```text
//! composed = D1 ∘ D2 ∘ … ∘ Dn ∘ raw
//! ```
//!
//! `D1` is the first declared decorator and the outermost wrapper: it sees
//! the call first and last. The raw unit binds the request, calls
//! `execute`, and routes the outcome through the hook pipeline attached to
//! the [`Context`](crate::Context).
//!
//! ## Building
//!
//! [`build_handler`] runs the capability inspector, resolves the request
//! type's binding table, composes the unit and returns a frozen
//! [`HandlerDescriptor`] ready for the registry.

mod build;
mod compose;
mod descriptor;

pub(crate) use build::assemble;
pub use build::{build_handler, build_handler_with, BuildOptions};
pub use compose::{compose, decorator, handler_fn, Decorator, HandlerFn};
pub use descriptor::{HandlerDescriptor, RequestDescriptor, ResponseDescriptor};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{
        spec_at, BindError, BindField, Bindable, BindingPolicy, Described, FieldAttrs,
        FieldBindingSpec, SourceKind,
    };
    use crate::context::Context;
    use crate::endpoint::Endpoint;
    use crate::error::ApiError;
    use http::Method;
    use serde_json::json;

    struct Lookup {
        id: i64,
    }

    impl Bindable for Lookup {
        fn binding_specs() -> Vec<FieldBindingSpec> {
            let attrs = FieldAttrs {
                from: Some(SourceKind::Path),
                ..FieldAttrs::plain("id")
            };
            vec![FieldBindingSpec::resolve(&attrs, i64::describe())]
        }

        fn bind(
            ctx: &Context,
            specs: &[FieldBindingSpec],
            policy: BindingPolicy,
        ) -> Result<Self, BindError> {
            Ok(Self {
                id: i64::bind_field(ctx, spec_at(specs, 0, "Lookup")?, policy)?,
            })
        }
    }

    struct Echo;

    impl Endpoint for Echo {
        type Request = Lookup;
        type Response = i64;
        type Error = ApiError;

        fn execute(&self, req: Lookup) -> Result<i64, ApiError> {
            if req.id < 0 {
                return Err(ApiError::bad_request("negative id"));
            }
            Ok(req.id * 2)
        }
    }

    fn call(desc: &HandlerDescriptor, id: &str) -> (u16, serde_json::Value) {
        let ctx = Context::builder(Method::GET, "/echo").path_param("id", id).build();
        desc.call(&ctx);
        ctx.take_response()
            .map(|r| (r.status, r.body))
            .unwrap_or((0, json!(null)))
    }

    #[test]
    fn test_typed_endpoint_round_trip() {
        let desc = build_handler(Echo).unwrap();
        assert_eq!(desc.verb(), &Method::GET);
        assert_eq!(desc.display_name(), "Echo");
        assert_eq!(desc.request().type_name, "Lookup");
        assert_eq!(call(&desc, "21"), (200, json!(42)));
        assert_eq!(call(&desc, "-1"), (400, json!({"code": 400, "message": "negative id"})));
    }

    #[test]
    fn test_policy_is_fixed_at_build_time() {
        let lenient = build_handler(Echo).unwrap();
        let strict = build_handler_with(Echo, &BuildOptions::with_policy(BindingPolicy::Strict)).unwrap();
        assert_eq!(call(&lenient, "abc"), (200, json!(0)));
        assert_eq!(call(&strict, "abc").0, 400);
    }

    #[test]
    fn test_display_name_override() {
        let options = BuildOptions {
            display_name: Some("Doubler".into()),
            ..BuildOptions::default()
        };
        let desc = build_handler_with(Echo, &options).unwrap();
        assert_eq!(desc.display_name(), "Doubler");
    }
}
