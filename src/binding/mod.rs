//! # Binding Module
//!
//! Request binding: turning a live [`Context`](crate::Context) into a typed
//! request value.
//!
//! Three pieces cooperate here:
//!
//! - [`TypeShape`] / [`Described`] describe the structure of a Rust type.
//!   The schema generator walks the same shapes, which keeps documented
//!   parameters and bound parameters in agreement.
//! - [`FieldBindingSpec`] is the resolved per-field rule: where to read a
//!   value (`query`, `path`, `header`, the ambient store, or the body) and
//!   under which wire name.
//! - [`Bindable`] / [`BindField`] construct values from those rules, under
//!   a [`BindingPolicy`].
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use izroute::binding::BindingPolicy;
//! use izroute::{ApiSchema, Bindable, Context};
//!
//! #[derive(Debug, Default, Bindable, ApiSchema)]
//! struct GetPet {
//!     #[bind(from = "path", mapping = "id", required)]
//!     pet_id: i64,
//!     #[bind(default = "false")]
//!     verbose: bool,
//! }
//!
//! let ctx = Context::builder(Method::GET, "/pets/42")
//!     .path_param("id", "42")
//!     .build();
//! let specs = GetPet::binding_specs();
//! let req = GetPet::bind(&ctx, &specs, BindingPolicy::Lenient).unwrap();
//! assert_eq!(req.pet_id, 42);
//! assert!(!req.verbose);
//! ```
//!
//! ## Policies
//!
//! The default [`BindingPolicy::Lenient`] never fails a request: missing or
//! unparseable values become the field's zero value. [`BindingPolicy::Strict`]
//! reports them as [`BindError`]s, which reach clients as 400 responses.

mod binder;
mod shape;
mod spec;

pub use binder::{
    bind_body, parse_bool, spec_at, BindError, BindField, Bindable, BindingPolicy,
};
pub use shape::{Described, ObjectShape, PropertyShape, TypeShape};
pub use spec::{FieldAttrs, FieldBindingSpec, SourceKind};
