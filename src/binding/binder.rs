use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use super::shape::Described;
use super::spec::{FieldBindingSpec, SourceKind};
use crate::context::Context;

/// How the binder treats values it cannot resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingPolicy {
    /// Never fail: unparseable or missing values become the type's zero value.
    #[default]
    Lenient,
    /// Missing `required` fields, parse failures and undecodable bodies are
    /// reported as [`BindError`]s.
    Strict,
}

impl BindingPolicy {
    #[must_use]
    pub fn is_strict(self) -> bool {
        matches!(self, BindingPolicy::Strict)
    }
}

impl fmt::Display for BindingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindingPolicy::Lenient => "lenient",
            BindingPolicy::Strict => "strict",
        })
    }
}

impl FromStr for BindingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(BindingPolicy::Lenient),
            "strict" => Ok(BindingPolicy::Strict),
            other => Err(format!("unknown binding policy `{other}`")),
        }
    }
}

/// Failure to materialise a request value. Only produced under
/// [`BindingPolicy::Strict`], except for [`BindError::SpecMismatch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("missing required {location} parameter `{name}`")]
    MissingRequired {
        name: &'static str,
        location: SourceKind,
    },

    #[error("invalid value `{value}` for {location} parameter `{name}`: expected {expected}")]
    InvalidValue {
        name: &'static str,
        location: SourceKind,
        value: String,
        expected: &'static str,
    },

    #[error("cannot decode request body into `{field}`: {message}")]
    Body { field: &'static str, message: String },

    /// A binding table shorter than the type it was built for.
    #[error("binding table of `{type_name}` has no entry {index}")]
    SpecMismatch {
        type_name: &'static str,
        index: usize,
    },
}

impl BindError {
    fn missing(spec: &FieldBindingSpec) -> Self {
        BindError::MissingRequired {
            name: spec.wire_name,
            location: spec.source,
        }
    }

    fn invalid(spec: &FieldBindingSpec, value: &str, expected: &'static str) -> Self {
        BindError::InvalidValue {
            name: spec.wire_name,
            location: spec.source,
            value: value.to_string(),
            expected,
        }
    }

    /// Client-side failures are 400s; a broken binding table is ours.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            BindError::SpecMismatch { .. } => 500,
            _ => 400,
        }
    }
}

/// A request type the binder can construct from a [`Context`].
///
/// Usually derived with `#[derive(Bindable)]`, which turns the per-field
/// `#[bind(...)]` metadata into an explicit table of
/// [`FieldBindingSpec`]s. The table is computed once at registration and
/// handed back to [`Bindable::bind`] on every request.
pub trait Bindable: Sized {
    /// One spec per field, in declaration order.
    fn binding_specs() -> Vec<FieldBindingSpec>;

    /// Build a fresh value from the live request.
    ///
    /// # Errors
    ///
    /// Strict-policy failures, see [`BindError`].
    fn bind(ctx: &Context, specs: &[FieldBindingSpec], policy: BindingPolicy)
        -> Result<Self, BindError>;
}

impl Bindable for () {
    fn binding_specs() -> Vec<FieldBindingSpec> {
        Vec::new()
    }

    fn bind(_: &Context, _: &[FieldBindingSpec], _: BindingPolicy) -> Result<Self, BindError> {
        Ok(())
    }
}

/// The context itself as a request: raw transport access, no bound fields.
impl Bindable for Context {
    fn binding_specs() -> Vec<FieldBindingSpec> {
        Vec::new()
    }

    fn bind(ctx: &Context, _: &[FieldBindingSpec], _: BindingPolicy) -> Result<Self, BindError> {
        Ok(ctx.clone())
    }
}

/// A field type the binder knows how to read.
pub trait BindField: Described + Sized {
    /// Bind the field, falling back to its zero value when nothing resolves.
    ///
    /// # Errors
    ///
    /// Strict-policy failures, see [`BindError`].
    fn bind_field(ctx: &Context, spec: &FieldBindingSpec, policy: BindingPolicy)
        -> Result<Self, BindError>;

    /// Bind the field, yielding `None` when nothing resolves. Backs the
    /// `Option<T>` impl.
    ///
    /// # Errors
    ///
    /// Strict-policy failures, see [`BindError`].
    fn bind_optional(
        ctx: &Context,
        spec: &FieldBindingSpec,
        policy: BindingPolicy,
    ) -> Result<Option<Self>, BindError> {
        Self::bind_field(ctx, spec, policy).map(Some)
    }
}

/// Look up `spec` in a binding table. Used by derived binders.
///
/// # Errors
///
/// [`BindError::SpecMismatch`] when the table is too short.
pub fn spec_at<'a>(
    specs: &'a [FieldBindingSpec],
    index: usize,
    type_name: &'static str,
) -> Result<&'a FieldBindingSpec, BindError> {
    specs
        .get(index)
        .ok_or(BindError::SpecMismatch { type_name, index })
}

fn scalar<T>(
    ctx: &Context,
    spec: &FieldBindingSpec,
    policy: BindingPolicy,
    expected: &'static str,
    keep_empty: bool,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, BindError> {
    let raw = ctx
        .lookup(spec.source, spec.wire_name)
        .filter(|raw| keep_empty || !raw.is_empty());

    if let Some(raw) = raw {
        if let Some(value) = parse(&raw) {
            return Ok(Some(value));
        }
        let err = BindError::invalid(spec, &raw, expected);
        if policy.is_strict() {
            warn!(field = spec.field, error = %err, "Rejecting request parameter");
            return Err(err);
        }
        debug!(field = spec.field, error = %err, "Ignoring unparseable parameter");
    }

    if let Some(value) = spec.default.and_then(&parse) {
        return Ok(Some(value));
    }
    if policy.is_strict() && spec.required {
        let err = BindError::missing(spec);
        warn!(field = spec.field, error = %err, "Rejecting request parameter");
        return Err(err);
    }
    Ok(None)
}

/// Boolean spellings accepted on the wire.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

macro_rules! bind_scalar {
    ($expected:literal, $keep_empty:literal, $parse:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl BindField for $ty {
                fn bind_field(
                    ctx: &Context,
                    spec: &FieldBindingSpec,
                    policy: BindingPolicy,
                ) -> Result<Self, BindError> {
                    Ok(Self::bind_optional(ctx, spec, policy)?.unwrap_or_default())
                }

                fn bind_optional(
                    ctx: &Context,
                    spec: &FieldBindingSpec,
                    policy: BindingPolicy,
                ) -> Result<Option<Self>, BindError> {
                    scalar::<Self>(ctx, spec, policy, $expected, $keep_empty, $parse)
                }
            }
        )+
    };
}

bind_scalar!("a string", true, |raw: &str| Some(raw.to_string()) => String);
bind_scalar!("an integer", false, |raw: &str| raw.parse().ok() =>
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
bind_scalar!("a number", false, |raw: &str| raw.parse().ok() => f32, f64);
bind_scalar!("a boolean", false, parse_bool => bool);
bind_scalar!("a single character", false, |raw: &str| raw.parse().ok() => char);

impl<T: BindField> BindField for Option<T> {
    fn bind_field(
        ctx: &Context,
        spec: &FieldBindingSpec,
        policy: BindingPolicy,
    ) -> Result<Self, BindError> {
        T::bind_optional(ctx, spec, policy)
    }
}

impl BindField for Context {
    fn bind_field(ctx: &Context, _: &FieldBindingSpec, _: BindingPolicy) -> Result<Self, BindError> {
        Ok(ctx.clone())
    }
}

/// Decode the whole request body as a self-contained value for a
/// structured field. `None` when there is no body or, under the lenient
/// policy, when it does not decode.
///
/// # Errors
///
/// Strict policy only: a missing body for a `required` field, or a body
/// that does not decode.
pub fn bind_body<T: DeserializeOwned>(
    ctx: &Context,
    spec: &FieldBindingSpec,
    policy: BindingPolicy,
) -> Result<Option<T>, BindError> {
    let Some(body) = ctx.body() else {
        if policy.is_strict() && spec.required {
            let err = BindError::missing(spec);
            warn!(field = spec.field, error = %err, "Rejecting request body");
            return Err(err);
        }
        return Ok(None);
    };

    match T::deserialize(body) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let err = BindError::Body {
                field: spec.field,
                message: e.to_string(),
            };
            if policy.is_strict() {
                warn!(field = spec.field, error = %err, "Rejecting request body");
                return Err(err);
            }
            debug!(field = spec.field, error = %err, "Ignoring undecodable body");
            Ok(None)
        }
    }
}

macro_rules! body_field {
    () => {
        fn bind_field(
            ctx: &Context,
            spec: &FieldBindingSpec,
            policy: BindingPolicy,
        ) -> Result<Self, BindError> {
            Ok(bind_body(ctx, spec, policy)?.unwrap_or_default())
        }

        fn bind_optional(
            ctx: &Context,
            spec: &FieldBindingSpec,
            policy: BindingPolicy,
        ) -> Result<Option<Self>, BindError> {
            bind_body(ctx, spec, policy)
        }
    };
}

impl BindField for Value {
    body_field!();
}

impl<T: DeserializeOwned + Described> BindField for Vec<T> {
    body_field!();
}

impl<T, S> BindField for HashMap<String, T, S>
where
    T: DeserializeOwned + Described,
    S: BuildHasher + Default,
{
    body_field!();
}

impl<T: DeserializeOwned + Described> BindField for BTreeMap<String, T> {
    body_field!();
}
