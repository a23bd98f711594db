use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::shape::{split_enum, TypeShape};

/// Where a request field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Query,
    Path,
    Header,
    /// The context's ambient key/value store.
    #[serde(alias = "ctx", rename = "context")]
    Ambient,
    Body,
}

impl SourceKind {
    /// Location name used in the schema document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Query => "query",
            SourceKind::Path => "path",
            SourceKind::Header => "header",
            SourceKind::Ambient => "context",
            SourceKind::Body => "body",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(SourceKind::Query),
            "path" => Ok(SourceKind::Path),
            "header" => Ok(SourceKind::Header),
            "ctx" | "context" => Ok(SourceKind::Ambient),
            "body" => Ok(SourceKind::Body),
            other => Err(format!("unknown field source `{other}`")),
        }
    }
}

/// Declarative metadata attached to one request field, as written in
/// `#[bind(...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAttrs {
    /// Rust field name
    pub field: &'static str,
    pub from: Option<SourceKind>,
    /// Wire name override
    pub mapping: Option<&'static str>,
    pub required: bool,
    pub description: Option<&'static str>,
    /// Comma-separated allowed values (documentation only)
    pub enum_values: Option<&'static str>,
    /// Raw value used when the wire location is absent
    pub default: Option<&'static str>,
}

impl FieldAttrs {
    /// Attributes of a field with no `#[bind(...)]` metadata.
    #[must_use]
    pub const fn plain(field: &'static str) -> Self {
        Self {
            field,
            from: None,
            mapping: None,
            required: false,
            description: None,
            enum_values: None,
            default: None,
        }
    }
}

/// Resolved binding rule for one field of a request type.
///
/// Both the request binder and the schema generator consume these, so a
/// documented parameter location is always the location the binder reads.
#[derive(Debug, Clone)]
pub struct FieldBindingSpec {
    pub field: &'static str,
    pub source: SourceKind,
    pub wire_name: &'static str,
    pub required: bool,
    pub description: Option<&'static str>,
    pub enum_values: Vec<String>,
    pub default: Option<&'static str>,
    pub shape: TypeShape,
}

impl FieldBindingSpec {
    /// Resolve a field's metadata against its type.
    ///
    /// The source defaults to `query`. Complex types are always bound from
    /// the body whatever the metadata says, and a field typed as the request
    /// context is injected rather than looked up.
    #[must_use]
    pub fn resolve(attrs: &FieldAttrs, shape: TypeShape) -> Self {
        let source = if shape.is_complex() {
            SourceKind::Body
        } else {
            attrs.from.unwrap_or(SourceKind::Query)
        };
        Self {
            field: attrs.field,
            source,
            wire_name: attrs.mapping.unwrap_or(attrs.field),
            required: attrs.required,
            description: attrs.description,
            enum_values: split_enum(attrs.enum_values),
            default: attrs.default,
            shape,
        }
    }

    /// Field populated with the live context.
    #[must_use]
    pub fn is_injected(&self) -> bool {
        self.shape.is_transport()
    }

    /// `(location, wire name)` pair; `None` for injected fields.
    #[must_use]
    pub fn location(&self) -> Option<(SourceKind, &'static str)> {
        (!self.is_injected()).then_some((self.source, self.wire_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Described;
    use crate::context::Context;

    #[test]
    fn test_defaults_to_query_and_field_name() {
        let spec = FieldBindingSpec::resolve(&FieldAttrs::plain("limit"), i64::describe());
        assert_eq!(spec.source, SourceKind::Query);
        assert_eq!(spec.wire_name, "limit");
        assert!(!spec.required);
        assert_eq!(spec.location(), Some((SourceKind::Query, "limit")));
    }

    #[test]
    fn test_mapping_and_source_are_honoured() {
        let attrs = FieldAttrs {
            from: Some(SourceKind::Path),
            mapping: Some("id"),
            required: true,
            enum_values: Some("a,b"),
            ..FieldAttrs::plain("pet_id")
        };
        let spec = FieldBindingSpec::resolve(&attrs, i64::describe());
        assert_eq!(spec.location(), Some((SourceKind::Path, "id")));
        assert!(spec.required);
        assert_eq!(spec.enum_values, vec!["a", "b"]);
    }

    #[test]
    fn test_complex_fields_bind_from_body() {
        let attrs = FieldAttrs {
            from: Some(SourceKind::Query),
            ..FieldAttrs::plain("tags")
        };
        let spec = FieldBindingSpec::resolve(&attrs, Vec::<String>::describe());
        assert_eq!(spec.source, SourceKind::Body);
    }

    #[test]
    fn test_context_field_is_injected() {
        let spec = FieldBindingSpec::resolve(&FieldAttrs::plain("ctx"), Context::describe());
        assert!(spec.is_injected());
        assert_eq!(spec.location(), None);
    }

    #[test]
    fn test_same_attrs_yield_same_spec() {
        let attrs = FieldAttrs {
            from: Some(SourceKind::Header),
            mapping: Some("x-trace"),
            ..FieldAttrs::plain("trace")
        };
        let a = FieldBindingSpec::resolve(&attrs, String::describe());
        let b = FieldBindingSpec::resolve(&attrs, String::describe());
        assert_eq!(a.location(), b.location());
        assert_eq!(a.required, b.required);
    }

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!("ctx".parse::<SourceKind>().ok(), Some(SourceKind::Ambient));
        assert_eq!("context".parse::<SourceKind>().ok(), Some(SourceKind::Ambient));
        assert!("cookie".parse::<SourceKind>().is_err());
    }
}
