//! # Schema Module
//!
//! Builds a Swagger 2.0 style description of every registered route.
//!
//! The generator reads the same binding tables the binder uses, so the
//! documented parameters are exactly the ones a request is bound from.
//! Named structs become entries under `definitions` and are referenced by
//! `$ref`; a struct used by several handlers is defined once.
//!
//! Types the format cannot express (`char`, unit) abort generation with
//! [`SchemaError::UnsupportedType`] rather than producing a partial
//! document.

mod docs;
mod generate;
mod types;

pub use docs::render_docs_page;
pub use generate::SchemaGenerator;
pub use types::{
    Definition, Info, Operation, Parameter, PathItem, Response, Schema, SchemaDocument,
    DEFINITIONS_REF, SWAGGER_VERSION,
};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unsupported type `{type_name}` at {location}")]
    UnsupportedType {
        type_name: &'static str,
        location: String,
    },
    #[error("schema encoding failed: {0}")]
    Encode(String),
    #[error("docs page rendering failed: {0}")]
    Render(String),
}

impl SchemaError {
    /// Attach a location to an [`SchemaError::UnsupportedType`].
    #[must_use]
    pub fn at(self, location: &str) -> Self {
        match self {
            SchemaError::UnsupportedType { type_name, .. } => SchemaError::UnsupportedType {
                type_name,
                location: location.to_string(),
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Encode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::TypeShape;
    use crate::endpoint::RawEndpoint;
    use crate::registry::RouteRegistry;

    #[test]
    fn test_raw_handler_documents_fallback_definitions() {
        let mut registry = RouteRegistry::new();
        registry
            .register_raw(
                "/v1/echo",
                RawEndpoint::new("Echo")
                    .verb("POST")
                    .summary("echo")
                    .execute(|_| serde_json::json!({})),
            )
            .unwrap();
        let doc = SchemaGenerator::generate(Info::default(), &registry.freeze()).unwrap();

        assert_eq!(doc.swagger, "2.0");
        let op = &doc.paths["/v1/echo"]["post"];
        assert_eq!(op.tags, vec!["Echo".to_string()]);
        assert_eq!(op.summary, "echo");
        assert!(op.parameters.is_empty());
        let ok = &op.responses["200"];
        assert_eq!(ok.schema.ref_name(), Some("_v1_echoResponse"));
        assert!(doc.definitions.contains_key("_v1_echoResponse"));
        assert_eq!(op.responses["400"].description, "Invalid input");
    }

    #[test]
    fn test_unsupported_error_carries_location() {
        let err = TypeShape::Unsupported("char")
            .schema_type()
            .unwrap_err()
            .at("`Pet.initial`");
        assert_eq!(err.to_string(), "unsupported type `char` at `Pet.initial`");
    }
}
