use std::collections::BTreeMap;
use tracing::{debug, info};

use super::types::{
    Definition, Info, Operation, Parameter, Response, Schema, SchemaDocument, SWAGGER_VERSION,
};
use super::SchemaError;
use crate::binding::{FieldBindingSpec, ObjectShape, TypeShape};
use crate::handler::HandlerDescriptor;
use crate::registry::FrozenRegistry;
use crate::router::param_name;

/// Walks registered handlers and emits a [`SchemaDocument`].
///
/// Parameters are derived from the same [`FieldBindingSpec`]s the binder
/// reads, so every documented `(in, name)` pair is one the binder uses.
/// Named types become shared definitions: two fields of the same struct
/// type produce one definition referenced twice.
#[derive(Debug)]
pub struct SchemaGenerator {
    info: Info,
    paths: BTreeMap<String, BTreeMap<String, Operation>>,
    definitions: BTreeMap<String, Definition>,
}

impl SchemaGenerator {
    #[must_use]
    pub fn new(info: Info) -> Self {
        Self {
            info,
            paths: BTreeMap::new(),
            definitions: BTreeMap::new(),
        }
    }

    /// Document every route of `registry`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnsupportedType`] if any handler uses a type the
    /// schema cannot express.
    pub fn generate(info: Info, registry: &FrozenRegistry) -> Result<SchemaDocument, SchemaError> {
        let mut generator = Self::new(info);
        for (path, descriptor) in registry.iter() {
            generator.add_route(path, descriptor)?;
        }
        let doc = generator.finish();
        info!(
            paths = doc.paths.len(),
            definitions = doc.definitions.len(),
            "Schema document generated"
        );
        Ok(doc)
    }

    /// Document one route.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnsupportedType`] for an inexpressible field or
    /// response type.
    pub fn add_route(&mut self, path: &str, descriptor: &HandlerDescriptor) -> Result<(), SchemaError> {
        let api_name = path.replace('/', "_");
        let request_fallback = format!("{api_name}Request");

        let mut parameters = Vec::new();
        for spec in descriptor.request().specs.iter() {
            if spec.is_injected() {
                continue;
            }
            let location = format!("{path} request field `{}`", spec.field);
            parameters.push(self.parameter(spec, &request_fallback, &location)?);
        }

        let responses = self.responses(path, &api_name, descriptor)?;
        let operation = Operation {
            tags: vec![descriptor.display_name().to_string()],
            summary: descriptor.summary().unwrap_or_default().to_string(),
            parameters,
            responses,
        };

        let verb = descriptor.verb().as_str().to_ascii_lowercase();
        debug!(path = %path, verb = %verb, "Documented route");
        self.paths
            .entry(schema_path(path))
            .or_default()
            .insert(verb, operation);
        Ok(())
    }

    #[must_use]
    pub fn finish(self) -> SchemaDocument {
        SchemaDocument {
            swagger: SWAGGER_VERSION.to_string(),
            info: self.info,
            paths: self.paths,
            definitions: self.definitions,
        }
    }

    fn parameter(
        &mut self,
        spec: &FieldBindingSpec,
        fallback: &str,
        location: &str,
    ) -> Result<Parameter, SchemaError> {
        let mut param = Parameter {
            name: spec.wire_name.to_string(),
            location: spec.source.as_str().to_string(),
            required: spec.required,
            param_type: None,
            format: None,
            description: spec.description.unwrap_or_default().to_string(),
            enum_values: spec.enum_values.clone(),
            default: spec.default.map(str::to_owned),
            schema: None,
        };

        if spec.shape.is_complex() {
            param.schema = Some(self.top_level(&spec.shape, fallback, location)?);
        } else {
            let scalar = self.schema_for(&spec.shape, location)?;
            param.param_type = scalar.schema_type;
            param.format = scalar.format;
        }
        Ok(param)
    }

    fn responses(
        &mut self,
        path: &str,
        api_name: &str,
        descriptor: &HandlerDescriptor,
    ) -> Result<BTreeMap<String, Response>, SchemaError> {
        let shape = &descriptor.response().shape;
        let location = format!("{path} response `{}`", descriptor.response().type_name);
        let mut responses = BTreeMap::new();

        if shape.is_complex() {
            let schema = self.top_level(shape, &format!("{api_name}Response"), &location)?;
            responses.insert(
                "200".to_string(),
                Response {
                    description: "successful operation".to_string(),
                    schema,
                },
            );
            responses.insert(
                "400".to_string(),
                Response {
                    description: "Invalid input".to_string(),
                    schema: Schema::typed("object", None),
                },
            );
        } else {
            responses.insert(
                "200".to_string(),
                Response {
                    description: "successful operation".to_string(),
                    schema: self.schema_for(shape, &location)?,
                },
            );
        }
        Ok(responses)
    }

    /// Schema for a body parameter or response. Unnamed object-like shapes
    /// (maps, arbitrary JSON) get a definition under `fallback`.
    fn top_level(
        &mut self,
        shape: &TypeShape,
        fallback: &str,
        location: &str,
    ) -> Result<Schema, SchemaError> {
        match shape.inner() {
            inner @ (TypeShape::Map(_) | TypeShape::Any) => {
                let inline = self.schema_for(inner, location)?;
                self.definitions
                    .entry(fallback.to_string())
                    .or_insert_with(|| Definition {
                        additional_properties: inline.additional_properties,
                        ..Definition::object()
                    });
                Ok(Schema::reference(fallback))
            }
            inner => self.schema_for(inner, location),
        }
    }

    fn schema_for(&mut self, shape: &TypeShape, location: &str) -> Result<Schema, SchemaError> {
        match shape {
            TypeShape::Optional(inner) => self.schema_for(inner, location),
            TypeShape::Object(object) => {
                self.define(object)?;
                Ok(Schema::reference(object.name))
            }
            TypeShape::Array(items) => Ok(Schema {
                items: Some(Box::new(self.schema_for(items, location)?)),
                ..Schema::typed("array", None)
            }),
            TypeShape::Map(values) => Ok(Schema {
                additional_properties: Some(Box::new(self.schema_for(values, location)?)),
                ..Schema::typed("object", None)
            }),
            other => {
                let schema_type = other.schema_type().map_err(|e| e.at(location))?;
                Ok(Schema::typed(schema_type, other.format()))
            }
        }
    }

    /// Ensure a named definition exists for `object`.
    fn define(&mut self, object: &ObjectShape) -> Result<(), SchemaError> {
        if self.definitions.contains_key(object.name) {
            return Ok(());
        }
        // Placeholder so self-referencing types terminate.
        self.definitions
            .insert(object.name.to_string(), Definition::object());

        let mut definition = Definition {
            description: object.description.map(str::to_owned),
            ..Definition::object()
        };
        for property in &object.properties {
            let shape = (property.shape)();
            let location = format!("`{}.{}`", object.name, property.name);
            let mut schema = self.schema_for(&shape, &location)?;
            schema.description = property.description.map(str::to_owned);
            schema.enum_values = property.enum_list();
            if property.required {
                definition.required.push(property.name.to_string());
            }
            definition.properties.insert(property.name.to_string(), schema);
        }
        self.definitions.insert(object.name.to_string(), definition);
        Ok(())
    }
}

/// `/pets/:id` → `/pets/{id}`
fn schema_path(path: &str) -> String {
    if !path.contains(':') {
        return path.to_string();
    }
    path.split('/')
        .map(|segment| match param_name(segment) {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
