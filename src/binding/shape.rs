use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::context::Context;
use crate::schema::SchemaError;

/// Structural description of a type, shared by the binder and the schema
/// generator.
#[derive(Clone)]
pub enum TypeShape {
    String,
    Integer { format: &'static str },
    Number { format: &'static str },
    Boolean,
    /// Named struct with documented properties.
    Object(ObjectShape),
    Array(Box<TypeShape>),
    /// String-keyed map with values of the inner shape.
    Map(Box<TypeShape>),
    /// Arbitrary JSON value.
    Any,
    Optional(Box<TypeShape>),
    /// The request context itself; injected, never read from the wire.
    Transport,
    /// A kind the schema cannot express. Carries the Rust type name.
    Unsupported(&'static str),
}

/// A named struct.
#[derive(Clone)]
pub struct ObjectShape {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub properties: Vec<PropertyShape>,
}

/// One property of an [`ObjectShape`].
///
/// The property's own shape is produced lazily so self-referencing types
/// can be described without unbounded recursion.
#[derive(Clone)]
pub struct PropertyShape {
    pub name: &'static str,
    pub shape: fn() -> TypeShape,
    pub description: Option<&'static str>,
    /// Comma-separated allowed values (documentation only)
    pub enum_values: Option<&'static str>,
    pub required: bool,
}

impl PropertyShape {
    #[must_use]
    pub fn enum_list(&self) -> Vec<String> {
        split_enum(self.enum_values)
    }
}

pub(crate) fn split_enum(raw: Option<&str>) -> Vec<String> {
    raw.map(|values| {
        values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

impl TypeShape {
    /// Complex shapes are decoded from the request body and documented as
    /// `body` parameters.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        match self {
            TypeShape::Object(_) | TypeShape::Array(_) | TypeShape::Map(_) | TypeShape::Any => {
                true
            }
            TypeShape::Optional(inner) => inner.is_complex(),
            _ => false,
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            TypeShape::Transport => true,
            TypeShape::Optional(inner) => inner.is_transport(),
            _ => false,
        }
    }

    /// Strip any `Optional` wrappers.
    #[must_use]
    pub fn inner(&self) -> &TypeShape {
        match self {
            TypeShape::Optional(inner) => inner.inner(),
            other => other,
        }
    }

    /// Schema `type` keyword for this shape.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnsupportedType`] for kinds the schema cannot express.
    pub fn schema_type(&self) -> Result<&'static str, SchemaError> {
        match self {
            TypeShape::String => Ok("string"),
            TypeShape::Integer { .. } => Ok("integer"),
            TypeShape::Number { .. } => Ok("number"),
            TypeShape::Boolean => Ok("boolean"),
            TypeShape::Object(_) | TypeShape::Map(_) | TypeShape::Any | TypeShape::Transport => {
                Ok("object")
            }
            TypeShape::Array(_) => Ok("array"),
            TypeShape::Optional(inner) => inner.schema_type(),
            TypeShape::Unsupported(name) => Err(SchemaError::UnsupportedType {
                type_name: name,
                location: String::new(),
            }),
        }
    }

    #[must_use]
    pub fn format(&self) -> Option<&'static str> {
        match self.inner() {
            TypeShape::Integer { format } | TypeShape::Number { format } => Some(format),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::String => f.write_str("String"),
            TypeShape::Integer { format } => write!(f, "Integer({format})"),
            TypeShape::Number { format } => write!(f, "Number({format})"),
            TypeShape::Boolean => f.write_str("Boolean"),
            TypeShape::Object(obj) => write!(f, "Object({})", obj.name),
            TypeShape::Array(inner) => write!(f, "Array({inner:?})"),
            TypeShape::Map(inner) => write!(f, "Map({inner:?})"),
            TypeShape::Any => f.write_str("Any"),
            TypeShape::Optional(inner) => write!(f, "Optional({inner:?})"),
            TypeShape::Transport => f.write_str("Transport"),
            TypeShape::Unsupported(name) => write!(f, "Unsupported({name})"),
        }
    }
}

impl fmt::Debug for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.properties.iter().map(|p| p.name).collect();
        f.debug_struct("ObjectShape")
            .field("name", &self.name)
            .field("properties", &names)
            .finish()
    }
}

impl fmt::Debug for PropertyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyShape")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Types that can describe their own structure.
///
/// Implemented here for primitives, strings, collections and JSON values;
/// `#[derive(ApiSchema)]` implements it for structs.
pub trait Described {
    fn describe() -> TypeShape;
}

macro_rules! described {
    ($shape:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Described for $ty {
                fn describe() -> TypeShape {
                    $shape
                }
            }
        )+
    };
}

described!(TypeShape::String => String);
described!(TypeShape::Integer { format: "int32" } => i8, i16, i32, u8, u16);
described!(TypeShape::Integer { format: "int64" } => i64, u32, u64, isize, usize);
described!(TypeShape::Number { format: "float" } => f32);
described!(TypeShape::Number { format: "double" } => f64);
described!(TypeShape::Boolean => bool);
described!(TypeShape::Any => serde_json::Value);
described!(TypeShape::Transport => Context);
described!(TypeShape::Unsupported("char") => char);
described!(TypeShape::Unsupported("()") => ());

impl<T: Described> Described for Option<T> {
    fn describe() -> TypeShape {
        TypeShape::Optional(Box::new(T::describe()))
    }
}

impl<T: Described> Described for Vec<T> {
    fn describe() -> TypeShape {
        TypeShape::Array(Box::new(T::describe()))
    }
}

impl<T: Described, S> Described for HashMap<String, T, S> {
    fn describe() -> TypeShape {
        TypeShape::Map(Box::new(T::describe()))
    }
}

impl<T: Described> Described for BTreeMap<String, T> {
    fn describe() -> TypeShape {
        TypeShape::Map(Box::new(T::describe()))
    }
}

impl<T: Described> Described for Box<T> {
    fn describe() -> TypeShape {
        T::describe()
    }
}
