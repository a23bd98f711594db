//! Derive macros for `izroute`.
//!
//! - `#[derive(Bindable)]` emits the binding table and binder of a request
//!   type from its `#[bind(...)]` field attributes.
//! - `#[derive(ApiSchema)]` emits the type metadata the schema generator
//!   documents, honouring serde renames and `#[schema(...)]` attributes.
//!
//! The generated code refers to `::izroute`, so these derives are meant to
//! be used through the re-exports of that crate.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod bindable;
mod schema;

/// Request binding.
///
/// Field attributes, all optional:
///
/// ```text
/// #[bind(from = "query" | "path" | "header" | "ctx" | "context" | "body")]
/// #[bind(mapping = "wire_name")]
/// #[bind(required)]                  // or required = true
/// #[bind(description = "...")]
/// #[bind(enum = "a,b,c")]
/// #[bind(default = "10")]            // raw value used when absent
/// #[bind(skip)]                      // left at Default::default()
/// ```
///
/// Fields without `from` are read from the query string; object, array,
/// map and JSON fields are always decoded from the body.
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    bindable::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Type metadata for the schema generator.
///
/// Container: `#[schema(rename = "Name", description = "...", body)]`.
/// `body` additionally lets the type be a request field decoded from the
/// body; it then also needs `Deserialize` and `Default`.
///
/// Fields: `#[schema(rename = "...", description = "...", enum = "a,b",
/// required, skip)]`. `#[serde(rename)]`, `#[serde(rename_all)]` and
/// `#[serde(skip)]` are honoured.
#[proc_macro_derive(ApiSchema, attributes(schema))]
pub fn derive_api_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    schema::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
