use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, DeriveInput, LitStr, Result};

use crate::attrs::{
    apply_rename_rule, flag_value, named_fields, opt_str, serde_field, serde_rename_all,
    string_value,
};

#[derive(Default)]
struct ContainerAttrs {
    rename: Option<LitStr>,
    description: Option<LitStr>,
    body: bool,
}

fn container_attrs(attrs: &[Attribute]) -> Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("schema")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                out.rename = Some(string_value(&meta)?);
            } else if meta.path.is_ident("description") {
                out.description = Some(string_value(&meta)?);
            } else if meta.path.is_ident("body") {
                out.body = flag_value(&meta)?;
            } else {
                return Err(meta.error("unknown schema attribute"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

#[derive(Default)]
struct PropertyAttrs {
    rename: Option<LitStr>,
    description: Option<LitStr>,
    enum_values: Option<LitStr>,
    required: bool,
    skip: bool,
}

fn property_attrs(attrs: &[Attribute]) -> Result<PropertyAttrs> {
    let mut out = PropertyAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("schema")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                out.rename = Some(string_value(&meta)?);
            } else if meta.path.is_ident("description") {
                out.description = Some(string_value(&meta)?);
            } else if meta.path.is_ident("enum") || meta.path.is_ident("enum_values") {
                out.enum_values = Some(string_value(&meta)?);
            } else if meta.path.is_ident("required") {
                out.required = flag_value(&meta)?;
            } else if meta.path.is_ident("skip") {
                out.skip = true;
            } else {
                return Err(meta.error("unknown schema attribute"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

pub(crate) fn expand(input: &DeriveInput) -> Result<TokenStream2> {
    let ident = &input.ident;
    let fields = named_fields(input, "ApiSchema")?;
    let container = container_attrs(&input.attrs)?;
    let rename_all = serde_rename_all(&input.attrs)?;

    let type_name = container
        .rename
        .as_ref()
        .map_or_else(|| ident.to_string(), LitStr::value);
    let description = opt_str(container.description.as_ref());

    let mut properties = Vec::new();
    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let serde = serde_field(&field.attrs)?;
        let attrs = property_attrs(&field.attrs)?;
        if serde.skip || attrs.skip {
            continue;
        }

        let name = match (&attrs.rename, &serde.rename, &rename_all) {
            (Some(lit), _, _) | (None, Some(lit), _) => lit.value(),
            (None, None, Some(rule)) => apply_rename_rule(rule, &field_ident.to_string())?,
            (None, None, None) => field_ident.to_string(),
        };
        let ty = &field.ty;
        let prop_description = opt_str(attrs.description.as_ref());
        let enum_values = opt_str(attrs.enum_values.as_ref());
        let required = attrs.required;

        properties.push(quote! {
            ::izroute::binding::PropertyShape {
                name: #name,
                shape: <#ty as ::izroute::binding::Described>::describe,
                description: #prop_description,
                enum_values: #enum_values,
                required: #required,
            }
        });
    }

    let body_impl = container.body.then(|| {
        quote! {
            impl ::izroute::binding::BindField for #ident {
                fn bind_field(
                    ctx: &::izroute::Context,
                    spec: &::izroute::binding::FieldBindingSpec,
                    policy: ::izroute::binding::BindingPolicy,
                ) -> ::core::result::Result<Self, ::izroute::binding::BindError> {
                    ::core::result::Result::Ok(
                        ::izroute::binding::bind_body(ctx, spec, policy)?.unwrap_or_default(),
                    )
                }

                fn bind_optional(
                    ctx: &::izroute::Context,
                    spec: &::izroute::binding::FieldBindingSpec,
                    policy: ::izroute::binding::BindingPolicy,
                ) -> ::core::result::Result<
                    ::core::option::Option<Self>,
                    ::izroute::binding::BindError,
                > {
                    ::izroute::binding::bind_body(ctx, spec, policy)
                }
            }
        }
    });

    Ok(quote! {
        impl ::izroute::binding::Described for #ident {
            fn describe() -> ::izroute::binding::TypeShape {
                ::izroute::binding::TypeShape::Object(::izroute::binding::ObjectShape {
                    name: #type_name,
                    description: #description,
                    properties: ::std::vec![#(#properties),*],
                })
            }
        }

        #body_impl
    })
}
