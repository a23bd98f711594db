use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Field, LitStr, Result};

use crate::attrs::{flag_value, named_fields, opt_str, string_value, SOURCES};

#[derive(Default)]
struct BindAttrs {
    from: Option<LitStr>,
    mapping: Option<LitStr>,
    required: bool,
    description: Option<LitStr>,
    enum_values: Option<LitStr>,
    default: Option<LitStr>,
    skip: bool,
}

fn bind_attrs(field: &Field) -> Result<BindAttrs> {
    let mut out = BindAttrs::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("bind")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("from") {
                let lit = string_value(&meta)?;
                if !SOURCES.iter().any(|(name, _)| *name == lit.value()) {
                    return Err(syn::Error::new_spanned(
                        &lit,
                        "unknown binding source; expected one of query, path, header, ctx, context, body",
                    ));
                }
                out.from = Some(lit);
            } else if meta.path.is_ident("mapping") {
                out.mapping = Some(string_value(&meta)?);
            } else if meta.path.is_ident("required") {
                out.required = flag_value(&meta)?;
            } else if meta.path.is_ident("description") {
                out.description = Some(string_value(&meta)?);
            } else if meta.path.is_ident("enum") || meta.path.is_ident("enum_values") {
                out.enum_values = Some(string_value(&meta)?);
            } else if meta.path.is_ident("default") {
                out.default = Some(string_value(&meta)?);
            } else if meta.path.is_ident("skip") {
                out.skip = true;
            } else {
                return Err(meta.error("unknown bind attribute"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

fn source_tokens(from: Option<&LitStr>) -> TokenStream2 {
    let variant = from.and_then(|lit| {
        let value = lit.value();
        SOURCES
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, variant)| syn::Ident::new(variant, lit.span()))
    });
    match variant {
        Some(variant) => {
            quote!(::core::option::Option::Some(::izroute::binding::SourceKind::#variant))
        }
        None => quote!(::core::option::Option::None),
    }
}

pub(crate) fn expand(input: &DeriveInput) -> Result<TokenStream2> {
    let ident = &input.ident;
    let type_name = ident.to_string();
    let fields = named_fields(input, "Bindable")?;

    let mut specs = Vec::new();
    let mut inits = Vec::new();
    let mut index = 0usize;

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let attrs = bind_attrs(field)?;

        if attrs.skip {
            inits.push(quote!(#field_ident: ::core::default::Default::default()));
            continue;
        }

        let name = field_ident.to_string();
        let from = source_tokens(attrs.from.as_ref());
        let mapping = opt_str(attrs.mapping.as_ref());
        let required = attrs.required;
        let description = opt_str(attrs.description.as_ref());
        let enum_values = opt_str(attrs.enum_values.as_ref());
        let default = opt_str(attrs.default.as_ref());

        specs.push(quote! {
            ::izroute::binding::FieldBindingSpec::resolve(
                &::izroute::binding::FieldAttrs {
                    field: #name,
                    from: #from,
                    mapping: #mapping,
                    required: #required,
                    description: #description,
                    enum_values: #enum_values,
                    default: #default,
                },
                <#ty as ::izroute::binding::Described>::describe(),
            )
        });
        inits.push(quote! {
            #field_ident: <#ty as ::izroute::binding::BindField>::bind_field(
                ctx,
                ::izroute::binding::spec_at(specs, #index, #type_name)?,
                policy,
            )?
        });
        index += 1;
    }

    Ok(quote! {
        impl ::izroute::binding::Bindable for #ident {
            fn binding_specs() -> ::std::vec::Vec<::izroute::binding::FieldBindingSpec> {
                ::std::vec![#(#specs),*]
            }

            #[allow(unused_variables)]
            fn bind(
                ctx: &::izroute::Context,
                specs: &[::izroute::binding::FieldBindingSpec],
                policy: ::izroute::binding::BindingPolicy,
            ) -> ::core::result::Result<Self, ::izroute::binding::BindError> {
                ::core::result::Result::Ok(Self {
                    #(#inits),*
                })
            }
        }
    })
}
