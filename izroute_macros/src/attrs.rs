use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Fields, FieldsNamed, LitBool, LitStr, Result, Token};

pub(crate) const SOURCES: &[(&str, &str)] = &[
    ("query", "Query"),
    ("path", "Path"),
    ("header", "Header"),
    ("ctx", "Ambient"),
    ("context", "Ambient"),
    ("body", "Body"),
];

/// Named fields of a non-generic struct, or a spanned error.
pub(crate) fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> Result<&'a FieldsNamed> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            format!("#[derive({derive})] does not support generic types"),
        ));
    }
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(named),
            Fields::Unit => Err(syn::Error::new_spanned(
                &input.ident,
                format!("#[derive({derive})] needs a struct with named fields"),
            )),
            Fields::Unnamed(fields) => Err(syn::Error::new_spanned(
                fields,
                format!("#[derive({derive})] needs named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            format!("#[derive({derive})] only supports structs"),
        )),
    }
}

/// `key = "value"`
pub(crate) fn string_value(meta: &ParseNestedMeta) -> Result<LitStr> {
    meta.value()?.parse()
}

/// Bare `key` or `key = true|false`.
pub(crate) fn flag_value(meta: &ParseNestedMeta) -> Result<bool> {
    if meta.input.peek(Token![=]) {
        let lit: LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    } else {
        Ok(true)
    }
}

/// Consume the value of a key this derive does not interpret.
pub(crate) fn skip_value(meta: &ParseNestedMeta) -> Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_value(&nested))?;
    }
    Ok(())
}

pub(crate) fn opt_str(value: Option<&LitStr>) -> TokenStream2 {
    match value {
        Some(lit) => quote!(::core::option::Option::Some(#lit)),
        None => quote!(::core::option::Option::None),
    }
}

/// serde's view of a field: wire name and whether it is skipped.
#[derive(Default)]
pub(crate) struct SerdeField {
    pub rename: Option<LitStr>,
    pub skip: bool,
}

pub(crate) fn serde_field(attrs: &[Attribute]) -> Result<SerdeField> {
    let mut out = SerdeField::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(Token![=]) {
                    out.rename = Some(string_value(&meta)?);
                } else {
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("serialize") {
                            out.rename = Some(string_value(&inner)?);
                        } else {
                            skip_value(&inner)?;
                        }
                        Ok(())
                    })?;
                }
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                out.skip = true;
            } else {
                skip_value(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// Container-level `#[serde(rename_all = "...")]`.
pub(crate) fn serde_rename_all(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut rule = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                if meta.input.peek(Token![=]) {
                    rule = Some(string_value(&meta)?);
                } else {
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("serialize") {
                            rule = Some(string_value(&inner)?);
                        } else {
                            skip_value(&inner)?;
                        }
                        Ok(())
                    })?;
                }
            } else {
                skip_value(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(rule)
}

/// Apply a serde `rename_all` rule to a snake_case field name.
pub(crate) fn apply_rename_rule(rule: &LitStr, field: &str) -> Result<String> {
    let words: Vec<&str> = field.split('_').filter(|w| !w.is_empty()).collect();
    let capitalize = |w: &str| {
        let mut chars = w.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        }
    };
    let renamed = match rule.value().as_str() {
        "lowercase" => field.to_lowercase(),
        "UPPERCASE" => field.to_uppercase(),
        "snake_case" => field.to_string(),
        "SCREAMING_SNAKE_CASE" => field.to_uppercase(),
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.replace('_', "-").to_uppercase(),
        "PascalCase" => words.iter().map(|w| capitalize(w)).collect(),
        "camelCase" => words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { (*w).to_string() } else { capitalize(w) })
            .collect(),
        other => {
            return Err(syn::Error::new_spanned(
                rule,
                format!("unknown rename rule `{other}`"),
            ))
        }
    };
    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(s: &str) -> LitStr {
        LitStr::new(s, proc_macro2::Span::call_site())
    }

    #[test]
    fn test_rename_rules() {
        assert_eq!(apply_rename_rule(&rule("camelCase"), "pet_id").unwrap(), "petId");
        assert_eq!(apply_rename_rule(&rule("PascalCase"), "pet_id").unwrap(), "PetId");
        assert_eq!(apply_rename_rule(&rule("kebab-case"), "pet_id").unwrap(), "pet-id");
        assert_eq!(apply_rename_rule(&rule("SCREAMING_SNAKE_CASE"), "pet_id").unwrap(), "PET_ID");
        assert!(apply_rename_rule(&rule("Sponge"), "pet_id").is_err());
    }
}
