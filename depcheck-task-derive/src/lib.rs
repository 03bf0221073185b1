//! Derive macros for depcheck-task
//!
//! This crate provides `#[derive(TaskProperties)]`, which binds the fields of
//! a task attribute struct to settings keys.
//!
//! # Usage
//!
//! ```text
//! use depcheck_task::{keys, TaskProperties};
//!
//! #[derive(TaskProperties, Default)]
//! struct ProxyProperties {
//!     #[task(key = keys::PROXY_SERVER)]
//!     proxy_server: Option<String>,
//!
//!     #[task(key = keys::PROXY_PASSWORD, secret)]
//!     proxy_password: Option<String>,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Lit, Meta, parse_macro_input};

/// Derive macro for generating `TaskProperties` implementations.
///
/// ## Field attributes (`#[task(...)]`)
/// - `key = <expr>` - Settings key the value is copied to (a `&'static str`)
/// - `name = "attrName"` - Attribute name override (default: camelCase field name)
/// - `description = "..."` - Help text for generated docs
/// - `secret` - Never log or document the value
/// - `skip` - Not an attribute at all
///
/// Fields without `key` are still attributes, but are left to the task to
/// interpret instead of being copied into the settings store.
#[proc_macro_derive(TaskProperties, attributes(task))]
pub fn derive_task_properties(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "TaskProperties can only be derived for structs with named fields.\n\nExample:\n  #[derive(TaskProperties)]\n  struct UpdateProperties {\n      #[task(key = keys::PROXY_SERVER)]\n      proxy_server: Option<String>,\n  }",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "TaskProperties can only be derived for structs.\n\nTry: #[derive(TaskProperties)] on a struct, not an enum or union.",
            ));
        }
    };

    let mut descriptors = Vec::new();
    let mut populate = Vec::new();
    let mut setters = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attrs(&field.attrs)?;

        if attrs.skip {
            continue;
        }

        let attr_name = attrs
            .name
            .clone()
            .unwrap_or_else(|| camel_case(&field_name.to_string()));
        let secret = attrs.secret;
        let description = match &attrs.description {
            Some(desc) => quote! { ::core::option::Option::Some(#desc) },
            None => quote! { ::core::option::Option::None },
        };

        let key = match &attrs.key {
            Some(key) => {
                populate.push(quote! {
                    settings.set_if_present(#key, &self.#field_name);
                });
                quote! { ::core::option::Option::Some(#key) }
            }
            None => quote! { ::core::option::Option::None },
        };

        descriptors.push(quote! {
            ::depcheck_task::PropertyDescriptor {
                name: #attr_name,
                key: #key,
                secret: #secret,
                description: #description,
            }
        });

        // Attribute names are matched case-insensitively, as build files spell
        // them in whatever case the author likes
        setters.push(quote! {
            if name.eq_ignore_ascii_case(#attr_name) {
                self.#field_name = ::depcheck_task::properties::parse_attribute(#attr_name, value)?;
                return ::core::result::Result::Ok(());
            }
        });
    }

    Ok(quote! {
        impl ::depcheck_task::TaskProperties for #name {
            fn descriptors() -> ::std::vec::Vec<::depcheck_task::PropertyDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            #[allow(unused_variables)]
            fn populate_settings(&self, settings: &mut ::depcheck_task::Settings) {
                #(#populate)*
            }

            #[allow(unused_variables)]
            fn set_attribute(&mut self, name: &str, value: &str) -> ::depcheck_task::Result<()> {
                #(#setters)*
                ::core::result::Result::Err(::depcheck_task::Error::UnknownAttribute(name.to_string()))
            }
        }
    })
}

/// Field-level attributes from #[task(...)]
#[derive(Default)]
struct FieldAttrs {
    key: Option<Expr>,
    name: Option<String>,
    description: Option<String>,
    secret: bool,
    skip: bool,
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("task") {
            continue;
        }

        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;

        for meta in nested {
            match meta {
                Meta::Path(path) => {
                    if path.is_ident("secret") {
                        result.secret = true;
                    } else if path.is_ident("skip") {
                        result.skip = true;
                    } else {
                        return Err(syn::Error::new_spanned(
                            path,
                            "unknown #[task] flag; expected `secret` or `skip`",
                        ));
                    }
                }
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("key") {
                        result.key = Some(nv.value);
                    } else if nv.path.is_ident("name") {
                        result.name = Some(string_literal(&nv.value, "name")?);
                    } else if nv.path.is_ident("description") {
                        result.description = Some(string_literal(&nv.value, "description")?);
                    } else {
                        return Err(syn::Error::new_spanned(
                            nv.path,
                            "unknown #[task] option; expected `key`, `name` or `description`",
                        ));
                    }
                }
                Meta::List(list) => {
                    return Err(syn::Error::new_spanned(
                        list,
                        "#[task] does not take nested lists",
                    ));
                }
            }
        }
    }

    Ok(result)
}

fn string_literal(value: &Expr, option: &str) -> syn::Result<String> {
    if let Expr::Lit(lit) = value {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(
        value,
        format!("#[task({option})] must be a string literal.\n\nExample: #[task({option} = \"...\")]"),
    ))
}

/// `cve_url12_modified` -> `cveUrl12Modified`
fn camel_case(field: &str) -> String {
    let mut parts = field.split('_').filter(|s| !s.is_empty());
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
