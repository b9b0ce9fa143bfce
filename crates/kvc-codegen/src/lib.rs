// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Type};

/// Per-field options from `#[kvc(...)]`.
#[derive(Default)]
struct FieldOptions {
    skip: bool,
    readonly: bool,
    base: bool,
}

/// `#[derive(Reflect)]` macro: generates the `FieldLayout` table and
/// `kvc::Reflect` impl.
///
/// Supports:
/// - structs with named fields (any field type implementing `kvc::Reflect`)
/// - enums (whole-value access only, no fields)
///
/// Field attributes:
/// - `#[kvc(skip)]`: not published
/// - `#[kvc(readonly)]`: published, rejects writes
/// - `#[kvc(base)]`: the field's own fields are published in its place
///
/// `PhantomData` fields are skipped. Generic types, tuple structs and unions
/// are rejected with a compile error.
///
/// Example:
/// ```ignore
/// use kvc::Reflect;
///
/// #[derive(Clone, Reflect)]
/// struct Employee {
///     #[kvc(base)]
///     person: Person,
///     #[kvc(readonly)]
///     badge: u32,
///     #[kvc(skip)]
///     scratch: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(kvc))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Reflect cannot be derived for generic types",
        ));
    }

    let name = &input.ident;
    let type_name = name.unraw().to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            Fields::Unit => {
                return Ok(quote! {
                    impl ::kvc::Reflect for #name {
                        fn type_info() -> ::kvc::TypeInfo {
                            ::kvc::TypeInfo::record::<Self>(#type_name, &[])
                        }
                    }
                })
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Only named fields are supported",
                ))
            }
        },
        Data::Enum(_) => {
            return Ok(quote! {
                impl ::kvc::Reflect for #name {
                    fn type_info() -> ::kvc::TypeInfo {
                        ::kvc::TypeInfo::enumeration::<Self>(#type_name)
                    }
                }
            })
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Only structs and enums are supported",
            ))
        }
    };

    let mut layouts = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let options = field_options(field)?;
        if options.skip || is_phantom(&field.ty) {
            continue;
        }
        let name_str = field_ident.unraw().to_string();
        let ty = &field.ty;
        let readonly = options.readonly;
        let inherited = options.base;

        // Concrete type name, not `Self`: FIELDS is a nested item.
        layouts.push(quote! {
            ::kvc::FieldLayout {
                name: #name_str,
                offset: ::core::mem::offset_of!(#name, #field_ident),
                field_type: <#ty as ::kvc::Reflect>::type_info,
                readonly: #readonly,
                inherited: #inherited,
            }
        });
    }

    Ok(quote! {
        impl ::kvc::Reflect for #name {
            fn type_info() -> ::kvc::TypeInfo {
                const FIELDS: &[::kvc::FieldLayout] = &[
                    #(#layouts),*
                ];
                ::kvc::TypeInfo::record::<Self>(#type_name, FIELDS)
            }
        }
    })
}

fn field_options(field: &Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("kvc") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.path.is_ident("readonly") {
                options.readonly = true;
            } else if meta.path.is_ident("base") {
                options.base = true;
            } else {
                return Err(meta.error("expected `skip`, `readonly` or `base`"));
            }
            Ok(())
        })?;
    }
    if options.skip && (options.readonly || options.base) {
        return Err(syn::Error::new_spanned(
            field,
            "`skip` cannot be combined with other kvc options",
        ));
    }
    Ok(options)
}

/// True for `PhantomData<..>` (any path ending in it).
fn is_phantom(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "PhantomData"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(src: &str) -> syn::Result<String> {
        let input: DeriveInput = syn::parse_str(src)?;
        expand(&input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_struct_emits_layout_table() {
        let out = match expand_str(
            "struct Person { name: String, #[kvc(readonly)] r#type: u8, #[kvc(skip)] cache: u32, marker: PhantomData<u8> }",
        ) {
            Ok(out) => out,
            Err(err) => panic!("expansion failed: {err}"),
        };
        assert!(out.contains("offset_of ! (Person , name)"));
        assert!(out.contains("name : \"type\""));
        assert!(out.contains("readonly : true"));
        assert!(!out.contains("cache"));
        assert!(!out.contains("marker"));
    }

    #[test]
    fn test_enum_is_whole_value() {
        let out = expand_str("enum Mode { On, Off(u8) }").unwrap_or_default();
        assert!(out.contains("enumeration"));
    }

    #[test]
    fn test_rejected_inputs() {
        assert!(expand_str("struct Wrapper<T> { inner: T }").is_err());
        assert!(expand_str("struct Pair(u8, u8);").is_err());
        assert!(expand_str("union Bits { a: u32, b: f32 }").is_err());
        assert!(expand_str("struct S { #[kvc(skip, readonly)] a: u8 }").is_err());
        assert!(expand_str("struct S { #[kvc(hidden)] a: u8 }").is_err());
    }
}
