//! `#[derive(NebulaError)]` — generates `From<Enum> for nebula_error::NebulaError`.
//!
//! Each variant may carry `#[error_kind(not_found)]` (or `invalid_input`,
//! `conflict`, `unauthorized`, `timeout`, `unavailable`, `cancelled`,
//! `internal`) to pick the resulting [`ErrorKind`](../nebula_error/enum.ErrorKind.html).
//! Variants without the attribute map to `ErrorKind::Internal`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

#[proc_macro_derive(NebulaError, attributes(error_kind))]
pub fn derive_nebula_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(&input, "NebulaError can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let arms: Vec<_> = data
        .variants
        .iter()
        .map(|variant| {
            let variant_ident = &variant.ident;
            let kind_ident = error_kind_for(variant).unwrap_or_else(|| quote!(Internal));

            let pattern = match &variant.fields {
                Fields::Unit => quote!(#name::#variant_ident),
                Fields::Unnamed(_) => quote!(#name::#variant_ident(..)),
                Fields::Named(_) => quote!(#name::#variant_ident { .. }),
            };

            quote! {
                #pattern => nebula_error::ErrorKind::#kind_ident,
            }
        })
        .collect();

    let expanded = quote! {
        impl ::std::convert::From<#name> for nebula_error::NebulaError {
            fn from(value: #name) -> Self {
                let message = value.to_string();
                let kind = match &value {
                    #(#arms)*
                };
                nebula_error::NebulaError::new(kind, message)
            }
        }
    };

    expanded.into()
}

fn error_kind_for(variant: &syn::Variant) -> Option<proc_macro2::TokenStream> {
    for attr in &variant.attrs {
        if !attr.path().is_ident("error_kind") {
            continue;
        }
        let mut found = None;
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.get_ident() {
                found = Some(pascal_case(&ident.to_string()));
            }
            Ok(())
        });
        if found.is_some() {
            return found;
        }
    }
    None
}

fn pascal_case(input: &str) -> proc_macro2::TokenStream {
    let mut out = String::new();
    for part in input.split('_') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    let ident = syn::Ident::new(&out, proc_macro2::Span::call_site());
    quote!(#ident)
}
