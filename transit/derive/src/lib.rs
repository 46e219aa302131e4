//! `#[derive(TransitReflect)]`
//!
//! Generates the `Reflect` impl describing the in-memory layout of a POD
//! record so that decoders can read the raw bytes without compiled-in
//! knowledge of the type. Pointer and reference members are described as
//! 8-byte identities that the decoder resolves against the block's
//! dependency table.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type};

#[proc_macro_derive(TransitReflect)]
pub fn derive_transit_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let name_str = name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "TransitReflect requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "TransitReflect only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let members = fields.iter().map(|field| {
        let ident = field.ident.as_ref().unwrap();
        let field_name = ident.to_string();
        let (type_name, is_reference, size) = match &field.ty {
            Type::Reference(_) | Type::Ptr(_) => (
                quote! { String::from("usize") },
                quote! { true },
                quote! { std::mem::size_of::<usize>() },
            ),
            ty => {
                let type_name = quote! { #ty }.to_string().replace(' ', "");
                (
                    quote! { String::from(#type_name) },
                    quote! { false },
                    quote! { std::mem::size_of::<#ty>() },
                )
            }
        };
        quote! {
            skylight_transit::Member {
                name: String::from(#field_name),
                type_name: #type_name,
                offset: memoffset::offset_of!(#name, #ident),
                size: #size,
                is_reference: #is_reference,
            }
        }
    });

    TokenStream::from(quote! {
        impl skylight_transit::Reflect for #name {
            fn reflect() -> skylight_transit::UserDefinedType {
                skylight_transit::UserDefinedType {
                    name: String::from(#name_str),
                    size: std::mem::size_of::<Self>(),
                    members: vec![ #( #members, )* ],
                    is_reference: false,
                    secondary_udts: vec![],
                }
            }
        }
    })
}
