use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Type, parse_macro_input};

/// Marks every `Option<T>` field of a response struct as non-nullable in the generated OpenAPI schema.
///
/// Response types skip `None` fields during serialization, so such fields are absent rather than `null`.
#[proc_macro_attribute]
pub fn skipped_options(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(item as DeriveInput);

    if let Data::Struct(data_struct) = &mut input.data
        && let Fields::Named(fields) = &mut data_struct.fields
    {
        for field in fields.named.iter_mut().filter(|field| is_option(&field.ty)) {
            if !has_nullable_attribute(field) {
                field.attrs.push(syn::parse_quote!(#[schema(nullable = false)]));
            }
        }
    }

    TokenStream::from(quote!(#input))
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}

fn has_nullable_attribute(field: &Field) -> bool {
    field.attrs.iter().any(|attr| {
        attr.path().is_ident("schema")
            && attr
                .meta
                .require_list()
                .is_ok_and(|list| list.tokens.to_string().contains("nullable"))
    })
}
