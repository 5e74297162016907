use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DataStruct, DeriveInput, Error, Type};

pub fn derive(input: DeriveInput) -> TokenStream {
    match expand(input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error(),
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream, Error> {
    let name = &input.ident;

    let Data::Struct(DataStruct { fields, .. }) = &input.data else {
        return Err(Error::new(input.span(), "FieldLayout can only be derived for structs"));
    };
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "FieldLayout cannot be derived for generic structs",
        ));
    }
    if !has_stable_repr(&input)? {
        return Err(Error::new(
            name.span(),
            "FieldLayout requires #[repr(C)] or #[repr(transparent)]",
        ));
    }

    let mut types = fields.iter().map(|f| &f.ty);
    let Some(field_ty) = types.next() else {
        return Err(Error::new(name.span(), "FieldLayout requires at least one field"));
    };
    let expected = type_key(field_ty);
    for ty in types {
        if type_key(ty) != expected {
            return Err(Error::new(
                ty.span(),
                format!("every field must be of type `{}`", expected),
            ));
        }
    }
    let count = fields.len();

    Ok(quote! {
        unsafe impl ::strata::FieldLayout for #name {
            type Field = #field_ty;

            fn field_count() -> usize {
                #count
            }
        }

        const _: () = assert!(
            ::core::mem::size_of::<#name>() == #count * ::core::mem::size_of::<#field_ty>(),
            "FieldLayout struct must not contain padding"
        );
    })
}

fn type_key(ty: &Type) -> String {
    quote!(#ty).to_string()
}

fn has_stable_repr(input: &DeriveInput) -> Result<bool, Error> {
    let mut stable = false;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("C") || meta.path.is_ident("transparent") {
                stable = true;
            } else if meta.path.is_ident("packed") {
                return Err(meta.error("FieldLayout cannot be derived for packed structs"));
            } else if meta.input.peek(syn::token::Paren) {
                // align(N)
                let content;
                syn::parenthesized!(content in meta.input);
                content.parse::<TokenStream>()?;
            }
            Ok(())
        })?;
    }
    Ok(stable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn expands_homogeneous_struct() {
        let input: DeriveInput = parse_quote! {
            #[repr(C)]
            struct Point { x: f32, y: f32, z: f32 }
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("type Field = f32"));
        assert!(out.contains("3usize"));
    }

    #[test]
    fn accepts_repr_with_alignment() {
        let input: DeriveInput = parse_quote! {
            #[repr(C, align(16))]
            struct Quad([u32; 4]);
        };
        assert!(expand(input).is_ok());
    }

    #[test]
    fn rejects_packed_repr() {
        let input: DeriveInput = parse_quote! {
            #[repr(C, packed)]
            struct Packed { x: f32, y: f32, z: f32 }
        };
        let err = expand(input).unwrap_err();
        assert_eq!(err.to_string(), "FieldLayout cannot be derived for packed structs");
        let input: DeriveInput = parse_quote! {
            #[repr(C, packed(2))]
            struct Packed2 { x: f32, y: f32 }
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn rejects_mixed_fields() {
        let input: DeriveInput = parse_quote! {
            #[repr(C)]
            struct Mixed { a: f32, b: u32 }
        };
        let err = expand(input).unwrap_err();
        assert_eq!(err.to_string(), "every field must be of type `f32`");
    }

    #[test]
    fn rejects_default_repr() {
        let input: DeriveInput = parse_quote! {
            struct Loose { a: f32, b: f32 }
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn rejects_enums_and_empty_structs() {
        let input: DeriveInput = parse_quote! {
            #[repr(C)]
            enum E { A }
        };
        assert!(expand(input).is_err());
        let input: DeriveInput = parse_quote! {
            #[repr(C)]
            struct Empty {}
        };
        assert!(expand(input).is_err());
    }
}
