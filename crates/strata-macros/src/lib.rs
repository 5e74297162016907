mod field_layout;

use proc_macro::TokenStream;
use syn::parse_macro_input;

/// Derives `strata::FieldLayout` for a struct whose fields all share one type.
///
/// The struct must be `#[repr(C)]` or `#[repr(transparent)]` and must also implement
/// `bytemuck::Pod`. A compile-time assertion checks that the struct has no padding.
#[proc_macro_derive(FieldLayout)]
pub fn derive_field_layout(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input);
    field_layout::derive(input).into()
}
