extern crate proc_macro;

mod cast;
mod errors;

use proc_macro::TokenStream;

/// Implements `castable::HasCast` and `castable::CastType` for a concrete cast.
///
/// The struct must hold exactly one `castable::Cast` field, either marked with
/// `#[cast(base)]` or recognised by its type. Every other field is initialised
/// with `Default::default()` by the generated `for_key` constructor.
///
/// Struct level options:
/// - `#[cast(key_type = "object")]` declares the storage key type (default `string`)
/// - `#[cast(name = "address")]` overrides the registry name (default: snake_case
///   type name without a trailing `_cast`)
#[proc_macro_derive(Cast, attributes(cast))]
pub fn cast_derive(input: TokenStream) -> TokenStream {
    let input: proc_macro2::TokenStream = input.into();
    cast::generate_cast_impl(input).into()
}
