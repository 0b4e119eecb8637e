//! Error types for derive failures
//! These surface as compile errors pointing at the offending item

use proc_macro2::Span;

#[derive(Debug, thiserror::Error)]
pub enum CastDeriveError {
    #[error("#[derive(Cast)] expects a struct with named fields, '{type_name}' is not one.")]
    NotNamedStruct { type_name: String },

    #[error("No base field found in cast '{type_name}'.\n\nPlease mark the field holding the cast state with #[cast(base)].\n\nExample:\n    #[derive(Cast)]\n    struct MyCast {{\n        #[cast(base)]\n        base: castable::Cast,\n    }}")]
    NoBaseField { type_name: String },

    #[error("Multiple base fields found in cast '{type_name}'. Mark exactly one field with #[cast(base)].")]
    MultipleBaseFields { type_name: String },

    #[error("Unknown key type '{key_type}'. Supported key types: string, double, array, object, json.")]
    UnknownKeyType { key_type: String },
}

impl CastDeriveError {
    /// Convert to syn::Error for compilation
    pub fn into_syn_error(self, span: Span) -> syn::Error {
        syn::Error::new(span, self.to_string())
    }
}
