use heck::ToSnakeCase;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DataStruct, DeriveInput, Field, Fields, Ident, LitStr};

use crate::errors::CastDeriveError;

const KEY_TYPES: &[(&str, &str)] = &[
    ("string", "String"),
    ("double", "Double"),
    ("array", "Array"),
    ("object", "Object"),
    ("json", "Json"),
];

struct CastOptions {
    key_type: Ident,
    name: String,
}

pub fn generate_cast_impl(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = match syn::parse2(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error(),
    };

    match expand(&ast) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let fields = match &ast.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => fields.named.iter().collect::<Vec<_>>(),
        _ => {
            return Err(CastDeriveError::NotNamedStruct {
                type_name: name.to_string(),
            }
            .into_syn_error(name.span()))
        }
    };

    let options = parse_options(ast)?;
    let base = find_base_field(name, &fields)?;
    let base_ident = base.ident.as_ref();
    let others = fields
        .iter()
        .filter(|field| field.ident.as_ref() != base_ident)
        .filter_map(|field| field.ident.as_ref());

    let key_type = &options.key_type;
    let cast_name = &options.name;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::castable::HasCast for #name #ty_generics #where_clause {
            fn cast(&self) -> &::castable::Cast {
                &self.#base_ident
            }

            fn cast_mut(&mut self) -> &mut ::castable::Cast {
                &mut self.#base_ident
            }
        }

        impl #impl_generics ::castable::CastType for #name #ty_generics #where_clause {
            const NAME: &'static str = #cast_name;
            const KEY_TYPE: ::castable::KeyType = ::castable::KeyType::#key_type;

            fn for_key(key: ::core::option::Option<&str>) -> Self {
                Self {
                    #base_ident: ::castable::Cast::new(key, ::castable::KeyType::#key_type),
                    #( #others: ::core::default::Default::default(), )*
                }
            }
        }
    })
}

fn parse_options(ast: &DeriveInput) -> syn::Result<CastOptions> {
    let mut key_type: Option<LitStr> = None;
    let mut name: Option<String> = None;

    for attr in ast.attrs.iter().filter(|attr| attr.path().is_ident("cast")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key_type") {
                key_type = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported cast option, expected `key_type` or `name`"))
            }
        })?;
    }

    let key_type = match key_type {
        Some(lit) => key_type_variant(&lit)?,
        None => Ident::new("String", Span::call_site()),
    };
    let name = name.unwrap_or_else(|| default_cast_name(&ast.ident));

    Ok(CastOptions { key_type, name })
}

fn key_type_variant(lit: &LitStr) -> syn::Result<Ident> {
    let value = lit.value();
    KEY_TYPES
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, variant)| Ident::new(variant, lit.span()))
        .ok_or_else(|| CastDeriveError::UnknownKeyType { key_type: value }.into_syn_error(lit.span()))
}

// AddressCast -> "address", Cents -> "cents"
fn default_cast_name(ident: &Ident) -> String {
    let snake = ident.to_string().to_snake_case();
    match snake.strip_suffix("_cast") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => snake,
    }
}

fn find_base_field<'a>(name: &Ident, fields: &[&'a Field]) -> syn::Result<&'a Field> {
    let mut marked = Vec::new();
    for field in fields {
        if is_marked_base(field)? {
            marked.push(*field);
        }
    }

    match marked.len() {
        1 => return Ok(marked[0]),
        0 => {}
        _ => {
            return Err(CastDeriveError::MultipleBaseFields {
                type_name: name.to_string(),
            }
            .into_syn_error(marked[1].span()))
        }
    }

    // Fall back to the single field typed `Cast`
    let typed: Vec<&Field> = fields.iter().copied().filter(|field| is_cast_type(&field.ty)).collect();
    match typed.as_slice() {
        [field] => Ok(*field),
        [] => Err(CastDeriveError::NoBaseField {
            type_name: name.to_string(),
        }
        .into_syn_error(name.span())),
        [_, second, ..] => Err(CastDeriveError::MultipleBaseFields {
            type_name: name.to_string(),
        }
        .into_syn_error(second.span())),
    }
}

fn is_marked_base(field: &Field) -> syn::Result<bool> {
    let mut base = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("cast")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base") {
                base = true;
                Ok(())
            } else {
                Err(meta.error("unsupported field option, expected `base`"))
            }
        })?;
    }
    Ok(base)
}

fn is_cast_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Cast" && segment.arguments.is_empty();
        }
    }
    false
}
