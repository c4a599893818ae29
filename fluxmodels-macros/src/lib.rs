//! Procedural macros for fluxmodels
//!
//! This crate provides the derive macro used by every catalog function to
//! unpack its positional parameter slice:
//!
//! - `#[derive(Params)]` - Turn a struct of `f64` fields into a typed parameter tuple
//!
//! # Example
//!
//! ```ignore
//! use fluxmodels::prelude::*;
//!
//! #[derive(Params)]
//! struct PowerLawParams {
//!     k: f64,
//!     piv: f64,
//!     index: f64,
//! }
//!
//! let PowerLawParams { k, piv, index } = PowerLawParams::from_slice(&[1.0, 1.0, -2.0])?;
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derive macro for function parameter tuples.
///
/// Generates:
/// - `Params` trait implementation (field order is the positional order)
/// - `TryFrom<&[f64]>` implementation
///
/// `from_slice` returns `FunctionError::ParameterCount` instead of panicking
/// when the slice length does not match the number of fields.
#[proc_macro_derive(Params)]
pub fn derive_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "Params can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Params can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };

    let field_names: Vec<_> = fields.iter().filter_map(|f| f.ident.as_ref()).collect();
    let field_strings: Vec<_> = field_names.iter().map(|n| n.to_string()).collect();
    let field_indices: Vec<_> = (0..field_names.len()).collect();
    let num_fields = field_names.len();

    let expanded = quote! {
        impl ::fluxmodels::Params for #name {
            fn field_names() -> &'static [&'static str] {
                &[#(#field_strings),*]
            }

            fn num_params() -> usize {
                #num_fields
            }

            fn from_slice(values: &[f64]) -> ::std::result::Result<Self, ::fluxmodels::FunctionError> {
                if values.len() != #num_fields {
                    return Err(::fluxmodels::FunctionError::ParameterCount {
                        expected: #num_fields,
                        got: values.len(),
                    });
                }
                Ok(Self {
                    #(#field_names: values[#field_indices]),*
                })
            }

            fn to_vec(&self) -> Vec<f64> {
                vec![#(self.#field_names),*]
            }
        }

        impl ::std::convert::TryFrom<&[f64]> for #name {
            type Error = ::fluxmodels::FunctionError;

            fn try_from(slice: &[f64]) -> ::std::result::Result<Self, Self::Error> {
                <#name as ::fluxmodels::Params>::from_slice(slice)
            }
        }
    };

    TokenStream::from(expanded)
}
