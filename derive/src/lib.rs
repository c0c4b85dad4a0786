#![forbid(unsafe_code)]
use proc_macro::TokenStream;
use syn::DeriveInput;

#[macro_use]
mod error;

mod common;
mod derive_options;
mod derive_value_enum;

#[proc_macro_derive(Options, attributes(opt))]
pub fn derive_options(tts: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(tts as DeriveInput);
    derive_options::expand(&input).into()
}

#[proc_macro_derive(ValueEnum, attributes(value))]
pub fn derive_value_enum(tts: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(tts as DeriveInput);
    derive_value_enum::expand(&input).into()
}
