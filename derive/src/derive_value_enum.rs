use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{DeriveInput, Ident};

use crate::common::{ValueEnumMeta, ValueVariantMeta, wrap_anon_item};
use crate::error::{Result, check_no_generics, collect_errors};

pub fn expand(input: &DeriveInput) -> TokenStream {
    if let Err(err) = check_no_generics(&input.generics) {
        return err;
    }

    match collect_errors(|| expand_impl(input)) {
        Ok(def) => wrap_anon_item(def),
        Err(mut tts) => {
            tts.extend(wrap_anon_item(ValueEnumImpl {
                ident: &input.ident,
                variants: Vec::new(),
                complete: false,
            }));
            tts
        }
    }
}

fn expand_impl(def: &DeriveInput) -> Result<ValueEnumImpl<'_>> {
    let syn::Data::Enum(enum_def) = &def.data else {
        abort!(def.ident, "derive(ValueEnum) can only be used on enums");
    };
    let meta = ValueEnumMeta::parse_attrs(&def.attrs);

    let mut seen = HashMap::new();
    let mut variants = Vec::with_capacity(enum_def.variants.len());
    for variant in &enum_def.variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            emit_error!(variant.ident, "only unit variant is supported");
            continue;
        }
        let symbol = match ValueVariantMeta::parse_attrs(&variant.attrs).name {
            Some(name) => name,
            None => meta.rename_all.rename(variant.ident.to_string()),
        };
        if let Some(prev) = seen.insert(symbol.clone(), &variant.ident) {
            emit_error!(variant.ident, "duplicated symbol `{symbol}` after renaming");
            emit_error!(prev, "first variant here");
        }
        variants.push(Variant { symbol, ident: &variant.ident });
    }

    Ok(ValueEnumImpl { ident: &def.ident, variants, complete: true })
}

struct ValueEnumImpl<'i> {
    ident: &'i Ident,
    /// In declaration order.
    variants: Vec<Variant<'i>>,
    /// False for the fallback emitted next to compile errors.
    complete: bool,
}

struct Variant<'i> {
    symbol: String,
    ident: &'i Ident,
}

impl ToTokens for ValueEnumImpl<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let name = self.ident;
        let symbols = self.variants.iter().map(|v| &v.symbol).collect::<Vec<_>>();
        let idents = self.variants.iter().map(|v| v.ident).collect::<Vec<_>>();
        let as_symbol = if self.complete {
            quote! {
                match *self {
                    #(Self::#idents => #symbols,)*
                }
            }
        } else {
            quote! { __rt::unreachable!() }
        };

        tokens.extend(quote! {
            #[automatically_derived]
            impl __rt::ValueEnum for #name {
                const SYMBOLS: &'static [&'static __rt::str] = &[#(#symbols),*];

                #[allow(unreachable_code)]
                fn parse_value(__v: &__rt::str) -> __rt::Option<Self> {
                    __rt::Some(match __v {
                        #(#symbols => Self::#idents,)*
                        _ => return __rt::None,
                    })
                }

                fn as_symbol(&self) -> &'static __rt::str {
                    #as_symbol
                }
            }

            #[automatically_derived]
            impl __rt::FieldType for #name {
                fn shape() -> __rt::TypeShape {
                    __rt::enum_shape::<Self>()
                }
            }

            #[automatically_derived]
            impl __rt::FromValue for #name {
                fn from_value(__v: __rt::Value) -> __rt::Option<Self> {
                    __rt::enum_from_value::<Self>(__v)
                }
            }

            #[automatically_derived]
            impl __rt::From<#name> for __rt::Value {
                fn from(__v: #name) -> Self {
                    __rt::Value::Enum(__rt::String::from(__rt::ValueEnum::as_symbol(&__v)))
                }
            }
        });
    }
}
