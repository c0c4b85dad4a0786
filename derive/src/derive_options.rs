use std::collections::HashMap;

use proc_macro2::{Ident, Span, TokenStream};
use quote::{ToTokens, quote, quote_spanned};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, FieldsNamed, LitStr, Type};

use crate::common::{Doc, OptMeta, Override, TY_OPTION, VerbatimExpr, strip_ty_ctor, wrap_anon_item};
use crate::error::{Result, check_no_generics, collect_errors, emit};

pub fn expand(input: &DeriveInput) -> TokenStream {
    if let Err(err) = check_no_generics(&input.generics) {
        return err;
    }

    match collect_errors(|| match &input.data {
        Data::Struct(syn::DataStruct { fields: Fields::Named(fields), .. }) => {
            expand_for_named_struct(input, fields)
        }
        _ => abort!(input.ident, "derive(Options) only supports structs with named fields"),
    }) {
        Ok(def) => wrap_anon_item(def),
        Err(mut tts) => {
            tts.extend(wrap_anon_item(fallback(&input.ident)));
            tts
        }
    }
}

fn fallback(ident: &Ident) -> TokenStream {
    quote! {
        #[automatically_derived]
        impl __rt::Options for #ident {
            fn schema() -> __rt::Result<__rt::Schema, __rt::SchemaError> {
                __rt::unreachable!()
            }
            fn from_record(_: __rt::Record) -> __rt::Result<Self, __rt::ParseError> {
                __rt::unreachable!()
            }
        }
    }
}

struct OptionsImpl<'i> {
    ident: &'i Ident,
    about: Doc,
    fields: Vec<FieldDef<'i>>,
}

struct FieldDef<'i> {
    ident: &'i Ident,
    ty: &'i Type,
    long: String,
    short: Option<char>,
    message: Option<String>,
    default: Option<DefaultDef<'i>>,
}

enum DefaultDef<'i> {
    /// `default = EXPR`, typed as the field type without `Option`.
    Expr { inner_ty: &'i Type, expr: VerbatimExpr },
    /// `default_value = "..."`, coerced at schema build.
    Literal(LitStr),
}

fn check_long_name(name: &LitStr) {
    let s = name.value();
    if s.is_empty() {
        emit_error!(name, "opt(long) name must NOT be empty");
    } else if s.starts_with('-') {
        emit_error!(
            name,
            r#"opt(long) name is automatically prefixed by "--", and you should not add more "-" prefix"#,
        );
    } else if s.contains(|c: char| c.is_whitespace() || c.is_control()) {
        emit_error!(name, "opt(long) name must NOT contain whitespace or control characters");
    }
}

fn check_short_name(c: char, span: Span) {
    if c == '-' || c.is_whitespace() || c.is_control() {
        emit(span, "opt(short) name must NOT be '-', whitespace or control characters");
    }
}

fn expand_for_named_struct<'i>(
    input: &'i DeriveInput,
    fields: &'i FieldsNamed,
) -> Result<OptionsImpl<'i>> {
    let mut out = OptionsImpl {
        ident: &input.ident,
        about: Doc::from_attrs(&input.attrs),
        fields: Vec::with_capacity(fields.named.len()),
    };

    let mut seen_long = HashMap::new();
    let mut seen_short = HashMap::new();

    for field in &fields.named {
        let Some(ident) = field.ident.as_ref() else {
            abort!(field, "only named fields are supported");
        };
        let mut meta = OptMeta::parse_attrs(&field.attrs);

        let long = match &meta.long {
            Some(name) => {
                check_long_name(name);
                name.value()
            }
            None => ident.unraw().to_string(),
        };
        let long_span = meta.long.as_ref().map_or(ident.span(), LitStr::span);
        if let Some(prev) = seen_long.insert(long.clone(), long_span) {
            emit(long_span, "duplicated option names");
            emit(prev, "previously defined here");
        }

        let short = match &meta.short {
            Some(Override::Explicit(c)) => Some((c.value(), c.span())),
            Some(Override::Inherit) => long.chars().next().map(|c| (c, ident.span())),
            None => None,
        };
        if let Some((c, span)) = short {
            check_short_name(c, span);
            if let Some(prev) = seen_short.insert(c, span) {
                emit(span, "duplicated short names");
                emit(prev, "previously defined here");
            }
        }

        let default = match (meta.default.take(), meta.default_value.take()) {
            (Some(expr), None) => {
                let inner_ty = strip_ty_ctor(&field.ty, TY_OPTION).unwrap_or(&field.ty);
                Some(DefaultDef::Expr { inner_ty, expr })
            }
            (None, Some(lit)) => Some(DefaultDef::Literal(lit)),
            (None, None) => None,
            (Some(_), Some(lit)) => {
                emit_error!(lit, "opt(default_value) conflicts with opt(default)");
                None
            }
        };

        out.fields.push(FieldDef {
            ident,
            ty: &field.ty,
            long,
            short: short.map(|(c, _)| c),
            message: meta.message(),
            default,
        });
    }

    Ok(out)
}

impl ToTokens for OptionsImpl<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = self.ident;

        let about = if self.about.0.is_empty() {
            TokenStream::new()
        } else {
            let about = &self.about;
            quote! { .about(#about) }
        };

        let mut decls = TokenStream::new();
        let mut aliases = TokenStream::new();
        for FieldDef { ty, long, short, message, default, .. } in &self.fields {
            let default = match default {
                None => TokenStream::new(),
                Some(DefaultDef::Expr { inner_ty, expr }) => quote_spanned! {expr.span()=>
                    .with_default({
                        let __v: #inner_ty = #expr;
                        __v
                    })
                },
                Some(DefaultDef::Literal(lit)) => quote! { .with_default_literal(#lit) },
            };
            decls.extend(quote_spanned! {ty.span()=>
                .field(
                    __rt::FieldDecl::new(#long, <#ty as __rt::FieldType>::shape())
                    #default
                )
            });
            if let Some(c) = short {
                aliases.extend(quote! { .short(#long, #c) });
            }
            if let Some(msg) = message {
                aliases.extend(quote! { .message(#long, #msg) });
            }
        }

        let field_idents = self.fields.iter().map(|f| f.ident);
        let field_idxs = 0..self.fields.len();

        tokens.extend(quote! {
            #[automatically_derived]
            impl __rt::Options for #ident {
                fn schema() -> __rt::Result<__rt::Schema, __rt::SchemaError> {
                    __rt::SchemaBuilder::new()
                        #about
                        #decls
                        #aliases
                        .build()
                }

                #[allow(unused_mut)]
                fn from_record(
                    mut __record: __rt::Record,
                ) -> __rt::Result<Self, __rt::ParseError> {
                    __rt::Ok(Self {
                        #(#field_idents: __record.take(#field_idxs)?,)*
                    })
                }
            }
        });
    }
}

impl ToTokens for Doc {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.0.to_tokens(tokens);
    }
}
