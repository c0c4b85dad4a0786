use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::meta::ParseNestedMeta;
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Attribute, GenericArgument, LitChar, LitStr, PathArguments, Token, Type};

use crate::error::try_syn;

pub const TY_OPTION: &str = "Option";

/// `TyCtor<ArgTy>` => `ArgTy`. `ty_ctor` must be a single-identifier path.
///
/// This is matched literally and does NOT try to be smart, i.e.
/// it does not recognize absolute paths or type aliases.
pub fn strip_ty_ctor<'i>(ty: &'i Type, ty_ctor: &str) -> Option<&'i Type> {
    let Type::Path(syn::TypePath { qself: None, path }) = ty else { return None };
    if path.leading_colon.is_some() || path.segments.len() != 1 {
        return None;
    }
    let seg = &path.segments[0];
    if seg.ident != ty_ctor {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &seg.arguments else { return None };
    match args.args.first() {
        Some(GenericArgument::Type(arg_ty)) if args.args.len() == 1 => Some(arg_ty),
        _ => None,
    }
}

pub fn wrap_anon_item(tts: impl ToTokens) -> TokenStream {
    quote! {
        const _: () = {
            use ::declopt::__private as __rt;
            #tts
        };
    }
}

pub trait OptionExt<T> {
    fn set_once(&mut self, span: Span, v: T);
}

impl<T> OptionExt<T> for Option<T> {
    fn set_once(&mut self, span: Span, v: T) {
        if self.is_none() {
            *self = Some(v);
        } else {
            crate::error::emit(span, "duplicated attribute");
        }
    }
}

/// `key` alone or `key = VALUE`.
pub enum Override<T> {
    Inherit,
    Explicit(T),
}

impl<T: Parse> Parse for Override<T> {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            Self::Explicit(input.parse()?)
        } else {
            Self::Inherit
        })
    }
}

pub struct VerbatimExpr(TokenStream);

impl Parse for VerbatimExpr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(Self(input.parse::<syn::Expr>()?.to_token_stream()))
    }
}

impl ToTokens for VerbatimExpr {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.0.to_tokens(tokens);
    }
}

/// `#[opt(..)]` on a field of `derive(Options)`.
#[derive(Default)]
pub struct OptMeta {
    pub doc: Doc,

    pub long: Option<LitStr>,
    pub short: Option<Override<LitChar>>,
    pub help: Option<LitStr>,

    pub default: Option<VerbatimExpr>,
    pub default_value: Option<LitStr>,
}

impl OptMeta {
    pub fn parse_attrs(attrs: &[Attribute]) -> Self {
        let mut this = Self::default();
        for attr in attrs {
            this.doc.extend_from_attr(attr);
            if attr.path().is_ident("opt") {
                try_syn(attr.parse_nested_meta(|meta| this.parse_update(&meta)));
            }
        }
        this.doc.post_process();
        this
    }

    fn parse_update(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        let path = &meta.path;
        let span = path.span();

        if path.is_ident("long") {
            self.long.set_once(span, meta.value()?.parse()?);
        } else if path.is_ident("short") {
            self.short.set_once(span, meta.input.parse()?);
        } else if path.is_ident("help") {
            self.help.set_once(span, meta.value()?.parse()?);
        } else if path.is_ident("default") {
            self.default.set_once(span, meta.value()?.parse()?);
        } else if path.is_ident("default_value") {
            self.default_value.set_once(span, meta.value()?.parse()?);
        } else {
            emit_error!(path, "unknown attribute");
        }
        Ok(())
    }

    /// The help message: explicit `help` wins over doc-comments.
    pub fn message(&self) -> Option<String> {
        match &self.help {
            Some(s) => Some(s.value()),
            None if !self.doc.0.is_empty() => Some(self.doc.0.clone()),
            None => None,
        }
    }
}

/// Top-level `#[value]` for `derive(ValueEnum)` enum.
pub struct ValueEnumMeta {
    pub rename_all: Rename,
}

impl ValueEnumMeta {
    pub fn parse_attrs(attrs: &[Attribute]) -> Self {
        let mut rename_all = None;
        for attr in attrs {
            if !attr.path().is_ident("value") {
                continue;
            }
            try_syn(attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    rename_all.set_once(meta.path.span(), meta.value()?.parse::<Rename>()?);
                } else {
                    emit_error!(meta.path, "unknown attribute");
                }
                Ok(())
            }));
        }
        Self { rename_all: rename_all.unwrap_or(Rename::KebabCase) }
    }
}

/// Variant `#[value]` for `derive(ValueEnum)` enum.
#[derive(Default)]
pub struct ValueVariantMeta {
    pub name: Option<String>,
}

impl ValueVariantMeta {
    pub fn parse_attrs(attrs: &[Attribute]) -> Self {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident("value") {
                continue;
            }
            try_syn(attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    this.name.set_once(meta.path.span(), meta.value()?.parse::<LitStr>()?.value());
                } else {
                    emit_error!(meta.path, "unknown attribute");
                }
                Ok(())
            }));
        }
        this
    }
}

#[derive(Clone, Copy)]
pub enum Rename {
    CamelCase,
    KebabCase,
    PascalCase,
    ScreamingSnakeCase,
    SnakeCase,
    Lower,
    Upper,
    Verbatim,
}

impl Parse for Rename {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let s = input.parse::<LitStr>()?;
        Ok(match &*s.value() {
            "camelCase" => Self::CamelCase,
            "kebab-case" => Self::KebabCase,
            "PascalCase" => Self::PascalCase,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnakeCase,
            "snake_case" => Self::SnakeCase,
            "lower" => Self::Lower,
            "UPPER" => Self::Upper,
            "verbatim" => Self::Verbatim,
            _ => return Err(syn::Error::new(s.span(), "unknown case conversion")),
        })
    }
}

impl Rename {
    pub fn rename(self, s: String) -> String {
        use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

        match self {
            Self::CamelCase => s.to_lower_camel_case(),
            Self::KebabCase => s.to_kebab_case(),
            Self::PascalCase => s.to_pascal_case(),
            Self::ScreamingSnakeCase => s.to_shouty_snake_case(),
            Self::SnakeCase => s.to_snake_case(),
            Self::Lower => s.to_lowercase(),
            Self::Upper => s.to_uppercase(),
            Self::Verbatim => s,
        }
    }
}

/// Collect doc-comments into a single string.
///
/// Consecutive lines are joined with a space; a blank doc line starts a new line.
#[derive(Default, PartialEq)]
pub struct Doc(pub String);

impl Doc {
    pub fn post_process(&mut self) {
        let len = self.0.trim_ascii_end().len();
        self.0.truncate(len);
    }

    pub fn extend_from_attr(&mut self, attr: &Attribute) {
        if !attr.path().is_ident("doc") {
            return;
        }
        let syn::Meta::NameValue(m) = &attr.meta else { return };
        if let syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(s), .. }) = &m.value {
            let s = s.value();
            let s = s.trim_ascii();
            if s.is_empty() {
                if !self.0.is_empty() && !self.0.ends_with('\n') {
                    self.0.push('\n');
                }
            } else {
                if !self.0.is_empty() && !self.0.ends_with('\n') {
                    self.0.push(' ');
                }
                self.0.push_str(s);
            }
        } else {
            emit_error!(m.value, "only literal doc comment is supported");
        }
    }

    /// Collect only doc-comments, for containers that take no other attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut doc = Self::default();
        for attr in attrs {
            doc.extend_from_attr(attr);
        }
        doc.post_process();
        doc
    }
}
