//! Accumulated `compile_error!`s, so one expansion can report every problem at once.
use std::cell::RefCell;

use proc_macro2::{Span, TokenStream};
use quote::quote_spanned;

thread_local! {
    static PENDING: RefCell<Option<TokenStream>> = const { RefCell::new(None) };
}

/// `Err(())` means errors were already recorded and expansion cannot continue.
pub type Result<T, E = ()> = std::result::Result<T, E>;

macro_rules! emit_error {
    ($src:expr, $($tt:tt)+) => {
        crate::error::emit(syn::spanned::Spanned::span(&$src), &format!($($tt)+))
    };
}

macro_rules! abort {
    ($src:expr, $($tt:tt)+) => {{
        emit_error!($src, $($tt)+);
        return Err(());
    }};
}

fn push(tts: TokenStream) {
    PENDING.with_borrow_mut(|pending| pending.get_or_insert_default().extend(tts));
}

pub fn emit(span: Span, msg: &str) {
    push(quote_spanned! {span=> ::std::compile_error! { #msg } });
}

/// Record a `syn` parse failure and continue with `None`.
pub fn try_syn<T>(ret: syn::Result<T>) -> Option<T> {
    ret.map_err(|err| push(err.to_compile_error())).ok()
}

/// Run `f`, returning either its output or every error it recorded.
pub fn collect_errors<T>(f: impl FnOnce() -> Result<T>) -> Result<T, TokenStream> {
    let outer = PENDING.take();
    let ret = f();
    let errors = PENDING.replace(outer);
    match (ret, errors) {
        (Ok(v), None) => Ok(v),
        (_, Some(errors)) => Err(errors),
        (Err(()), None) => Err(quote_spanned! {Span::call_site()=>
            ::std::compile_error! { "declopt-derive failed without a diagnostic" }
        }),
    }
}

/// Generic containers are rejected outright; the generated impls name the type directly.
pub fn check_no_generics(generics: &syn::Generics) -> Result<(), TokenStream> {
    if generics.params.is_empty()
        && generics.where_clause.as_ref().is_none_or(|w| w.predicates.is_empty())
    {
        Ok(())
    } else {
        Err(syn::Error::new(Span::call_site(), "generics are not supported").into_compile_error())
    }
}
