//! Attribute macros injecting instrumentation into functions.
//!
//! `#[span_fn]` opens a thread span covering the function's execution;
//! `#[log_fn]` records function entry in the log stream.
//!
//! Both are re-exported through the tracing prelude:
//!
//! ```rust,ignore
//! use skylight_tracing::prelude::*;
//!
//! #[span_fn]
//! fn compute_checksum(data: &[u8]) -> u32 {
//!     data.iter().fold(0u32, |acc, &b| acc.wrapping_add(b as u32))
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream, Result},
    parse_macro_input, parse_quote, ItemFn, LitStr,
};

struct TraceArgs {
    alternative_name: Option<LitStr>,
}

impl Parse for TraceArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        if input.is_empty() {
            Ok(Self {
                alternative_name: None,
            })
        } else {
            Ok(Self {
                alternative_name: Some(input.parse::<LitStr>()?),
            })
        }
    }
}

/// Instruments a function with a scope-based span.
///
/// The span name defaults to the function name, prefixed with the module
/// path; pass a string literal to override it:
///
/// ```rust,ignore
/// #[span_fn("frame_update")]
/// fn update(world: &mut World) { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn span_fn(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as TraceArgs);
    let mut function = parse_macro_input!(input as ItemFn);

    if function.sig.asyncness.is_some() {
        return syn::Error::new_spanned(
            &function.sig,
            "span_fn instruments synchronous functions; thread spans cannot follow a future across threads",
        )
        .to_compile_error()
        .into();
    }

    let function_name = args
        .alternative_name
        .map_or(function.sig.ident.to_string(), |n| n.value());

    function.block.stmts.insert(
        0,
        parse_quote! {
            span_scope!(_METADATA_FUNC, concat!(module_path!(), "::", #function_name));
        },
    );

    TokenStream::from(quote! {
        #function
    })
}

/// Logs function entry with the function name at trace level.
#[proc_macro_attribute]
pub fn log_fn(args: TokenStream, input: TokenStream) -> TokenStream {
    assert!(args.is_empty());
    let mut function = parse_macro_input!(input as ItemFn);
    let function_name = function.sig.ident.to_string();

    function.block.stmts.insert(
        0,
        parse_quote! {
            trace!(#function_name);
        },
    );
    TokenStream::from(quote! {
        #function
    })
}
