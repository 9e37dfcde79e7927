#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate in the workspace.
//!
//! * [`macro@skc_error`] turns an enum into a `thiserror` error with context support,
//!   conversion impls, a stable `kind()` label and a caller-safe `public_message()`.
//! * [`macro@skc_slice`] turns a struct into an `Arc`-backed feature slice handle.
//!
//! The examples below are `ignore`d because proc-macro crates cannot run their own
//! expansions in doctests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// Attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source`
///   field (or a field marked `#[source]`/`#[from]`), enabling the `?` operator.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` if an
///   `Internal` variant is present.
/// * **Log Labels**: Generates `kind(&self) -> &'static str`, the snake-case variant name,
///   for structured log fields.
/// * **Public Messages**: Generates `public_message(&self) -> &'static str`. A variant may
///   carry `#[public = "..."]` (or a `&'static str` constant); variants without it report `"internal error"`. Boundary
///   layers return this text to untrusted callers instead of the `Display` output.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field **and** a context field.
/// 4. Tuple or unit variants are rejected.
/// 5. Two variants must not wrap the same source type, or the `From` impls collide.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[skc_derive::skc_error]
/// pub enum StoreError {
///     #[public = "resource not found"]
///     #[error("Not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(path: &str) -> Result<Vec<u8>, StoreError> {
///     std::fs::read(path).context("Loading blob")
/// }
///
/// let err = StoreError::from("boom");
/// assert_eq!(err.kind(), "internal");
/// assert_eq!(err.public_message(), "internal error");
/// ```
#[proc_macro_attribute]
pub fn skc_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is generated as a cheap-to-clone
/// `Arc` wrapper that derefs to the inner state and implements
/// `skc_kernel::domain::registry::FeatureSlice`, so it can be registered in the API state.
///
/// # Example
/// ```rust,ignore
/// #[skc_derive::skc_slice]
/// pub struct Credentials {
///     pub vault: Vault,
/// }
///
/// let slice = Credentials::new(CredentialsInner { vault });
/// assert_eq!(Credentials::NAME, "credentials");
/// ```
#[proc_macro_attribute]
pub fn skc_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
