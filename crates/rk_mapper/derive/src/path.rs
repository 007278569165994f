//! Paths into `rk_mapper` used by generated code.
//!
//! Generated code must name the runtime crate the way the calling crate sees
//! it, see [`rk_mapper`].

use proc_macro2::TokenStream;
use quote::quote;

/// Get the path under which the caller reaches `rk_mapper`.
///
/// 1. For crates that depend on `rk_mapper`, `::rk_mapper` is returned.
/// 2. For crates that depend on `recordkit`, `::recordkit::mapper` is returned.
/// 3. For crates that depend on `rk_core`, `::rk_core::mapper` is returned.
/// 4. For crates that depend on `rk`, `::rk::mapper` is returned.
/// 5. Otherwise `::rk_mapper` is returned, which may be incorrect.
///
/// Resolving reads the caller's manifest, so the path is computed once per
/// derive and passed around.
pub(crate) fn rk_mapper() -> syn::Path {
    rk_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("rk_mapper"))
}

#[inline(always)]
pub(crate) fn macro_exports_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::__macro_exports }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::__macro_exports::auto_register }
}

#[inline(always)]
pub(crate) fn record_convertible_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::RecordConvertible }
}

#[inline(always)]
pub(crate) fn record_hooks_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::RecordHooks }
}

#[inline(always)]
pub(crate) fn encoded_record_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::EncodedRecord }
}

#[inline(always)]
pub(crate) fn boxed_future_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::BoxedFuture }
}

#[inline]
pub(crate) fn record_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::record::Record }
}

#[inline]
pub(crate) fn store_connection_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::store::StoreConnection }
}

#[inline]
pub(crate) fn schema_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::schema }
}

#[inline]
pub(crate) fn engine_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::engine }
}

#[inline]
pub(crate) fn raw_value_(rk_mapper_path: &syn::Path) -> TokenStream {
    quote! { #rk_mapper_path::convert::RawValue }
}
