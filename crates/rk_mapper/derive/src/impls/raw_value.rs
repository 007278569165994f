use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, ExprLit, Fields, Lit, LitStr, Meta};

static RAW_VALUE_ATTRIBUTE_NAME: &str = "raw_value";

/// Reads `#[raw_value = "..."]` from a variant.
fn variant_string(variant: &syn::Variant) -> syn::Result<Option<LitStr>> {
    let mut found = None;
    for attr in &variant.attrs {
        if !attr.path().is_ident(RAW_VALUE_ATTRIBUTE_NAME) {
            continue;
        }
        let Meta::NameValue(pair) = &attr.meta else {
            return Err(syn::Error::new_spanned(attr, "expected `#[raw_value = \"...\"]`"));
        };
        let Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) = &pair.value else {
            return Err(syn::Error::new_spanned(&pair.value, "expected a string literal"));
        };
        if found.replace(lit.clone()).is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate `raw_value`"));
        }
    }
    Ok(found)
}

/// Generates `RawValue` for a fieldless enum.
///
/// Without attributes the raw value is the discriminant as `i64`; with
/// `#[raw_value = "..."]` on every variant it is that string.
pub(crate) fn impl_raw_value(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &ast.data else {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`RawValue` can only be derived for enums",
        ));
    };
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "`RawValue` cannot be derived for generic enums",
        ));
    }

    if data.variants.is_empty() {
        return Err(syn::Error::new(
            ast.ident.span(),
            "`RawValue` needs at least one variant",
        ));
    }

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.fields,
                "`RawValue` variants cannot have fields",
            ));
        }
        variants.push((&variant.ident, variant_string(variant)?));
    }

    let named = variants.iter().filter(|(_, s)| s.is_some()).count();
    if named != 0 && named != variants.len() {
        return Err(syn::Error::new(
            ast.ident.span(),
            "either every variant or no variant must have `#[raw_value = \"...\"]`",
        ));
    }

    let rk_mapper_path = crate::path::rk_mapper();
    let raw_value_ = crate::path::raw_value_(&rk_mapper_path);
    let macro_exports_ = crate::path::macro_exports_(&rk_mapper_path);
    let ident = &ast.ident;

    let body = if named == 0 {
        let idents: Vec<_> = variants.iter().map(|(ident, _)| ident).collect();
        quote! {
            type Raw = i64;

            fn raw_value(&self) -> i64 {
                match self {
                    #( Self::#idents => Self::#idents as i64, )*
                }
            }

            fn from_raw_value(raw: i64) -> #macro_exports_::Option<Self> {
                #(
                    if raw == Self::#idents as i64 {
                        return #macro_exports_::Option::Some(Self::#idents);
                    }
                )*
                #macro_exports_::Option::None
            }
        }
    } else {
        let idents: Vec<_> = variants.iter().map(|(ident, _)| ident).collect();
        let strings: Vec<_> = variants.iter().filter_map(|(_, s)| s.as_ref()).collect();
        quote! {
            type Raw = #macro_exports_::String;

            fn raw_value(&self) -> #macro_exports_::String {
                match self {
                    #( Self::#idents => #macro_exports_::String::from(#strings), )*
                }
            }

            fn from_raw_value(raw: #macro_exports_::String) -> #macro_exports_::Option<Self> {
                match raw.as_str() {
                    #( #strings => #macro_exports_::Option::Some(Self::#idents), )*
                    _ => #macro_exports_::Option::None,
                }
            }
        }
    };

    Ok(quote! {
        impl #raw_value_ for #ident {
            #body
        }
    })
}
