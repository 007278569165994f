use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr};

use crate::RECORD_ATTRIBUTE_NAME;

/// Type-level `#[record(..)]` options.
#[derive(Debug, Default)]
pub(crate) struct TypeAttributes {
    /// `record_type = "..."`.
    pub record_type: Option<LitStr>,
    /// `hooks`: call `RecordHooks` at the end of encode and decode.
    pub hooks: Option<Span>,
    /// `auto_register`: submit the schema for `SchemaRegistry::auto_register`.
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let span = meta.path.span();
                if meta.path.is_ident("record_type") {
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "record type cannot be empty"));
                    }
                    if this.record_type.replace(lit).is_some() {
                        return Err(syn::Error::new(span, "duplicate `record_type`"));
                    }
                } else if meta.path.is_ident("hooks") {
                    this.hooks = Some(span);
                } else if meta.path.is_ident("auto_register") {
                    this.auto_register = Some(span);
                } else {
                    return Err(meta.error(
                        "unknown type attribute; expected `record_type`, `hooks` or `auto_register`",
                    ));
                }
                Ok(())
            })?;
        }
        Ok(this)
    }
}
