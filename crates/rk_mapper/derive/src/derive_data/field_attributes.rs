use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Ident, LitStr, Token};

use crate::RECORD_ATTRIBUTE_NAME;

/// The typed encoding named by `encoding = ..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    RawValue,
    Codable,
    Binary,
}

/// The default of an ignored field.
#[derive(Debug, Clone)]
pub(crate) enum IgnoreDefault {
    /// No default given; only valid for `Option` fields.
    None,
    /// `default`: `Default::default()`.
    Trait,
    /// `default = expr`.
    Expr(Box<Expr>),
}

#[derive(Debug, Clone)]
pub(crate) enum MarkerKind {
    Name,
    Owning,
    OwnedBy(Option<LitStr>),
    Encoding(Strategy),
    Ignore(IgnoreDefault),
}

impl MarkerKind {
    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Owning | Self::OwnedBy(_) => "reference",
            Self::Encoding(_) => "encoding",
            Self::Ignore(_) => "ignore",
        }
    }
}

/// One field-kind marker and where it was written.
#[derive(Debug, Clone)]
pub(crate) struct Marker {
    pub kind: MarkerKind,
    pub span: Span,
}

/// All markers found in the `#[record(..)]` attributes of one field.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    pub markers: Vec<Marker>,
}

impl FieldAttributes {
    /// Parses every `#[record(..)]` attribute of a field.
    ///
    /// Unknown keys are errors. Conflicting markers are not: they are
    /// reported by the classifier, which sees all of them at once.
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
                continue;
            }
            let mut pending_default: Option<(IgnoreDefault, Span)> = None;
            attr.parse_nested_meta(|meta| {
                let span = meta.path.span();
                if meta.path.is_ident("name") {
                    this.push(MarkerKind::Name, span);
                } else if meta.path.is_ident("reference") {
                    let kind = parse_reference(&meta)?;
                    this.push(kind, span);
                } else if meta.path.is_ident("encoding") {
                    let kind = parse_encoding(&meta)?;
                    this.push(kind, span);
                } else if meta.path.is_ident("ignore") {
                    this.push(MarkerKind::Ignore(IgnoreDefault::None), span);
                } else if meta.path.is_ident("default") {
                    let default = if meta.input.peek(Token![=]) {
                        IgnoreDefault::Expr(Box::new(meta.value()?.parse()?))
                    } else {
                        IgnoreDefault::Trait
                    };
                    pending_default = Some((default, span));
                } else {
                    return Err(meta.error(
                        "unknown field attribute; expected `name`, `reference`, `encoding`, `ignore` or `default`",
                    ));
                }
                Ok(())
            })?;

            if let Some((default, span)) = pending_default {
                let ignore = this
                    .markers
                    .iter_mut()
                    .rev()
                    .find(|m| matches!(m.kind, MarkerKind::Ignore(IgnoreDefault::None)));
                match ignore {
                    Some(marker) => marker.kind = MarkerKind::Ignore(default),
                    None => {
                        return Err(syn::Error::new(
                            span,
                            "`default` is only valid together with `ignore`, e.g. `#[record(ignore, default)]`",
                        ));
                    }
                }
            }
        }
        Ok(this)
    }

    fn push(&mut self, kind: MarkerKind, span: Span) {
        self.markers.push(Marker { kind, span });
    }
}

/// `reference`, `reference(owning)`, `reference(owned_by)`, `reference(owned_by = "f")`.
fn parse_reference(meta: &ParseNestedMeta) -> syn::Result<MarkerKind> {
    if meta.input.is_empty() || meta.input.peek(Token![,]) {
        return Ok(MarkerKind::Owning);
    }
    let mut kind = None;
    meta.parse_nested_meta(|inner| {
        if kind.is_some() {
            return Err(inner.error("a reference has exactly one direction"));
        }
        if inner.path.is_ident("owning") {
            kind = Some(MarkerKind::Owning);
        } else if inner.path.is_ident("owned_by") {
            let owner_field = if inner.input.peek(Token![=]) {
                Some(inner.value()?.parse::<LitStr>()?)
            } else {
                None
            };
            kind = Some(MarkerKind::OwnedBy(owner_field));
        } else {
            return Err(inner.error("expected `owning` or `owned_by`"));
        }
        Ok(())
    })?;
    Ok(kind.unwrap_or(MarkerKind::Owning))
}

/// `encoding = raw_value | codable | binary`.
fn parse_encoding(meta: &ParseNestedMeta) -> syn::Result<MarkerKind> {
    let ident: Ident = meta.value()?.parse()?;
    let strategy = match ident.to_string().as_str() {
        "raw_value" => Strategy::RawValue,
        "codable" => Strategy::Codable,
        "binary" => Strategy::Binary,
        _ => {
            return Err(syn::Error::new(
                ident.span(),
                "expected `raw_value`, `codable` or `binary`",
            ));
        }
    };
    Ok(MarkerKind::Encoding(strategy))
}
