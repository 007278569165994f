//! Syntactic inspection of field types.
//!
//! Only the written form is inspected: `Option<..>`, `Vec<u8>`, `String`
//! and `PhantomData<..>` are recognized by their last path segment.

use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type, TypePath};

/// Whether a field holds binary payloads staged as assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryShape {
    None,
    Single,
    List,
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(TypePath { qself: None, path }) => path.segments.last(),
        Type::Group(group) => last_segment(&group.elem),
        Type::Paren(paren) => last_segment(&paren.elem),
        _ => None,
    }
}

/// Returns the single generic argument of `ty` if its last segment is `name`.
fn single_argument<'a>(ty: &'a Type, name: &str) -> Option<&'a Type> {
    let segment = last_segment(ty)?;
    if segment.ident != name {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn is_plain(ty: &Type, name: &str) -> bool {
    last_segment(ty).is_some_and(|s| s.ident == name && s.arguments.is_none())
}

/// `Option<T>` yields `T`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    single_argument(ty, "Option")
}

pub(crate) fn is_string(ty: &Type) -> bool {
    is_plain(ty, "String")
}

pub(crate) fn is_system_time(ty: &Type) -> bool {
    is_plain(ty, "SystemTime")
}

pub(crate) fn is_phantom(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|s| s.ident == "PhantomData")
}

fn is_bytes(ty: &Type) -> bool {
    single_argument(ty, "Vec").is_some_and(|inner| is_plain(inner, "u8"))
}

/// The binary shape of a type with any outer `Option` removed.
pub(crate) fn binary_shape(ty: &Type) -> BinaryShape {
    if is_bytes(ty) {
        BinaryShape::Single
    } else if single_argument(ty, "Vec").is_some_and(is_bytes) {
        BinaryShape::List
    } else {
        BinaryShape::None
    }
}

/// The type as written, without the spaces token printing inserts.
pub(crate) fn type_string(ty: &Type) -> String {
    let mut out = String::new();
    for token in ty.to_token_stream().to_string().split_whitespace() {
        let glue = out
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
            && token.starts_with(|c: char| c.is_alphanumeric() || c == '_');
        if glue {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}
