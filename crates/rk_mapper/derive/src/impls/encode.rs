use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::derive_data::{BinaryShape, ClassifiedField, FieldKind, RecordStruct, Strategy};

/// One encoder call for the field at `index`, or nothing.
fn field_statement(index: usize, field: &ClassifiedField) -> TokenStream {
    let ident = &field.ident;
    let optional = field.optional;

    let (method, fallible) = match &field.kind {
        FieldKind::RecordName | FieldKind::Ignored(_) | FieldKind::System(_) => {
            return TokenStream::new();
        }
        FieldKind::Plain(BinaryShape::None) => ("plain", false),
        FieldKind::Plain(BinaryShape::Single) => ("asset", false),
        FieldKind::Plain(BinaryShape::List) => ("asset_list", false),
        FieldKind::Encoding(Strategy::RawValue) => ("raw_value", false),
        FieldKind::Encoding(Strategy::Codable) => ("codable", true),
        FieldKind::Encoding(Strategy::Binary) => ("archived", true),
        FieldKind::Owning => ("owning", true),
        FieldKind::OwnedBy { .. } => ("owned_by", true),
    };

    // Binary payloads are passed as slices.
    let binary = matches!(field.kind, FieldKind::Plain(BinaryShape::Single | BinaryShape::List));
    let call = match (optional, binary) {
        (false, _) => {
            let method = format_ident!("{}", method);
            quote!(__encoder.#method(#index, &self.#ident))
        }
        (true, false) => {
            let method = format_ident!("{}_optional", method);
            quote!(__encoder.#method(#index, self.#ident.as_ref()))
        }
        (true, true) => {
            let method = format_ident!("{}_optional", method);
            quote!(__encoder.#method(#index, self.#ident.as_deref()))
        }
    };

    if fallible {
        quote!(#call?;)
    } else {
        quote!(#call;)
    }
}

/// Generates `fn encode`.
pub(crate) fn get_encode_impl(info: &RecordStruct) -> TokenStream {
    let rk_mapper_path = &info.rk_mapper_path;
    let engine_ = crate::path::engine_(rk_mapper_path);
    let record_ = crate::path::record_(rk_mapper_path);
    let encoded_record_ = crate::path::encoded_record_(rk_mapper_path);
    let macro_exports_ = crate::path::macro_exports_(rk_mapper_path);

    let name_ident = info.record_name_field().map(|(_, field)| &field.ident);

    let statements = info
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| field_statement(index, field));

    let finish = if info.attrs.hooks.is_some() {
        let record_hooks_ = crate::path::record_hooks_(rk_mapper_path);
        quote! {
            __encoder.finish_with(|__record| #record_hooks_::will_finish_encoding(self, __record))
        }
    } else {
        quote! {
            #macro_exports_::Result::Ok(__encoder.finish())
        }
    };

    quote! {
        fn encode(
            &self,
            base: #macro_exports_::Option<#record_>,
        ) -> #macro_exports_::Result<#encoded_record_, #engine_::EncodingError> {
            #[allow(unused_mut)]
            let mut __encoder = #engine_::RecordEncoder::begin(Self::schema(), &self.#name_ident, base)?;
            #(#statements)*
            #finish
        }
    }
}
