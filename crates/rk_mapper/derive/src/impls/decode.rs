use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::derive_data::{BinaryShape, ClassifiedField, FieldKind, IgnoreDefault, RecordStruct};
use crate::derive_data::{Strategy, SystemField};

/// The expression producing the value of the field at `index`.
fn field_expr(index: usize, field: &ClassifiedField, macro_exports_: &TokenStream) -> TokenStream {
    let (method, is_async) = match &field.kind {
        FieldKind::RecordName => return quote!(__decoder.record_name()),
        FieldKind::System(SystemField::CreationDate) => return quote!(__decoder.creation_date()),
        FieldKind::System(SystemField::ModificationDate) => {
            return quote!(__decoder.modification_date());
        }
        FieldKind::System(SystemField::ChangeTag) => return quote!(__decoder.change_tag()),
        FieldKind::Ignored(IgnoreDefault::None) => return quote!(#macro_exports_::Option::None),
        FieldKind::Ignored(IgnoreDefault::Trait) => {
            return quote!(#macro_exports_::Default::default());
        }
        FieldKind::Ignored(IgnoreDefault::Expr(expr)) => return quote!(#expr),
        FieldKind::Plain(BinaryShape::None) => ("plain", false),
        FieldKind::Plain(BinaryShape::Single) => ("asset", false),
        FieldKind::Plain(BinaryShape::List) => ("asset_list", false),
        FieldKind::Encoding(Strategy::RawValue) => ("raw_value", false),
        FieldKind::Encoding(Strategy::Codable) => ("codable", false),
        FieldKind::Encoding(Strategy::Binary) => ("archived", false),
        FieldKind::Owning => ("owning", true),
        FieldKind::OwnedBy { .. } => ("owned_by", true),
    };

    let method = if field.optional {
        format_ident!("{}_optional", method)
    } else {
        format_ident!("{}", method)
    };
    if is_async {
        quote!(__decoder.#method(#index).await?)
    } else {
        quote!(__decoder.#method(#index)?)
    }
}

/// Generates `fn decode`.
///
/// Fields are read into locals in declaration order, then the instance is
/// built in one expression so that no partially built value exists.
pub(crate) fn get_decode_impl(info: &RecordStruct) -> TokenStream {
    let rk_mapper_path = &info.rk_mapper_path;
    let engine_ = crate::path::engine_(rk_mapper_path);
    let record_ = crate::path::record_(rk_mapper_path);
    let store_connection_ = crate::path::store_connection_(rk_mapper_path);
    let boxed_future_ = crate::path::boxed_future_(rk_mapper_path);
    let macro_exports_ = crate::path::macro_exports_(rk_mapper_path);

    let locals: Vec<_> = (0..info.fields.len())
        .map(|index| format_ident!("__field_{}", index))
        .collect();

    let reads = info.fields.iter().enumerate().map(|(index, field)| {
        let local = &locals[index];
        let ty = &field.ty;
        let expr = field_expr(index, field, &macro_exports_);
        quote!(let #local: #ty = #expr;)
    });

    let idents = info.fields.iter().map(|field| &field.ident);
    let skipped = &info.skipped;

    let (binding, finish) = if info.attrs.hooks.is_some() {
        let record_hooks_ = crate::path::record_hooks_(rk_mapper_path);
        (
            quote!(let mut __value),
            quote! {
                __decoder.finish_with(|__record| {
                    #record_hooks_::will_finish_decoding(&mut __value, __record)
                })?;
            },
        )
    } else {
        (quote!(let __value), TokenStream::new())
    };

    quote! {
        fn decode<'a>(
            record: &'a #record_,
            store: #macro_exports_::Option<&'a dyn #store_connection_>,
        ) -> #boxed_future_<'a, #macro_exports_::Result<Self, #engine_::DecodingError>> {
            #macro_exports_::Box::pin(async move {
                let __decoder = #engine_::RecordDecoder::new(Self::schema(), record, store);
                #(#reads)*
                #binding = Self {
                    #(#idents: #locals,)*
                    #(#skipped: #macro_exports_::Default::default(),)*
                };
                #finish
                #macro_exports_::Result::Ok(__value)
            })
        }
    }
}
