use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{BinaryShape, ClassifiedField, FieldKind, IgnoreDefault, RecordStruct, Strategy};
use crate::derive_data::SystemField;

fn kind_tokens(field: &ClassifiedField, schema_: &TokenStream) -> TokenStream {
    match &field.kind {
        FieldKind::Plain(_) => quote!(#schema_::FieldKind::Plain),
        FieldKind::RecordName => quote!(#schema_::FieldKind::RecordName),
        FieldKind::Owning => {
            quote!(#schema_::FieldKind::Reference(#schema_::ReferenceDirection::Owning))
        }
        FieldKind::OwnedBy { owner_field } => quote! {
            #schema_::FieldKind::Reference(#schema_::ReferenceDirection::OwnedBy {
                owner_field: #owner_field,
            })
        },
        FieldKind::Encoding(strategy) => {
            let strategy = match strategy {
                Strategy::RawValue => quote!(RawValue),
                Strategy::Codable => quote!(OpaqueCodable),
                Strategy::Binary => quote!(OpaqueBinary),
            };
            quote!(#schema_::FieldKind::TypedEncoding(#schema_::EncodingStrategy::#strategy))
        }
        FieldKind::Ignored(default) => {
            let has_default = !matches!(default, IgnoreDefault::None);
            quote!(#schema_::FieldKind::Ignored { has_default: #has_default })
        }
        FieldKind::System(system) => {
            let system = match system {
                SystemField::CreationDate => quote!(CreationDate),
                SystemField::ModificationDate => quote!(ModificationDate),
                SystemField::ChangeTag => quote!(ChangeTag),
            };
            quote!(#schema_::FieldKind::System(#schema_::SystemField::#system))
        }
    }
}

/// Generates `fn schema()` returning a `static` schema.
pub(crate) fn get_schema_impl(info: &RecordStruct) -> TokenStream {
    let schema_ = crate::path::schema_(&info.rk_mapper_path);
    let record_type = &info.record_type;
    let len = info.fields.len();
    let record_name = info.record_name_field().map_or(0, |(index, _)| index);

    let fields = info.fields.iter().map(|field| {
        let name = field.name();
        let declared_type = field.declared_type();
        let optional = field.optional;
        let kind = kind_tokens(field, &schema_);
        let binary = match field.kind {
            FieldKind::Plain(BinaryShape::Single) => {
                quote!(.with_binary(#schema_::BinaryShape::Single))
            }
            FieldKind::Plain(BinaryShape::List) => quote!(.with_binary(#schema_::BinaryShape::List)),
            _ => TokenStream::new(),
        };
        quote! {
            #schema_::FieldSchema::new(#name, #declared_type, #optional, #kind) #binary
        }
    });

    quote! {
        fn schema() -> &'static #schema_::RecordSchema {
            static FIELDS: [#schema_::FieldSchema; #len] = [ #(#fields),* ];
            static SCHEMA: #schema_::RecordSchema =
                #schema_::RecordSchema::new_unchecked(#record_type, &FIELDS, #record_name);
            &SCHEMA
        }
    }
}
