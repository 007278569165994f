// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod decode;
mod encode;
mod raw_value;
mod schema;

// -----------------------------------------------------------------------------
// Internal API

use auto_register::get_auto_register_impl;
use decode::get_decode_impl;
use encode::get_encode_impl;
use schema::get_schema_impl;

pub(crate) use raw_value::impl_raw_value;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::RecordStruct;

/// Generates `RecordConvertible` and, if requested, the schema registration.
pub(crate) fn impl_record_convertible(info: &RecordStruct) -> TokenStream {
    let rk_mapper_path = &info.rk_mapper_path;
    let record_convertible_ = crate::path::record_convertible_(rk_mapper_path);
    let macro_exports_ = crate::path::macro_exports_(rk_mapper_path);

    let ident = info.ident;
    let record_type = &info.record_type;

    // Classification guarantees exactly one record-name field.
    let Some((_, name_field)) = info.record_name_field() else {
        return syn::Error::new(ident.span(), "missing record name field").into_compile_error();
    };
    let name_ident = &name_field.ident;

    let schema_fn = get_schema_impl(info);
    let encode_fn = get_encode_impl(info);
    let decode_fn = get_decode_impl(info);
    let auto_register = get_auto_register_impl(info);

    quote! {
        impl #record_convertible_ for #ident {
            const RECORD_TYPE: &'static str = #record_type;

            #schema_fn

            #[inline]
            fn record_name(&self) -> &str {
                &self.#name_ident
            }

            #[inline]
            fn set_record_name(&mut self, record_name: #macro_exports_::String) {
                self.#name_ident = record_name;
            }

            #encode_fn

            #decode_fn
        }

        #auto_register
    }
}
