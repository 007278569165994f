use crate::derive_data::RecordStruct;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(info: &RecordStruct) -> proc_macro2::TokenStream {
    use quote::quote_spanned;

    let Some(span) = info.attrs.auto_register else {
        return proc_macro2::TokenStream::new();
    };

    let auto_register_ = crate::path::auto_register_(&info.rk_mapper_path);
    let ident = info.ident;

    quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterSchema>::__register
            )
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &RecordStruct) -> proc_macro2::TokenStream {
    proc_macro2::TokenStream::new()
}
