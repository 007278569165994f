//! See following macros:
//!
//! - [`RecordConvertible`](derive_record_convertible)
//! - [`RawValue`](derive_raw_value)
#![cfg_attr(docsrs, feature(doc_cfg))]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static RECORD_ATTRIBUTE_NAME: &str = "record";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Record Mapping Derivation
///
/// `#[derive(RecordConvertible)]` implements `RecordConvertible` for a struct
/// with named fields: a static field schema, `encode`, `decode` and the
/// identity accessors.
///
/// ## Type Attributes
///
/// - `#[record(record_type = "Name")]`: the record type name, default is the
///   struct name.
/// - `#[record(hooks)]`: call the type's `RecordHooks` implementation at the
///   end of encode and decode.
/// - `#[record(auto_register)]`: submit the schema to
///   `SchemaRegistry::auto_register`. A no-op without the `auto_register`
///   feature.
///
/// ## Field Markers
///
/// A field takes at most one marker:
///
/// | Marker | Kind |
/// |---|---|
/// | none | stored verbatim (`Vec<u8>` and `Vec<Vec<u8>>` as assets) |
/// | `name` | the record name; exactly one `String` field per type |
/// | `reference` / `reference(owning)` | child record, pointed at from this record |
/// | `reference(owned_by)` | child record pointing back at this one under `<RecordType>Owner` |
/// | `reference(owned_by = "key")` | same, with a custom back-pointer key |
/// | `encoding = raw_value` | an enum stored through its `RawValue` |
/// | `encoding = codable` | a serde value stored as JSON bytes |
/// | `encoding = binary` | a serde value stored as binary archive bytes |
/// | `ignore` | not stored; `Option` fields decode as `None` |
/// | `ignore, default` / `ignore, default = expr` | not stored; decoded as the default |
///
/// Unmarked `creation_date`, `modification_date` (`Option<SystemTime>`) and
/// `record_change_tag` (`Option<String>`) fields are filled from the record
/// metadata. `PhantomData` fields are skipped.
///
/// ## Example
///
/// ```rust, ignore
/// #[derive(RecordConvertible)]
/// #[record(record_type = "AppUser")]
/// struct User {
///     #[record(name)]
///     id: String,
///     age: i64,
///     nickname: Option<String>,
///     #[record(reference(owned_by))]
///     profile: Option<Profile>,
///     #[record(encoding = raw_value)]
///     tier: Tier,
/// }
/// ```
#[proc_macro_derive(RecordConvertible, attributes(record))]
pub fn derive_record_convertible(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let info = match derive_data::RecordStruct::from_input(&ast) {
        Ok(info) => info,
        Err(err) => return err.into_compile_error().into(),
    };

    let impls = impls::impl_record_convertible(&info);

    TokenStream::from(quote! {
        const _: () = {
            #impls
        };
    })
}

/// # Raw Value Derivation
///
/// Implements `RawValue` for a fieldless enum.
///
/// Without attributes the raw value is the discriminant as `i64`. With
/// `#[raw_value = "..."]` on every variant, it is that string.
///
/// ## Example
///
/// ```rust, ignore
/// #[derive(RawValue)]
/// enum Tier {
///     Free = 0,
///     Paid = 10,
/// }
///
/// #[derive(RawValue)]
/// enum Theme {
///     #[raw_value = "light"]
///     Light,
///     #[raw_value = "dark"]
///     Dark,
/// }
/// ```
#[proc_macro_derive(RawValue, attributes(raw_value))]
pub fn derive_raw_value(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match impls::impl_raw_value(&ast) {
        Ok(tokens) => TokenStream::from(quote! {
            const _: () = {
                #tokens
            };
        }),
        Err(err) => err.into_compile_error().into(),
    }
}
