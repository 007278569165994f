//! Conversions between Rust values and [`RecordValue`](crate::record::RecordValue)s.
//!
//! - [`RecordField`]: values stored verbatim (`Plain` fields).
//! - [`RawValue`]: enumerations stored through their raw scalar.
//! - [`encode_data`] / [`decode_data`]: the opaque byte encodings.

// -----------------------------------------------------------------------------
// Modules

mod data;
mod raw_value;
mod record_field;

// -----------------------------------------------------------------------------
// Exports

pub use data::{DataError, decode_data, encode_data};
pub use raw_value::RawValue;
pub use record_field::RecordField;
