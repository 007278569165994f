//! The Encoding and Decoding Engines.
//!
//! Both engines are driven by a [`RecordSchema`](crate::schema::RecordSchema)
//! and addressed by field index. Generated code calls one method per field,
//! in declaration order; the method chosen follows the field's
//! [`FieldKind`](crate::schema::FieldKind) and shape.
//!
//! | Field | Encoder | Decoder |
//! |---|---|---|
//! | `Plain` | [`plain`] | [`RecordDecoder::plain`] |
//! | `Plain`, `Vec<u8>` | [`asset`] | [`RecordDecoder::asset`] |
//! | `Plain`, `Vec<Vec<u8>>` | [`asset_list`] | [`RecordDecoder::asset_list`] |
//! | `TypedEncoding(RawValue)` | [`raw_value`] | [`RecordDecoder::raw_value`] |
//! | `TypedEncoding(OpaqueCodable)` | [`codable`] | [`RecordDecoder::codable`] |
//! | `TypedEncoding(OpaqueBinary)` | [`archived`] | [`RecordDecoder::archived`] |
//! | `Reference(Owning)` | [`owning`] | [`RecordDecoder::owning`] |
//! | `Reference(OwnedBy)` | [`owned_by`] | [`RecordDecoder::owned_by`] |
//!
//! Every method has an `_optional` twin for `Option<T>` fields.
//!
//! [`plain`]: RecordEncoder::plain
//! [`asset`]: RecordEncoder::asset
//! [`asset_list`]: RecordEncoder::asset_list
//! [`raw_value`]: RecordEncoder::raw_value
//! [`codable`]: RecordEncoder::codable
//! [`archived`]: RecordEncoder::archived
//! [`owning`]: RecordEncoder::owning
//! [`owned_by`]: RecordEncoder::owned_by

// -----------------------------------------------------------------------------
// Modules

mod decoder;
mod encoder;
mod error;

// -----------------------------------------------------------------------------
// Exports

pub use decoder::RecordDecoder;
pub use encoder::RecordEncoder;
pub use error::{BoxedCause, DecodingError, EncodingError};
