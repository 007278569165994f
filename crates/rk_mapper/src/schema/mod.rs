//! The Field Schema Model.
//!
//! A [`RecordSchema`] is built once per type, normally as a `static` emitted
//! by `#[derive(RecordConvertible)]`, and is read by the engines on every
//! encode and decode call. The engines never inspect type structure
//! themselves.
//!
//! ## Menu
//!
//! - [`FieldSchema`]: name, declared type, optionality, binary shape and [`FieldKind`].
//! - [`FieldKind`]: `Plain`, `RecordName`, `Reference`, `TypedEncoding`, `Ignored`, `System`.
//! - [`RecordSchema`]: the ordered field list of one record type.
//! - [`SchemaError`]: invariant violations of hand-built schemas.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod field_schema;
mod record_schema;

// -----------------------------------------------------------------------------
// Exports

pub use error::SchemaError;
pub use field_schema::{BinaryShape, EncodingStrategy, FieldKind, FieldSchema};
pub use field_schema::{ReferenceDirection, SystemField};
pub use record_schema::RecordSchema;
