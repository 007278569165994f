//! Parsing and classification of the derive input.

// -----------------------------------------------------------------------------
// Modules

mod classifier;
mod field_attributes;
mod field_type;
mod record_struct;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use classifier::{ClassifiedField, FieldKind, SystemField};
pub(crate) use field_attributes::{IgnoreDefault, Strategy};
pub(crate) use field_type::BinaryShape;
pub(crate) use record_struct::RecordStruct;
