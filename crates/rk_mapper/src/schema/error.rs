use thiserror::Error;

/// A violated invariant of a [`RecordSchema`](crate::schema::RecordSchema).
///
/// Derived schemas are checked at compile time; this is the runtime check
/// for schemas built by hand and for registry insertion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("record type '{record_type}' has no field marked as record name")]
    MissingRecordName { record_type: &'static str },

    #[error("record type '{record_type}' marks more than one field as record name: {fields:?}")]
    MultipleRecordNames {
        record_type: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("record name field '{field}' of '{record_type}' must be a non-optional String, found {declared_type}")]
    InvalidRecordNameType {
        record_type: &'static str,
        field: &'static str,
        declared_type: &'static str,
    },

    #[error("record name of '{record_type}' is field {expected} ('{field}'), but the schema points at field {found}")]
    RecordNameIndexMismatch {
        record_type: &'static str,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("record type '{record_type}' declares field '{field}' more than once")]
    DuplicateField {
        record_type: &'static str,
        field: &'static str,
    },

    #[error("ignored field '{field}' of '{record_type}' must be optional or have a default value")]
    IgnoredWithoutDefault {
        record_type: &'static str,
        field: &'static str,
    },

    #[error("record type '{record_type}' is already registered with a different schema")]
    DuplicateRecordType { record_type: &'static str },
}
