use core::error::Error as StdError;

use thiserror::Error;

use crate::convert::DataError;
use crate::record::RecordValue;
use crate::schema::EncodingStrategy;

/// An error carried as the cause of another error.
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

fn kind_of(value: &Option<RecordValue>) -> &'static str {
    value.as_ref().map_or("nothing", RecordValue::kind_name)
}

// -----------------------------------------------------------------------------
// DecodingError

/// A failure while building an instance from a record.
///
/// Every variant names the record type being decoded; field-level variants
/// also name the field. The rendered message is derived from these values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodingError {
    #[error(
        "Error while trying to initialize an instance of {record_type} from a record: \
         missing field '{field}' on record."
    )]
    MissingField {
        record_type: &'static str,
        field: &'static str,
    },

    #[error(
        "Error while trying to initialize an instance of {record_type} from a record: \
         field '{field}' has type {} but was expected to have type {expected_type}.",
        kind_of(.found)
    )]
    FieldTypeMismatch {
        record_type: &'static str,
        field: &'static str,
        expected_type: &'static str,
        found: Option<RecordValue>,
    },

    #[error(
        "Error while trying to initialize an instance of {record_type} from a record: \
         missing database argument to fetch relationship '{field}'."
    )]
    MissingDatabase {
        record_type: &'static str,
        field: &'static str,
    },

    #[error(
        "Error while trying to initialize an instance of {record_type} from a record: \
         field '{field}' could not be decoded because of error {source}"
    )]
    NestedField {
        record_type: &'static str,
        field: &'static str,
        source: BoxedCause,
    },

    #[error(
        "Error while trying to initialize an instance of {record_type} from a record: \
         multiple records with the same owner"
    )]
    MultipleRecordsWithSameOwner { record_type: &'static str },

    #[error(
        "Error while trying to initialize an instance of {record_type} from a record: \
         field '{field}' could not be decoded since '{enum_type}' could not be \
         instantiated from raw value {raw_value:?}"
    )]
    UnableToDecodeRawType {
        record_type: &'static str,
        field: &'static str,
        enum_type: &'static str,
        raw_value: RecordValue,
    },

    #[error(
        "Error while trying to initialize an instance of {record_type} from a record: \
         field '{field}' could not be decoded as {strategy} because of: {source}"
    )]
    UnableToDecodeDataType {
        record_type: &'static str,
        field: &'static str,
        strategy: EncodingStrategy,
        source: DataError,
    },

    #[error(
        "Error while trying to initialize an instance of {record_type} from a record: \
         decoding hook failed: {source}"
    )]
    Hook {
        record_type: &'static str,
        source: BoxedCause,
    },
}

impl DecodingError {
    /// Returns the record type whose decoding failed.
    pub fn record_type(&self) -> &'static str {
        match self {
            Self::MissingField { record_type, .. }
            | Self::FieldTypeMismatch { record_type, .. }
            | Self::MissingDatabase { record_type, .. }
            | Self::NestedField { record_type, .. }
            | Self::MultipleRecordsWithSameOwner { record_type }
            | Self::UnableToDecodeRawType { record_type, .. }
            | Self::UnableToDecodeDataType { record_type, .. }
            | Self::Hook { record_type, .. } => record_type,
        }
    }

    /// Returns the field whose decoding failed, if the error is field-level.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. }
            | Self::FieldTypeMismatch { field, .. }
            | Self::MissingDatabase { field, .. }
            | Self::NestedField { field, .. }
            | Self::UnableToDecodeRawType { field, .. }
            | Self::UnableToDecodeDataType { field, .. } => Some(field),
            Self::MultipleRecordsWithSameOwner { .. } | Self::Hook { .. } => None,
        }
    }
}

// -----------------------------------------------------------------------------
// EncodingError

/// A failure while building records from an instance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodingError {
    #[error(
        "Error when trying to encode instance of {record_type} to a record: '{field}' is empty; \
         the record name field cannot be empty when encoding"
    )]
    EmptyRecordName {
        record_type: &'static str,
        field: &'static str,
    },

    #[error(
        "Error when trying to encode instance of {record_type} to a record: \
         field '{field}' could not be encoded as {strategy} because of: {source}"
    )]
    UnableToEncodeDataType {
        record_type: &'static str,
        field: &'static str,
        strategy: EncodingStrategy,
        source: DataError,
    },

    #[error(
        "Error when trying to encode instance of {record_type} to a record: \
         field '{field}' is not an owned-by reference"
    )]
    NotAnOwnedByReference {
        record_type: &'static str,
        field: &'static str,
    },

    #[error(
        "Error when trying to encode instance of {record_type} to a record: \
         encoding hook failed: {source}"
    )]
    Hook {
        record_type: &'static str,
        source: BoxedCause,
    },
}

impl EncodingError {
    /// Returns the record type whose encoding failed.
    pub fn record_type(&self) -> &'static str {
        match self {
            Self::EmptyRecordName { record_type, .. }
            | Self::UnableToEncodeDataType { record_type, .. }
            | Self::NotAnOwnedByReference { record_type, .. }
            | Self::Hook { record_type, .. } => record_type,
        }
    }
}
