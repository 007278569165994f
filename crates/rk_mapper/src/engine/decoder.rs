use std::time::SystemTime;

use serde::de::DeserializeOwned;

use crate::RecordConvertible;
use crate::convert::{RawValue, RecordField, decode_data};
use crate::engine::{BoxedCause, DecodingError};
use crate::record::{Record, RecordReference, RecordValue};
use crate::schema::{EncodingStrategy, FieldSchema, RecordSchema};
use crate::store::{Predicate, Query, StoreConnection, StoreError, drain_query};
use crate::HookError;

/// Reads the fields of one record back into values.
///
/// Absent keys are errors on required fields and `None` on optional ones.
/// A present value of the wrong shape is always an error.
///
/// # Example
///
/// ```
/// use rk_mapper::engine::RecordDecoder;
/// use rk_mapper::record::{Record, RecordId};
/// use rk_mapper::schema::{FieldKind, FieldSchema, RecordSchema};
///
/// let schema = RecordSchema::new(
///     "User",
///     vec![
///         FieldSchema::new("id", "String", false, FieldKind::RecordName),
///         FieldSchema::new("age", "i64", false, FieldKind::Plain),
///         FieldSchema::new("nickname", "Option<String>", true, FieldKind::Plain),
///     ],
/// )
/// .unwrap();
///
/// let mut record = Record::new("User", RecordId::new("u1"));
/// record.set("age", 30_i64);
///
/// let decoder = RecordDecoder::new(&schema, &record, None);
/// assert_eq!(decoder.record_name(), "u1");
/// assert_eq!(decoder.plain::<i64>(1).unwrap(), 30);
/// assert_eq!(decoder.plain_optional::<String>(2).unwrap(), None);
/// ```
#[derive(Clone, Copy)]
pub struct RecordDecoder<'a> {
    schema: &'a RecordSchema,
    record: &'a Record,
    store: Option<&'a dyn StoreConnection>,
}

impl<'a> RecordDecoder<'a> {
    pub fn new(
        schema: &'a RecordSchema,
        record: &'a Record,
        store: Option<&'a dyn StoreConnection>,
    ) -> Self {
        log::debug!("decoding {} '{}'", schema.record_type(), record.id());
        Self {
            schema,
            record,
            store,
        }
    }

    #[inline]
    pub fn record(&self) -> &'a Record {
        self.record
    }

    /// The record name, taken from the record's identifier.
    #[inline]
    pub fn record_name(&self) -> String {
        self.record.id().record_name().to_owned()
    }

    #[inline]
    fn field(&self, index: usize) -> &'a FieldSchema {
        self.schema.field_at(index)
    }

    #[inline]
    fn get(&self, field: &FieldSchema) -> Option<&'a RecordValue> {
        self.record.get(field.storage_key())
    }

    // -------------------------------------------------------------------------
    // Errors

    fn missing(&self, field: &FieldSchema) -> DecodingError {
        DecodingError::MissingField {
            record_type: self.schema.record_type(),
            field: field.name(),
        }
    }

    fn mismatch(&self, field: &FieldSchema, found: Option<&RecordValue>) -> DecodingError {
        DecodingError::FieldTypeMismatch {
            record_type: self.schema.record_type(),
            field: field.name(),
            expected_type: field.declared_type(),
            found: found.cloned(),
        }
    }

    fn nested(&self, field: &FieldSchema, source: impl Into<BoxedCause>) -> DecodingError {
        DecodingError::NestedField {
            record_type: self.schema.record_type(),
            field: field.name(),
            source: source.into(),
        }
    }

    fn store(&self, field: &FieldSchema) -> Result<&'a dyn StoreConnection, DecodingError> {
        self.store.ok_or(DecodingError::MissingDatabase {
            record_type: self.schema.record_type(),
            field: field.name(),
        })
    }

    // -------------------------------------------------------------------------
    // Plain

    pub fn plain<T: RecordField>(&self, index: usize) -> Result<T, DecodingError> {
        let field = self.field(index);
        self.plain_optional(index)?.ok_or_else(|| self.missing(field))
    }

    pub fn plain_optional<T: RecordField>(&self, index: usize) -> Result<Option<T>, DecodingError> {
        let field = self.field(index);
        match self.get(field) {
            None => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| self.mismatch(field, Some(value))),
        }
    }

    // -------------------------------------------------------------------------
    // Assets

    fn read_asset(&self, field: &FieldSchema, value: &RecordValue) -> Result<Vec<u8>, DecodingError> {
        let handle = value.as_asset().ok_or_else(|| self.mismatch(field, Some(value)))?;
        handle.read().map_err(|e| {
            log::debug!("cannot read asset {}: {e}", handle.path().display());
            self.mismatch(field, Some(value))
        })
    }

    /// Reads a staged payload. A missing handle is a type mismatch.
    pub fn asset(&self, index: usize) -> Result<Vec<u8>, DecodingError> {
        let field = self.field(index);
        let value = self.get(field).ok_or_else(|| self.mismatch(field, None))?;
        self.read_asset(field, value)
    }

    pub fn asset_optional(&self, index: usize) -> Result<Option<Vec<u8>>, DecodingError> {
        let field = self.field(index);
        self.get(field).map(|value| self.read_asset(field, value)).transpose()
    }

    fn read_asset_list(&self, field: &FieldSchema, value: &RecordValue) -> Result<Vec<Vec<u8>>, DecodingError> {
        let handles = value
            .as_asset_list()
            .ok_or_else(|| self.mismatch(field, Some(value)))?;
        handles
            .iter()
            .map(|handle| {
                handle.read().map_err(|e| {
                    log::debug!("cannot read asset {}: {e}", handle.path().display());
                    self.mismatch(field, Some(value))
                })
            })
            .collect()
    }

    pub fn asset_list(&self, index: usize) -> Result<Vec<Vec<u8>>, DecodingError> {
        let field = self.field(index);
        let value = self.get(field).ok_or_else(|| self.mismatch(field, None))?;
        self.read_asset_list(field, value)
    }

    pub fn asset_list_optional(&self, index: usize) -> Result<Option<Vec<Vec<u8>>>, DecodingError> {
        let field = self.field(index);
        self.get(field)
            .map(|value| self.read_asset_list(field, value))
            .transpose()
    }

    // -------------------------------------------------------------------------
    // Typed encodings

    pub fn raw_value<T: RawValue>(&self, index: usize) -> Result<T, DecodingError> {
        let field = self.field(index);
        self.raw_value_optional(index)?.ok_or_else(|| self.missing(field))
    }

    /// An absent raw value is `None`; an unknown one is still an error.
    pub fn raw_value_optional<T: RawValue>(&self, index: usize) -> Result<Option<T>, DecodingError> {
        let field = self.field(index);
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let raw = T::Raw::from_value(value).ok_or_else(|| self.mismatch(field, Some(value)))?;
        T::from_raw_value(raw)
            .map(Some)
            .ok_or_else(|| DecodingError::UnableToDecodeRawType {
                record_type: self.schema.record_type(),
                field: field.name(),
                enum_type: core::any::type_name::<T>(),
                raw_value: value.clone(),
            })
    }

    fn data<T: DeserializeOwned>(
        &self,
        index: usize,
        strategy: EncodingStrategy,
    ) -> Result<Option<T>, DecodingError> {
        let field = self.field(index);
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let bytes = value.as_bytes().ok_or_else(|| self.mismatch(field, Some(value)))?;
        decode_data(strategy, bytes)
            .map(Some)
            .map_err(|source| DecodingError::UnableToDecodeDataType {
                record_type: self.schema.record_type(),
                field: field.name(),
                strategy,
                source,
            })
    }

    pub fn codable<T: DeserializeOwned>(&self, index: usize) -> Result<T, DecodingError> {
        let field = self.field(index);
        self.codable_optional(index)?.ok_or_else(|| self.missing(field))
    }

    pub fn codable_optional<T: DeserializeOwned>(&self, index: usize) -> Result<Option<T>, DecodingError> {
        self.data(index, EncodingStrategy::OpaqueCodable)
    }

    pub fn archived<T: DeserializeOwned>(&self, index: usize) -> Result<T, DecodingError> {
        let field = self.field(index);
        self.archived_optional(index)?.ok_or_else(|| self.missing(field))
    }

    pub fn archived_optional<T: DeserializeOwned>(&self, index: usize) -> Result<Option<T>, DecodingError> {
        self.data(index, EncodingStrategy::OpaqueBinary)
    }

    // -------------------------------------------------------------------------
    // References

    async fn resolve<T: RecordConvertible>(
        &self,
        field: &FieldSchema,
        reference: &RecordReference,
        optional: bool,
    ) -> Result<Option<T>, DecodingError> {
        let store = self.store(field)?;
        log::trace!(
            "resolving '{}' of {} '{}' to '{}'",
            field.name(),
            self.schema.record_type(),
            self.record.id(),
            reference.record_id(),
        );

        let record = match store.fetch(reference.record_id()).await {
            Ok(record) => record,
            Err(StoreError::UnknownItem(_)) if optional => return Ok(None),
            Err(e) => return Err(self.nested(field, e)),
        };
        T::decode(&record, Some(store))
            .await
            .map(Some)
            .map_err(|e| self.nested(field, e))
    }

    /// Fetches and decodes the record this record points at.
    pub async fn owning<T: RecordConvertible>(&self, index: usize) -> Result<T, DecodingError> {
        let field = self.field(index);
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        let reference = value
            .as_reference()
            .ok_or_else(|| self.mismatch(field, Some(value)))?;
        self.resolve(field, reference, false)
            .await?
            .ok_or_else(|| self.missing(field))
    }

    /// An absent pointer or an unknown target record is `None`.
    pub async fn owning_optional<T: RecordConvertible>(&self, index: usize) -> Result<Option<T>, DecodingError> {
        let field = self.field(index);
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let reference = value
            .as_reference()
            .ok_or_else(|| self.mismatch(field, Some(value)))?;
        self.resolve(field, reference, true).await
    }

    async fn find_owned<T: RecordConvertible>(&self, field: &FieldSchema) -> Result<Option<T>, DecodingError> {
        let store = self.store(field)?;
        let owner_field = field.owner_field().ok_or_else(|| self.mismatch(field, None))?;
        log::trace!(
            "querying {} owned by {} '{}' through '{owner_field}'",
            T::RECORD_TYPE,
            self.schema.record_type(),
            self.record.id(),
        );

        let query = Query::new(
            T::RECORD_TYPE,
            Predicate::References {
                field: owner_field.to_owned(),
                id: self.record.id().clone(),
            },
        );
        let results = drain_query(store, &query)
            .await
            .map_err(|e| self.nested(field, e))?;
        if results.len() > 1 {
            return Err(DecodingError::MultipleRecordsWithSameOwner {
                record_type: self.schema.record_type(),
            });
        }
        let Some((_, result)) = results.into_iter().next() else {
            return Ok(None);
        };

        let record = result.map_err(|e| self.nested(field, e))?;
        T::decode(&record, Some(store))
            .await
            .map(Some)
            .map_err(|e| self.nested(field, e))
    }

    /// Finds the single record pointing back at this one and decodes it.
    pub async fn owned_by<T: RecordConvertible>(&self, index: usize) -> Result<T, DecodingError> {
        let field = self.field(index);
        self.find_owned(field).await?.ok_or_else(|| self.missing(field))
    }

    pub async fn owned_by_optional<T: RecordConvertible>(&self, index: usize) -> Result<Option<T>, DecodingError> {
        self.find_owned(self.field(index)).await
    }

    // -------------------------------------------------------------------------
    // System fields

    #[inline]
    pub fn creation_date(&self) -> Option<SystemTime> {
        self.record.metadata().creation_date
    }

    #[inline]
    pub fn modification_date(&self) -> Option<SystemTime> {
        self.record.metadata().modification_date
    }

    #[inline]
    pub fn change_tag(&self) -> Option<String> {
        self.record.metadata().change_tag.clone()
    }

    // -------------------------------------------------------------------------
    // Finish

    /// Runs the post-decode `hook` against the record.
    pub fn finish_with(&self, hook: impl FnOnce(&Record) -> Result<(), HookError>) -> Result<(), DecodingError> {
        hook(self.record).map_err(|source| DecodingError::Hook {
            record_type: self.schema.record_type(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RecordDecoder;
    use crate::assets::AssetStager;
    use crate::engine::DecodingError;
    use crate::record::{AssetHandle, Record, RecordId, RecordValue};
    use crate::schema::{BinaryShape, EncodingStrategy, FieldKind, FieldSchema, RecordSchema};

    fn schema() -> RecordSchema {
        RecordSchema::new(
            "Photo",
            vec![
                FieldSchema::new("id", "String", false, FieldKind::RecordName),
                FieldSchema::new("width", "u32", false, FieldKind::Plain),
                FieldSchema::new("data", "Vec<u8>", false, FieldKind::Plain)
                    .with_binary(BinaryShape::Single),
                FieldSchema::new(
                    "meta",
                    "Vec<u8>",
                    false,
                    FieldKind::TypedEncoding(EncodingStrategy::OpaqueBinary),
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn required_plain_missing_and_mismatched() {
        let schema = schema();
        let mut record = Record::new("Photo", RecordId::new("p1"));
        let decoder = RecordDecoder::new(&schema, &record, None);
        assert!(matches!(
            decoder.plain::<u32>(1),
            Err(DecodingError::MissingField { field: "width", .. })
        ));

        record.set("width", "wide");
        let decoder = RecordDecoder::new(&schema, &record, None);
        match decoder.plain::<u32>(1) {
            Err(DecodingError::FieldTypeMismatch { expected_type, found, .. }) => {
                assert_eq!(expected_type, "u32");
                assert_eq!(found, Some(RecordValue::from("wide")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unreadable_asset_is_a_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema();
        let mut record = Record::new("Photo", RecordId::new("p1"));

        let decoder = RecordDecoder::new(&schema, &record, None);
        assert!(matches!(
            decoder.asset(2),
            Err(DecodingError::FieldTypeMismatch { found: None, .. })
        ));

        record.set("data", AssetHandle::new(dir.path().join("gone.data")));
        let decoder = RecordDecoder::new(&schema, &record, None);
        assert!(matches!(decoder.asset(2), Err(DecodingError::FieldTypeMismatch { .. })));

        let handle = AssetStager::new(dir.path()).stage(b"pixels").unwrap();
        record.set("data", handle);
        let decoder = RecordDecoder::new(&schema, &record, None);
        assert_eq!(decoder.asset(2).unwrap(), b"pixels");
    }

    #[test]
    fn corrupt_archive_reports_strategy() {
        let schema = schema();
        let mut record = Record::new("Photo", RecordId::new("p1"));
        record.set("meta", RecordValue::Bytes(vec![0xff, 0xff]));

        let decoder = RecordDecoder::new(&schema, &record, None);
        assert!(matches!(
            decoder.archived::<Vec<u8>>(3),
            Err(DecodingError::UnableToDecodeDataType {
                strategy: EncodingStrategy::OpaqueBinary,
                ..
            })
        ));
    }
}
