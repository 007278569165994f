use std::io;

use serde::Serialize;

use crate::assets::AssetStager;
use crate::convert::{RawValue, RecordField, encode_data};
use crate::engine::EncodingError;
use crate::record::{AssetHandle, Record, RecordId, RecordReference, RecordValue, ReferenceAction};
use crate::schema::{EncodingStrategy, FieldSchema, RecordSchema};
use crate::{EncodedRecord, HookError, RecordConvertible};

/// Builds the primary record and the auxiliary records of one instance.
///
/// # Example
///
/// ```
/// use rk_mapper::engine::RecordEncoder;
/// use rk_mapper::schema::{FieldKind, FieldSchema, RecordSchema};
///
/// let schema = RecordSchema::new(
///     "User",
///     vec![
///         FieldSchema::new("id", "String", false, FieldKind::RecordName),
///         FieldSchema::new("age", "i64", false, FieldKind::Plain),
///     ],
/// )
/// .unwrap();
///
/// let mut encoder = RecordEncoder::begin(&schema, "u1", None).unwrap();
/// encoder.plain(1, &30_i64);
/// let encoded = encoder.finish();
///
/// assert_eq!(encoded.instance.id().record_name(), "u1");
/// assert_eq!(encoded.instance.len(), 1);
/// assert!(encoded.references.is_empty());
/// ```
pub struct RecordEncoder<'s> {
    schema: &'s RecordSchema,
    record: Record,
    references: Vec<Record>,
    stager: AssetStager,
}

impl<'s> RecordEncoder<'s> {
    /// Starts encoding an instance whose record-name field holds `record_name`.
    ///
    /// A supplied `base` record becomes the primary record as is. Otherwise a
    /// fresh record is created, which requires a non-empty `record_name`.
    pub fn begin(
        schema: &'s RecordSchema,
        record_name: &str,
        base: Option<Record>,
    ) -> Result<Self, EncodingError> {
        let record = match base {
            Some(base) => base,
            None if record_name.is_empty() => {
                return Err(EncodingError::EmptyRecordName {
                    record_type: schema.record_type(),
                    field: schema.record_name_field().name(),
                });
            }
            None => Record::new(schema.record_type(), RecordId::new(record_name)),
        };
        log::debug!("encoding {} '{}'", schema.record_type(), record.id());

        Ok(Self {
            schema,
            record,
            references: Vec::new(),
            stager: AssetStager::shared(),
        })
    }

    /// Stages binary payloads with `stager` instead of the shared one.
    pub fn with_stager(mut self, stager: AssetStager) -> Self {
        self.stager = stager;
        self
    }

    #[inline]
    fn field(&self, index: usize) -> &'s FieldSchema {
        self.schema.field_at(index)
    }

    #[inline]
    fn key(&self, index: usize) -> &'static str {
        self.field(index).storage_key()
    }

    /// The primary record built so far.
    #[inline]
    pub fn record(&self) -> &Record {
        &self.record
    }

    #[inline]
    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    // -------------------------------------------------------------------------
    // Plain

    pub fn plain<T: RecordField>(&mut self, index: usize, value: &T) {
        let key = self.key(index);
        self.record.set(key, value.to_value());
    }

    /// Writes `value`, or clears the key when it is `None`.
    pub fn plain_optional<T: RecordField>(&mut self, index: usize, value: Option<&T>) {
        match value {
            Some(value) => self.plain(index, value),
            None => {
                let key = self.key(index);
                self.record.remove(key);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Assets

    fn stage(&self, index: usize, bytes: &[u8]) -> Option<AssetHandle> {
        self.staged(index, self.stager.stage(bytes))
    }

    fn staged(&self, index: usize, result: io::Result<AssetHandle>) -> Option<AssetHandle> {
        match result {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!(
                    "skipping asset of field '{}' on {}: {e}",
                    self.key(index),
                    self.schema.record_type(),
                );
                None
            }
        }
    }

    fn collect_staged(
        &self,
        index: usize,
        results: impl IntoIterator<Item = io::Result<AssetHandle>>,
    ) -> Vec<AssetHandle> {
        results
            .into_iter()
            .filter_map(|result| self.staged(index, result))
            .collect()
    }

    /// Stages `bytes` as an asset. A staging failure leaves the key untouched.
    pub fn asset(&mut self, index: usize, bytes: &[u8]) {
        if let Some(handle) = self.stage(index, bytes) {
            let key = self.key(index);
            self.record.set(key, handle);
        }
    }

    pub fn asset_optional(&mut self, index: usize, bytes: Option<&[u8]>) {
        match bytes {
            Some(bytes) => self.asset(index, bytes),
            None => {
                let key = self.key(index);
                self.record.remove(key);
            }
        }
    }

    /// Stages every payload; payloads that fail to stage are left out.
    ///
    /// The key is always written, so a list whose payloads all fail is
    /// stored as an empty `AssetList`.
    pub fn asset_list(&mut self, index: usize, items: &[Vec<u8>]) {
        let handles = self.collect_staged(index, items.iter().map(|bytes| self.stager.stage(bytes)));
        let key = self.key(index);
        self.record.set(key, RecordValue::AssetList(handles));
    }

    pub fn asset_list_optional(&mut self, index: usize, items: Option<&[Vec<u8>]>) {
        match items {
            Some(items) => self.asset_list(index, items),
            None => {
                let key = self.key(index);
                self.record.remove(key);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Typed encodings

    pub fn raw_value<T: RawValue>(&mut self, index: usize, value: &T) {
        let key = self.key(index);
        self.record.set(key, value.raw_value().to_value());
    }

    /// Writes the raw value; `None` writes nothing.
    pub fn raw_value_optional<T: RawValue>(&mut self, index: usize, value: Option<&T>) {
        if let Some(value) = value {
            self.raw_value(index, value);
        }
    }

    fn data<T: Serialize + ?Sized>(
        &mut self,
        index: usize,
        strategy: EncodingStrategy,
        value: &T,
    ) -> Result<(), EncodingError> {
        let key = self.key(index);
        let bytes = encode_data(strategy, value).map_err(|source| {
            EncodingError::UnableToEncodeDataType {
                record_type: self.schema.record_type(),
                field: key,
                strategy,
                source,
            }
        })?;
        self.record.set(key, RecordValue::Bytes(bytes));
        Ok(())
    }

    /// Stores `value` as self-describing bytes.
    pub fn codable<T: Serialize + ?Sized>(&mut self, index: usize, value: &T) -> Result<(), EncodingError> {
        self.data(index, EncodingStrategy::OpaqueCodable, value)
    }

    pub fn codable_optional<T: Serialize>(
        &mut self,
        index: usize,
        value: Option<&T>,
    ) -> Result<(), EncodingError> {
        match value {
            Some(value) => self.codable(index, value),
            None => Ok(()),
        }
    }

    /// Stores `value` as binary archive bytes.
    pub fn archived<T: Serialize + ?Sized>(&mut self, index: usize, value: &T) -> Result<(), EncodingError> {
        self.data(index, EncodingStrategy::OpaqueBinary, value)
    }

    pub fn archived_optional<T: Serialize>(
        &mut self,
        index: usize,
        value: Option<&T>,
    ) -> Result<(), EncodingError> {
        match value {
            Some(value) => self.archived(index, value),
            None => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // References

    /// Encodes the child and stores a pointer to it on this record.
    pub fn owning<T: RecordConvertible>(&mut self, index: usize, value: &T) -> Result<(), EncodingError> {
        let encoded = value.encode(None)?;
        let reference = RecordReference::new(encoded.instance.id().clone(), ReferenceAction::None);
        log::trace!("{} '{}' owns '{}'", self.schema.record_type(), self.record.id(), reference.record_id());

        let key = self.key(index);
        self.record.set(key, reference);
        self.references.extend(encoded.into_records());
        Ok(())
    }

    /// Like [`owning`](Self::owning); `None` writes nothing.
    pub fn owning_optional<T: RecordConvertible>(
        &mut self,
        index: usize,
        value: Option<&T>,
    ) -> Result<(), EncodingError> {
        match value {
            Some(value) => self.owning(index, value),
            None => Ok(()),
        }
    }

    /// Encodes the child and points its back-pointer key at this record.
    ///
    /// The back-pointer carries [`ReferenceAction::DeleteSelf`], so deleting
    /// this record deletes the child.
    pub fn owned_by<T: RecordConvertible>(&mut self, index: usize, value: &T) -> Result<(), EncodingError> {
        let field = self.field(index);
        let Some(owner_field) = field.owner_field() else {
            return Err(EncodingError::NotAnOwnedByReference {
                record_type: self.schema.record_type(),
                field: field.name(),
            });
        };

        let mut encoded = value.encode(None)?;
        let back = RecordReference::new(self.record.id().clone(), ReferenceAction::DeleteSelf);
        log::trace!(
            "'{}' is owned by {} '{}' through '{owner_field}'",
            encoded.instance.id(),
            self.schema.record_type(),
            self.record.id(),
        );
        encoded.instance.set(owner_field, back);
        self.references.extend(encoded.into_records());
        Ok(())
    }

    /// Like [`owned_by`](Self::owned_by); `None` writes nothing.
    pub fn owned_by_optional<T: RecordConvertible>(
        &mut self,
        index: usize,
        value: Option<&T>,
    ) -> Result<(), EncodingError> {
        match value {
            Some(value) => self.owned_by(index, value),
            None => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Finish

    #[inline]
    pub fn finish(self) -> EncodedRecord {
        EncodedRecord {
            instance: self.record,
            references: self.references,
        }
    }

    /// Runs `hook` on the primary record, then finishes.
    pub fn finish_with(
        mut self,
        hook: impl FnOnce(&mut Record) -> Result<(), HookError>,
    ) -> Result<EncodedRecord, EncodingError> {
        hook(&mut self.record).map_err(|source| EncodingError::Hook {
            record_type: self.schema.record_type(),
            source,
        })?;
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::RecordEncoder;
    use crate::assets::AssetStager;
    use crate::engine::EncodingError;
    use crate::record::{AssetHandle, Record, RecordId, RecordValue};
    use crate::schema::{BinaryShape, EncodingStrategy, FieldKind, FieldSchema, RecordSchema};

    fn schema() -> RecordSchema {
        RecordSchema::new(
            "Photo",
            vec![
                FieldSchema::new("id", "String", false, FieldKind::RecordName),
                FieldSchema::new("caption", "Option<String>", true, FieldKind::Plain),
                FieldSchema::new("data", "Vec<u8>", false, FieldKind::Plain)
                    .with_binary(BinaryShape::Single),
                FieldSchema::new(
                    "tags",
                    "Option<Vec<String>>",
                    true,
                    FieldKind::TypedEncoding(EncodingStrategy::OpaqueCodable),
                ),
                FieldSchema::new("pages", "Vec<Vec<u8>>", false, FieldKind::Plain)
                    .with_binary(BinaryShape::List),
            ],
        )
        .unwrap()
    }

    #[test]
    fn empty_record_name_is_rejected() {
        let schema = schema();
        let err = RecordEncoder::begin(&schema, "", None).err().unwrap();
        assert!(matches!(
            err,
            EncodingError::EmptyRecordName { record_type: "Photo", field: "id" }
        ));
    }

    #[test]
    fn base_record_is_reused() {
        let schema = schema();
        let mut base = Record::new("Photo", RecordId::new("p0"));
        base.set("caption", "old");

        let mut encoder = RecordEncoder::begin(&schema, "", Some(base)).unwrap();
        encoder.plain_optional::<String>(1, None);
        let encoded = encoder.finish();

        assert_eq!(encoded.instance.id().record_name(), "p0");
        assert!(!encoded.instance.contains_key("caption"));
    }

    #[test]
    fn failed_staging_skips_the_field() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema();
        let mut encoder = RecordEncoder::begin(&schema, "p1", None)
            .unwrap()
            .with_stager(AssetStager::new(dir.path().join("missing")));
        encoder.asset(2, b"bytes");
        encoder.plain_optional(1, Some(&String::from("hi")));

        let record = encoder.finish().instance;
        assert!(!record.contains_key("data"));
        assert_eq!(record.get("caption"), Some(&RecordValue::from("hi")));
    }

    #[test]
    fn asset_list_keeps_staged_items() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema();
        let mut encoder = RecordEncoder::begin(&schema, "p1", None)
            .unwrap()
            .with_stager(AssetStager::new(dir.path()));
        encoder.asset_list(4, &[b"one".to_vec(), b"two".to_vec()]);

        let record = encoder.finish().instance;
        let handles = record.get("pages").and_then(RecordValue::as_asset_list).unwrap();
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].read().unwrap(), b"one");
        assert_eq!(handles[1].read().unwrap(), b"two");
    }

    #[test]
    fn asset_list_drops_failed_items() {
        let schema = schema();
        let encoder = RecordEncoder::begin(&schema, "p1", None).unwrap();
        let first = AssetHandle::new("/tmp/first.data");
        let third = AssetHandle::new("/tmp/third.data");

        let handles = encoder.collect_staged(
            4,
            [
                Ok(first.clone()),
                Err(io::Error::other("disk full")),
                Ok(third.clone()),
            ],
        );
        assert_eq!(handles, [first, third]);
    }

    #[test]
    fn asset_list_with_every_item_failed_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let schema = schema();
        let mut encoder = RecordEncoder::begin(&schema, "p1", None)
            .unwrap()
            .with_stager(AssetStager::new(dir.path().join("missing")));
        encoder.asset_list(4, &[b"one".to_vec(), b"two".to_vec()]);

        let record = encoder.finish().instance;
        assert_eq!(record.get("pages"), Some(&RecordValue::AssetList(Vec::new())));
    }

    #[test]
    fn absent_typed_value_writes_nothing() {
        let schema = schema();
        let mut encoder = RecordEncoder::begin(&schema, "p1", None).unwrap();
        encoder.codable_optional::<Vec<String>>(3, None).unwrap();
        assert!(encoder.record().is_empty());

        encoder.codable_optional(3, Some(&vec![String::from("a")])).unwrap();
        assert_eq!(
            encoder.record().get("tags"),
            Some(&RecordValue::Bytes(b"[\"a\"]".to_vec()))
        );
    }

    #[test]
    fn failing_hook_aborts() {
        let schema = schema();
        let encoder = RecordEncoder::begin(&schema, "p1", None).unwrap();
        let err = encoder.finish_with(|_| Err("nope".into())).err().unwrap();
        assert!(matches!(err, EncodingError::Hook { record_type: "Photo", .. }));
    }
}
