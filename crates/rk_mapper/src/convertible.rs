use rk_task::BoxedFuture;

use crate::engine::{BoxedCause, DecodingError, EncodingError};
use crate::record::{Record, RecordId};
use crate::schema::RecordSchema;
use crate::store::StoreConnection;

/// The error a hook returns to abort an encode or decode.
pub type HookError = BoxedCause;

// -----------------------------------------------------------------------------
// EncodedRecord

/// The output of [`RecordConvertible::encode`].
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedRecord {
    /// The primary record.
    pub instance: Record,
    /// Records produced by reference fields, nested ones flattened in.
    pub references: Vec<Record>,
}

impl EncodedRecord {
    /// Returns the primary record followed by the auxiliary records.
    pub fn into_records(self) -> Vec<Record> {
        let mut records = Vec::with_capacity(1 + self.references.len());
        records.push(self.instance);
        records.extend(self.references);
        records
    }
}

// -----------------------------------------------------------------------------
// RecordConvertible

/// A type with a fixed record mapping.
///
/// Implemented by `#[derive(RecordConvertible)]`; see the
/// [crate documentation](crate) for the field markers.
///
/// `decode` returns a boxed future so that types may refer to themselves
/// through `Box<Self>`.
pub trait RecordConvertible: Sized + Send + Sync + 'static {
    /// The record type name.
    const RECORD_TYPE: &'static str;

    /// The compiled field list of this type.
    fn schema() -> &'static RecordSchema;

    /// The value of the record-name field.
    fn record_name(&self) -> &str;

    fn set_record_name(&mut self, record_name: String);

    /// The identifier of the record this instance encodes to.
    fn record_id(&self) -> RecordId {
        RecordId::new(self.record_name())
    }

    /// Builds the primary record and its auxiliary records.
    ///
    /// With a `base` record, the base is updated in place and the
    /// record-name field is not consulted.
    fn encode(&self, base: Option<Record>) -> Result<EncodedRecord, EncodingError>;

    /// Builds an instance from `record`, resolving references through `store`.
    fn decode<'a>(
        record: &'a Record,
        store: Option<&'a dyn StoreConnection>,
    ) -> BoxedFuture<'a, Result<Self, DecodingError>>;
}

impl<T: RecordConvertible> RecordConvertible for Box<T> {
    const RECORD_TYPE: &'static str = T::RECORD_TYPE;

    #[inline]
    fn schema() -> &'static RecordSchema {
        T::schema()
    }

    #[inline]
    fn record_name(&self) -> &str {
        (**self).record_name()
    }

    #[inline]
    fn set_record_name(&mut self, record_name: String) {
        (**self).set_record_name(record_name);
    }

    #[inline]
    fn encode(&self, base: Option<Record>) -> Result<EncodedRecord, EncodingError> {
        (**self).encode(base)
    }

    fn decode<'a>(
        record: &'a Record,
        store: Option<&'a dyn StoreConnection>,
    ) -> BoxedFuture<'a, Result<Self, DecodingError>> {
        Box::pin(async move { T::decode(record, store).await.map(Box::new) })
    }
}

// -----------------------------------------------------------------------------
// RecordHooks

/// Optional steps run at the end of encoding and decoding.
///
/// Only called for types marked `#[record(hooks)]`. A returned error aborts
/// the whole operation.
pub trait RecordHooks {
    /// Runs after every field was written to `record`.
    fn will_finish_encoding(&self, record: &mut Record) -> Result<(), HookError> {
        let _ = record;
        Ok(())
    }

    /// Runs after every field was read from `record`.
    fn will_finish_decoding(&mut self, record: &Record) -> Result<(), HookError> {
        let _ = record;
        Ok(())
    }
}
