use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::record::{RecordId, RecordValue};

/// Store-managed metadata of a record.
///
/// These values are maintained by the store on save and are never written by
/// the encoding engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordMetadata {
    pub creation_date: Option<SystemTime>,
    pub modification_date: Option<SystemTime>,
    pub change_tag: Option<String>,
}

/// A typed key/value document with a stable identifier.
///
/// Keys are kept ordered so that records compare and print deterministically.
///
/// # Example
///
/// ```
/// use rk_mapper::record::{Record, RecordId, RecordValue};
///
/// let mut record = Record::new("User", RecordId::new("u1"));
/// record.set("age", 30_i64);
///
/// assert_eq!(record.get("age"), Some(&RecordValue::Int(30)));
/// assert_eq!(record.id().record_name(), "u1");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    record_type: String,
    id: RecordId,
    fields: BTreeMap<String, RecordValue>,
    metadata: RecordMetadata,
}

impl Record {
    /// Creates an empty record.
    pub fn new(record_type: impl Into<String>, id: RecordId) -> Self {
        Self {
            record_type: record_type.into(),
            id,
            fields: BTreeMap::new(),
            metadata: RecordMetadata::default(),
        }
    }

    #[inline]
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    #[inline]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.fields.get(key)
    }

    /// Sets `key`, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<RecordValue>) -> Option<RecordValue> {
        self.fields.insert(key.into(), value.into())
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<RecordValue> {
        self.fields.remove(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the keys in ascending order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &RecordValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }

    #[inline]
    pub fn metadata_mut(&mut self) -> &mut RecordMetadata {
        &mut self.metadata
    }
}
