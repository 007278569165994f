//! A lookup table from record type names to schemas.

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::RecordConvertible;
use crate::schema::{RecordSchema, SchemaError};

/// A fixed seed, so iteration order is stable between runs.
const REGISTRY_HASH_STATE: FixedState = FixedState::with_seed(0x52_4B_5F_53_43_48_45_4D);

/// Schemas keyed by record type name.
///
/// Every schema is validated on insertion. A record type name can be
/// registered once; registering the same schema again is a no-op.
///
/// # Example
///
/// ```
/// use rk_mapper::registry::SchemaRegistry;
/// use rk_mapper::schema::{FieldKind, FieldSchema, RecordSchema};
///
/// static FIELDS: [FieldSchema; 1] = [FieldSchema::new("id", "String", false, FieldKind::RecordName)];
/// static TAG: RecordSchema = RecordSchema::new_unchecked("Tag", &FIELDS, 0);
///
/// let mut registry = SchemaRegistry::new();
/// registry.insert(&TAG).unwrap();
///
/// assert!(registry.contains("Tag"));
/// assert_eq!(registry.get("Tag").map(|s| s.field_len()), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, &'static RecordSchema, FixedState>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: HashMap::with_hasher(REGISTRY_HASH_STATE),
        }
    }

    /// Creates a registry holding every schema submitted with
    /// `#[record(auto_register)]` anywhere in the program.
    #[cfg(feature = "auto_register")]
    pub fn auto_register() -> Self {
        let mut registry = Self::new();
        crate::__macro_exports::auto_register::register_schemas(&mut registry);
        registry
    }

    /// Validates and inserts `schema`.
    pub fn insert(&mut self, schema: &'static RecordSchema) -> Result<(), SchemaError> {
        schema.validate()?;
        let record_type = schema.record_type();
        match self.schemas.get(record_type) {
            Some(existing) if *existing != schema => {
                Err(SchemaError::DuplicateRecordType { record_type })
            }
            Some(_) => Ok(()),
            None => {
                log::debug!("registered schema of {record_type}");
                self.schemas.insert(record_type, schema);
                Ok(())
            }
        }
    }

    /// Inserts the schema of `T`.
    #[inline]
    pub fn register<T: RecordConvertible>(&mut self) -> Result<(), SchemaError> {
        self.insert(T::schema())
    }

    #[inline]
    pub fn get(&self, record_type: &str) -> Option<&'static RecordSchema> {
        self.schemas.get(record_type).copied()
    }

    #[inline]
    pub fn contains(&self, record_type: &str) -> bool {
        self.schemas.contains_key(record_type)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterates over the registered schemas in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &'static RecordSchema> + '_ {
        self.schemas.values().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::SchemaRegistry;
    use crate::schema::{FieldKind, FieldSchema, RecordSchema, SchemaError};

    static ID: [FieldSchema; 1] = [FieldSchema::new("id", "String", false, FieldKind::RecordName)];
    static ID_AND_AGE: [FieldSchema; 2] = [
        FieldSchema::new("id", "String", false, FieldKind::RecordName),
        FieldSchema::new("age", "i64", false, FieldKind::Plain),
    ];
    static EMPTY: [FieldSchema; 0] = [];

    static USER: RecordSchema = RecordSchema::new_unchecked("User", &ID, 0);
    static OTHER_USER: RecordSchema = RecordSchema::new_unchecked("User", &ID_AND_AGE, 0);
    static BROKEN: RecordSchema = RecordSchema::new_unchecked("Broken", &EMPTY, 0);

    #[test]
    fn reinserting_the_same_schema_is_allowed() {
        let mut registry = SchemaRegistry::new();
        registry.insert(&USER).unwrap();
        registry.insert(&USER).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn conflicting_schema_is_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.insert(&USER).unwrap();
        assert_eq!(
            registry.insert(&OTHER_USER),
            Err(SchemaError::DuplicateRecordType { record_type: "User" })
        );
    }

    #[test]
    fn invalid_schema_is_rejected() {
        let mut registry = SchemaRegistry::new();
        assert_eq!(
            registry.insert(&BROKEN),
            Err(SchemaError::MissingRecordName { record_type: "Broken" })
        );
        assert!(registry.is_empty());
    }
}
