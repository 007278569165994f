use std::borrow::Cow;

use crate::schema::{FieldKind, FieldSchema, SchemaError};

/// The ordered field list of one record type.
///
/// Field order is declaration order. It drives code generation and the order
/// in which fields are decoded, never the stored shape.
///
/// # Example
///
/// ```
/// use rk_mapper::schema::{FieldKind, FieldSchema, RecordSchema};
///
/// let schema = RecordSchema::new(
///     "User",
///     vec![
///         FieldSchema::new("name", "String", false, FieldKind::RecordName),
///         FieldSchema::new("age", "i64", false, FieldKind::Plain),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(schema.record_name_field().name(), "name");
/// assert_eq!(schema.index_of("age"), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSchema {
    record_type: &'static str,
    fields: Cow<'static, [FieldSchema]>,
    record_name: usize,
}

impl RecordSchema {
    /// Creates a schema without checking its invariants.
    ///
    /// Used by generated code, whose input was validated at compile time.
    /// `record_name` is the index of the record-name field.
    #[inline]
    pub const fn new_unchecked(
        record_type: &'static str,
        fields: &'static [FieldSchema],
        record_name: usize,
    ) -> Self {
        Self {
            record_type,
            fields: Cow::Borrowed(fields),
            record_name,
        }
    }

    /// Creates a schema and checks its invariants.
    pub fn new(record_type: &'static str, fields: Vec<FieldSchema>) -> Result<Self, SchemaError> {
        let record_name = Self::check(record_type, &fields)?;
        Ok(Self {
            record_type,
            fields: Cow::Owned(fields),
            record_name,
        })
    }

    /// Re-checks the invariants of this schema.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let record_name = Self::check(self.record_type, &self.fields)?;
        if record_name != self.record_name {
            return Err(SchemaError::RecordNameIndexMismatch {
                record_type: self.record_type,
                field: self.fields[record_name].name(),
                expected: record_name,
                found: self.record_name,
            });
        }
        Ok(())
    }

    fn check(record_type: &'static str, fields: &[FieldSchema]) -> Result<usize, SchemaError> {
        for (index, field) in fields.iter().enumerate() {
            if fields[..index].iter().any(|f| f.name() == field.name()) {
                return Err(SchemaError::DuplicateField {
                    record_type,
                    field: field.name(),
                });
            }
            if let FieldKind::Ignored { has_default } = field.kind()
                && !has_default
                && !field.is_optional()
            {
                return Err(SchemaError::IgnoredWithoutDefault {
                    record_type,
                    field: field.name(),
                });
            }
        }

        let names: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind() == FieldKind::RecordName)
            .map(|(index, _)| index)
            .collect();

        let index = match names.as_slice() {
            [] => return Err(SchemaError::MissingRecordName { record_type }),
            [index] => *index,
            _ => {
                return Err(SchemaError::MultipleRecordNames {
                    record_type,
                    fields: names.iter().map(|i| fields[*i].name()).collect(),
                });
            }
        };

        let field = &fields[index];
        if field.is_optional() || field.declared_type() != "String" {
            return Err(SchemaError::InvalidRecordNameType {
                record_type,
                field: field.name(),
                declared_type: field.declared_type(),
            });
        }
        Ok(index)
    }

    /// The record type name written to every encoded record.
    #[inline]
    pub const fn record_type(&self) -> &'static str {
        self.record_type
    }

    /// Returns the fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Returns the field at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds. Generated code only passes indices
    /// taken from the schema it was generated with.
    #[inline]
    pub fn field_at(&self, index: usize) -> &FieldSchema {
        &self.fields[index]
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the index of the field `name`. O(N).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    #[inline]
    pub fn record_name_field(&self) -> &FieldSchema {
        &self.fields[self.record_name]
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::RecordSchema;
    use crate::schema::{FieldKind, FieldSchema, SchemaError};

    fn name_field(name: &'static str) -> FieldSchema {
        FieldSchema::new(name, "String", false, FieldKind::RecordName)
    }

    #[test]
    fn missing_record_name() {
        let err = RecordSchema::new("User", vec![FieldSchema::new("age", "i64", false, FieldKind::Plain)]);
        assert_eq!(err, Err(SchemaError::MissingRecordName { record_type: "User" }));
    }

    #[test]
    fn multiple_record_names_lists_all() {
        let err = RecordSchema::new("User", vec![name_field("id"), name_field("id2")]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MultipleRecordNames {
                record_type: "User",
                fields: vec!["id", "id2"],
            }
        );
    }

    #[test]
    fn record_name_must_be_plain_string() {
        let optional = FieldSchema::new("id", "Option<String>", true, FieldKind::RecordName);
        assert!(matches!(
            RecordSchema::new("User", vec![optional]),
            Err(SchemaError::InvalidRecordNameType { declared_type: "Option<String>", .. })
        ));

        let int = FieldSchema::new("id", "i64", false, FieldKind::RecordName);
        assert!(matches!(
            RecordSchema::new("User", vec![int]),
            Err(SchemaError::InvalidRecordNameType { declared_type: "i64", .. })
        ));
    }

    #[test]
    fn ignored_needs_default_or_option() {
        let ignored = FieldSchema::new("cache", "u32", false, FieldKind::Ignored { has_default: false });
        assert!(matches!(
            RecordSchema::new("User", vec![name_field("id"), ignored]),
            Err(SchemaError::IgnoredWithoutDefault { field: "cache", .. })
        ));

        let optional = FieldSchema::new("cache", "Option<u32>", true, FieldKind::Ignored { has_default: false });
        assert!(RecordSchema::new("User", vec![name_field("id"), optional]).is_ok());
    }

    #[test]
    fn unchecked_record_name_index_must_match() {
        static FIELDS: [FieldSchema; 2] = [
            FieldSchema::new("age", "i64", false, FieldKind::Plain),
            FieldSchema::new("id", "String", false, FieldKind::RecordName),
        ];
        let wrong = RecordSchema::new_unchecked("User", &FIELDS, 0);
        assert_eq!(
            wrong.validate(),
            Err(SchemaError::RecordNameIndexMismatch {
                record_type: "User",
                field: "id",
                expected: 1,
                found: 0,
            })
        );
        assert!(RecordSchema::new_unchecked("User", &FIELDS, 1).validate().is_ok());
    }

    #[test]
    fn duplicate_field() {
        let age = FieldSchema::new("age", "i64", false, FieldKind::Plain);
        assert!(matches!(
            RecordSchema::new("User", vec![name_field("id"), age, age]),
            Err(SchemaError::DuplicateField { field: "age", .. })
        ));
    }
}
