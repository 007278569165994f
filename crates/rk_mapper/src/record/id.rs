use core::fmt;

/// The identifier of a record.
///
/// It is derived from the record-name field only, so encoding the same logical
/// entity twice addresses the same stored record.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId {
    record_name: String,
}

impl RecordId {
    /// Creates an identifier from a record name.
    #[inline]
    pub fn new(record_name: impl Into<String>) -> Self {
        Self {
            record_name: record_name.into(),
        }
    }

    /// Returns the record name this identifier was derived from.
    #[inline]
    pub fn record_name(&self) -> &str {
        &self.record_name
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.record_name)
    }
}

impl From<&str> for RecordId {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    #[inline]
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
