use crate::record::{Record, RecordId, RecordValue};
use crate::store::StoreError;

/// A filter over records of one type.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Matches every record.
    All,
    /// The value under `field` equals `value`.
    Equals { field: String, value: RecordValue },
    /// The reference under `field` points at `id`.
    References { field: String, id: RecordId },
    /// Every inner predicate matches.
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Equals { field, value } => record.get(field) == Some(value),
            Self::References { field, id } => record
                .get(field)
                .and_then(RecordValue::as_reference)
                .is_some_and(|reference| reference.record_id() == id),
            Self::And(predicates) => predicates.iter().all(|p| p.matches(record)),
        }
    }
}

/// A query for records of `record_type` matching `predicate`.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub record_type: String,
    pub predicate: Predicate,
}

impl Query {
    #[inline]
    pub fn new(record_type: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            record_type: record_type.into(),
            predicate,
        }
    }
}

/// An opaque continuation returned with a non-final [`QueryPage`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryCursor {
    position: u64,
}

impl QueryCursor {
    #[inline]
    pub const fn new(position: u64) -> Self {
        Self { position }
    }

    #[inline]
    pub const fn position(&self) -> u64 {
        self.position
    }
}

/// One matched id with its record, or the failure to load it.
pub type QueryResult = (RecordId, Result<Record, StoreError>);

/// One page of query results.
///
/// `cursor` is `Some` while more pages remain.
#[derive(Debug, Default)]
pub struct QueryPage {
    pub results: Vec<QueryResult>,
    pub cursor: Option<QueryCursor>,
}

#[cfg(test)]
mod tests {
    use super::Predicate;
    use crate::record::{Record, RecordId, RecordReference, ReferenceAction};

    #[test]
    fn references_compare_ids() {
        let mut record = Record::new("Post", RecordId::new("p1"));
        record.set(
            "UserOwner",
            RecordReference::new(RecordId::new("u1"), ReferenceAction::DeleteSelf),
        );

        let owner = |id: &str| Predicate::References {
            field: "UserOwner".into(),
            id: RecordId::new(id),
        };
        assert!(owner("u1").matches(&record));
        assert!(!owner("u2").matches(&record));
        assert!(Predicate::And(vec![Predicate::All, owner("u1")]).matches(&record));
    }

    #[test]
    fn equals_requires_the_key() {
        let record = Record::new("Post", RecordId::new("p1"));
        let predicate = Predicate::Equals {
            field: "title".into(),
            value: "x".into(),
        };
        assert!(!predicate.matches(&record));
    }
}
