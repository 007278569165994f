use crate::record::RecordId;

/// What the store does with the referencing record when the target is deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReferenceAction {
    /// Nothing; the pointer is left dangling.
    #[default]
    None,
    /// The referencing record is deleted together with its target.
    DeleteSelf,
}

/// A pointer from one record to another.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordReference {
    record_id: RecordId,
    action: ReferenceAction,
}

impl RecordReference {
    #[inline]
    pub fn new(record_id: RecordId, action: ReferenceAction) -> Self {
        Self { record_id, action }
    }

    #[inline]
    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    #[inline]
    pub fn action(&self) -> ReferenceAction {
        self.action
    }
}
