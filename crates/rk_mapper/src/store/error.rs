use thiserror::Error;

use crate::engine::BoxedCause;
use crate::record::RecordId;

/// A failure reported by a [`StoreConnection`](crate::store::StoreConnection).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("record '{0}' does not exist")]
    UnknownItem(RecordId),

    #[error("record '{id}' was changed since it was fetched")]
    Conflict { id: RecordId },

    #[error(transparent)]
    Backend(BoxedCause),
}

impl StoreError {
    /// Returns `true` for [`StoreError::UnknownItem`].
    #[inline]
    pub fn is_unknown_item(&self) -> bool {
        matches!(self, Self::UnknownItem(_))
    }
}
