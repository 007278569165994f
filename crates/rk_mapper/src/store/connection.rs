use rk_task::BoxedFuture;

use crate::record::{Record, RecordId};
use crate::store::{Query, QueryCursor, QueryPage, QueryResult, StoreError};

/// The operations the mapper needs from a backing store.
///
/// Every call returns a boxed future so that the trait stays usable as
/// `&dyn StoreConnection`.
pub trait StoreConnection: Send + Sync {
    /// Fetches one record. A missing record is [`StoreError::UnknownItem`].
    fn fetch<'a>(&'a self, id: &'a RecordId) -> BoxedFuture<'a, Result<Record, StoreError>>;

    /// Runs `query`, resuming at `cursor` if given.
    fn query<'a>(
        &'a self,
        query: &'a Query,
        cursor: Option<QueryCursor>,
    ) -> BoxedFuture<'a, Result<QueryPage, StoreError>>;

    /// Saves `records`. With `atomically`, either all records are saved or none.
    fn save<'a>(&'a self, records: Vec<Record>, atomically: bool) -> BoxedFuture<'a, Result<(), StoreError>>;
}

/// Runs `query` and follows cursors until the last page.
pub async fn drain_query(
    store: &dyn StoreConnection,
    query: &Query,
) -> Result<Vec<QueryResult>, StoreError> {
    let mut results = Vec::new();
    let mut cursor = None;
    loop {
        let page = store.query(query, cursor).await?;
        results.extend(page.results);
        match page.cursor {
            Some(next) => cursor = Some(next),
            None => return Ok(results),
        }
    }
}
