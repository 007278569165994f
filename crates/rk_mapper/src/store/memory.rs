use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use rk_task::BoxedFuture;

use crate::record::{Record, RecordId, RecordValue, ReferenceAction};
use crate::store::{Query, QueryCursor, QueryPage, StoreConnection, StoreError};

/// An in-process [`StoreConnection`].
///
/// Records are kept by id. Saving assigns the store-managed metadata (dates
/// and a change tag); a saved record that carries a change tag must match
/// the stored one, otherwise the save is a [`StoreError::Conflict`].
///
/// Query results are returned in id order, `page_size` at a time.
///
/// # Example
///
/// ```
/// use rk_mapper::record::{Record, RecordId};
/// use rk_mapper::store::{MemoryStore, StoreConnection};
///
/// let store = MemoryStore::new();
/// let record = Record::new("User", RecordId::new("u1"));
///
/// rk_task::block_on(store.save(vec![record], true)).unwrap();
///
/// let fetched = rk_task::block_on(store.fetch(&RecordId::new("u1"))).unwrap();
/// assert!(fetched.metadata().change_tag.is_some());
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<RecordId, Record>>,
    page_size: usize,
    change_counter: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub const DEFAULT_PAGE_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_page_size(Self::DEFAULT_PAGE_SIZE)
    }

    /// Creates a store answering queries `page_size` records at a time.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
            change_counter: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<RecordId, Record>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<RecordId, Record>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `record` as is, bypassing metadata and conflict handling.
    pub fn insert(&self, record: Record) -> Option<Record> {
        self.write().insert(record.id().clone(), record)
    }

    pub fn get(&self, id: &RecordId) -> Option<Record> {
        self.read().get(id).cloned()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Deletes a record and, transitively, every record whose reference to a
    /// deleted record carries [`ReferenceAction::DeleteSelf`].
    ///
    /// Returns the ids of all deleted records.
    pub fn delete(&self, id: &RecordId) -> Vec<RecordId> {
        let mut records = self.write();
        let mut pending = vec![id.clone()];
        let mut deleted = Vec::new();

        while let Some(id) = pending.pop() {
            if records.remove(&id).is_none() {
                continue;
            }
            pending.extend(
                records
                    .values()
                    .filter(|record| Self::cascades_from(record, &id))
                    .map(|record| record.id().clone()),
            );
            deleted.push(id);
        }

        log::debug!("deleted {} record(s) starting at '{id}'", deleted.len());
        deleted
    }

    fn cascades_from(record: &Record, parent: &RecordId) -> bool {
        record.iter().any(|(_, value)| match value {
            RecordValue::Reference(reference) => {
                reference.action() == ReferenceAction::DeleteSelf && reference.record_id() == parent
            }
            _ => false,
        })
    }

    fn check_conflict(records: &BTreeMap<RecordId, Record>, record: &Record) -> Result<(), StoreError> {
        let Some(tag) = &record.metadata().change_tag else {
            return Ok(());
        };
        match records.get(record.id()) {
            Some(stored) if stored.metadata().change_tag.as_ref() != Some(tag) => {
                Err(StoreError::Conflict {
                    id: record.id().clone(),
                })
            }
            _ => Ok(()),
        }
    }

    fn commit(&self, records: &mut BTreeMap<RecordId, Record>, mut record: Record, now: SystemTime) {
        let creation_date = records
            .get(record.id())
            .and_then(|stored| stored.metadata().creation_date)
            .unwrap_or(now);
        let tag = self.change_counter.fetch_add(1, Ordering::Relaxed) + 1;

        let metadata = record.metadata_mut();
        metadata.creation_date = Some(creation_date);
        metadata.modification_date = Some(now);
        metadata.change_tag = Some(format!("{tag:x}"));

        records.insert(record.id().clone(), record);
    }

    fn save_now(&self, batch: Vec<Record>, atomically: bool) -> Result<(), StoreError> {
        let now = SystemTime::now();
        let mut records = self.write();

        if atomically {
            for record in &batch {
                Self::check_conflict(&records, record)?;
            }
            let len = batch.len();
            for record in batch {
                self.commit(&mut records, record, now);
            }
            log::debug!("saved {len} record(s) atomically");
            return Ok(());
        }

        let mut first_error = None;
        for record in batch {
            match Self::check_conflict(&records, &record) {
                Ok(()) => self.commit(&mut records, record, now),
                Err(e) => {
                    log::debug!("skipping record in non-atomic save: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn query_now(&self, query: &Query, cursor: Option<QueryCursor>) -> QueryPage {
        let records = self.read();
        let start = cursor.map_or(0, |c| c.position() as usize);

        let mut matching = records
            .values()
            .filter(|record| record.record_type() == query.record_type)
            .filter(|record| query.predicate.matches(record))
            .skip(start);

        let results = matching
            .by_ref()
            .take(self.page_size)
            .map(|record| (record.id().clone(), Ok(record.clone())))
            .collect::<Vec<_>>();
        let cursor = matching
            .next()
            .map(|_| QueryCursor::new((start + results.len()) as u64));

        QueryPage { results, cursor }
    }
}

impl StoreConnection for MemoryStore {
    fn fetch<'a>(&'a self, id: &'a RecordId) -> BoxedFuture<'a, Result<Record, StoreError>> {
        Box::pin(async move { self.get(id).ok_or_else(|| StoreError::UnknownItem(id.clone())) })
    }

    fn query<'a>(
        &'a self,
        query: &'a Query,
        cursor: Option<QueryCursor>,
    ) -> BoxedFuture<'a, Result<QueryPage, StoreError>> {
        Box::pin(async move { Ok(self.query_now(query, cursor)) })
    }

    fn save<'a>(&'a self, records: Vec<Record>, atomically: bool) -> BoxedFuture<'a, Result<(), StoreError>> {
        Box::pin(async move { self.save_now(records, atomically) })
    }
}
