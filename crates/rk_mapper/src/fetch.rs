use rk_task::BoxedFuture;
use thiserror::Error;

use crate::RecordConvertible;
use crate::engine::{DecodingError, EncodingError};
use crate::record::{Record, RecordId};
use crate::store::{Predicate, Query, StoreConnection, StoreError, drain_query};

/// A failure of [`RecordConvertibleExt::save`].
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A failure of [`RecordConvertibleExt::fetch`] and [`RecordConvertibleExt::fetch_all`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
}

/// Store conveniences layered on [`RecordConvertible`].
///
/// Implemented for every [`RecordConvertible`] type.
pub trait RecordConvertibleExt: RecordConvertible {
    /// Encodes `self` and saves the primary and auxiliary records atomically.
    fn save<'a>(
        &'a self,
        store: &'a dyn StoreConnection,
        base: Option<Record>,
    ) -> BoxedFuture<'a, Result<(), SaveError>> {
        Box::pin(async move {
            let records = self.encode(base)?.into_records();
            log::debug!("saving {} '{}' with {} record(s)", Self::RECORD_TYPE, self.record_name(), records.len());
            store.save(records, true).await?;
            Ok(())
        })
    }

    /// Fetches the record named `record_name` and decodes it.
    fn fetch<'a>(
        record_name: &'a str,
        store: &'a dyn StoreConnection,
    ) -> BoxedFuture<'a, Result<Self, FetchError>> {
        Box::pin(async move {
            let record = store.fetch(&RecordId::new(record_name)).await?;
            Ok(Self::decode(&record, Some(store)).await?)
        })
    }

    /// Decodes every record of this type matching `predicate`.
    ///
    /// All pages are read. Records the store fails to load are skipped;
    /// a record that fails to decode aborts.
    fn fetch_all<'a>(
        store: &'a dyn StoreConnection,
        predicate: Option<Predicate>,
    ) -> BoxedFuture<'a, Result<Vec<Self>, FetchError>> {
        Box::pin(async move {
            let query = Query::new(Self::RECORD_TYPE, predicate.unwrap_or(Predicate::All));
            let results = drain_query(store, &query).await?;

            let mut instances = Vec::with_capacity(results.len());
            for (id, result) in results {
                match result {
                    Ok(record) => instances.push(Self::decode(&record, Some(store)).await?),
                    Err(e) => log::warn!("skipping {} '{id}': {e}", Self::RECORD_TYPE),
                }
            }
            Ok(instances)
        })
    }
}

impl<T: RecordConvertible> RecordConvertibleExt for T {}
