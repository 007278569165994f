use rk_task::{BoxedFuture, block_on};

use super::references::{Author, Book, Member, book, member};
use crate::record::{Record, RecordId};
use crate::store::{MemoryStore, Predicate, Query, QueryCursor, QueryPage, StoreConnection, StoreError};
use crate::{FetchError, RecordConvertibleExt};

fn author(id: &str, name: &str) -> Author {
    Author {
        id: id.into(),
        name: name.into(),
    }
}

#[test]
fn save_then_fetch() {
    let store = MemoryStore::new();
    let original = book("b1");

    block_on(original.save(&store, None)).unwrap();
    assert_eq!(store.len(), 2);

    let fetched = block_on(Book::fetch("b1", &store)).unwrap();
    assert_eq!(fetched, original);

    let stored = store.get(&RecordId::new("b1")).unwrap();
    assert!(stored.metadata().creation_date.is_some());
    assert!(stored.metadata().change_tag.is_some());
}

#[test]
fn fetch_unknown_record() {
    let store = MemoryStore::new();
    match block_on(Book::fetch("nope", &store)) {
        Err(FetchError::Store(e)) => assert!(e.is_unknown_item()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn save_with_stale_base_conflicts() {
    let store = MemoryStore::new();
    let original = author("a1", "Ann");
    block_on(original.save(&store, None)).unwrap();

    let base = store.get(&RecordId::new("a1")).unwrap();
    block_on(author("a1", "Bea").save(&store, Some(base.clone()))).unwrap();

    // The first base is now stale.
    let result = block_on(author("a1", "Cy").save(&store, Some(base)));
    assert!(result.is_err());

    let fetched = block_on(Author::fetch("a1", &store)).unwrap();
    assert_eq!(fetched.name, "Bea");
}

#[test]
fn fetch_all_reads_every_page() {
    let store = MemoryStore::with_page_size(2);
    for i in 0..5 {
        let name = if i % 2 == 0 { "even" } else { "odd" };
        block_on(author(&format!("a{i}"), name).save(&store, None)).unwrap();
    }

    let all = block_on(Author::fetch_all(&store, None)).unwrap();
    assert_eq!(all.len(), 5);

    let even = block_on(Author::fetch_all(
        &store,
        Some(Predicate::Equals {
            field: "name".into(),
            value: "even".into(),
        }),
    ))
    .unwrap();
    assert_eq!(even.len(), 3);
    assert!(even.iter().all(|a| a.name == "even"));
}

#[test]
fn fetch_all_aborts_on_undecodable_record() {
    let store = MemoryStore::new();
    block_on(author("a1", "Ann").save(&store, None)).unwrap();
    store.insert(Record::new("Author", RecordId::new("a2")));

    assert!(matches!(
        block_on(Author::fetch_all(&store, None)),
        Err(FetchError::Decoding(_))
    ));
}

/// Fails every record whose name starts with `bad`.
struct FlakyStore {
    inner: MemoryStore,
}

impl StoreConnection for FlakyStore {
    fn fetch<'a>(&'a self, id: &'a RecordId) -> BoxedFuture<'a, Result<Record, StoreError>> {
        self.inner.fetch(id)
    }

    fn query<'a>(
        &'a self,
        query: &'a Query,
        cursor: Option<QueryCursor>,
    ) -> BoxedFuture<'a, Result<QueryPage, StoreError>> {
        Box::pin(async move {
            let mut page = self.inner.query(query, cursor).await?;
            for (id, result) in &mut page.results {
                if id.record_name().starts_with("bad") {
                    *result = Err(StoreError::Backend("disk error".into()));
                }
            }
            Ok(page)
        })
    }

    fn save<'a>(&'a self, records: Vec<Record>, atomically: bool) -> BoxedFuture<'a, Result<(), StoreError>> {
        self.inner.save(records, atomically)
    }
}

#[test]
fn fetch_all_skips_failed_entries() {
    let store = FlakyStore {
        inner: MemoryStore::with_page_size(2),
    };
    for id in ["a1", "bad1", "a2", "bad2", "a3"] {
        block_on(author(id, "x").save(&store, None)).unwrap();
    }

    let all = block_on(Author::fetch_all(&store, None)).unwrap();
    let mut ids: Vec<_> = all.iter().map(|a| a.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, ["a1", "a2", "a3"]);
}

#[test]
fn deleting_an_owner_cascades() {
    let store = MemoryStore::new();
    block_on(member("m1").save(&store, None)).unwrap();
    assert_eq!(store.len(), 3);

    let deleted = store.delete(&RecordId::new("m1"));
    assert_eq!(deleted.len(), 3);
    assert!(store.is_empty());

    assert!(matches!(
        block_on(Member::fetch("m1", &store)),
        Err(FetchError::Store(StoreError::UnknownItem(_)))
    ));
}
