use std::marker::PhantomData;
use std::time::{Duration, SystemTime};

use rk_task::block_on;
use serde::{Deserialize, Serialize};

use crate::derive::{RawValue, RecordConvertible};
use crate::engine::{DecodingError, EncodingError};
use crate::record::{Record, RecordId, RecordValue};
use crate::{HookError, RecordConvertible as _, RecordHooks};

#[derive(RecordConvertible, Debug, PartialEq)]
struct User {
    #[record(name)]
    name: String,
    age: i64,
    nickname: Option<String>,
}

#[derive(RawValue, Debug, PartialEq, Clone, Copy)]
enum Tier {
    Free = 0,
    Paid = 10,
}

#[derive(RawValue, Debug, PartialEq)]
enum Theme {
    #[raw_value = "light"]
    Light,
    #[raw_value = "dark"]
    Dark,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Settings {
    volume: u8,
    tags: Vec<String>,
}

#[derive(RecordConvertible, Debug, PartialEq)]
#[record(record_type = "Account")]
struct AccountModel {
    #[record(name)]
    id: String,
    score: f64,
    active: bool,
    visits: u32,
    labels: Vec<String>,
    joined: SystemTime,
    #[record(encoding = raw_value)]
    tier: Tier,
    #[record(encoding = raw_value)]
    theme: Option<Theme>,
    #[record(encoding = codable)]
    settings: Settings,
    #[record(encoding = binary)]
    history: Option<Vec<(u32, String)>>,
    #[record(ignore)]
    session: Option<String>,
    #[record(ignore, default = 7)]
    retries: u32,
    creation_date: Option<SystemTime>,
    record_change_tag: Option<String>,
    _marker: PhantomData<()>,
}

fn account(id: &str) -> AccountModel {
    AccountModel {
        id: id.into(),
        score: 12.5,
        active: true,
        visits: 3,
        labels: vec!["a".into(), "b".into()],
        joined: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        tier: Tier::Paid,
        theme: Some(Theme::Dark),
        settings: Settings {
            volume: 4,
            tags: vec!["x".into()],
        },
        history: Some(vec![(1, "login".into())]),
        session: None,
        retries: 7,
        creation_date: None,
        record_change_tag: None,
        _marker: PhantomData,
    }
}

#[test]
fn user_record_without_nickname() {
    let mut record = Record::new("User", RecordId::new("u1"));
    record.set("age", 30_i64);

    let user = block_on(User::decode(&record, None)).unwrap();
    assert_eq!(
        user,
        User {
            name: "u1".into(),
            age: 30,
            nickname: None,
        }
    );

    let encoded = user.encode(None).unwrap();
    assert_eq!(encoded.instance.id().record_name(), "u1");
    assert_eq!(encoded.instance.record_type(), "User");
    assert_eq!(encoded.instance.keys().collect::<Vec<_>>(), ["age"]);
    assert_eq!(encoded.instance.get("age"), Some(&RecordValue::Int(30)));
    assert!(encoded.references.is_empty());
}

#[test]
fn identity_accessors() {
    let mut user = User {
        name: "u1".into(),
        age: 1,
        nickname: None,
    };
    assert_eq!(User::RECORD_TYPE, "User");
    assert_eq!(user.record_id(), RecordId::new("u1"));

    user.set_record_name("u2".into());
    assert_eq!(user.record_name(), "u2");
    assert_eq!(AccountModel::RECORD_TYPE, "Account");
}

#[test]
fn round_trip() {
    let original = account("acc-1");
    let encoded = original.encode(None).unwrap();
    let record = &encoded.instance;

    assert_eq!(record.record_type(), "Account");
    assert_eq!(record.get("tier"), Some(&RecordValue::Int(10)));
    assert_eq!(record.get("theme"), Some(&RecordValue::from("dark")));
    assert!(matches!(record.get("settings"), Some(RecordValue::Bytes(_))));
    assert!(!record.contains_key("session"));
    assert!(!record.contains_key("retries"));
    assert!(!record.contains_key("creation_date"));
    assert!(!record.contains_key("_marker"));

    let decoded = block_on(AccountModel::decode(record, None)).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn absent_optional_typed_fields() {
    let mut original = account("acc-2");
    original.theme = None;
    original.history = None;

    let record = original.encode(None).unwrap().instance;
    assert!(!record.contains_key("theme"));
    assert!(!record.contains_key("history"));

    let decoded = block_on(AccountModel::decode(&record, None)).unwrap();
    assert_eq!(decoded.theme, None);
    assert_eq!(decoded.history, None);
}

#[derive(RecordConvertible, Debug, PartialEq)]
struct Counter {
    #[record(name)]
    id: String,
    total: u64,
}

#[test]
fn u64_above_i64_max_round_trips() {
    let counter = Counter {
        id: "c1".into(),
        total: u64::MAX,
    };
    let record = counter.encode(None).unwrap().instance;
    assert_eq!(record.get("total"), Some(&RecordValue::Int(-1)));

    let decoded = block_on(Counter::decode(&record, None)).unwrap();
    assert_eq!(decoded, counter);
}

#[test]
fn empty_record_name() {
    let err = account("").encode(None).unwrap_err();
    assert!(matches!(
        err,
        EncodingError::EmptyRecordName {
            record_type: "Account",
            field: "id",
        }
    ));
}

#[test]
fn base_record_allows_empty_name() {
    let mut base = Record::new("Account", RecordId::new("stored"));
    base.set("unrelated", true);

    let encoded = account("").encode(Some(base)).unwrap();
    assert_eq!(encoded.instance.id().record_name(), "stored");
    assert_eq!(encoded.instance.get("unrelated"), Some(&RecordValue::Bool(true)));
    assert_eq!(encoded.instance.get("visits"), Some(&RecordValue::Int(3)));
}

#[test]
fn unknown_raw_value() {
    let mut record = account("acc-3").encode(None).unwrap().instance;
    record.set("tier", 3_i64);

    match block_on(AccountModel::decode(&record, None)) {
        Err(DecodingError::UnableToDecodeRawType {
            record_type,
            field,
            enum_type,
            raw_value,
        }) => {
            assert_eq!(record_type, "Account");
            assert_eq!(field, "tier");
            assert!(enum_type.ends_with("Tier"));
            assert_eq!(raw_value, RecordValue::Int(3));
        }
        other => panic!("unexpected {other:?}"),
    }

    // Optional raw values still reject unknown members.
    let mut record = account("acc-3").encode(None).unwrap().instance;
    record.set("theme", "sepia");
    assert!(matches!(
        block_on(AccountModel::decode(&record, None)),
        Err(DecodingError::UnableToDecodeRawType { field: "theme", .. })
    ));
}

#[test]
fn missing_and_mismatched_fields() {
    let record = Record::new("User", RecordId::new("u1"));
    assert!(matches!(
        block_on(User::decode(&record, None)),
        Err(DecodingError::MissingField {
            record_type: "User",
            field: "age",
        })
    ));

    let mut record = Record::new("User", RecordId::new("u1"));
    record.set("age", 30_i64);
    record.set("nickname", 5_i64);
    match block_on(User::decode(&record, None)) {
        Err(DecodingError::FieldTypeMismatch {
            field,
            expected_type,
            found,
            ..
        }) => {
            assert_eq!(field, "nickname");
            assert_eq!(expected_type, "Option<String>");
            assert_eq!(found, Some(RecordValue::Int(5)));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn corrupt_codable_bytes() {
    let mut record = account("acc-4").encode(None).unwrap().instance;
    record.set("settings", b"{".to_vec());
    assert!(matches!(
        block_on(AccountModel::decode(&record, None)),
        Err(DecodingError::UnableToDecodeDataType { field: "settings", .. })
    ));
}

#[test]
fn system_fields_come_from_metadata() {
    let mut record = account("acc-5").encode(None).unwrap().instance;
    let created = SystemTime::UNIX_EPOCH + Duration::from_secs(42);
    record.metadata_mut().creation_date = Some(created);
    record.metadata_mut().change_tag = Some("7f".into());

    let decoded = block_on(AccountModel::decode(&record, None)).unwrap();
    assert_eq!(decoded.creation_date, Some(created));
    assert_eq!(decoded.record_change_tag.as_deref(), Some("7f"));

    // Never written back as keys.
    let encoded = decoded.encode(None).unwrap().instance;
    assert!(!encoded.contains_key("creation_date"));
    assert!(encoded.metadata().creation_date.is_none());
}

// -----------------------------------------------------------------------------
// Hooks

#[derive(RecordConvertible, Debug)]
#[record(hooks)]
struct Note {
    #[record(name)]
    id: String,
    body: String,
    #[record(ignore)]
    length: Option<usize>,
}

impl RecordHooks for Note {
    fn will_finish_encoding(&self, record: &mut Record) -> Result<(), HookError> {
        if self.body.is_empty() {
            return Err("note body is empty".into());
        }
        record.set("length", self.body.len() as i64);
        Ok(())
    }

    fn will_finish_decoding(&mut self, record: &Record) -> Result<(), HookError> {
        let length = record
            .get("length")
            .and_then(RecordValue::as_int)
            .ok_or("length was not stored")?;
        self.length = Some(length as usize);
        Ok(())
    }
}

#[test]
fn hooks_run_after_fields() {
    let note = Note {
        id: "n1".into(),
        body: "hello".into(),
        length: None,
    };
    let record = note.encode(None).unwrap().instance;
    assert_eq!(record.get("length"), Some(&RecordValue::Int(5)));

    let decoded = block_on(Note::decode(&record, None)).unwrap();
    assert_eq!(decoded.length, Some(5));
}

#[test]
fn failing_hooks_abort() {
    let note = Note {
        id: "n1".into(),
        body: String::new(),
        length: None,
    };
    assert!(matches!(
        note.encode(None),
        Err(EncodingError::Hook { record_type: "Note", .. })
    ));

    let mut record = Record::new("Note", RecordId::new("n1"));
    record.set("body", "text");
    assert!(matches!(
        block_on(Note::decode(&record, None)),
        Err(DecodingError::Hook { record_type: "Note", .. })
    ));
}

// -----------------------------------------------------------------------------
// Assets

#[derive(RecordConvertible, Debug, PartialEq)]
struct Scan {
    #[record(name)]
    id: String,
    image: Vec<u8>,
    thumbnail: Option<Vec<u8>>,
    pages: Vec<Vec<u8>>,
}

fn remove_assets(record: &Record) {
    for (_, value) in record.iter() {
        let handles = match value {
            RecordValue::Asset(handle) => vec![handle.clone()],
            RecordValue::AssetList(handles) => handles.clone(),
            _ => continue,
        };
        for handle in handles {
            let _ = std::fs::remove_file(handle.path());
        }
    }
}

#[test]
fn binary_fields_are_staged() {
    let scan = Scan {
        id: "s1".into(),
        image: vec![1, 2, 3],
        thumbnail: None,
        pages: vec![vec![4], vec![5, 6]],
    };
    let record = scan.encode(None).unwrap().instance;

    assert!(matches!(record.get("image"), Some(RecordValue::Asset(_))));
    assert!(!record.contains_key("thumbnail"));
    match record.get("pages") {
        Some(RecordValue::AssetList(handles)) => assert_eq!(handles.len(), 2),
        other => panic!("unexpected {other:?}"),
    }

    let decoded = block_on(Scan::decode(&record, None));
    remove_assets(&record);
    assert_eq!(decoded.unwrap(), scan);
}
