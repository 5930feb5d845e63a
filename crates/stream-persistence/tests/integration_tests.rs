use serde::{Deserialize, Serialize};
use serde_json::json;
use stream::{Store, StreamError};
use stream_persistence::{new_store, DieselStateRepository, StoreConfig};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct AverageState {
  sum: i64,
  count: i64,
  value: f64,
}

// Temporary file-backed SQLite DB per test, removed (with its WAL side
// files) when dropped. Declare it before the store so it is dropped last.
struct TempDb {
  path: PathBuf,
}

impl TempDb {
  fn new() -> Self {
    TempDb { path: std::env::temp_dir().join(format!("stream_test_{}.db", Uuid::new_v4())) }
  }

  fn config(&self) -> StoreConfig {
    StoreConfig::new(self.path.to_str().unwrap().to_string()).with_pool_size(2)
                                                             .with_connection_timeout(Duration::from_secs(10))
  }
}

impl Drop for TempDb {
  fn drop(&mut self) {
    for suffix in ["", "-wal", "-shm"] {
      let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
    }
  }
}

fn setup_store(state_type: &str) -> Option<(TempDb, Store<DieselStateRepository>)> {
  if cfg!(feature = "pg") {
    eprintln!("skipping sqlite-only persistence test because 'pg' feature is enabled");
    return None;
  }
  let db = TempDb::new();
  let store = new_store(&db.config(), "states", state_type).expect("new_store");
  Some((db, store))
}

#[test]
fn get_state_not_found() {
  let Some((_db, store)) = setup_store("Average") else { return };
  let mut dest = AverageState { sum: 2, count: 1, value: 2.0 };

  let err = store.get("id", &mut dest).unwrap_err();

  assert!(err.is_not_found());
  assert_eq!(dest, AverageState { sum: 2, count: 1, value: 2.0 });
}

#[test]
fn put_state() {
  let Some((_db, store)) = setup_store("Average") else { return };
  let v = store.put_state("id", 0, &AverageState::default()).expect("unexpected error writing initial state");
  assert_eq!(v, 1);
}

#[test]
fn put_state_cannot_overwrite() {
  let Some((_db, store)) = setup_store("Average") else { return };
  let s = AverageState::default();
  store.put_state("id", 0, &s).expect("unexpected error writing initial state");

  let err = store.put_state("id", 0, &s).unwrap_err();
  assert_eq!(err,
             StreamError::OptimisticConcurrency { id: "id".into(),
                                                  state_type: "Average".into(),
                                                  expected: 0 });
}

#[test]
fn get_state() {
  let Some((_db, store)) = setup_store("Average") else { return };
  let initial = AverageState { sum: 1, count: 1, value: 1.0 };
  store.put_state("id", 0, &initial).expect("unexpected error writing initial state");

  let mut retrieved = AverageState::default();
  let sequence = store.get("id", &mut retrieved).expect("get");

  assert_eq!(sequence, 1);
  assert_eq!(retrieved, initial);
}

#[test]
fn conditional_update_advances_version_and_rejects_stale_writers() {
  let Some((_db, store)) = setup_store("Average") else { return };
  let mut expected = 0i64;
  for i in 1..=4 {
    let s = AverageState { sum: i, count: i, value: 1.0 };
    expected = store.put_state("id", expected, &s).expect("put");
  }
  assert_eq!(expected, 4);

  let stale = AverageState { sum: -1, count: 1, value: -1.0 };
  assert!(store.put_state("id", 2, &stale).unwrap_err().is_conflict());
  assert!(store.put_state("id", 5, &stale).unwrap_err().is_conflict());
  assert!(store.put_state("id", -3, &stale).unwrap_err().is_conflict());

  let mut current = AverageState::default();
  assert_eq!(store.get("id", &mut current).unwrap(), 4);
  assert_eq!(current.sum, 4);
  assert_eq!(store.version("id").unwrap(), 4);
  assert_eq!(store.version("missing").unwrap(), 0);
}

#[test]
fn state_types_and_tables_are_namespaced() {
  if cfg!(feature = "pg") {
    return;
  }
  let db = TempDb::new();
  let repo = std::sync::Arc::new(DieselStateRepository::new(&db.config()).expect("repo"));
  let average = Store::new(repo.clone(), "states", "Average").unwrap();
  let batch = Store::new(repo.clone(), "states", "Batch").unwrap();
  let archive = Store::new(repo, "archive", "Average").unwrap();

  average.put_state("id", 0, &AverageState { sum: 7, count: 1, value: 7.0 }).unwrap();
  batch.put_state("id", 0, &json!({"values": [1, 2]})).unwrap();
  // same id, different logical table: independent version counter
  archive.put_state("id", 0, &AverageState::default()).unwrap();

  let mut a = AverageState::default();
  average.get("id", &mut a).unwrap();
  assert_eq!(a.sum, 7);
  let mut b = serde_json::Value::Null;
  batch.get("id", &mut b).unwrap();
  assert_eq!(b, json!({"values": [1, 2]}));
}

#[test]
fn record_round_trips_metadata_and_timestamp() {
  let Some((_db, store)) = setup_store("Average") else { return };
  let before = chrono::Utc::now().timestamp_millis();
  store.put_state("id", 0, &AverageState::default()).unwrap();

  let record = store.record("id").unwrap().expect("record");
  assert_eq!(record.version, 1);
  assert_eq!(record.metadata, json!({"inbound": [], "outbound": []}));
  assert!(record.updated_at.timestamp_millis() >= before);
}

#[test]
fn reopening_the_same_database_keeps_state() {
  if cfg!(feature = "pg") {
    return;
  }
  let db = TempDb::new();
  let config = db.config();
  {
    let store = new_store(&config, "states", "Average").unwrap();
    store.put_state("id", 0, &AverageState { sum: 3, count: 1, value: 3.0 }).unwrap();
  }
  // second pool: migrations are already applied
  let store = new_store(&config, "states", "Average").unwrap();
  let mut s = AverageState::default();
  assert_eq!(store.get("id", &mut s).unwrap(), 1);
  assert_eq!(s.sum, 3);
}

#[test]
fn postgres_url_is_rejected_by_sqlite_build() {
  if cfg!(feature = "pg") {
    return;
  }
  let res = DieselStateRepository::new(&StoreConfig::new("postgres://user@localhost/db"));
  assert!(matches!(res, Err(StreamError::Config(_))));
}

#[test]
fn zero_pool_size_is_a_config_error() {
  if cfg!(feature = "pg") {
    return;
  }
  let db = TempDb::new();
  let res = DieselStateRepository::new(&db.config().with_pool_size(0));
  assert!(matches!(res, Err(StreamError::Config(_))));
}

#[test]
fn temporary_database_files_are_removed() {
  if cfg!(feature = "pg") {
    return;
  }
  let path = {
    let Some((db, store)) = setup_store("Average") else { return };
    store.put_state("id", 0, &AverageState::default()).unwrap();
    assert!(db.path.exists());
    drop(store);
    db.path.clone()
  };
  assert!(!path.exists());
}
