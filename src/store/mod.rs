pub mod collection;

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

pub use collection::{Collection, LoadPolicy, Record};

use collection::{next_id, same_id};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("no id left to assign in {path:?}")]
    IdsExhausted { path: PathBuf },
    #[error("failed to serialize {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Whole-file JSON array store. Every operation reads the file, mutates the
/// array in memory and rewrites it. Nothing is cached and nothing is locked:
/// concurrent writers to the same collection can lose each other's updates.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_of(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Return the collection exactly as stored.
    pub async fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        self.load(collection, LoadPolicy::Strict).await
    }

    /// Assign the next id to `record`, append it and rewrite the file.
    /// A missing or corrupt file is treated as an empty collection.
    pub async fn append(
        &self,
        collection: Collection,
        mut record: Record,
    ) -> Result<Record, StoreError> {
        let mut records = self.load(collection, LoadPolicy::Lenient).await?;
        let id = next_id(&records).ok_or_else(|| StoreError::IdsExhausted {
            path: self.path_of(collection),
        })?;
        record.insert("id".to_string(), Value::from(id));
        records.push(Value::Object(record.clone()));
        self.save(collection, &records).await?;
        debug!(collection = collection.file_name(), id, "appended record");
        Ok(record)
    }

    /// Remove every record in `source` whose id matches `record`'s id, then
    /// append `record` to `target`. The two rewrites are independent: if the
    /// second one fails the record is already gone from `source`.
    ///
    /// Returns how many records were removed from `source`.
    pub async fn move_record(
        &self,
        source: Collection,
        target: Collection,
        record: Record,
    ) -> Result<usize, StoreError> {
        let id = record.get("id");

        let mut remaining = self.load(source, LoadPolicy::Strict).await?;
        let before = remaining.len();
        remaining.retain(|r| !same_id(r.get("id"), id));
        let removed = before - remaining.len();
        self.save(source, &remaining).await?;

        let mut moved = self.load(target, LoadPolicy::Strict).await?;
        moved.push(Value::Object(record));
        self.save(target, &moved).await?;

        Ok(removed)
    }

    async fn load(
        &self,
        collection: Collection,
        policy: LoadPolicy,
    ) -> Result<Vec<Value>, StoreError> {
        let path = self.path_of(collection);
        // Raw bytes: undecodable text is a parse failure, not a read failure.
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if policy == LoadPolicy::Lenient && e.kind() == io::ErrorKind::NotFound => {
                debug!("{:?} does not exist, starting empty", path);
                return Ok(Vec::new());
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        if policy == LoadPolicy::Lenient && data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Vec<Value>>(&data) {
            Ok(records) => Ok(records),
            Err(e) if policy == LoadPolicy::Lenient => {
                warn!("{:?} is not a JSON array ({}), treating as empty", path, e);
                Ok(Vec::new())
            }
            Err(source) => Err(StoreError::Parse { path, source }),
        }
    }

    async fn save(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        let path = self.path_of(collection);
        let json = match serde_json::to_string_pretty(records) {
            Ok(json) => json,
            Err(source) => return Err(StoreError::Serialize { path, source }),
        };
        match tokio::fs::write(&path, json).await {
            Ok(()) => Ok(()),
            Err(source) => Err(StoreError::Write { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        (dir, store)
    }

    fn write(store: &RecordStore, collection: Collection, contents: &str) {
        std::fs::write(store.path_of(collection), contents).unwrap();
    }

    fn read(store: &RecordStore, collection: Collection) -> Value {
        let data = std::fs::read_to_string(store.path_of(collection)).unwrap();
        serde_json::from_str(&data).unwrap()
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[tokio::test]
    async fn list_returns_file_contents_unchanged() {
        let (_dir, store) = store();
        let contents = json!([
            {"name": "Alice", "id": 1, "slot": {"day": "mon", "hour": 9}},
            {"id": 2, "name": "Bob", "notes": null}
        ]);
        write(&store, Collection::Queue, &contents.to_string());

        let listed = store.list(Collection::Queue).await.unwrap();
        assert_eq!(Value::Array(listed.clone()), contents);
        // Key order survives the round trip.
        let keys: Vec<&str> = listed[1].as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["id", "name", "notes"]);
    }

    #[tokio::test]
    async fn list_missing_file_is_read_error() {
        let (_dir, store) = store();
        let err = store.list(Collection::Queue).await.unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[tokio::test]
    async fn list_invalid_json_is_parse_error() {
        let (_dir, store) = store();
        write(&store, Collection::Queue, "{not json");
        let err = store.list(Collection::Queue).await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));

        write(&store, Collection::Queue, "");
        let err = store.list(Collection::Queue).await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[tokio::test]
    async fn append_to_missing_file_assigns_id_one() {
        let (_dir, store) = store();
        let saved = store
            .append(Collection::Reports, record(json!({"name": "Alice"})))
            .await
            .unwrap();
        assert_eq!(saved.get("id"), Some(&json!(1)));
        assert_eq!(
            read(&store, Collection::Reports),
            json!([{"name": "Alice", "id": 1}])
        );
    }

    #[tokio::test]
    async fn append_to_empty_array_assigns_id_one() {
        let (_dir, store) = store();
        write(&store, Collection::Queue, "[]");
        store
            .append(Collection::Queue, record(json!({"name": "Alice"})))
            .await
            .unwrap();
        assert_eq!(
            read(&store, Collection::Queue),
            json!([{"name": "Alice", "id": 1}])
        );
    }

    #[tokio::test]
    async fn append_uses_max_plus_one() {
        let (_dir, store) = store();
        write(&store, Collection::Queue, r#"[{"id":1},{"id":3},{"id":5}]"#);
        let saved = store
            .append(Collection::Queue, record(json!({"name": "Eve"})))
            .await
            .unwrap();
        assert_eq!(saved.get("id"), Some(&json!(6)));
        assert_eq!(store.list(Collection::Queue).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn append_overwrites_caller_supplied_id() {
        let (_dir, store) = store();
        write(&store, Collection::Queue, r#"[{"id":4}]"#);
        let saved = store
            .append(Collection::Queue, record(json!({"id": 99, "name": "Zed"})))
            .await
            .unwrap();
        assert_eq!(saved.get("id"), Some(&json!(5)));
        let keys: Vec<&str> = saved.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["id", "name"]);
    }

    #[tokio::test]
    async fn append_recovers_from_invalid_json() {
        let (_dir, store) = store();
        write(&store, Collection::Reports, "this is not json");
        store
            .append(Collection::Reports, record(json!({"summary": "ok"})))
            .await
            .unwrap();
        assert_eq!(
            read(&store, Collection::Reports),
            json!([{"summary": "ok", "id": 1}])
        );
    }

    #[tokio::test]
    async fn append_recovers_from_blank_file() {
        let (_dir, store) = store();
        write(&store, Collection::Reports, "  \n");
        let saved = store
            .append(Collection::Reports, record(json!({})))
            .await
            .unwrap();
        assert_eq!(saved.get("id"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn append_recovers_from_invalid_utf8() {
        let (_dir, store) = store();
        std::fs::write(store.path_of(Collection::Reports), [0xff, 0xfe, b'[', b']']).unwrap();
        let saved = store
            .append(Collection::Reports, record(json!({"a": 1})))
            .await
            .unwrap();
        assert_eq!(saved.get("id"), Some(&json!(1)));
        assert_eq!(read(&store, Collection::Reports), json!([{"a": 1, "id": 1}]));
    }

    #[tokio::test]
    async fn list_invalid_utf8_is_parse_error() {
        let (_dir, store) = store();
        std::fs::write(store.path_of(Collection::Queue), [0xff, 0xfe, b'[', b']']).unwrap();
        let err = store.list(Collection::Queue).await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[tokio::test]
    async fn append_fails_when_ids_run_out() {
        let (_dir, store) = store();
        let full = format!(r#"[{{"id":{}}}]"#, i64::MAX);
        write(&store, Collection::Queue, &full);

        let err = store
            .append(Collection::Queue, record(json!({"a": 1})))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::IdsExhausted { .. }));
        // The file is left as it was.
        assert_eq!(read(&store, Collection::Queue), json!([{"id": i64::MAX}]));
    }

    #[tokio::test]
    async fn append_writes_pretty_json() {
        let (_dir, store) = store();
        store
            .append(Collection::Queue, record(json!({"name": "Alice"})))
            .await
            .unwrap();
        let data = std::fs::read_to_string(store.path_of(Collection::Queue)).unwrap();
        assert_eq!(data, "[\n  {\n    \"name\": \"Alice\",\n    \"id\": 1\n  }\n]");
    }

    #[tokio::test]
    async fn move_removes_all_matches_and_appends_once() {
        let (_dir, store) = store();
        write(
            &store,
            Collection::Queue,
            r#"[{"id":1,"name":"A"},{"id":2,"name":"B"},{"id":1,"name":"A again"}]"#,
        );
        write(&store, Collection::AttendedPatients, "[]");

        let patient = record(json!({"id": 1, "name": "A", "seen": true}));
        let removed = store
            .move_record(Collection::Queue, Collection::AttendedPatients, patient)
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(
            read(&store, Collection::Queue),
            json!([{"id": 2, "name": "B"}])
        );
        assert_eq!(
            read(&store, Collection::AttendedPatients),
            json!([{"id": 1, "name": "A", "seen": true}])
        );
    }

    #[tokio::test]
    async fn move_appends_even_without_a_match() {
        let (_dir, store) = store();
        write(&store, Collection::Queue, r#"[{"id":2}]"#);
        write(&store, Collection::AttendedPatients, r#"[{"id":9}]"#);

        let removed = store
            .move_record(
                Collection::Queue,
                Collection::AttendedPatients,
                record(json!({"id": 7})),
            )
            .await
            .unwrap();

        assert_eq!(removed, 0);
        assert_eq!(read(&store, Collection::Queue), json!([{"id": 2}]));
        assert_eq!(
            read(&store, Collection::AttendedPatients),
            json!([{"id": 9}, {"id": 7}])
        );
    }

    #[tokio::test]
    async fn move_missing_source_fails_without_writing() {
        let (_dir, store) = store();
        write(&store, Collection::AttendedPatients, "[]");

        let err = store
            .move_record(
                Collection::Queue,
                Collection::AttendedPatients,
                record(json!({"id": 1})),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Read { .. }));
        assert_eq!(read(&store, Collection::AttendedPatients), json!([]));
    }

    #[tokio::test]
    async fn move_is_not_rolled_back_when_target_fails() {
        let (_dir, store) = store();
        write(&store, Collection::Queue, r#"[{"id":1},{"id":2}]"#);

        let err = store
            .move_record(
                Collection::Queue,
                Collection::AttendedPatients,
                record(json!({"id": 1})),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Read { .. }));
        assert_eq!(read(&store, Collection::Queue), json!([{"id": 2}]));
    }
}
