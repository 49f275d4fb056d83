//! In-memory record store keyed by record id

use super::error::{StoreError, StoreResult};
use super::matching::record_matches;
use super::{RecordStore, UpsertOutcome};
use crate::types::CatalogRecord;
use segment_compiler::compiler::StoreQuery;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

/// Reference store: concurrent reads, exclusive upserts, results in id order
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<BTreeMap<u64, CatalogRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records; a later record replaces an earlier one with the same id
    pub fn from_records(records: impl IntoIterator<Item = CatalogRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Load a JSON array of records. A missing file yields an empty store.
    pub fn load_json_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let records: Vec<CatalogRecord> =
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.display().to_string(),
                source,
            })?;

        let mut by_id = BTreeMap::new();
        for record in records {
            let id = record.id;
            if by_id.insert(id, record).is_some() {
                return Err(StoreError::DuplicateId {
                    id,
                    path: path.display().to_string(),
                });
            }
        }

        Ok(Self {
            records: RwLock::new(by_id),
        })
    }

    /// Write every record as a pretty-printed JSON array
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let records = self.find(&StoreQuery::match_all())?;
        let content = serde_json::to_string_pretty(&records).map_err(|source| {
            StoreError::Json {
                path: path.display().to_string(),
                source,
            }
        })?;
        fs::write(path, content).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn get(&self, id: u64) -> StoreResult<Option<CatalogRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::lock_poisoned("get"))?;
        Ok(records.get(&id).cloned())
    }
}

impl RecordStore for InMemoryStore {
    fn find(&self, query: &StoreQuery) -> StoreResult<Vec<CatalogRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::lock_poisoned("find"))?;

        Ok(records
            .values()
            .filter(|record| record_matches(record, query))
            .cloned()
            .collect())
    }

    fn upsert(&self, record: CatalogRecord) -> StoreResult<UpsertOutcome> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::lock_poisoned("upsert"))?;

        Ok(match records.insert(record.id, record) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Inserted,
        })
    }

    fn len(&self) -> StoreResult<usize> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::lock_poisoned("len"))?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use segment_compiler::compiler::{StoreClause, StoreValue};
    use segment_compiler::condition::Comparison;
    use segment_compiler::policy::Field;
    use std::io::Write;

    #[test]
    fn test_upsert_is_idempotent_by_id() {
        let store = InMemoryStore::new();
        assert_eq!(
            store.upsert(CatalogRecord::new(1, "Lamp", "20")).unwrap(),
            UpsertOutcome::Inserted
        );
        assert_eq!(
            store.upsert(CatalogRecord::new(1, "Desk Lamp", "25")).unwrap(),
            UpsertOutcome::Updated
        );
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get(1).unwrap().unwrap().title, "Desk Lamp");
    }

    #[test]
    fn test_find_returns_id_order() {
        let store = InMemoryStore::from_records([
            CatalogRecord::new(3, "c", "1"),
            CatalogRecord::new(1, "a", "1"),
            CatalogRecord::new(2, "b", "1"),
        ]);
        let ids: Vec<u64> = store
            .find(&StoreQuery::match_all())
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_find_applies_clauses() {
        let store = InMemoryStore::from_records([
            CatalogRecord::new(1, "a", "1").with_on_sale(true),
            CatalogRecord::new(2, "b", "1"),
        ]);
        let mut query = StoreQuery::match_all();
        query.push(StoreClause::compare(
            Field::OnSale,
            Comparison::Eq,
            StoreValue::Boolean(true),
        ));
        let found = store.find(&query).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let store = InMemoryStore::from_records([
            CatalogRecord::new(5, "Kettle", "35.50").with_tags(["kitchen"]),
        ]);
        store.save_json_file(&path).unwrap();

        let loaded = InMemoryStore::load_json_file(&path).unwrap();
        assert_eq!(loaded.get(5).unwrap(), store.get(5).unwrap());
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryStore::load_json_file(dir.path().join("absent.json")).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_invalid_and_duplicate_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert_matches!(
            InMemoryStore::load_json_file(file.path()),
            Err(StoreError::Json { .. })
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1}}, {{"id": 1}}]"#).unwrap();
        assert_matches!(
            InMemoryStore::load_json_file(file.path()),
            Err(StoreError::DuplicateId { id: 1, .. })
        );
    }
}
