//! Whole-file persistence for the patient collection.
//!
//! The registry file is a single pretty-printed JSON object mapping patient id
//! to stored attributes. Every load reads and parses the whole file; every
//! save serializes and overwrites the whole file. There is no locking and no
//! caching across requests, so the file is the single source of truth.
//!
//! Known durability gap: `save` overwrites in place rather than writing to a
//! temporary file and renaming, so a crash mid-write can truncate the store.

use crate::{PatientRecord, RegistryError, RegistryResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The full set of patient records keyed by id, as persisted on disk.
pub type Collection = BTreeMap<String, PatientRecord>;

/// Stateless handle on the registry file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the entire persisted collection.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::FileRead` if the file is missing or unreadable
    /// and `RegistryError::Deserialization` if it holds malformed JSON. There
    /// is deliberately no empty-collection fallback.
    pub fn load(&self) -> RegistryResult<Collection> {
        let contents = fs::read_to_string(&self.path).map_err(RegistryError::FileRead)?;
        let collection: Collection =
            serde_json::from_str(&contents).map_err(RegistryError::Deserialization)?;

        tracing::debug!(
            "loaded {} patient records from {}",
            collection.len(),
            self.path.display()
        );

        Ok(collection)
    }

    /// Serializes the collection and overwrites the registry file.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Serialization` if encoding fails and
    /// `RegistryError::FileWrite` if the file cannot be written.
    pub fn save(&self, collection: &Collection) -> RegistryResult<()> {
        let contents =
            serde_json::to_string_pretty(collection).map_err(RegistryError::Serialization)?;
        fs::write(&self.path, contents).map_err(RegistryError::FileWrite)?;

        tracing::debug!(
            "persisted {} patient records to {}",
            collection.len(),
            self.path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Gender;
    use tempfile::TempDir;

    fn sample_collection() -> Collection {
        let mut collection = Collection::new();
        collection.insert(
            "p001".into(),
            PatientRecord {
                name: "Ananya".into(),
                city: "Guwahati".into(),
                age: 28,
                gender: Gender::Female,
                height: 1.65,
                weight: 45.0,
            },
        );
        collection.insert(
            "p002".into(),
            PatientRecord {
                name: "Ravi".into(),
                city: "Delhi".into(),
                age: 35,
                gender: Gender::Male,
                height: 1.75,
                weight: 85.0,
            },
        );
        collection
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::new(temp.path().join("patients.json"));

        let collection = sample_collection();
        store.save(&collection).unwrap();

        assert_eq!(store.load().unwrap(), collection);
    }

    #[test]
    fn test_save_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::new(temp.path().join("patients.json"));

        store.save(&sample_collection()).unwrap();
        let first = fs::read_to_string(store.path()).unwrap();

        store.save(&store.load().unwrap()).unwrap();
        let second = fs::read_to_string(store.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::new(temp.path().join("nonexistent.json"));

        assert!(matches!(store.load(), Err(RegistryError::FileRead(_))));
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("patients.json");
        fs::write(&path, "{ not json").unwrap();

        let store = RecordStore::new(path);
        assert!(matches!(
            store.load(),
            Err(RegistryError::Deserialization(_))
        ));
    }

    #[test]
    fn test_file_excludes_derived_fields() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::new(temp.path().join("patients.json"));
        store.save(&sample_collection()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("bmi"));
        assert!(!raw.contains("verdict"));
        // pretty-printed for hand editing
        assert!(raw.contains('\n'));
    }
}
