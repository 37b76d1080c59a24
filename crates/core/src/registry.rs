//! Patient service and sort parameters.
//!
//! `PatientService` implements the registry's operations over the record
//! store. Every operation re-reads the whole file and mutating operations
//! follow the same shape: load, check the precondition, mutate the in-memory
//! collection, save, respond. A failed precondition or validation never
//! reaches the save, so the file is untouched on any error.

use crate::{
    CoreConfig, PatientRecord, PatientUpdate, PatientView, RecordStore, RegistryError,
    RegistryResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

/// Attribute a collection can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Age,
    Bmi,
    Weight,
    Height,
}

/// Sort direction, ascending unless the caller says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// One entry of a sorted listing.
///
/// A JSON object cannot express order, so the sort operation returns an array
/// of id-tagged records instead of the id-keyed map.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SortedPatient {
    pub id: String,
    #[serde(flatten)]
    pub patient: PatientView,
}

/// Pure patient data operations - no API concerns.
#[derive(Clone)]
pub struct PatientService {
    cfg: Arc<CoreConfig>,
}

impl PatientService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    fn store(&self) -> RecordStore {
        RecordStore::new(self.cfg.db_file().to_path_buf())
    }

    /// Returns the whole collection with derived fields attached.
    pub fn list(&self) -> RegistryResult<BTreeMap<String, PatientView>> {
        let collection = self.store().load()?;

        Ok(collection
            .iter()
            .map(|(id, record)| (id.clone(), PatientView::from(record)))
            .collect())
    }

    /// Returns a single record.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if `id` is not in the collection.
    pub fn get(&self, id: &str) -> RegistryResult<PatientView> {
        let collection = self.store().load()?;

        collection
            .get(id)
            .map(PatientView::from)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Returns the collection ordered by the chosen attribute.
    ///
    /// The sort is stable, so records with equal keys keep the collection's
    /// own iteration order (id order).
    pub fn sorted(&self, key: SortKey, order: SortOrder) -> RegistryResult<Vec<SortedPatient>> {
        let collection = self.store().load()?;

        let mut entries: Vec<SortedPatient> = collection
            .iter()
            .map(|(id, record)| SortedPatient {
                id: id.clone(),
                patient: PatientView::from(record),
            })
            .collect();

        let sort_value = |entry: &SortedPatient| -> f64 {
            match key {
                SortKey::Age => f64::from(entry.patient.age),
                SortKey::Bmi => entry.patient.bmi,
                SortKey::Weight => entry.patient.weight,
                SortKey::Height => entry.patient.height,
            }
        };

        entries.sort_by(|a, b| {
            let ordering = sort_value(a).total_cmp(&sort_value(b));
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(entries)
    }

    /// Creates a new record under a client-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidInput` if the id is blank or the record
    /// violates a field constraint, and `RegistryError::Conflict` if the id is
    /// already taken. Neither writes the file.
    pub fn create(&self, id: String, record: PatientRecord) -> RegistryResult<PatientView> {
        if id.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "patient id cannot be empty".into(),
            ));
        }
        record.validate()?;

        let store = self.store();
        let mut collection = store.load()?;

        if collection.contains_key(&id) {
            return Err(RegistryError::Conflict(id));
        }

        let view = PatientView::from(&record);
        collection.insert(id, record);
        store.save(&collection)?;

        Ok(view)
    }

    /// Applies a partial update to an existing record.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for an unknown id and
    /// `RegistryError::InvalidInput` if the merged record is invalid; the file
    /// is untouched in both cases.
    pub fn update(&self, id: &str, update: PatientUpdate) -> RegistryResult<PatientView> {
        let store = self.store();
        let mut collection = store.load()?;

        let record = collection
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        record.apply(update)?;
        let view = PatientView::from(&*record);

        store.save(&collection)?;

        Ok(view)
    }

    /// Removes a record.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` for an unknown id without writing.
    pub fn delete(&self, id: &str) -> RegistryResult<()> {
        let store = self.store();
        let mut collection = store.load()?;

        if collection.remove(id).is_none() {
            return Err(RegistryError::NotFound(id.to_string()));
        }

        store.save(&collection)
    }
}
