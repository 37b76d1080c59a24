//! # FPR Core
//!
//! Core business logic for the FPR flat-file patient registry.
//!
//! This crate contains pure data operations over a single JSON registry file:
//! - Record schema, validation, and the derived BMI/verdict fields
//! - Whole-file load/save persistence (`RecordStore`)
//! - The `PatientService` operations: list, get, sort, create, update, delete
//!
//! **No API concerns**: HTTP routing, status-code mapping, and OpenAPI
//! documentation belong in `api-rest`.

pub mod config;
pub mod error;
pub mod record;
pub mod registry;
pub mod store;

pub use config::CoreConfig;
pub use error::{RegistryError, RegistryResult};
pub use record::{bmi, Gender, PatientRecord, PatientUpdate, PatientView, Verdict};
pub use registry::{PatientService, SortKey, SortOrder, SortedPatient};
pub use store::{Collection, RecordStore};
