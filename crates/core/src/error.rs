//! Error taxonomy for registry operations.
//!
//! Every fallible operation in this crate returns [`RegistryResult`]. The
//! variants split into user-correctable failures (`InvalidInput`, `Conflict`,
//! `NotFound`) and storage failures (file I/O and JSON encode/decode), so the
//! API layer can map them to status codes without inspecting messages.

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("patient already exists: {0}")]
    Conflict(String),
    #[error("patient not found: {0}")]
    NotFound(String),
    #[error("failed to read registry file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write registry file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize registry: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize registry: {0}")]
    Deserialization(serde_json::Error),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
