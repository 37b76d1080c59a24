//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core
//! services. Environment variables are never read during request handling,
//! which keeps behaviour consistent across multi-threaded runtimes and test
//! harnesses.

use crate::{RegistryError, RegistryResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    db_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `db_file` is the path of the single JSON file holding the whole patient
    /// collection. The file is not required to exist yet; a missing file
    /// surfaces as a storage error on the first request that touches it.
    pub fn new(db_file: PathBuf) -> RegistryResult<Self> {
        if db_file.as_os_str().is_empty() {
            return Err(RegistryError::InvalidInput(
                "registry file path cannot be empty".into(),
            ));
        }

        Ok(Self { db_file })
    }

    pub fn db_file(&self) -> &Path {
        &self.db_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_empty_path() {
        let cfg = CoreConfig::new(PathBuf::new());
        assert!(matches!(cfg, Err(RegistryError::InvalidInput(_))));
    }

    #[test]
    fn test_config_keeps_path() {
        let cfg = CoreConfig::new(PathBuf::from("patients.json")).unwrap();
        assert_eq!(cfg.db_file(), Path::new("patients.json"));
    }
}
