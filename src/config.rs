use crate::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKING_DIR_NAME: &str = "genome-archiver";
pub const DEFAULT_MAX_CONTIGS: usize = 1_000_000;
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;

/// Process-level settings for the importer.
///
/// `working_root` is where per-operation working areas are created; nothing
/// reads ambient global state for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    pub working_root: PathBuf,
    pub max_contigs: usize,
    pub compression_level: i64,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            working_root: std::env::temp_dir().join(DEFAULT_WORKING_DIR_NAME),
            max_contigs: DEFAULT_MAX_CONTIGS,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl ImporterConfig {
    pub fn from_json_file(path: &Path) -> ImportResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ImportError::io(
                format!("Could not read importer config '{}'", path.display()),
                e,
            )
        })?;
        serde_json::from_str(&text).map_err(|e| ImportError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn with_working_root(mut self, working_root: impl Into<PathBuf>) -> Self {
        self.working_root = working_root.into();
        self
    }

    pub fn with_max_contigs(mut self, max_contigs: usize) -> Self {
        self.max_contigs = max_contigs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let td = tempdir().unwrap();
        let path = td.path().join("importer.json");
        fs::write(&path, r#"{ "max_contigs": 12 }"#).unwrap();

        let config = ImporterConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_contigs, 12);
        assert_eq!(config.compression_level, DEFAULT_COMPRESSION_LEVEL);
        assert!(config.working_root.ends_with(DEFAULT_WORKING_DIR_NAME));
    }

    #[test]
    fn test_malformed_config_is_reported() {
        let td = tempdir().unwrap();
        let path = td.path().join("importer.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ImporterConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, ImportError::Config { .. }));
        assert!(!err.is_io());
    }

    #[test]
    fn test_missing_config_is_io() {
        let td = tempdir().unwrap();
        let err = ImporterConfig::from_json_file(&td.path().join("absent.json")).unwrap_err();
        assert!(err.is_io());
    }
}
