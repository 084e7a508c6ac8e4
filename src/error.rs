use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Maximum number of contigs exceeded ({limit})")]
    TooManyContigs { limit: usize },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("Could not process archive '{path}': {source}")]
    Archive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("Invalid importer config '{path}': {message}")]
    Config { path: String, message: String },
}

pub type ImportResult<T> = Result<T, ImportError>;

impl ImportError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ImportError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn archive(path: &Path, source: zip::result::ZipError) -> Self {
        ImportError::Archive {
            path: path.display().to_string(),
            source,
        }
    }

    /// True for every failure that originates in reading or writing files,
    /// including the zip container layer.
    pub fn is_io(&self) -> bool {
        matches!(self, ImportError::Io { .. } | ImportError::Archive { .. })
    }

    pub fn is_contig_limit(&self) -> bool {
        matches!(self, ImportError::TooManyContigs { .. })
    }
}
