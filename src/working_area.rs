use crate::error::{ImportError, ImportResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const WORKING_AREA_SUFFIX: &str = "_tmp";

/// Private scratch directory for one archive-creation call.
///
/// The directory is removed when the value is dropped, on every exit path.
#[derive(Debug)]
pub struct WorkingArea {
    path: PathBuf,
}

impl WorkingArea {
    /// Creates `<root>/<archive_file_name>_tmp`, replacing a leftover
    /// directory from an earlier run.
    pub fn acquire(root: &Path, archive_file_name: &str) -> ImportResult<Self> {
        let path = root.join(format!("{archive_file_name}{WORKING_AREA_SUFFIX}"));
        if path.exists() {
            log::warn!("Removing stale working area '{}'", path.display());
            fs::remove_dir_all(&path).map_err(|e| {
                ImportError::io(
                    format!("Could not remove stale working area '{}'", path.display()),
                    e,
                )
            })?;
        }
        fs::create_dir_all(&path).map_err(|e| {
            ImportError::io(
                format!("Could not create working area '{}'", path.display()),
                e,
            )
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn remove(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Drop for WorkingArea {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            log::warn!(
                "Could not remove working area '{}': {e}",
                self.path.display()
            );
        }
    }
}
