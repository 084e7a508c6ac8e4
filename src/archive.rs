use crate::error::{ImportError, ImportResult};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn part_path(destination: &Path) -> PathBuf {
    let mut tmp_os: OsString = destination.as_os_str().to_os_string();
    tmp_os.push(".part");
    PathBuf::from(tmp_os)
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Fails when two inputs would be stored under the same base name.
fn check_unique_entry_names(inputs: &[&Path]) -> ImportResult<()> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    for input in inputs {
        let name = entry_name(input);
        if let Some(first) = seen.insert(name.clone(), *input) {
            let message = format!(
                "'{}' and '{}' share the member name '{name}'",
                first.display(),
                input.display()
            );
            return Err(ImportError::io(
                format!("Could not pack archive members: {message}"),
                io::Error::new(io::ErrorKind::AlreadyExists, message),
            ));
        }
    }
    Ok(())
}

fn write_entries(
    writer: &mut ZipWriter<File>,
    archive_path: &Path,
    inputs: &[&Path],
    options: SimpleFileOptions,
) -> ImportResult<()> {
    for input in inputs {
        let name = entry_name(input);
        let mut source = File::open(input).map_err(|e| {
            ImportError::io(
                format!("Could not open archive member '{}'", input.display()),
                e,
            )
        })?;
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| ImportError::archive(archive_path, e))?;
        io::copy(&mut source, writer).map_err(|e| {
            ImportError::io(
                format!("Could not add '{}' to '{}'", name, archive_path.display()),
                e,
            )
        })?;
        log::debug!("Added '{name}' to '{}'", archive_path.display());
    }
    Ok(())
}

/// Packs `inputs` into a zip at `archive_path`, each stored under its base name.
///
/// The archive is built next to its destination and renamed into place, so a
/// failed run never leaves a truncated archive behind. Inputs sharing a base
/// name are rejected before anything is written.
pub fn create_zip_file(
    archive_path: &Path,
    inputs: &[&Path],
    compression_level: i64,
) -> ImportResult<()> {
    check_unique_entry_names(inputs)?;
    let tmp_path = part_path(archive_path);
    let file = File::create(&tmp_path).map_err(|e| {
        ImportError::io(format!("Could not create '{}'", tmp_path.display()), e)
    })?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(compression_level));

    let written = write_entries(&mut writer, archive_path, inputs, options).and_then(|_| {
        writer
            .finish()
            .map(|_| ())
            .map_err(|e| ImportError::archive(archive_path, e))
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, archive_path).map_err(|e| {
        ImportError::io(
            format!("Could not finalize archive '{}'", archive_path.display()),
            e,
        )
    })
}
