use crate::error::{ImportError, ImportResult};
use crate::ledger::RecordLengthLedger;
use crate::splitter::split_sequence_stream;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const BUNDLE_SUFFIX: &str = ".zip";
pub const GZIP_SUFFIX: &str = ".gz";

/// Share of the overall progress scale spent on splitting sequence input.
pub const SPLIT_PROGRESS_SHARE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceInputShape {
    Directory,
    Bundle,
    SingleFile,
}

impl SequenceInputShape {
    pub fn detect(input: &Path) -> Self {
        if input.is_dir() {
            SequenceInputShape::Directory
        } else if has_suffix(input, BUNDLE_SUFFIX) {
            SequenceInputShape::Bundle
        } else {
            SequenceInputShape::SingleFile
        }
    }

    /// Only a lone file is trusted to already list its records in a
    /// meaningful order.
    pub fn is_single_stream(&self) -> bool {
        matches!(self, SequenceInputShape::SingleFile)
    }
}

/// Everything learned while splitting one sequence input.
#[derive(Debug, Clone)]
pub struct ResolvedSequences {
    pub ledger: RecordLengthLedger,
    pub filenames_altered: bool,
    pub single_stream: bool,
    pub stream_count: usize,
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase().ends_with(suffix))
        .unwrap_or(false)
}

fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Every file below `root` whose name does not start with `.`, in the order
/// the filesystem lists them.
///
/// Symbolic links are followed and hidden directories are descended into;
/// only hidden files are left out.
pub fn sequence_files(root: &Path) -> ImportResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| {
            let context = format!("Could not list sequence directory '{}'", root.display());
            ImportError::io(context, e.into())
        })?;
        if entry.file_type().is_file() && !is_hidden_name(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn progress_increment(stream_count: usize) -> u32 {
    if stream_count == 0 {
        SPLIT_PROGRESS_SHARE
    } else {
        SPLIT_PROGRESS_SHARE / stream_count as u32
    }
}

/// Opens a file for line reading, decompressing `.gz` files transparently.
pub fn open_sequence_file(path: &Path) -> ImportResult<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| {
        ImportError::io(
            format!("Could not open sequence file '{}'", path.display()),
            e,
        )
    })?;
    if has_suffix(path, GZIP_SUFFIX) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Drives the splitter over every stream contained in `input`.
///
/// `on_stream` is called after each stream with its name and a progress
/// increment; the increments of a successful resolution add up to
/// [`SPLIT_PROGRESS_SHARE`]. A failure in any stream aborts the whole
/// resolution; files already written stay in `output_dir`.
pub fn resolve_sequence_input(
    input: &Path,
    output_dir: &Path,
    max_contigs: usize,
    on_stream: &mut dyn FnMut(&str, u32),
) -> ImportResult<ResolvedSequences> {
    let shape = SequenceInputShape::detect(input);
    log::info!(
        "Reading sequence input '{}' as {:?}",
        input.display(),
        shape
    );
    let mut ledger = RecordLengthLedger::new();
    let mut filenames_altered = false;
    let mut reported = 0;
    let mut report = |item: &str, increment: u32| {
        reported += increment;
        on_stream(item, increment);
    };

    let stream_count = match shape {
        SequenceInputShape::Directory => {
            let files = sequence_files(input)?;
            let increment = progress_increment(files.len());
            for path in &files {
                let source = path.display().to_string();
                let reader = open_sequence_file(path)?;
                filenames_altered |=
                    split_sequence_stream(reader, &source, output_dir, max_contigs, &mut ledger)?;
                report(&source, increment);
            }
            files.len()
        }
        SequenceInputShape::Bundle => split_bundle(
            input,
            output_dir,
            max_contigs,
            &mut ledger,
            &mut filenames_altered,
            &mut report,
        )?,
        SequenceInputShape::SingleFile => {
            let source = input.display().to_string();
            let reader = open_sequence_file(input)?;
            filenames_altered =
                split_sequence_stream(reader, &source, output_dir, max_contigs, &mut ledger)?;
            report(&source, SPLIT_PROGRESS_SHARE);
            1
        }
    };

    // Integer shares and empty inputs leave part of the split phase unreported.
    let remainder = SPLIT_PROGRESS_SHARE.saturating_sub(reported);
    if remainder > 0 {
        on_stream(&input.display().to_string(), remainder);
    }

    log::info!(
        "Split {} record(s) from {} stream(s) into '{}'",
        ledger.len(),
        stream_count,
        output_dir.display()
    );
    Ok(ResolvedSequences {
        ledger,
        filenames_altered,
        single_stream: shape.is_single_stream(),
        stream_count,
    })
}

fn split_bundle(
    bundle_path: &Path,
    output_dir: &Path,
    max_contigs: usize,
    ledger: &mut RecordLengthLedger,
    filenames_altered: &mut bool,
    on_stream: &mut dyn FnMut(&str, u32),
) -> ImportResult<usize> {
    let file = File::open(bundle_path).map_err(|e| {
        ImportError::io(
            format!("Could not open sequence bundle '{}'", bundle_path.display()),
            e,
        )
    })?;
    let mut bundle =
        zip::ZipArchive::new(file).map_err(|e| ImportError::archive(bundle_path, e))?;

    let mut streams = Vec::new();
    for index in 0..bundle.len() {
        let entry = bundle
            .by_index(index)
            .map_err(|e| ImportError::archive(bundle_path, e))?;
        let base_name = entry.name().rsplit('/').next().unwrap_or_default();
        if entry.is_dir() || is_hidden_name(base_name) {
            log::debug!("Skipping bundle entry '{}'", entry.name());
        } else {
            streams.push(index);
        }
    }
    let increment = progress_increment(streams.len());

    for &index in &streams {
        let entry = bundle
            .by_index(index)
            .map_err(|e| ImportError::archive(bundle_path, e))?;
        let entry_name = entry.name().to_string();
        let base_name = entry_name.rsplit('/').next().unwrap_or_default();
        let source = format!("{}!{}", bundle_path.display(), entry_name);
        let reader: Box<dyn BufRead + '_> =
            if base_name.to_ascii_lowercase().ends_with(GZIP_SUFFIX) {
                Box::new(BufReader::new(MultiGzDecoder::new(entry)))
            } else {
                Box::new(BufReader::new(entry))
            };
        *filenames_altered |=
            split_sequence_stream(reader, &source, output_dir, max_contigs, ledger)?;
        on_stream(&source, increment);
    }
    Ok(streams.len())
}
