use crate::archive::create_zip_file;
use crate::config::ImporterConfig;
use crate::cytoband::{cytoband_file_name, write_cytoband_file};
use crate::error::{ImportError, ImportResult};
use crate::manifest::{GenomeManifest, ManifestInputs};
use crate::resolver::{ResolvedSequences, SPLIT_PROGRESS_SHARE, resolve_sequence_input};
use crate::working_area::WorkingArea;
use genome_archive_protocol::{GenomeArchiveReport, ImportProgress};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CYTOBAND_PROGRESS: u32 = 20;
const MANIFEST_PROGRESS: u32 = 10;
const ARCHIVE_PROGRESS: u32 = 20;

/// Parameters for building one genome archive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportRequest {
    pub output_dir: PathBuf,
    pub archive_file_name: String,
    pub genome_id: String,
    pub display_name: String,
    /// Where split sequence files go, relative to `output_dir`, and what the
    /// manifest records as the sequence location.
    pub sequence_location: Option<String>,
    /// A FASTA file, a `.gz` FASTA, a `.zip` of FASTA files, or a directory.
    pub sequence_input: Option<PathBuf>,
    pub gene_file: Option<PathBuf>,
    pub cytoband_file: Option<PathBuf>,
    pub alias_file: Option<PathBuf>,
    /// Recorded in the manifest instead of `sequence_location` when non-empty.
    pub sequence_location_override: Option<String>,
}

impl ImportRequest {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.output_dir.as_os_str().is_empty() {
            missing.push("output_dir");
        }
        if self.archive_file_name.trim().is_empty() {
            missing.push("archive_file_name");
        }
        if self.genome_id.trim().is_empty() {
            missing.push("genome_id");
        }
        if self.display_name.trim().is_empty() {
            missing.push("display_name");
        }
        missing
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(&self.archive_file_name)
    }

    /// Directory receiving one sequence file per record.
    pub fn sequence_output_dir(&self) -> PathBuf {
        match self.sequence_location.as_deref() {
            Some(location) if !location.is_empty() => self.output_dir.join(location),
            _ => self.output_dir.clone(),
        }
    }

    fn manifest_sequence_location(&self) -> Option<&str> {
        self.sequence_location_override
            .as_deref()
            .filter(|location| !location.is_empty())
            .or(self.sequence_location.as_deref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenomeImporter {
    config: ImporterConfig,
}

impl GenomeImporter {
    pub fn new(config: ImporterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// Splits a sequence input into per-record files under `output_dir`.
    pub fn split_sequences(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> ImportResult<ResolvedSequences> {
        let mut quiet = |_: &str, _: u32| {};
        resolve_sequence_input(input, output_dir, self.config.max_contigs, &mut quiet)
    }

    pub fn create_genome_archive(
        &self,
        request: &ImportRequest,
    ) -> ImportResult<Option<GenomeArchiveReport>> {
        let mut noop = |_| {};
        self.create_genome_archive_with_progress(request, &mut noop)
    }

    /// Builds the genome archive described by `request`.
    ///
    /// Returns `Ok(None)` without touching the filesystem when a required
    /// field is missing. The working area is removed on every exit path;
    /// sequence files split before a failure are left in place. Progress
    /// increments of a successful run add up to 100.
    pub fn create_genome_archive_with_progress(
        &self,
        request: &ImportRequest,
        on_progress: &mut dyn FnMut(ImportProgress),
    ) -> ImportResult<Option<GenomeArchiveReport>> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            log::error!("Invalid input for genome creation:");
            log::error!("\tGenome output location={}", request.output_dir.display());
            log::error!("\tGenome filename={}", request.archive_file_name);
            log::error!("\tGenome id={}", request.genome_id);
            log::error!("\tGenome name={}", request.display_name);
            log::error!("\tMissing: {}", missing.join(", "));
            return Ok(None);
        }

        let genome_id = request.genome_id.as_str();
        let mut notify = |phase: &str, item: &str, increment: u32| {
            on_progress(ImportProgress {
                genome_id: genome_id.to_string(),
                phase: phase.to_string(),
                item: item.to_string(),
                increment,
            })
        };

        log::info!(
            "Creating genome archive '{}' for '{}'",
            request.archive_path().display(),
            genome_id
        );
        let area = WorkingArea::acquire(&self.config.working_root, &request.archive_file_name)?;

        let mut cytoband_file = request.cytoband_file.clone();
        let mut ordered = false;
        let mut filenames_altered = false;
        let mut chromosome_count = 0;

        if let Some(input) = &request.sequence_input {
            let sequence_dir = request.sequence_output_dir();
            fs::create_dir_all(&sequence_dir).map_err(|e| {
                ImportError::io(
                    format!(
                        "Could not create sequence directory '{}'",
                        sequence_dir.display()
                    ),
                    e,
                )
            })?;
            let resolved = resolve_sequence_input(
                input,
                &sequence_dir,
                self.config.max_contigs,
                &mut |item: &str, increment: u32| notify("split_sequence", item, increment),
            )?;
            filenames_altered = resolved.filenames_altered;
            chromosome_count = resolved.ledger.len();

            if cytoband_file.is_none() {
                let path = area.join(&cytoband_file_name(genome_id));
                ordered = write_cytoband_file(&resolved.ledger, resolved.single_stream, &path)?;
                cytoband_file = Some(path);
            }
        } else {
            notify("split_sequence", "", SPLIT_PROGRESS_SHARE);
        }
        // Skipped phases still report their share so every run adds up to 100.
        let cytoband_item = cytoband_file
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        notify("cytoband", &cytoband_item, CYTOBAND_PROGRESS);

        let manifest = GenomeManifest::build(&ManifestInputs {
            genome_id,
            display_name: &request.display_name,
            sequence_location: request.manifest_sequence_location(),
            cytoband_file: cytoband_file.as_deref(),
            gene_file: request.gene_file.as_deref(),
            alias_file: request.alias_file.as_deref(),
            ordered,
            filenames_altered,
        });
        let manifest_path = manifest.write_to(area.path())?;
        notify("manifest", &manifest_path.display().to_string(), MANIFEST_PROGRESS);

        fs::create_dir_all(&request.output_dir).map_err(|e| {
            ImportError::io(
                format!(
                    "Could not create output directory '{}'",
                    request.output_dir.display()
                ),
                e,
            )
        })?;
        let archive_path = request.archive_path();
        let members: Vec<&Path> = [
            request.gene_file.as_deref(),
            cytoband_file.as_deref(),
            Some(manifest_path.as_path()),
            request.alias_file.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        create_zip_file(&archive_path, &members, self.config.compression_level)?;
        notify("archive", &archive_path.display().to_string(), ARCHIVE_PROGRESS);

        drop(area);
        log::info!("Created genome archive '{}'", archive_path.display());
        Ok(Some(GenomeArchiveReport {
            archive_path: archive_path.display().to_string(),
            genome_id: genome_id.to_string(),
            chromosome_count,
            ordered,
            filenames_altered,
        }))
    }
}
