use serde::{Deserialize, Serialize};

/// Name of the key/value descriptor stored at the root of every genome archive.
pub const MANIFEST_FILE_NAME: &str = "property.txt";

/// The fixed set of keys a genome archive manifest may carry, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManifestKey {
    FilenamesAltered,
    Ordered,
    Id,
    Name,
    CytobandFile,
    GeneFile,
    ChrAliasFile,
    SequenceLocation,
}

impl ManifestKey {
    pub const ALL: [ManifestKey; 8] = [
        ManifestKey::FilenamesAltered,
        ManifestKey::Ordered,
        ManifestKey::Id,
        ManifestKey::Name,
        ManifestKey::CytobandFile,
        ManifestKey::GeneFile,
        ManifestKey::ChrAliasFile,
        ManifestKey::SequenceLocation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestKey::FilenamesAltered => "filenamesAltered",
            ManifestKey::Ordered => "ordered",
            ManifestKey::Id => "id",
            ManifestKey::Name => "name",
            ManifestKey::CytobandFile => "cytobandFile",
            ManifestKey::GeneFile => "geneFile",
            ManifestKey::ChrAliasFile => "chrAliasFile",
            ManifestKey::SequenceLocation => "sequenceLocation",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == raw)
    }
}

/// Coarse progress notification emitted while an archive is assembled.
///
/// `increment` is relative; the increments of one operation sum to roughly 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProgress {
    pub genome_id: String,
    pub phase: String,
    pub item: String,
    pub increment: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromosomeLength {
    pub name: String,
    pub length: u64,
}

/// Outcome of splitting one sequence input into per-record files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    pub output_dir: String,
    pub stream_count: usize,
    pub single_stream: bool,
    pub filenames_altered: bool,
    pub chromosomes: Vec<ChromosomeLength>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeArchiveReport {
    pub archive_path: String,
    pub genome_id: String,
    pub chromosome_count: usize,
    pub ordered: bool,
    pub filenames_altered: bool,
}
