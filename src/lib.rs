//! Turns FASTA input into a self-contained genome archive: one sequence file
//! per record next to the archive, and a zip holding the manifest plus the
//! cytoband, gene and alias files.

pub mod about;
pub mod archive;
pub mod config;
pub mod cytoband;
pub mod error;
pub mod filename;
pub mod importer;
pub mod ledger;
pub mod manifest;
pub mod resolver;
pub mod splitter;
pub mod working_area;

pub use config::ImporterConfig;
pub use error::{ImportError, ImportResult};
pub use importer::{GenomeImporter, ImportRequest};
