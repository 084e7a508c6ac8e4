use crate::error::{ImportError, ImportResult};
use genome_archive_protocol::{MANIFEST_FILE_NAME, ManifestKey};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref URL_SCHEME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap();
}

pub fn is_url(location: &str) -> bool {
    URL_SCHEME.is_match(location)
}

/// Sequence locations are written with forward slashes unless they are URLs.
pub fn normalize_sequence_location(location: &str) -> String {
    if is_url(location) {
        location.to_string()
    } else {
        location.replace('\\', "/")
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Values the manifest is built from. Absent values produce no key.
#[derive(Debug, Clone, Default)]
pub struct ManifestInputs<'a> {
    pub genome_id: &'a str,
    pub display_name: &'a str,
    pub sequence_location: Option<&'a str>,
    pub cytoband_file: Option<&'a Path>,
    pub gene_file: Option<&'a Path>,
    pub alias_file: Option<&'a Path>,
    pub ordered: bool,
    pub filenames_altered: bool,
}

/// The `key=value` descriptor stored as `property.txt` in a genome archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenomeManifest {
    entries: Vec<(ManifestKey, String)>,
}

impl GenomeManifest {
    pub fn build(inputs: &ManifestInputs) -> Self {
        let mut manifest = Self::default();
        if inputs.filenames_altered {
            manifest.push(ManifestKey::FilenamesAltered, "true".to_string());
        }
        manifest.push(ManifestKey::Ordered, inputs.ordered.to_string());
        manifest.push(ManifestKey::Id, inputs.genome_id.to_string());
        manifest.push(ManifestKey::Name, inputs.display_name.to_string());
        if let Some(path) = inputs.cytoband_file {
            manifest.push(ManifestKey::CytobandFile, base_name(path));
        }
        if let Some(path) = inputs.gene_file {
            manifest.push(ManifestKey::GeneFile, base_name(path));
        }
        if let Some(path) = inputs.alias_file {
            manifest.push(ManifestKey::ChrAliasFile, base_name(path));
        }
        if let Some(location) = inputs.sequence_location {
            manifest.push(
                ManifestKey::SequenceLocation,
                normalize_sequence_location(location),
            );
        }
        manifest
    }

    fn push(&mut self, key: ManifestKey, value: String) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: ManifestKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = ManifestKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{}={}\n", key.as_str(), value))
            .collect()
    }

    /// Reads manifest text back; unknown keys and malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut manifest = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if let Some(key) = ManifestKey::parse(key.trim()) {
                manifest.push(key, value.to_string());
            }
        }
        manifest
    }

    /// Writes `property.txt` into `dir` and returns its path.
    pub fn write_to(&self, dir: &Path) -> ImportResult<PathBuf> {
        let path = dir.join(MANIFEST_FILE_NAME);
        fs::write(&path, self.to_text()).map_err(|e| {
            ImportError::io(
                format!("Could not write genome manifest '{}'", path.display()),
                e,
            )
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_minimal_manifest() {
        let manifest = GenomeManifest::build(&ManifestInputs {
            genome_id: "toy",
            display_name: "Toy genome",
            ..Default::default()
        });
        assert_eq!(manifest.to_text(), "ordered=false\nid=toy\nname=Toy genome\n");
    }

    #[test]
    fn test_full_manifest_uses_base_names() {
        let cytoband = PathBuf::from("/tmp/work/toy_cytoband.txt");
        let genes = PathBuf::from("/data/refGene.txt");
        let alias = PathBuf::from("/data/alias.tab");
        let manifest = GenomeManifest::build(&ManifestInputs {
            genome_id: "toy",
            display_name: "Toy",
            sequence_location: Some("seq\\toy"),
            cytoband_file: Some(&cytoband),
            gene_file: Some(&genes),
            alias_file: Some(&alias),
            ordered: true,
            filenames_altered: true,
        });
        assert_eq!(
            manifest.to_text(),
            "filenamesAltered=true\nordered=true\nid=toy\nname=Toy\n\
             cytobandFile=toy_cytoband.txt\ngeneFile=refGene.txt\n\
             chrAliasFile=alias.tab\nsequenceLocation=seq/toy\n"
        );
        assert_eq!(GenomeManifest::parse(&manifest.to_text()), manifest);
    }

    #[test]
    fn test_url_location_is_kept_verbatim() {
        assert!(is_url("https://example.org/seq\\x"));
        assert!(!is_url("C:\\genomes\\seq"));
        assert_eq!(
            normalize_sequence_location("https://example.org/a\\b"),
            "https://example.org/a\\b"
        );
        assert_eq!(normalize_sequence_location("C:\\genomes\\seq"), "C:/genomes/seq");
    }

    #[test]
    fn test_write_to_creates_property_file() {
        let td = tempdir().unwrap();
        let manifest = GenomeManifest::build(&ManifestInputs {
            genome_id: "g",
            display_name: "G",
            ..Default::default()
        });
        let path = manifest.write_to(td.path()).unwrap();
        assert!(path.ends_with(MANIFEST_FILE_NAME));
        assert_eq!(fs::read_to_string(path).unwrap(), manifest.to_text());
    }
}
