use crate::error::{ImportError, ImportResult};
use crate::filename::legal_file_name;
use crate::ledger::RecordLengthLedger;
use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appended to a record identifier to name its sequence file.
pub const SEQUENCE_FILE_SUFFIX: &str = ".txt";

const HEADER_MARKER: u8 = b'>';

/// The record currently receiving sequence lines.
struct OpenRecord {
    name: String,
    length: u64,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl OpenRecord {
    fn create(name: String, path: PathBuf) -> ImportResult<Self> {
        let file = File::create(&path).map_err(|e| {
            ImportError::io(
                format!("Could not create sequence file '{}'", path.display()),
                e,
            )
        })?;
        Ok(Self {
            name,
            length: 0,
            path,
            writer: BufWriter::new(file),
        })
    }

    fn append(&mut self, bases: &[u8]) -> ImportResult<()> {
        self.length += bases.len() as u64;
        self.writer
            .write_all(&bases.to_ascii_uppercase())
            .map_err(|e| {
                ImportError::io(
                    format!("Could not write sequence file '{}'", self.path.display()),
                    e,
                )
            })
    }

    /// Flushes the sequence file and commits the final length.
    fn close(mut self, ledger: &mut RecordLengthLedger) -> ImportResult<()> {
        self.writer.flush().map_err(|e| {
            ImportError::io(
                format!("Could not flush sequence file '{}'", self.path.display()),
                e,
            )
        })?;
        log::debug!("Record '{}' has {} bases", self.name, self.length);
        ledger.record(&self.name, self.length);
        Ok(())
    }
}

/// First whitespace-delimited token of a header line, without the marker.
fn record_identifier(header: &[u8]) -> String {
    let end = header
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(header.len());
    String::from_utf8_lossy(&header[1..end]).into_owned()
}

/// Splits one FASTA stream into one upper-cased sequence file per record.
///
/// Lengths are committed to `ledger` when the next header or the end of the
/// stream is reached. Lines before the first header are ignored. Returns
/// whether any output file name had to be changed to be legal.
pub fn split_sequence_stream<R: BufRead>(
    mut reader: R,
    source: &str,
    output_dir: &Path,
    max_contigs: usize,
    ledger: &mut RecordLengthLedger,
) -> ImportResult<bool> {
    fs::create_dir_all(output_dir).map_err(|e| {
        ImportError::io(
            format!(
                "Could not create sequence directory '{}'",
                output_dir.display()
            ),
            e,
        )
    })?;

    let mut line: Vec<u8> = Vec::new();
    let mut active: Option<OpenRecord> = None;
    let mut contig_count: usize = 0;
    let mut filenames_altered = false;

    loop {
        line.clear();
        let bytes_read = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| ImportError::io(format!("Could not read FASTA '{source}'"), e))?;
        if bytes_read == 0 {
            break;
        }
        let trimmed = line.trim_ascii();

        if trimmed.first() == Some(&HEADER_MARKER) {
            if let Some(record) = active.take() {
                record.close(ledger)?;
            }
            contig_count += 1;
            if contig_count > max_contigs {
                return Err(ImportError::TooManyContigs { limit: max_contigs });
            }

            let name = record_identifier(trimmed);
            let legal = legal_file_name(&format!("{name}{SEQUENCE_FILE_SUFFIX}"));
            filenames_altered |= legal.altered;
            active = Some(OpenRecord::create(name, output_dir.join(legal.name))?);
        } else if let Some(record) = active.as_mut() {
            record.append(trimmed)?;
        }
    }

    if let Some(record) = active.take() {
        record.close(ledger)?;
    }
    Ok(filenames_altered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn split(text: &str, dir: &Path, max_contigs: usize) -> (ImportResult<bool>, RecordLengthLedger) {
        let mut ledger = RecordLengthLedger::new();
        let result = split_sequence_stream(
            Cursor::new(text.as_bytes().to_vec()),
            "test.fa",
            dir,
            max_contigs,
            &mut ledger,
        );
        (result, ledger)
    }

    #[test]
    fn test_split_two_records() {
        let td = tempdir().unwrap();
        let (result, ledger) = split(">chr1 comment\nACGT\nAC\n>chr2\nG\n", td.path(), 10);
        assert!(!result.unwrap());

        let entries: Vec<(&str, u64)> = ledger.iter().collect();
        assert_eq!(entries, vec![("chr1", 6), ("chr2", 1)]);
        assert_eq!(
            fs::read_to_string(td.path().join("chr1.txt")).unwrap(),
            "ACGTAC"
        );
        assert_eq!(fs::read_to_string(td.path().join("chr2.txt")).unwrap(), "G");
    }

    #[test]
    fn test_lowercase_input_is_uppercased_and_trimmed() {
        let td = tempdir().unwrap();
        let (result, ledger) = split(">contig_a\r\n  acgtn \r\nNNac\t\n", td.path(), 10);
        assert!(!result.unwrap());
        assert_eq!(ledger.get("contig_a"), Some(9));
        assert_eq!(
            fs::read_to_string(td.path().join("contig_a.txt")).unwrap(),
            "ACGTNNNAC"
        );
    }

    #[test]
    fn test_empty_stream_has_no_records() {
        let td = tempdir().unwrap();
        let (result, ledger) = split("", td.path(), 10);
        assert!(!result.unwrap());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_data_before_first_header_is_dropped() {
        let td = tempdir().unwrap();
        let (result, ledger) = split("ACGT\nTTTT\n>chr1\nGG\n", td.path(), 10);
        assert!(!result.unwrap());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("chr1"), Some(2));
        assert_eq!(fs::read_to_string(td.path().join("chr1.txt")).unwrap(), "GG");
    }

    #[test]
    fn test_header_without_sequence_records_zero_length() {
        let td = tempdir().unwrap();
        let (result, ledger) = split(">empty\n>full\nA\n", td.path(), 10);
        assert!(result.is_ok());
        assert_eq!(ledger.get("empty"), Some(0));
        assert!(td.path().join("empty.txt").exists());
    }

    #[test]
    fn test_illegal_record_name_is_sanitized() {
        let td = tempdir().unwrap();
        let (result, ledger) = split(">gi|42|ref\nACGT\n", td.path(), 10);
        assert!(result.unwrap());
        assert_eq!(ledger.get("gi|42|ref"), Some(4));
        assert!(td.path().join("gi_42_ref.txt").exists());
    }

    #[test]
    fn test_contig_limit_stops_processing() {
        let td = tempdir().unwrap();
        let (result, ledger) = split(">a\nA\n>b\nC\n>c\nG\n>d\nT\n", td.path(), 2);
        let err = result.unwrap_err();
        assert!(err.is_contig_limit());
        assert_eq!(ledger.len(), 2);
        assert!(!td.path().join("c.txt").exists());
        assert!(!td.path().join("d.txt").exists());
    }

    #[test]
    fn test_existing_sequence_file_is_truncated() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("chr1.txt"), "OLDCONTENTTHATISLONG").unwrap();
        let (result, _) = split(">chr1\nAC\n", td.path(), 10);
        assert!(result.is_ok());
        assert_eq!(fs::read_to_string(td.path().join("chr1.txt")).unwrap(), "AC");
    }

    #[test]
    fn test_creates_missing_output_directory() {
        let td = tempdir().unwrap();
        let nested = td.path().join("seq").join("hg_toy");
        let (result, _) = split(">chr1\nAC\n", &nested, 10);
        assert!(result.is_ok());
        assert!(nested.join("chr1.txt").exists());
    }
}
