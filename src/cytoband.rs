use crate::error::{ImportError, ImportResult};
use crate::ledger::RecordLengthLedger;
use itertools::Itertools;
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CYTOBAND_FILE_SUFFIX: &str = "_cytoband.txt";

pub fn cytoband_file_name(genome_id: &str) -> String {
    format!("{genome_id}{CYTOBAND_FILE_SUFFIX}")
}

fn strip_chr_prefix(raw: &str) -> &str {
    match raw.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &raw[3..],
        _ => raw,
    }
}

fn parse_u64_ascii(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Numbered chromosomes first by value, then named ones.
fn chromosome_sort_class(name: &str) -> (u8, u64) {
    match parse_u64_ascii(strip_chr_prefix(name.trim())) {
        Some(number) => (0, number),
        None => (1, 0),
    }
}

/// Orders chromosome names the way a karyotype is usually listed:
/// `chr1 < chr2 < chr10 < chrM < chrX`.
///
/// Named entries compare case-insensitively with a plain lexicographic
/// tie-break, so the order is total and deterministic.
pub fn compare_chromosomes(left: &str, right: &str) -> Ordering {
    let (left_group, left_rank) = chromosome_sort_class(left);
    let (right_group, right_rank) = chromosome_sort_class(right);
    left_group
        .cmp(&right_group)
        .then(left_rank.cmp(&right_rank))
        .then_with(|| {
            strip_chr_prefix(left)
                .to_ascii_lowercase()
                .cmp(&strip_chr_prefix(right).to_ascii_lowercase())
        })
        .then_with(|| left.cmp(right))
}

/// One `<name>\t0\t<length>` line per chromosome.
///
/// A single input stream keeps its record order; otherwise names are sorted
/// with [`compare_chromosomes`]. Returns the lines and whether they were sorted.
pub fn cytoband_lines(ledger: &RecordLengthLedger, single_stream: bool) -> (Vec<String>, bool) {
    let entries: Vec<(&str, u64)> = if single_stream {
        ledger.iter().collect()
    } else {
        ledger
            .iter()
            .sorted_by(|a, b| compare_chromosomes(a.0, b.0))
            .collect()
    };
    let lines = entries
        .into_iter()
        .map(|(name, length)| format!("{name}\t0\t{length}"))
        .collect();
    (lines, !single_stream)
}

/// Writes a coarse cytoband file covering each chromosome end to end.
/// Returns whether the chromosomes were sorted.
pub fn write_cytoband_file(
    ledger: &RecordLengthLedger,
    single_stream: bool,
    path: &Path,
) -> ImportResult<bool> {
    let (lines, sorted) = cytoband_lines(ledger, single_stream);
    let write_err = |e: std::io::Error| {
        ImportError::io(
            format!("Could not write cytoband file '{}'", path.display()),
            e,
        )
    };
    let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
    for line in &lines {
        writeln!(writer, "{line}").map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;
    log::info!(
        "Wrote {} cytoband line(s) to '{}'",
        lines.len(),
        path.display()
    );
    Ok(sorted)
}
