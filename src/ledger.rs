use genome_archive_protocol::ChromosomeLength;
use std::collections::HashMap;

/// Record identifier to sequence length, in first-seen order.
///
/// Recording an identifier a second time keeps its original position and
/// replaces the length, so the last record with a given name wins.
#[derive(Debug, Clone, Default)]
pub struct RecordLengthLedger {
    entries: Vec<(String, u64)>,
    positions: HashMap<String, usize>,
}

impl RecordLengthLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, length: u64) {
        match self.positions.get(name) {
            Some(&idx) => self.entries[idx].1 = length,
            None => {
                self.positions.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), length));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.positions.get(name).map(|&idx| self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, len)| (name.as_str(), *len))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn to_chromosome_lengths(&self) -> Vec<ChromosomeLength> {
        self.iter()
            .map(|(name, length)| ChromosomeLength {
                name: name.to_string(),
                length,
            })
            .collect()
    }
}
