use sanitize_filename::{Options, sanitize_with_options};

/// Substitute for every character that is not legal in a file name.
pub const REPLACEMENT: &str = "_";

/// A file name that is safe to create on any supported filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalFileName {
    pub name: String,
    pub altered: bool,
}

/// Maps `candidate` to a filesystem-legal name.
///
/// Windows rules are applied on every platform so a genome archive built on
/// Linux names its sequence files the same way as one built on Windows.
pub fn legal_file_name(candidate: &str) -> LegalFileName {
    let name = sanitize_with_options(
        candidate,
        Options {
            windows: true,
            truncate: true,
            replacement: REPLACEMENT,
        },
    );
    let altered = name != candidate;
    LegalFileName { name, altered }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_name_is_unchanged() {
        let legal = legal_file_name("chr1.txt");
        assert_eq!(legal.name, "chr1.txt");
        assert!(!legal.altered);
    }

    #[test]
    fn test_illegal_characters_are_replaced() {
        let legal = legal_file_name("gi|12345|ref:NC_0001.txt");
        assert_eq!(legal.name, "gi_12345_ref_NC_0001.txt");
        assert!(legal.altered);
    }

    #[test]
    fn test_sanitizing_is_idempotent() {
        for raw in ["chr1.txt", "a/b\\c.txt", "CON.txt", "scaffold*?.txt", "x. "] {
            let once = legal_file_name(raw);
            let twice = legal_file_name(&once.name);
            assert_eq!(once.name, twice.name, "{raw}");
            assert!(!twice.altered, "{raw}");
        }
    }
}
