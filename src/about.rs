pub const GENOME_ARCHIVER_DISPLAY_VERSION: &str = env!("GENOME_ARCHIVER_DISPLAY_VERSION");
pub const GENOME_ARCHIVER_BUILD_N: &str = env!("GENOME_ARCHIVER_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "genome-archiver {}\nBuild {}\nFASTA to genome archive importer",
        GENOME_ARCHIVER_DISPLAY_VERSION, GENOME_ARCHIVER_BUILD_N
    )
}
