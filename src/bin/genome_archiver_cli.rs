use anyhow::{Context, Result, anyhow, bail};
use genome_archive_protocol::{ImportProgress, SplitReport};
use genome_archiver::{
    GenomeImporter, ImportRequest, ImporterConfig, about, cytoband::write_cytoband_file,
};
use serde::Serialize;
use std::path::Path;
use std::{env, fs};

fn usage() {
    eprintln!(
        "Usage:\n  \
  genome_archiver_cli --version\n  \
  genome_archiver_cli [--config PATH] create '<request-json>'\n  \
  genome_archiver_cli [--config PATH] split SEQUENCE_INPUT OUTPUT_DIR\n  \
  genome_archiver_cli [--config PATH] cytoband SEQUENCE_INPUT SEQ_DIR OUTPUT_FILE\n\n  \
  SEQUENCE_INPUT is a FASTA file, a .gz FASTA, a .zip of FASTA files or a directory.\n  \
  Tip: pass @file.json instead of inline JSON"
    );
}

fn load_json_arg(value: &str) -> Result<String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).with_context(|| format!("Could not read JSON file '{path}'"))
    } else {
        Ok(value.to_string())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Could not serialize JSON output")?;
    println!("{text}");
    Ok(())
}

fn parse_global_config_arg(args: &[String]) -> Result<(ImporterConfig, usize)> {
    if args.len() >= 3 && args[1] == "--config" {
        let config = ImporterConfig::from_json_file(Path::new(&args[2]))?;
        return Ok((config, 3));
    }
    Ok((ImporterConfig::default(), 1))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        bail!("Missing command");
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    let (config, cmd_idx) = parse_global_config_arg(&args)?;
    if args.len() <= cmd_idx {
        usage();
        bail!("Missing command");
    }
    let importer = GenomeImporter::new(config);
    let command = &args[cmd_idx];

    match command.as_str() {
        "create" => {
            if args.len() <= cmd_idx + 1 {
                usage();
                bail!("Missing request JSON");
            }
            let json = load_json_arg(&args[cmd_idx + 1])?;
            let request: ImportRequest =
                serde_json::from_str(&json).context("Invalid request JSON")?;
            let report = importer
                .create_genome_archive_with_progress(&request, &mut |progress: ImportProgress| {
                    log::info!("[{}] {} (+{})", progress.phase, progress.item, progress.increment)
                })?
                .ok_or_else(|| {
                    anyhow!(
                        "Missing required fields: {}",
                        request.missing_fields().join(", ")
                    )
                })?;
            print_json(&report)
        }
        "split" => {
            if args.len() <= cmd_idx + 2 {
                usage();
                bail!("split requires: SEQUENCE_INPUT OUTPUT_DIR");
            }
            let output_dir = Path::new(&args[cmd_idx + 2]);
            let resolved = importer.split_sequences(Path::new(&args[cmd_idx + 1]), output_dir)?;
            print_json(&SplitReport {
                output_dir: output_dir.display().to_string(),
                stream_count: resolved.stream_count,
                single_stream: resolved.single_stream,
                filenames_altered: resolved.filenames_altered,
                chromosomes: resolved.ledger.to_chromosome_lengths(),
            })
        }
        "cytoband" => {
            if args.len() <= cmd_idx + 3 {
                usage();
                bail!("cytoband requires: SEQUENCE_INPUT SEQ_DIR OUTPUT_FILE");
            }
            let output = Path::new(&args[cmd_idx + 3]);
            let resolved = importer
                .split_sequences(Path::new(&args[cmd_idx + 1]), Path::new(&args[cmd_idx + 2]))?;
            let sorted = write_cytoband_file(&resolved.ledger, resolved.single_stream, output)?;
            println!(
                "Wrote {} chromosome(s) to '{}' ({})",
                resolved.ledger.len(),
                output.display(),
                if sorted { "sorted" } else { "input order" }
            );
            Ok(())
        }
        _ => {
            usage();
            Err(anyhow!("Unknown command '{command}'"))
        }
    }
}
