//! pdf2csv - Convert tables in decoded PDF documents to CSV
//!
//! Reads fragment documents (positioned text runs per page), reconstructs
//! their tables and writes one CSV file per input.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use pdfgrid_core::error::TableError;
use pdfgrid_core::export::{csv_file_name, serialize};
use pdfgrid_core::high_level::{ConvertOptions, convert_to_csv, extract_raw_rows};
use pdfgrid_core::source::{DecoderConfig, JsonFragmentDecoder, SourceDocument};
use pdfgrid_core::table::LayoutParams;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const FALLBACK_MESSAGE: &str = "Error converting document to CSV. Please try again.";

/// Reconstruct tables from decoded PDF documents and write them as CSV.
#[derive(Parser, Debug)]
#[command(name = "pdf2csv")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more fragment documents (JSON)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Page selection ===
    /// A comma or space separated list of page numbers to convert (1-indexed)
    #[arg(long = "page-numbers")]
    page_numbers: Option<String>,

    /// The maximum number of pages to convert (0 = no limit)
    #[arg(short = 'm', long, default_value = "0")]
    maxpages: usize,

    /// Number of page workers (default: available parallelism)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    // === Layout options ===
    /// Distance below which x-positions share a column
    #[arg(long = "column-tolerance", default_value = "5.0", value_parser = parse_tolerance)]
    column_tolerance: f64,

    /// Largest gap across which same-font fragments are joined
    #[arg(long = "gap-tolerance", default_value = "5.0", value_parser = parse_tolerance)]
    gap_tolerance: f64,

    // === Decoder options ===
    /// Fail pages with more fragments than this (0 = no limit)
    #[arg(long = "max-fragments", default_value = "0")]
    max_fragments: usize,

    /// Skip undecodable fragments instead of failing their page
    #[arg(long, action = ArgAction::SetTrue)]
    lenient: bool,

    // === Output options ===
    /// Output path, or "-" for stdout. Defaults to <name>.csv next to the input
    #[arg(short = 'o', long)]
    outfile: Option<String>,

    /// Write rows before cleanup, for diagnosing layout problems
    #[arg(long, action = ArgAction::SetTrue)]
    raw: bool,
}

/// Parse a non-negative, finite tolerance.
fn parse_tolerance(s: &str) -> std::result::Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Ok(v) => Err(format!("tolerance must be a non-negative number, got {}", v)),
        Err(_) => Err(format!("invalid float value: {}", s)),
    }
}

/// Parse 1-indexed page numbers into zero-indexed ones.
fn parse_page_numbers(spec: &str) -> Option<Vec<usize>> {
    let nums: Vec<usize> = spec
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .map(|n| n - 1)
        .collect();
    if nums.is_empty() { None } else { Some(nums) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Where the CSV for `input` goes.
fn output_target(input: &Path, outfile: Option<&str>) -> OutputTarget {
    match outfile {
        Some("-") => OutputTarget::Stdout,
        Some(path) => OutputTarget::File(PathBuf::from(path)),
        None => {
            let name = csv_file_name(&input.to_string_lossy());
            OutputTarget::File(input.with_file_name(name))
        }
    }
}

fn build_options(args: &Args) -> ConvertOptions {
    let layout = LayoutParams::default()
        .with_column_tolerance(args.column_tolerance)
        .with_adjacent_gap_tolerance(args.gap_tolerance);
    ConvertOptions {
        layout,
        decoder: DecoderConfig {
            max_fragments_per_page: args.max_fragments,
            skip_malformed_fragments: args.lenient,
        },
        page_numbers: args.page_numbers.as_deref().and_then(parse_page_numbers),
        maxpages: args.maxpages,
        threads: args.threads,
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Convert a single document. Nothing is written unless conversion succeeds.
fn process_file(path: &Path, options: &ConvertOptions, args: &Args) -> Result<()> {
    let input = SourceDocument::from_path(path)
        .map_err(|e| TableError::InvalidInput(format!("{}: {e}", path.display())))?;

    let csv = if args.raw {
        serialize(&extract_raw_rows(&JsonFragmentDecoder, &input, options)?)?
    } else {
        convert_to_csv(&JsonFragmentDecoder, &input, options)?
    };

    match output_target(path, args.outfile.as_deref()) {
        OutputTarget::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(csv.as_bytes())?;
            stdout.flush()?;
        }
        OutputTarget::File(out) => {
            std::fs::write(&out, csv)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(output = %out.display(), "wrote CSV");
        }
    }
    Ok(())
}

/// Message shown to the user for a failed conversion.
fn describe_failure(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<TableError>() {
        Some(table_err) => table_err.user_message(),
        None => FALLBACK_MESSAGE,
    }
}

fn run(args: &Args) -> Result<bool> {
    if args.files.len() > 1 && args.outfile.as_deref().is_some_and(|o| o != "-") {
        bail!("--outfile can only name a file when converting a single document");
    }

    let options = build_options(args);
    debug!(?options, "conversion options");

    let mut all_ok = true;
    for path in &args.files {
        if let Err(err) = process_file(path, &options, args) {
            debug!(file = %path.display(), error = ?err, "conversion failed");
            eprintln!("{}: {}", path.display(), describe_failure(&err));
            all_ok = false;
        }
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_are_one_indexed() {
        assert_eq!(parse_page_numbers("1,3 5"), Some(vec![0, 2, 4]));
        assert_eq!(parse_page_numbers("0, x"), None);
        assert_eq!(parse_page_numbers(""), None);
    }

    #[test]
    fn tolerance_must_be_non_negative() {
        assert_eq!(parse_tolerance(" 7.5 "), Ok(7.5));
        assert!(parse_tolerance("-1").is_err());
        assert!(parse_tolerance("inf").is_err());
        assert!(parse_tolerance("wide").is_err());
    }

    #[test]
    fn default_output_sits_next_to_input() {
        assert_eq!(
            output_target(Path::new("/data/report.json"), None),
            OutputTarget::File(PathBuf::from("/data/report.csv"))
        );
        assert_eq!(
            output_target(Path::new("report.json"), Some("-")),
            OutputTarget::Stdout
        );
        assert_eq!(
            output_target(Path::new("report.json"), Some("out/t.csv")),
            OutputTarget::File(PathBuf::from("out/t.csv"))
        );
    }

    #[test]
    fn table_errors_use_their_user_message() {
        let err = anyhow::Error::new(TableError::NoTableData);
        assert_eq!(describe_failure(&err), "No table data found in the document");
        let other = anyhow::anyhow!("disk on fire");
        assert_eq!(describe_failure(&other), FALLBACK_MESSAGE);
    }

    #[test]
    fn args_build_options() {
        let args = Args::parse_from([
            "pdf2csv",
            "in.json",
            "--page-numbers",
            "2,4",
            "-m",
            "1",
            "-j",
            "2",
            "--column-tolerance",
            "8",
            "--max-fragments",
            "500",
            "--lenient",
        ]);
        let options = build_options(&args);
        assert_eq!(options.page_numbers, Some(vec![1, 3]));
        assert_eq!(options.maxpages, 1);
        assert_eq!(options.threads, Some(2));
        assert_eq!(options.layout.column_tolerance, 8.0);
        assert_eq!(options.layout.adjacent_gap_tolerance, 5.0);
        assert_eq!(options.decoder.max_fragments_per_page, 500);
        assert!(options.decoder.skip_malformed_fragments);
    }

    #[test]
    fn converts_file_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("orders.json");
        std::fs::write(
            &input,
            r#"[[{"text": "Item", "x": 0, "y": 700}, {"text": "Qty", "x": 80, "y": 700},
                {"text": "Tea", "x": 0, "y": 680}, {"text": "2", "x": 80, "y": 680}]]"#,
        )
        .unwrap();
        let args = Args::parse_from(["pdf2csv", input.to_str().unwrap()]);
        assert!(run(&args).unwrap());
        let csv = std::fs::read_to_string(dir.path().join("orders.csv")).unwrap();
        assert_eq!(csv, "\"Item\",\"Qty\"\r\n\"Tea\",\"2\"\r\n");
    }

    #[test]
    fn failed_conversion_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.json");
        std::fs::write(&input, "[]").unwrap();
        let args = Args::parse_from(["pdf2csv", input.to_str().unwrap()]);
        assert!(!run(&args).unwrap());
        assert!(!dir.path().join("empty.csv").exists());
    }
}
