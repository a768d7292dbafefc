//! Global id finder for scanned questionnaires.
//!
//! Reads multi-page monochrome TIFF files and prints one line per page:
//!
//! ```text
//! Processing scans/batch1.tif
//! * ("scans/batch1.tif", 0, Some("000123"))
//! * ("scans/batch1.tif", 1, None)
//! Done
//! ```
//!
//! Log output goes to stderr and is controlled with `RUST_LOG`.

mod recognizer;
mod tiff_source;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use formscan::{ScanConfig, find_global_ids};
use tracing::info;

use crate::recognizer::UndecodedBarcode;
use crate::tiff_source::TiffPageSource;

/// Find the global id on every page of scanned questionnaire sheets
#[derive(Parser, Debug)]
#[command(name = "find-global-id")]
#[command(about = "Print the global id of every page in multi-page monochrome TIFF scans")]
struct Args {
    /// Multi-page monochrome TIFF files
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Barcode style printed on the sheets
    #[arg(long, env = "FORMSCAN_STYLE", default_value = "code128")]
    style: String,

    /// Paper width in millimetres
    #[arg(long, env = "FORMSCAN_PAPER_WIDTH", default_value_t = 210.0)]
    paper_width: f64,

    /// Paper height in millimetres
    #[arg(long, env = "FORMSCAN_PAPER_HEIGHT", default_value_t = 297.0)]
    paper_height: f64,

    /// Survey directory; printed paths are relative to it
    #[arg(long, env = "FORMSCAN_SURVEY_DIR", default_value = ".")]
    survey_dir: PathBuf,
}

impl Args {
    fn scan_config(&self) -> ScanConfig {
        ScanConfig::new()
            .with_style(&self.style)
            .with_paper_size(self.paper_width, self.paper_height)
            .with_survey_dir(&self.survey_dir)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args.scan_config();
    info!(files = args.files.len(), style = %config.style, "finding global ids");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let results = find_global_ids(
        &args.files,
        &TiffPageSource,
        &UndecodedBarcode,
        &config,
        &mut out,
    )
    .context("Failed to write results")?;

    let found = results.iter().filter(|r| r.global_id.is_some()).count();
    info!(pages = results.len(), found, "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["find-global-id", "a.tif"]).unwrap();
        assert_eq!(args.scan_config(), ScanConfig::default());
        assert_eq!(args.files, vec![PathBuf::from("a.tif")]);
    }

    #[test]
    fn paper_size_flags() {
        let args = Args::try_parse_from([
            "find-global-id",
            "--paper-width",
            "216",
            "--paper-height",
            "279",
            "--style",
            "code39",
            "a.tif",
            "b.tif",
        ])
        .unwrap();
        let config = args.scan_config();
        assert_eq!((config.paper_width, config.paper_height), (216.0, 279.0));
        assert_eq!(config.style, "code39");
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn needs_a_file() {
        assert!(Args::try_parse_from(["find-global-id"]).is_err());
    }
}
