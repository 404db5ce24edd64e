//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use concord::CompareStrategy;

/// Concord: reconcile portal-extracted tables against reference files
#[derive(Parser)]
#[command(name = "concord")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a portal capture against a reference file for one breed
    Validate {
        /// Path to the reference file (TSV/CSV)
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// Breed filter value applied on the portal side
        #[arg(short, long)]
        breed: String,

        /// Path to the portal capture file (see 'concord capture')
        #[arg(short, long, value_name = "FILE")]
        capture: PathBuf,

        /// Comparison strategy (outer-join or sorted)
        #[arg(long, default_value_t = CompareStrategy::OuterJoin)]
        strategy: CompareStrategy,

        /// Reference file delimiter (default: auto-detect)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Restrict the reference table to rows matching the breed first
        #[arg(long)]
        filter_reference: bool,

        /// Output path for the comparison report
        #[arg(short, long, default_value = "comparison_report.csv")]
        report: PathBuf,

        /// Print the result as JSON instead of a console summary
        #[arg(long)]
        json: bool,
    },

    /// Normalize raw captured portal rows and save a labeled snapshot
    Capture {
        /// Path to the raw rows file (headerless, portal column order)
        #[arg(value_name = "RAW_ROWS")]
        input: PathBuf,

        /// Keep only rows for this breed
        #[arg(short, long)]
        breed: Option<String>,

        /// Output path for the snapshot (default: portal_capture.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input delimiter (default: auto-detect)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// Start the validation web server
    Serve {
        /// Path to the portal capture file backing the extractor
        #[arg(short, long, value_name = "FILE")]
        capture: PathBuf,

        /// Port for the web server
        #[arg(short, long, default_value = "3150")]
        port: u16,

        /// Directory for uploaded reference files and reports
        #[arg(short, long, default_value = "uploads")]
        uploads: PathBuf,

        /// Comparison strategy (outer-join or sorted)
        #[arg(long, default_value_t = CompareStrategy::OuterJoin)]
        strategy: CompareStrategy,
    },
}
