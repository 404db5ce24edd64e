//! Example: validate a capture of the portal table against a reference file.
//!
//! Usage:
//!   cargo run --example validate -- <capture_file> <reference_file> <breed>

use std::env;

use concord::{CaptureExtractor, Provenance, Reconciler};

fn main() -> concord::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: cargo run --example validate -- <capture_file> <reference_file> <breed>");
        std::process::exit(1);
    }

    let extractor = CaptureExtractor::from_file(&args[1])?;
    let result = Reconciler::new().validate(&extractor, &args[3], &args[2])?;

    if result.is_pass() {
        println!("PASS: UI data matches the reference for '{}'", args[3]);
        return Ok(());
    }

    println!(
        "FAIL: {} discrepancies for '{}'",
        result.discrepancies().len(),
        args[3]
    );
    for row in &result.report().rows {
        let side = match row.source {
            Provenance::UiOnly => "only in UI",
            Provenance::ReferenceOnly => "missing from UI",
            Provenance::ValueMismatch => "value differs",
        };
        println!("  [{}] {}", side, row.values.join(" | "));
    }

    Ok(())
}
