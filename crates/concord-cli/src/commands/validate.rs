//! Validate command - compare a portal capture against a reference file.

use std::path::PathBuf;

use colored::Colorize;
use concord::{
    CaptureExtractor, CompareStrategy, ParserConfig, Provenance, ReconConfig, Reconciler,
    ValidationResponse,
};

#[allow(clippy::too_many_arguments)]
pub fn run(
    reference: PathBuf,
    breed: String,
    capture: PathBuf,
    strategy: CompareStrategy,
    delimiter: Option<char>,
    filter_reference: bool,
    report: PathBuf,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !reference.exists() {
        return Err(format!("Reference file not found: {}", reference.display()).into());
    }
    if !capture.exists() {
        return Err(format!("Capture file not found: {}", capture.display()).into());
    }

    let mut parser_config = ParserConfig::default();
    if let Some(d) = delimiter {
        parser_config = parser_config.with_delimiter(d as u8);
    }

    let config = ReconConfig::default()
        .with_strategy(strategy)
        .with_filter_reference(filter_reference)
        .with_parser(parser_config);
    let reconciler = Reconciler::with_config(config);

    let extractor = CaptureExtractor::from_file(&capture)?;

    if verbose && !json {
        println!(
            "{} {} against {} (strategy: {})",
            "Validating".cyan().bold(),
            breed.white().bold(),
            reference.display().to_string().white(),
            strategy
        );
    }

    let result = reconciler.validate(&extractor, &breed, &reference)?;

    // The report artifact is written on every run: header-only when passing.
    let report_delimiter = if report.extension().is_some_and(|e| e == "tsv") {
        b'\t'
    } else {
        b','
    };
    result.report().write_file(&report, report_delimiter)?;

    if json {
        let response = ValidationResponse::from_result(&result, Some(&report));
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if result.is_pass() {
        println!(
            "{} UI data matches the reference for breed '{}'",
            "PASS:".green().bold(),
            breed.white().bold()
        );
    } else {
        println!(
            "{} {} discrepancies found for breed '{}'",
            "FAIL:".red().bold(),
            result.discrepancies().len().to_string().white().bold(),
            breed.white().bold()
        );
        println!();

        for row in &result.report().rows {
            let tag = match row.source {
                Provenance::UiOnly => "ui only      ".red(),
                Provenance::ReferenceOnly => "missing in UI".yellow(),
                Provenance::ValueMismatch => "value differs".blue(),
            };
            println!("  [{}] {}", tag, row.values.join(" | "));
        }
        println!();
    }

    println!("Report saved to {}", report.display().to_string().white());

    Ok(())
}
