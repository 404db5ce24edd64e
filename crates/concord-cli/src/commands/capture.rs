//! Capture command - save a normalized snapshot of raw portal rows.

use std::path::PathBuf;

use colored::Colorize;
use concord::{portal_columns, Dataset, Parser, ParserConfig};

pub fn run(
    input: PathBuf,
    breed: Option<String>,
    output: Option<PathBuf>,
    delimiter: Option<char>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Raw rows file not found: {}", input.display()).into());
    }

    let mut parser_config = ParserConfig::default().without_header();
    if let Some(d) = delimiter {
        parser_config = parser_config.with_delimiter(d as u8);
    }

    let parser = Parser::with_config(parser_config);
    let (table, metadata) = parser.parse_file(&input)?;

    if verbose {
        println!(
            "Read {} raw rows ({} cells wide) from {}",
            metadata.row_count,
            metadata.column_count,
            input.display()
        );
    }

    // Raw rows are unlabeled; align them to the portal's fixed column layout.
    let mut dataset = Dataset::from_raw_rows(table.rows, portal_columns());
    if let Some(ref breed) = breed {
        dataset = dataset.retain_matching("breed", breed);
    }

    let output_path = output.unwrap_or_else(|| PathBuf::from("portal_capture.csv"));
    let out_delimiter = if output_path.extension().is_some_and(|e| e == "tsv") {
        b'\t'
    } else {
        b','
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(out_delimiter)
        .from_path(&output_path)?;
    writer.write_record(&dataset.columns)?;
    for row in &dataset.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    println!(
        "{} {} rows to {}",
        "Saved".green().bold(),
        dataset.rows.len().to_string().white().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
