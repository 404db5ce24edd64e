//! Discrepancy records, the delimited report artifact, and the JSON shape.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConcordError, Result};

/// Name of the provenance column appended to report files.
pub const SOURCE_COLUMN: &str = "source";

/// Origin/nature of a detected difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Row present in the UI extraction but not the reference.
    UiOnly,
    /// Row present in the reference but not the UI extraction.
    ReferenceOnly,
    /// Cell value differs between the two sides at a matched position.
    ValueMismatch,
}

impl Provenance {
    /// Tag written to the report file's provenance column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::UiOnly => "ui_only",
            Provenance::ReferenceOnly => "reference_only",
            Provenance::ValueMismatch => "value_mismatch",
        }
    }
}

impl FromStr for Provenance {
    type Err = ConcordError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ui_only" => Ok(Provenance::UiOnly),
            "reference_only" => Ok(Provenance::ReferenceOnly),
            "value_mismatch" => Ok(Provenance::ValueMismatch),
            other => Err(ConcordError::Parse(format!(
                "Unknown provenance tag '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected difference between the UI and reference datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provenance", rename_all = "snake_case")]
pub enum Discrepancy {
    /// Full row found only in the UI extraction (excess multiplicity counts
    /// once per unmatched instance).
    UiOnly { values: Vec<String> },
    /// Full row found only in the reference file.
    ReferenceOnly { values: Vec<String> },
    /// Cell difference at a matched sorted position.
    ValueMismatch {
        row: usize,
        column: String,
        ui: String,
        reference: String,
    },
}

impl Discrepancy {
    /// The provenance tag for this discrepancy.
    pub fn provenance(&self) -> Provenance {
        match self {
            Discrepancy::UiOnly { .. } => Provenance::UiOnly,
            Discrepancy::ReferenceOnly { .. } => Provenance::ReferenceOnly,
            Discrepancy::ValueMismatch { .. } => Provenance::ValueMismatch,
        }
    }
}

/// One row of the report artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Values over the common columns.
    pub values: Vec<String>,
    /// Provenance tag for the row.
    pub source: Provenance,
}

/// Ready-to-serialize table representation of a discrepancy list.
///
/// Header is the common columns plus a trailing `source` column; the body is
/// empty on a passing run. Value mismatches serialize the UI-side row; the
/// per-cell detail stays in the JSON mismatch records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    /// Common columns, without the provenance column.
    pub columns: Vec<String>,
    /// Discrepancy rows, in engine order.
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Create a report over the given common columns.
    pub fn new(columns: Vec<String>, rows: Vec<ReportRow>) -> Self {
        Self { columns, rows }
    }

    /// Serialize to delimited text, header first.
    pub fn to_delimited(&self, delimiter: u8) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        let mut header = self.columns.clone();
        header.push(SOURCE_COLUMN.to_string());
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = row.values.clone();
            record.push(row.source.as_str().to_string());
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ConcordError::Parse(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ConcordError::Parse(e.to_string()))
    }

    /// Re-parse a report previously produced by [`ReportTable::to_delimited`].
    pub fn from_delimited(text: &str, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let header: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        let Some((last, columns)) = header.split_last() else {
            return Err(ConcordError::EmptyData("Report has no header".to_string()));
        };
        if last != SOURCE_COLUMN {
            return Err(ConcordError::Parse(format!(
                "Report is missing the trailing '{SOURCE_COLUMN}' column, got '{last}'"
            )));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut values: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            let Some(tag) = values.pop() else {
                return Err(ConcordError::Parse("Report row has no cells".to_string()));
            };
            if values.len() != columns.len() {
                return Err(ConcordError::Parse(format!(
                    "Report row has {} cells, expected {}",
                    values.len() + 1,
                    columns.len() + 1
                )));
            }
            rows.push(ReportRow {
                values,
                source: tag.parse()?,
            });
        }

        Ok(Self {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Write the report to disk.
    pub fn write_file(&self, path: impl AsRef<Path>, delimiter: u8) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConcordError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let text = self.to_delimited(delimiter)?;
        fs::write(path, text).map_err(|e| ConcordError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Read a report back from disk.
    pub fn load_file(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConcordError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_delimited(&text, delimiter)
    }
}

/// JSON shape returned to HTTP callers and `--json` CLI runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    /// Human-readable status line.
    pub result: String,
    /// Discrepancy records, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatches: Option<Vec<Discrepancy>>,
    /// Path of the persisted report artifact, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl ValidationResponse {
    /// Build the response for a completed comparison.
    pub fn from_result(
        result: &super::ComparisonResult,
        report_path: Option<&Path>,
    ) -> Self {
        use super::ComparisonResult;

        match result {
            ComparisonResult::Pass { filter, .. } => Self {
                result: format!("PASS: UI data matches the reference for '{filter}'"),
                mismatches: None,
                report: None,
            },
            ComparisonResult::Fail {
                filter,
                discrepancies,
                ..
            } => Self {
                result: format!(
                    "FAIL: {} discrepancies found for '{}'",
                    discrepancies.len(),
                    filter
                ),
                mismatches: Some(discrepancies.clone()),
                report: report_path.map(|p| p.display().to_string()),
            },
        }
    }

    /// Build the error-shaped response used at the HTTP boundary.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: message.into(),
            mismatches: None,
            report: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ReportTable {
        ReportTable::new(
            vec!["breed".to_string(), "diagnosis".to_string()],
            vec![
                ReportRow {
                    values: vec!["Boxer".to_string(), "Lymphoma".to_string()],
                    source: Provenance::UiOnly,
                },
                ReportRow {
                    values: vec!["Boxer".to_string(), "Melanoma".to_string()],
                    source: Provenance::ReferenceOnly,
                },
            ],
        )
    }

    #[test]
    fn test_report_round_trip() {
        let report = sample_report();
        let text = report.to_delimited(b'\t').unwrap();
        let parsed = ReportTable::from_delimited(&text, b'\t').unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_report_header_only_on_empty_body() {
        let report = ReportTable::new(vec!["breed".to_string()], Vec::new());
        let text = report.to_delimited(b',').unwrap();
        assert_eq!(text, "breed,source\n");
    }

    #[test]
    fn test_report_round_trip_with_embedded_delimiter() {
        let report = ReportTable::new(
            vec!["breed".to_string(), "weight (kg)".to_string()],
            vec![ReportRow {
                values: vec!["Boxer, mixed".to_string(), "30".to_string()],
                source: Provenance::UiOnly,
            }],
        );
        let text = report.to_delimited(b',').unwrap();
        let parsed = ReportTable::from_delimited(&text, b',').unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_from_delimited_rejects_unknown_tag() {
        let text = "breed,source\nBoxer,left_only\n";
        assert!(matches!(
            ReportTable::from_delimited(text, b','),
            Err(ConcordError::Parse(_))
        ));
    }

    #[test]
    fn test_from_delimited_requires_source_column() {
        let text = "breed,diagnosis\nBoxer,Lymphoma\n";
        assert!(matches!(
            ReportTable::from_delimited(text, b','),
            Err(ConcordError::Parse(_))
        ));
    }

    #[test]
    fn test_provenance_tags_round_trip() {
        for p in [
            Provenance::UiOnly,
            Provenance::ReferenceOnly,
            Provenance::ValueMismatch,
        ] {
            assert_eq!(p.as_str().parse::<Provenance>().unwrap(), p);
        }
    }
}
