//! Reconciler: normalize both sides onto common columns and classify
//! the differences.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConcordError, Result};
use crate::extract::TableExtractor;
use crate::input::{Parser, ParserConfig};
use crate::schema::{portal_columns, Dataset, PORTAL_BREED_COLUMN};

use super::report::{Discrepancy, Provenance, ReportRow, ReportTable};

/// How two normalized tables are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareStrategy {
    /// Full outer join on all common columns with multiset semantics:
    /// unmatched rows classify as `UiOnly`/`ReferenceOnly`, matched rows are
    /// not reported, and unequal duplicate multiplicities report the excess
    /// instances on the side that has them.
    #[default]
    OuterJoin,
    /// Sort both tables by the full common-column tuple, then compare
    /// cell-by-cell at matching positions, reporting per-cell value
    /// mismatches. Requires identical column order on both sides.
    SortedPositional,
}

impl std::str::FromStr for CompareStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "outer-join" | "outer_join" | "outer" | "join" => Ok(CompareStrategy::OuterJoin),
            "sorted" | "sorted-positional" | "positional" => Ok(CompareStrategy::SortedPositional),
            _ => Err(format!(
                "Unknown strategy: {}. Use outer-join or sorted.",
                s
            )),
        }
    }
}

impl std::fmt::Display for CompareStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareStrategy::OuterJoin => write!(f, "outer-join"),
            CompareStrategy::SortedPositional => write!(f, "sorted"),
        }
    }
}

/// Configuration for a reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconConfig {
    /// Comparison strategy.
    pub strategy: CompareStrategy,
    /// Expected column layout of the extracted UI rows, in render order.
    pub ui_columns: Vec<String>,
    /// Parser configuration for the reference file.
    pub parser: ParserConfig,
    /// Restrict the reference table to rows matching the filter value before
    /// comparing, for reference exports that cover the whole portal.
    pub filter_reference: bool,
    /// Canonical name of the column the filter value applies to.
    pub filter_column: String,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            strategy: CompareStrategy::default(),
            ui_columns: portal_columns().to_vec(),
            parser: ParserConfig::default(),
            filter_reference: false,
            filter_column: PORTAL_BREED_COLUMN.to_string(),
        }
    }
}

impl ReconConfig {
    /// Select the comparison strategy.
    pub fn with_strategy(mut self, strategy: CompareStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the expected UI column layout.
    pub fn with_ui_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.ui_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Pre-filter the reference table by the filter value.
    pub fn with_filter_reference(mut self, filter_reference: bool) -> Self {
        self.filter_reference = filter_reference;
        self
    }

    /// Replace the parser configuration for the reference file.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonResult {
    /// The two datasets agree over their common columns.
    Pass {
        filter: String,
        /// Header-only report (common columns + provenance column).
        report: ReportTable,
    },
    /// Differences were found; this is a normal outcome, not an error.
    Fail {
        filter: String,
        discrepancies: Vec<Discrepancy>,
        report: ReportTable,
    },
}

impl ComparisonResult {
    /// Whether the run passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, ComparisonResult::Pass { .. })
    }

    /// The filter value this run validated.
    pub fn filter(&self) -> &str {
        match self {
            ComparisonResult::Pass { filter, .. } | ComparisonResult::Fail { filter, .. } => filter,
        }
    }

    /// The discrepancy list (empty on pass).
    pub fn discrepancies(&self) -> &[Discrepancy] {
        match self {
            ComparisonResult::Pass { .. } => &[],
            ComparisonResult::Fail { discrepancies, .. } => discrepancies,
        }
    }

    /// The ready-to-serialize report (header-only on pass).
    pub fn report(&self) -> &ReportTable {
        match self {
            ComparisonResult::Pass { report, .. } | ComparisonResult::Fail { report, .. } => report,
        }
    }
}

/// The reconciliation engine.
///
/// One `Reconciler` is reusable across runs; each run builds its datasets
/// fresh and discards them with the returned [`ComparisonResult`].
pub struct Reconciler {
    config: ReconConfig,
    parser: Parser,
}

impl Reconciler {
    /// Create a reconciler with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReconConfig::default())
    }

    /// Create a reconciler with custom configuration.
    pub fn with_config(config: ReconConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    /// The active configuration.
    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// Full run: extract UI rows, load the reference file, compare.
    pub fn validate(
        &self,
        extractor: &dyn TableExtractor,
        filter_value: &str,
        reference_path: impl AsRef<Path>,
    ) -> Result<ComparisonResult> {
        let raw_rows = extractor.extract(filter_value)?;
        let ui = Dataset::from_raw_rows(raw_rows, &self.config.ui_columns);

        let (table, _metadata) = self.parser.parse_file(reference_path)?;
        let mut reference = Dataset::from_table(table);
        if self.config.filter_reference {
            reference = reference.retain_matching(&self.config.filter_column, filter_value);
        }

        self.compare(&ui, &reference, filter_value)
    }

    /// Compare two normalized datasets and classify every difference.
    pub fn compare(
        &self,
        ui: &Dataset,
        reference: &Dataset,
        filter_value: &str,
    ) -> Result<ComparisonResult> {
        if ui.is_empty() || reference.is_empty() {
            return Err(self.schema_mismatch(ui, reference));
        }

        let common = ui.common_columns(reference);
        if common.is_empty() {
            return Err(self.schema_mismatch(ui, reference));
        }

        let ui_proj = ui.project(&common);
        let ref_proj = reference.project(&common);

        let (discrepancies, report_rows) = match self.config.strategy {
            CompareStrategy::OuterJoin => outer_join_diff(&ui_proj, &ref_proj),
            CompareStrategy::SortedPositional => sorted_positional_diff(&ui_proj, &ref_proj)?,
        };

        let report = ReportTable::new(common, report_rows);
        let filter = filter_value.to_string();

        if discrepancies.is_empty() {
            Ok(ComparisonResult::Pass { filter, report })
        } else {
            Ok(ComparisonResult::Fail {
                filter,
                discrepancies,
                report,
            })
        }
    }

    fn schema_mismatch(&self, ui: &Dataset, reference: &Dataset) -> ConcordError {
        ConcordError::SchemaMismatch {
            ui_columns: ui.columns.clone(),
            reference_columns: reference.columns.clone(),
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

/// Multiset outer join over full rows.
///
/// UI-only rows surface in UI row order, then reference-only rows in
/// reference row order.
fn outer_join_diff(ui: &Dataset, reference: &Dataset) -> (Vec<Discrepancy>, Vec<ReportRow>) {
    let mut ref_counts: IndexMap<&[String], usize> = IndexMap::new();
    for row in &reference.rows {
        *ref_counts.entry(row.as_slice()).or_insert(0) += 1;
    }

    let mut discrepancies = Vec::new();
    let mut report_rows = Vec::new();

    for row in &ui.rows {
        match ref_counts.get_mut(row.as_slice()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => {
                discrepancies.push(Discrepancy::UiOnly { values: row.clone() });
                report_rows.push(ReportRow {
                    values: row.clone(),
                    source: Provenance::UiOnly,
                });
            }
        }
    }

    // Multiplicities the UI never consumed are rows missing from the UI.
    for (row, count) in ref_counts {
        for _ in 0..count {
            discrepancies.push(Discrepancy::ReferenceOnly {
                values: row.to_vec(),
            });
            report_rows.push(ReportRow {
                values: row.to_vec(),
                source: Provenance::ReferenceOnly,
            });
        }
    }

    (discrepancies, report_rows)
}

/// Sort both sides by the full column tuple, then compare positionally.
fn sorted_positional_diff(
    ui: &Dataset,
    reference: &Dataset,
) -> Result<(Vec<Discrepancy>, Vec<ReportRow>)> {
    // Positional comparison is meaningless unless both sides were sorted by
    // the identical key.
    if ui.columns != reference.columns {
        return Err(ConcordError::SchemaMismatch {
            ui_columns: ui.columns.clone(),
            reference_columns: reference.columns.clone(),
        });
    }

    let ui_sorted = ui.sorted();
    let ref_sorted = reference.sorted();

    let mut discrepancies = Vec::new();
    let mut report_rows = Vec::new();

    let shared = ui_sorted.rows.len().min(ref_sorted.rows.len());
    for i in 0..shared {
        let (ui_row, ref_row) = (&ui_sorted.rows[i], &ref_sorted.rows[i]);
        if ui_row == ref_row {
            continue;
        }

        for (col_idx, column) in ui_sorted.columns.iter().enumerate() {
            if ui_row[col_idx] != ref_row[col_idx] {
                discrepancies.push(Discrepancy::ValueMismatch {
                    row: i,
                    column: column.clone(),
                    ui: ui_row[col_idx].clone(),
                    reference: ref_row[col_idx].clone(),
                });
            }
        }
        // One report row per differing position; cell detail stays in the
        // discrepancy records.
        report_rows.push(ReportRow {
            values: ui_row.clone(),
            source: Provenance::ValueMismatch,
        });
    }

    for row in &ui_sorted.rows[shared..] {
        discrepancies.push(Discrepancy::UiOnly { values: row.clone() });
        report_rows.push(ReportRow {
            values: row.clone(),
            source: Provenance::UiOnly,
        });
    }
    for row in &ref_sorted.rows[shared..] {
        discrepancies.push(Discrepancy::ReferenceOnly { values: row.clone() });
        report_rows.push(ReportRow {
            values: row.clone(),
            source: Provenance::ReferenceOnly,
        });
    }

    Ok((discrepancies, report_rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::from_raw_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
            columns,
        )
    }

    fn case_row() -> &'static [&'static str] {
        &["C1", "StudyA", "Type1", "Boxer", "Cancer", "II"]
    }

    const CASE_COLUMNS: &[&str] = &[
        "Case ID",
        "Study Code",
        "Study Type",
        "Breed",
        "Diagnosis",
        "Stage of Disease",
    ];

    #[test]
    fn test_identical_content_passes() {
        let ui = dataset(CASE_COLUMNS, &[case_row()]);
        let reference = dataset(CASE_COLUMNS, &[case_row()]);

        let result = Reconciler::new().compare(&ui, &reference, "Boxer").unwrap();
        assert!(result.is_pass());
        assert!(result.report().rows.is_empty());
    }

    #[test]
    fn test_missing_reference_rows_each_reported_once() {
        let ui = dataset(&["breed", "diagnosis"], &[&["Boxer", "Lymphoma"]]);
        let reference = dataset(
            &["breed", "diagnosis"],
            &[
                &["Boxer", "Lymphoma"],
                &["Boxer", "Melanoma"],
                &["Boxer", "Osteosarcoma"],
            ],
        );

        let result = Reconciler::new().compare(&ui, &reference, "Boxer").unwrap();
        let reference_only: Vec<_> = result
            .discrepancies()
            .iter()
            .filter(|d| d.provenance() == Provenance::ReferenceOnly)
            .collect();
        assert_eq!(reference_only.len(), 2);
    }

    #[test]
    fn test_differing_rows_yield_one_per_side() {
        // UI has a Boxer row the reference lacks; the reference has a
        // different Boxer row.
        let ui = dataset(&["breed", "diagnosis"], &[&["Boxer", "Lymphoma"]]);
        let reference = dataset(&["breed", "diagnosis"], &[&["Boxer", "Melanoma"]]);

        let result = Reconciler::new().compare(&ui, &reference, "Boxer").unwrap();
        let discrepancies = result.discrepancies();
        assert_eq!(discrepancies.len(), 2);
        assert_eq!(
            discrepancies[0],
            Discrepancy::UiOnly {
                values: vec!["Boxer".to_string(), "Lymphoma".to_string()]
            }
        );
        assert_eq!(
            discrepancies[1],
            Discrepancy::ReferenceOnly {
                values: vec!["Boxer".to_string(), "Melanoma".to_string()]
            }
        );
    }

    #[test]
    fn test_one_sided_columns_dropped_silently() {
        let ui = dataset(
            &["Breed", "Diagnosis", "Stage"],
            &[&["Boxer", "Lymphoma", "II"]],
        );
        let reference = dataset(&["breed", "diagnosis"], &[&["Boxer", "Lymphoma"]]);

        let result = Reconciler::new().compare(&ui, &reference, "Boxer").unwrap();
        assert!(result.is_pass());
        assert_eq!(result.report().columns, vec!["breed", "diagnosis"]);
    }

    #[test]
    fn test_duplicate_multiplicity_reports_excess_as_ui_only() {
        let ui = dataset(
            &["breed"],
            &[&["Boxer"], &["Boxer"]],
        );
        let reference = dataset(&["breed"], &[&["Boxer"]]);

        let result = Reconciler::new().compare(&ui, &reference, "Boxer").unwrap();
        assert_eq!(
            result.discrepancies(),
            &[Discrepancy::UiOnly {
                values: vec!["Boxer".to_string()]
            }]
        );
    }

    #[test]
    fn test_row_order_is_not_significant() {
        let ui = dataset(
            &["breed", "diagnosis"],
            &[&["Beagle", "Melanoma"], &["Boxer", "Lymphoma"]],
        );
        let reference = dataset(
            &["breed", "diagnosis"],
            &[&["Boxer", "Lymphoma"], &["Beagle", "Melanoma"]],
        );

        let result = Reconciler::new().compare(&ui, &reference, "any").unwrap();
        assert!(result.is_pass());
    }

    #[test]
    fn test_sorted_positional_reports_cell_mismatches() {
        let config = ReconConfig::default().with_strategy(CompareStrategy::SortedPositional);
        let ui = dataset(
            &["breed", "diagnosis", "stage of disease"],
            &[&["Boxer", "Lymphoma", "II"]],
        );
        let reference = dataset(
            &["breed", "diagnosis", "stage of disease"],
            &[&["Boxer", "Lymphoma", "III"]],
        );

        let result = Reconciler::with_config(config)
            .compare(&ui, &reference, "Boxer")
            .unwrap();
        assert_eq!(
            result.discrepancies(),
            &[Discrepancy::ValueMismatch {
                row: 0,
                column: "stage of disease".to_string(),
                ui: "II".to_string(),
                reference: "III".to_string(),
            }]
        );
        assert_eq!(result.report().rows.len(), 1);
        assert_eq!(result.report().rows[0].source, Provenance::ValueMismatch);
    }

    #[test]
    fn test_sorted_positional_surplus_rows_are_one_sided() {
        let config = ReconConfig::default().with_strategy(CompareStrategy::SortedPositional);
        let ui = dataset(&["breed"], &[&["Beagle"], &["Boxer"]]);
        let reference = dataset(&["breed"], &[&["Beagle"]]);

        let result = Reconciler::with_config(config)
            .compare(&ui, &reference, "any")
            .unwrap();
        assert_eq!(
            result.discrepancies(),
            &[Discrepancy::UiOnly {
                values: vec!["Boxer".to_string()]
            }]
        );
    }

    #[test]
    fn test_empty_ui_table_is_schema_mismatch() {
        let ui = dataset(&["breed"], &[]);
        let reference = dataset(&["breed"], &[&["Boxer"]]);

        let result = Reconciler::new().compare(&ui, &reference, "Boxer");
        assert!(matches!(result, Err(ConcordError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_disjoint_columns_is_schema_mismatch() {
        let ui = dataset(&["breed"], &[&["Boxer"]]);
        let reference = dataset(&["weight (kg)"], &[&["30"]]);

        let result = Reconciler::new().compare(&ui, &reference, "Boxer");
        match result {
            Err(ConcordError::SchemaMismatch {
                ui_columns,
                reference_columns,
            }) => {
                assert_eq!(ui_columns, vec!["breed"]);
                assert_eq!(reference_columns, vec!["weight (kg)"]);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_fail_report_carries_common_columns_and_tags() {
        let ui = dataset(&["breed", "diagnosis"], &[&["Boxer", "Lymphoma"]]);
        let reference = dataset(&["breed", "diagnosis"], &[&["Boxer", "Melanoma"]]);

        let result = Reconciler::new().compare(&ui, &reference, "Boxer").unwrap();
        let report = result.report();
        assert_eq!(report.columns, vec!["breed", "diagnosis"]);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].source, Provenance::UiOnly);
        assert_eq!(report.rows[1].source, Provenance::ReferenceOnly);
    }
}
