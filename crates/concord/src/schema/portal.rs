//! The fixed column layout of the portal's results table.

use once_cell::sync::Lazy;

/// Columns of the portal's explore table, in render order, after the leading
/// selection-control cell has been discarded.
static PORTAL_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "Case ID",
        "Study Code",
        "Study Type",
        "Breed",
        "Diagnosis",
        "Stage of Disease",
        "Age",
        "Sex",
        "Neutered Status",
        "Weight (kg)",
        "Response to Treatment",
        "Cohort",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

/// Canonical (lower-cased) name of the breed column.
pub const PORTAL_BREED_COLUMN: &str = "breed";

/// The expected portal column names, in render order.
pub fn portal_columns() -> &'static [String] {
    &PORTAL_COLUMNS
}
