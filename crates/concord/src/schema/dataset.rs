//! Normalized dataset: canonical column names plus positionally aligned rows.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::input::DataTable;

/// A table normalized for comparison: lower-cased column names and rows whose
/// length always equals the column count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Canonical (lower-cased) column names, in schema order.
    pub columns: Vec<String>,
    /// Row data, positionally aligned to `columns`.
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Normalize unlabeled extractor rows onto a fixed column schema.
    ///
    /// Rows wider than the schema are truncated from the end; narrower rows
    /// are right-padded with empty cells. Both are deliberate, lossy policies
    /// carried over from the portal capture flow: the rendered table can grow
    /// trailing decoration cells or drop optional ones, and the capture is
    /// still positionally aligned to the known schema.
    pub fn from_raw_rows<S: AsRef<str>>(rows: Vec<Vec<String>>, columns: &[S]) -> Self {
        let columns: Vec<String> = columns
            .iter()
            .map(|c| c.as_ref().to_lowercase())
            .collect();
        let width = columns.len();

        let rows = rows
            .into_iter()
            .map(|mut row| {
                while row.len() < width {
                    row.push(String::new());
                }
                row.truncate(width);
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Normalize a header-carrying parsed table.
    pub fn from_table(table: DataTable) -> Self {
        let columns = table.headers.iter().map(|h| h.to_lowercase()).collect();
        Self {
            columns,
            rows: table.rows,
        }
    }

    /// Whether the dataset has no columns or no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    /// Column names present in both datasets, in this dataset's column order.
    ///
    /// Both sides are already canonically lower-cased, so the intersection is
    /// case-insensitive by construction and commutative as a set.
    pub fn common_columns(&self, other: &Dataset) -> Vec<String> {
        let theirs: IndexSet<&str> = other.columns.iter().map(|c| c.as_str()).collect();
        self.columns
            .iter()
            .filter(|c| theirs.contains(c.as_str()))
            .cloned()
            .collect()
    }

    /// Project onto a subset of this dataset's columns, in the given order.
    ///
    /// Columns not present in this dataset yield empty cells; callers are
    /// expected to project onto a common-column list computed first.
    pub fn project(&self, columns: &[String]) -> Dataset {
        let positions: Vec<Option<usize>> = columns
            .iter()
            .map(|c| self.columns.iter().position(|own| own == c))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                positions
                    .iter()
                    .map(|p| p.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Dataset {
            columns: columns.to_vec(),
            rows,
        }
    }

    /// Keep only rows whose `column` cell equals `value`, ignoring ASCII case.
    ///
    /// A dataset without that column is returned unchanged.
    pub fn retain_matching(&self, column: &str, value: &str) -> Dataset {
        let Some(idx) = self.columns.iter().position(|c| c == column) else {
            return self.clone();
        };

        let rows = self
            .rows
            .iter()
            .filter(|row| {
                row.get(idx)
                    .is_some_and(|cell| cell.eq_ignore_ascii_case(value))
            })
            .cloned()
            .collect();

        Dataset {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// A copy with rows sorted lexicographically by the full column tuple.
    pub fn sorted(&self) -> Dataset {
        let mut rows = self.rows.clone();
        rows.sort();
        Dataset {
            columns: self.columns.clone(),
            rows,
        }
    }
}
