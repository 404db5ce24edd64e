//! Canonical dataset shape and schema normalization.

mod dataset;
mod portal;

pub use dataset::Dataset;
pub use portal::{portal_columns, PORTAL_BREED_COLUMN};
