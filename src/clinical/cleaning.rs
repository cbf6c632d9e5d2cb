//! Load-time cleaning of the clinical table
//!
//! Applied once, in this order:
//! 1. drop administrative columns
//! 2. normalize `Gender` and drop rows outside {M, F}
//! 3. truncate at the first column whose name starts with "b"/"B"
//!
//! Step 3 is positional: it depends on the column layout of the source file,
//! not on what the columns mean. Running the whole pass twice is a no-op.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::Table;
use crate::error::Result;

/// Administrative columns removed before analysis
pub const DROPPED_COLUMNS: [&str; 4] = [
    "Education",
    "Discharge_Status",
    "Current_Work_Status",
    "AdmissionType",
];

pub const GENDER_COLUMN: &str = "Gender";

/// Mis-encoded gender value that stands for female
pub const GENDER_MISENCODED_FEMALE: &str = "Ž";

/// Cleaning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningRules {
    /// Columns dropped when present
    pub drop_columns: Vec<String>,
    /// Gender column name
    pub gender_column: String,
    /// (encoded value, replacement) pairs applied before filtering
    pub gender_aliases: Vec<(String, String)>,
    /// Gender values kept
    pub allowed_genders: Vec<String>,
    /// Lower-case prefix marking the first column to cut
    pub truncate_prefix: char,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            drop_columns: DROPPED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            gender_column: GENDER_COLUMN.to_string(),
            gender_aliases: vec![(GENDER_MISENCODED_FEMALE.to_string(), "F".to_string())],
            allowed_genders: vec!["M".to_string(), "F".to_string()],
            truncate_prefix: 'b',
        }
    }
}

/// Run all cleaning steps
pub fn clean_clinical(mut table: Table, rules: &CleaningRules) -> Result<Table> {
    let n_rows = table.n_rows();
    let n_columns = table.n_columns();

    drop_admin_columns(&mut table, rules)?;
    normalize_gender(&mut table, rules)?;
    truncate_at_prefix(&mut table, rules.truncate_prefix)?;

    log::info!(
        "Cleaned clinical table: {} x {} -> {} x {}",
        n_rows,
        n_columns,
        table.n_rows(),
        table.n_columns()
    );
    Ok(table)
}

/// Step 1: drop the configured columns where present
pub fn drop_admin_columns(table: &mut Table, rules: &CleaningRules) -> Result<()> {
    let dropped = table.drop_columns(&rules.drop_columns)?;
    if !dropped.is_empty() {
        log::debug!("Dropped columns: {}", dropped.join(", "));
    }
    Ok(())
}

/// Step 2: map gender aliases, then drop rows whose gender is not allowed
///
/// Does nothing when the table has no gender column.
pub fn normalize_gender(table: &mut Table, rules: &CleaningRules) -> Result<()> {
    let Some(genders) = table.text_values(&rules.gender_column) else {
        log::debug!("No '{}' column, skipping gender normalization", rules.gender_column);
        return Ok(());
    };

    let normalized: Vec<Option<String>> = genders
        .into_iter()
        .map(|gender| {
            gender.map(|g| {
                rules
                    .gender_aliases
                    .iter()
                    .find(|(from, _)| *from == g)
                    .map_or(g, |(_, to)| to.clone())
            })
        })
        .collect();
    let keep: BooleanChunked = normalized
        .iter()
        .map(|g| g.as_ref().is_some_and(|g| rules.allowed_genders.contains(g)))
        .collect();

    table.replace_column(Series::new(rules.gender_column.as_str().into(), normalized))?;
    let removed = table.filter_rows(&keep)?;
    if removed > 0 {
        log::debug!("Dropped {} rows with unrecognized gender", removed);
    }
    Ok(())
}

/// Position of the first column whose lower-cased name starts with `prefix`
pub fn truncation_point(columns: &[String], prefix: char) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.to_lowercase().starts_with(prefix))
}

/// Step 3: keep only the columns before the first `prefix` column
pub fn truncate_at_prefix(table: &mut Table, prefix: char) -> Result<()> {
    let columns = table.column_names();
    if let Some(cutoff) = truncation_point(&columns, prefix) {
        log::debug!(
            "Truncating at column '{}' ({} columns dropped)",
            columns[cutoff],
            columns.len() - cutoff
        );
        table.truncate_columns(cutoff)?;
    }
    Ok(())
}
