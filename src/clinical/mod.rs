//! Clinical EDA pipeline: load, clean, and summarize a clinical feature table

mod cleaning;
mod explore;
mod panels;

pub use cleaning::{
    clean_clinical, drop_admin_columns, normalize_gender, truncate_at_prefix, truncation_point,
    CleaningRules, DROPPED_COLUMNS, GENDER_COLUMN, GENDER_MISENCODED_FEMALE,
};
pub use explore::{
    explore_column, is_categorical, ColumnDistribution, ValueCount, CATEGORICAL_MAX_DISTINCT,
};
pub use panels::{
    age_group_by_gender, column_mean, format_thousands, gender_breakdown, los_by_gender,
    medication_usage, overview, surgery_histogram, CategoryShare, GroupBoxStats, GroupCount,
    MedicationUsage, Overview, SurgeryCount, AGE_GROUP_COLUMN, LOS_COLUMN, LOS_ICU_COLUMN,
    MEDICATION_SUFFIX, SURGERY_COUNT_COLUMN, TOP_MEDICATIONS,
};

use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::data::Table;
use crate::error::Result;
use crate::io::{read_indexed_table, SessionCache};

lazy_static! {
    static ref CLINICAL_TABLES: SessionCache<Table> = SessionCache::new();
}

/// Read a clinical CSV (first column is the row index) and clean it
pub fn read_clinical<P: AsRef<Path>>(path: P) -> Result<Table> {
    let table = read_indexed_table(path)?;
    clean_clinical(table, &CleaningRules::default())
}

/// Load the cleaned clinical table once per path for the lifetime of the process
pub fn load_clinical<P: AsRef<Path>>(path: P) -> Result<Arc<Table>> {
    CLINICAL_TABLES.get_or_load(path.as_ref(), |p| read_clinical(p))
}

/// Every panel of the clinical page except the explorer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalReport {
    pub overview: Overview,
    pub columns: Vec<String>,
    pub age_group_by_gender: Option<Vec<GroupCount>>,
    pub gender_breakdown: Option<Vec<CategoryShare>>,
    pub los_by_gender: Option<Vec<GroupBoxStats>>,
    pub surgery_histogram: Option<Vec<SurgeryCount>>,
    pub medication_usage: Vec<MedicationUsage>,
}

impl ClinicalReport {
    /// Compute all panels from a cleaned table
    pub fn from_table(table: &Table) -> Self {
        Self {
            overview: overview(table),
            columns: table.column_names(),
            age_group_by_gender: age_group_by_gender(table),
            gender_breakdown: gender_breakdown(table),
            los_by_gender: los_by_gender(table),
            surgery_histogram: surgery_histogram(table),
            medication_usage: medication_usage(table, TOP_MEDICATIONS),
        }
    }
}

/// Load (or reuse) the clinical table at `path` and build its report
pub fn clinical_report<P: AsRef<Path>>(path: P) -> Result<ClinicalReport> {
    let table = load_clinical(path)?;
    Ok(ClinicalReport::from_table(&table))
}
