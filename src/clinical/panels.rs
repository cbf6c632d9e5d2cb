//! Summary panels of the clinical dashboard
//!
//! Every panel is computed on demand from the cleaned table. A panel whose
//! source columns are absent returns `None` (or an empty list) so the rest
//! of the page still renders.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use polars::prelude::*;
use serde::Serialize;

use super::cleaning::GENDER_COLUMN;
use crate::data::Table;
use crate::stats::BoxStats;

pub const LOS_COLUMN: &str = "LOS";
pub const LOS_ICU_COLUMN: &str = "LOS_ICU";
pub const AGE_GROUP_COLUMN: &str = "Age_Group";
pub const SURGERY_COUNT_COLUMN: &str = "Surgery_Count";

/// Suffix of per-medication prescription count columns
pub const MEDICATION_SUFFIX: &str = "_count";

/// Medications shown in the usage ranking
pub const TOP_MEDICATIONS: usize = 15;

/// Group label used when a panel is not split by gender
pub const ALL_PATIENTS: &str = "All";

/// Format an integer with thousands separators (1234567 -> "1,234,567")
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Headline metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub n_patients: usize,
    pub n_features: usize,
    pub mean_los: Option<f64>,
    pub mean_icu_days: Option<f64>,
}

fn fmt_days(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.1} days", v))
}

impl fmt::Display for Overview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "High-Level Overview")?;
        writeln!(f, "===================")?;
        writeln!(f, "Total Patients: {}", format_thousands(self.n_patients))?;
        writeln!(f, "Total Features: {}", self.n_features)?;
        writeln!(f, "Avg Length of Stay (LOS): {}", fmt_days(self.mean_los))?;
        writeln!(f, "Avg ICU Days: {}", fmt_days(self.mean_icu_days))?;
        Ok(())
    }
}

/// Mean of a numeric column, `None` if it is absent, text-typed or empty
pub fn column_mean(table: &Table, column: &str) -> Option<f64> {
    table.numeric_column(column)?.mean()
}

/// Row/column counts and the two stay-length means
pub fn overview(table: &Table) -> Overview {
    Overview {
        n_patients: table.n_rows(),
        n_features: table.n_columns(),
        mean_los: column_mean(table, LOS_COLUMN),
        mean_icu_days: column_mean(table, LOS_ICU_COLUMN),
    }
}

/// Total prescriptions of one medication
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationUsage {
    /// Column name with the `_count` suffix stripped
    pub medication: String,
    pub total: f64,
}

/// Sum every `_count` column, rank descending and keep the top `top_n`
///
/// Missing or non-numeric cells add nothing. Equal totals keep column order.
/// Returns an empty list when the table has no medication columns.
pub fn medication_usage(table: &Table, top_n: usize) -> Vec<MedicationUsage> {
    let mut usage: Vec<MedicationUsage> = table
        .column_names()
        .iter()
        .filter_map(|name| {
            let medication = name.strip_suffix(MEDICATION_SUFFIX)?;
            let total = match table.numeric_column(name) {
                Some(values) => values.sum().unwrap_or(0.0),
                None => table
                    .text_values(name)?
                    .into_iter()
                    .flatten()
                    .filter_map(|v| v.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
                    .sum(),
            };
            Some(MedicationUsage {
                medication: medication.to_string(),
                total,
            })
        })
        .collect();

    usage.sort_by(|a, b| b.total.total_cmp(&a.total));
    usage.truncate(top_n);
    usage
}

/// Patient count for one (category, gender) cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub group: String,
    pub gender: String,
    pub count: usize,
}

/// Age group distribution split by gender, age groups in sorted order
pub fn age_group_by_gender(table: &Table) -> Option<Vec<GroupCount>> {
    let groups = table.text_values(AGE_GROUP_COLUMN)?;
    let genders = table.text_values(GENDER_COLUMN)?;

    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for (group, gender) in groups.into_iter().zip(genders) {
        if let (Some(group), Some(gender)) = (group, gender) {
            *counts.entry((group, gender)).or_insert(0) += 1;
        }
    }

    Some(
        counts
            .into_iter()
            .map(|((group, gender), count)| GroupCount {
                group,
                gender,
                count,
            })
            .collect(),
    )
}

/// Share of patients in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub fraction: f64,
}

/// Count non-missing cells in order of first appearance
///
/// Category order follows the data, as the charts draw it.
pub(crate) fn value_counts(cells: &[Option<String>]) -> Vec<(&str, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for cell in cells.iter().flatten() {
        let count = counts.entry(cell.as_str()).or_insert_with(|| {
            order.push(cell.as_str());
            0
        });
        *count += 1;
    }
    order.into_iter().map(|v| (v, counts[v])).collect()
}

/// Gender breakdown for the donut chart
pub fn gender_breakdown(table: &Table) -> Option<Vec<CategoryShare>> {
    let genders = table.text_values(GENDER_COLUMN)?;
    let counts = value_counts(&genders);
    let total: usize = counts.iter().map(|(_, c)| c).sum();

    Some(
        counts
            .into_iter()
            .map(|(category, count)| CategoryShare {
                category: category.to_string(),
                count,
                fraction: if total == 0 { 0.0 } else { count as f64 / total as f64 },
            })
            .collect(),
    )
}

/// Box statistics for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBoxStats {
    pub group: String,
    pub stats: BoxStats,
}

/// Length of stay distribution, per gender when the table has one
pub fn los_by_gender(table: &Table) -> Option<Vec<GroupBoxStats>> {
    let los: Vec<f64> = table
        .numeric_column(LOS_COLUMN)?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();

    let Some(genders) = table.text_values(GENDER_COLUMN) else {
        let stats = BoxStats::from_values(&los)?;
        return Some(vec![GroupBoxStats {
            group: ALL_PATIENTS.to_string(),
            stats,
        }]);
    };

    let groups = value_counts(&genders);
    Some(
        groups
            .into_iter()
            .filter_map(|(gender, _)| {
                let values: Vec<f64> = los
                    .iter()
                    .zip(&genders)
                    .filter(|(_, g)| g.as_deref() == Some(gender))
                    .map(|(&v, _)| v)
                    .collect();
                Some(GroupBoxStats {
                    group: gender.to_string(),
                    stats: BoxStats::from_values(&values)?,
                })
            })
            .collect(),
    )
}

/// Patients per number of surgeries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurgeryCount {
    pub surgeries: i64,
    pub patients: usize,
}

/// Histogram of `Surgery_Count` with one bar per integer value
pub fn surgery_histogram(table: &Table) -> Option<Vec<SurgeryCount>> {
    let values = table.numeric_values(SURGERY_COUNT_COLUMN)?;
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for v in values.into_iter().filter(|v| v.is_finite()) {
        *counts.entry(v.round() as i64).or_insert(0) += 1;
    }
    Some(
        counts
            .into_iter()
            .map(|(surgeries, patients)| SurgeryCount { surgeries, patients })
            .collect(),
    )
}
