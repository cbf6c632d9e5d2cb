//! Interactive explorer: distribution of one user-selected column

use serde::Serialize;

use super::cleaning::GENDER_COLUMN;
use super::panels::value_counts;
use crate::data::Table;
use crate::error::{EdaError, Result};
use crate::stats::{histogram, sturges_bins, BoxStats, HistogramBin};

/// Columns with fewer distinct values than this are shown as categories
pub const CATEGORICAL_MAX_DISTINCT: usize = 20;

/// Count of one value, optionally within one gender
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub count: usize,
}

/// Distribution of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnDistribution {
    /// Grouped bar counts, split by gender when the table has one
    Categorical {
        column: String,
        counts: Vec<ValueCount>,
    },
    /// Histogram with a marginal box plot
    Numeric {
        column: String,
        histogram: Vec<HistogramBin>,
        box_stats: Option<BoxStats>,
    },
}

impl ColumnDistribution {
    /// Name of the explored column
    pub fn column(&self) -> &str {
        match self {
            ColumnDistribution::Categorical { column, .. } => column,
            ColumnDistribution::Numeric { column, .. } => column,
        }
    }

    /// Chart title
    pub fn title(&self) -> String {
        match self {
            ColumnDistribution::Categorical { column, .. } => format!("Distribution of {}", column),
            ColumnDistribution::Numeric { column, .. } => {
                format!("Distribution and Outliers of {}", column)
            }
        }
    }
}

/// True when a column gets the categorical treatment
///
/// Text-typed columns always do; numeric ones when they have fewer than
/// [`CATEGORICAL_MAX_DISTINCT`] distinct values.
pub fn is_categorical(table: &Table, column: &str) -> Option<bool> {
    if table.is_text_column(column)? {
        return Some(true);
    }
    Some(table.n_unique(column)? < CATEGORICAL_MAX_DISTINCT)
}

/// Distribution of `column`, the column must exist
pub fn explore_column(table: &Table, column: &str) -> Result<ColumnDistribution> {
    let categorical = is_categorical(table, column).ok_or_else(|| EdaError::MissingColumn {
        column: column.to_string(),
    })?;

    if categorical {
        log::debug!("Exploring '{}' as categorical", column);
        Ok(ColumnDistribution::Categorical {
            column: column.to_string(),
            counts: categorical_counts(table, column)?,
        })
    } else {
        log::debug!("Exploring '{}' as numeric", column);
        let values = table.numeric_values(column).unwrap_or_default();
        Ok(ColumnDistribution::Numeric {
            column: column.to_string(),
            histogram: histogram(&values, sturges_bins(values.len())),
            box_stats: BoxStats::from_values(&values),
        })
    }
}

/// Value counts in order of first appearance, split by gender if available
///
/// Exploring the gender column itself is not split again.
fn categorical_counts(table: &Table, column: &str) -> Result<Vec<ValueCount>> {
    let cells = table
        .text_values(column)
        .ok_or_else(|| EdaError::MissingColumn {
            column: column.to_string(),
        })?;

    let genders = match table.text_values(GENDER_COLUMN) {
        Some(g) if column != GENDER_COLUMN => g,
        _ => {
            return Ok(value_counts(&cells)
                .into_iter()
                .map(|(value, count)| ValueCount {
                    value: value.to_string(),
                    gender: None,
                    count,
                })
                .collect());
        }
    };

    let mut counts: Vec<ValueCount> = Vec::new();
    for (value, gender) in cells.iter().zip(&genders) {
        let Some(value) = value else {
            continue;
        };
        match counts
            .iter_mut()
            .find(|c| c.value == *value && c.gender == *gender)
        {
            Some(existing) => existing.count += 1,
            None => counts.push(ValueCount {
                value: value.clone(),
                gender: gender.clone(),
                count: 1,
            }),
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_table;

    /// `n` patients; with `outlier` the first weight is replaced by 500
    fn patients(n: usize, outlier: bool) -> Table {
        let mut csv = String::from("Gender,Weight,Visits,Ward\n");
        for i in 0..n {
            let weight = if outlier && i == 0 { 500.0 } else { i as f64 * 1.5 };
            csv.push_str(&format!(
                "{},{},{},ward-{}\n",
                if i % 2 == 0 { "M" } else { "F" },
                weight,
                i % 3,
                i % 2
            ));
        }
        parse_table(&csv, false).unwrap()
    }

    #[test]
    fn test_mode_switches_at_twenty_distinct_values() {
        let t = patients(19, false);
        assert_eq!(is_categorical(&t, "Weight"), Some(true));

        let t = patients(20, false);
        assert_eq!(is_categorical(&t, "Weight"), Some(false));
        assert_eq!(is_categorical(&t, "Visits"), Some(true));
        assert_eq!(is_categorical(&t, "Ward"), Some(true));
        assert_eq!(is_categorical(&t, "Missing"), None);
    }

    #[test]
    fn test_numeric_distribution() {
        let t = patients(40, true);
        let dist = explore_column(&t, "Weight").unwrap();
        assert_eq!(dist.title(), "Distribution and Outliers of Weight");
        match dist {
            ColumnDistribution::Numeric {
                histogram,
                box_stats,
                ..
            } => {
                assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 40);
                let stats = box_stats.unwrap();
                assert_eq!(stats.outliers, vec![500.0]);
            }
            other => panic!("expected numeric distribution, got {:?}", other),
        }
    }

    #[test]
    fn test_categorical_split_by_gender() {
        let t = patients(6, false);
        let dist = explore_column(&t, "Visits").unwrap();
        assert_eq!(dist.column(), "Visits");
        match dist {
            ColumnDistribution::Categorical { counts, .. } => {
                // rows: (M,0) (F,1) (M,2) (F,0) (M,1) (F,2)
                assert_eq!(counts.len(), 6);
                assert!(counts.iter().all(|c| c.count == 1));
                assert_eq!(counts[0].value, "0");
                assert_eq!(counts[0].gender.as_deref(), Some("M"));
            }
            other => panic!("expected categorical distribution, got {:?}", other),
        }
    }

    #[test]
    fn test_gender_column_not_split_again() {
        let t = patients(5, false);
        match explore_column(&t, "Gender").unwrap() {
            ColumnDistribution::Categorical { counts, .. } => {
                assert_eq!(
                    counts,
                    vec![
                        ValueCount { value: "M".to_string(), gender: None, count: 3 },
                        ValueCount { value: "F".to_string(), gender: None, count: 2 },
                    ]
                );
            }
            other => panic!("expected categorical distribution, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_error() {
        let t = patients(3, false);
        let err = explore_column(&t, "Nope").unwrap_err();
        assert!(matches!(err, EdaError::MissingColumn { .. }));
    }
}
