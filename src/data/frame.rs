//! Column-ordered table backed by a polars [`DataFrame`]

use std::collections::HashMap;

use polars::prelude::*;

use crate::error::{EdaError, Result};

/// Cell values read as missing (pandas' default NA markers)
pub const NULL_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Column names as pandas' read_csv reports them
///
/// Empty headers become `Unnamed: {position}` and repeated names get a
/// `.1`, `.2`, ... suffix.
pub fn pandas_column_names<S: AsRef<str>>(header: &[S]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.as_ref();
            let base = if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let out = if *count == 0 {
                base
            } else {
                let renamed = format!("{}.{}", base, count);
                log::warn!("Duplicate column name '{}' renamed to '{}'", base, renamed);
                renamed
            };
            *count += 1;
            out
        })
        .collect()
}

/// A data table with an optional row index held apart from the features
///
/// The index column (the first CSV column for clinical data) never takes
/// part in column operations but follows its rows through filtering.
#[derive(Debug, Clone)]
pub struct Table {
    index: Option<Column>,
    frame: DataFrame,
}

impl Table {
    /// Wrap a frame without an index
    pub fn new(frame: DataFrame) -> Self {
        Self { index: None, frame }
    }

    /// Split the first column off as the row index
    pub fn with_index(mut frame: DataFrame) -> Result<Self> {
        let Some(name) = frame.get_column_names().first().map(|s| s.to_string()) else {
            return Err(EdaError::EmptyData {
                reason: "no columns to use as index".to_string(),
            });
        };
        let index = frame.drop_in_place(&name)?;
        Ok(Self {
            index: Some(index),
            frame,
        })
    }

    /// Feature columns
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Row keys, if the table was read with an index
    pub fn index(&self) -> Option<&Column> {
        self.index.as_ref()
    }

    pub fn n_rows(&self) -> usize {
        self.frame.height()
    }

    /// Number of feature columns (index excluded)
    pub fn n_columns(&self) -> usize {
        self.frame.width()
    }

    /// Feature column names in source order
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.frame.column(name).ok()
    }

    /// True when some cell is neither missing nor a number
    ///
    /// An all-missing column is not text, the way pandas reads it as float.
    pub fn is_text_column(&self, name: &str) -> Option<bool> {
        let column = self.column(name)?;
        Some(column.dtype() == &DataType::String && column.null_count() < column.len())
    }

    /// Column cast to floats with missing cells as nulls, `None` if absent or text
    pub fn numeric_column(&self, name: &str) -> Option<Float64Chunked> {
        if self.is_text_column(name)? {
            return None;
        }
        let cast = self.column(name)?.cast(&DataType::Float64).ok()?;
        cast.f64().ok().cloned()
    }

    /// Non-missing values of a numeric column
    pub fn numeric_values(&self, name: &str) -> Option<Vec<f64>> {
        let values = self.numeric_column(name)?;
        Some(values.into_iter().flatten().filter(|v| !v.is_nan()).collect())
    }

    /// Cells as text (numbers rendered), missing cells as `None`
    pub fn text_values(&self, name: &str) -> Option<Vec<Option<String>>> {
        let cast = self.column(name)?.cast(&DataType::String).ok()?;
        let cells = cast.str().ok()?;
        Some(cells.into_iter().map(|v| v.map(|s| s.to_string())).collect())
    }

    /// Count of distinct non-missing values
    pub fn n_unique(&self, name: &str) -> Option<usize> {
        let series = self.column(name)?.as_materialized_series();
        let distinct = series.n_unique().ok()?;
        Some(distinct - usize::from(series.null_count() > 0))
    }

    /// Rename a column, `false` if `from` does not exist
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<bool> {
        if !self.has_column(from) {
            return Ok(false);
        }
        self.frame.rename(from, to.into())?;
        Ok(true)
    }

    /// Drop every named column that is present; absent names are ignored
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<String>> {
        let mut dropped = Vec::new();
        for name in names {
            let name = name.as_ref();
            if self.has_column(name) {
                self.frame.drop_in_place(name)?;
                dropped.push(name.to_string());
            }
        }
        Ok(dropped)
    }

    /// Keep only the first `n` columns
    pub fn truncate_columns(&mut self, n: usize) -> Result<()> {
        let tail: Vec<String> = self.column_names().into_iter().skip(n).collect();
        self.drop_columns(&tail)?;
        Ok(())
    }

    /// Replace the column with the same name as `series`
    pub fn replace_column(&mut self, series: Series) -> Result<()> {
        self.frame.with_column(series)?;
        Ok(())
    }

    /// Keep the rows where `mask` is true, returns how many were removed
    pub fn filter_rows(&mut self, mask: &BooleanChunked) -> Result<usize> {
        let before = self.n_rows();
        self.frame = self.frame.filter(mask)?;
        self.index = self.index.as_ref().map(|i| i.filter(mask)).transpose()?;
        Ok(before - self.n_rows())
    }
}
