//! Differential expression records

use serde::{Deserialize, Serialize};

use super::significance::{classify, Significance, Thresholds};

/// Offset added to padj before taking the log so that padj == 0 stays finite
pub const PADJ_EPSILON: f64 = 1e-300;

/// Volcano plot y value: -log10(padj + 1e-300)
///
/// For padj in [0, 1] the result is finite and non-negative (about 300 at
/// padj == 0). Subtracting from 0.0 keeps padj == 1 at +0.0.
pub fn neg_log10_padj(padj: f64) -> f64 {
    0.0 - (padj + PADJ_EPSILON).log10()
}

/// Drop a version suffix from an Ensembl identifier ("ENSG00000141510.17" -> "ENSG00000141510")
pub fn strip_version(raw_id: &str) -> &str {
    raw_id.split_once('.').map_or(raw_id, |(stem, _)| stem)
}

/// One row of RNA-seq differential expression results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRecord {
    /// Ensembl gene ID without version suffix
    pub ensembl_id: String,
    /// Gene symbol (empty when the source has none)
    pub symbol: String,
    /// Mean of normalized counts
    pub base_mean: f64,
    /// Log2 fold change
    pub log2_fold_change: f64,
    /// BH-adjusted p-value, NaN when the source reports NA
    pub padj: f64,
    /// -log10(padj + 1e-300)
    pub neg_log10_padj: f64,
}

impl GeneRecord {
    /// Create a record, deriving `neg_log10_padj` from `padj`
    pub fn new(
        ensembl_id: impl Into<String>,
        symbol: impl Into<String>,
        base_mean: f64,
        log2_fold_change: f64,
        padj: f64,
    ) -> Self {
        Self {
            ensembl_id: ensembl_id.into(),
            symbol: symbol.into(),
            base_mean,
            log2_fold_change,
            padj,
            neg_log10_padj: neg_log10_padj(padj),
        }
    }

    /// Significance under the given thresholds, always computed fresh
    pub fn significance(&self, thresholds: &Thresholds) -> Significance {
        classify(self.padj, self.log2_fold_change, thresholds)
    }
}

/// Immutable table of gene records in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneTable {
    records: Vec<GeneRecord>,
}

impl GeneTable {
    /// Wrap records
    pub fn new(records: Vec<GeneRecord>) -> Self {
        Self { records }
    }

    /// All records
    pub fn records(&self) -> &[GeneRecord] {
        &self.records
    }

    /// Get number of genes
    pub fn n_genes(&self) -> usize {
        self.records.len()
    }

    /// True if no genes were loaded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest finite -log10(padj), `None` if every padj is NA
    pub fn max_neg_log10_padj(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.neg_log10_padj)
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
    }
}
