//! Gene significance classification for volcano plots
//!
//! A gene is called when its adjusted p-value is below the padj cutoff and
//! its log2 fold change lies beyond ±lfc cutoff. Both comparisons are
//! strict, so a value sitting exactly on either threshold is not significant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EdaError, Result};

/// Default adjusted p-value cutoff
pub const DEFAULT_PADJ_THRESHOLD: f64 = 0.05;

/// Default absolute log2 fold change cutoff
pub const DEFAULT_LFC_THRESHOLD: f64 = 2.0;

/// Largest LFC cutoff the threshold control accepts
pub const MAX_LFC_THRESHOLD: f64 = 10.0;

/// Significance label of a single gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Significance {
    Upregulated,
    Downregulated,
    #[serde(rename = "Not Significant")]
    NotSignificant,
}

impl Significance {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Significance::Upregulated => "Upregulated",
            Significance::Downregulated => "Downregulated",
            Significance::NotSignificant => "Not Significant",
        }
    }

    /// True for up- and down-regulated genes
    pub fn is_significant(&self) -> bool {
        !matches!(self, Significance::NotSignificant)
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User-adjustable cutoffs for calling a gene significant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Adjusted p-value must be strictly below this
    pub padj: f64,
    /// |log2 fold change| must be strictly above this
    pub lfc: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            padj: DEFAULT_PADJ_THRESHOLD,
            lfc: DEFAULT_LFC_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Create validated thresholds
    pub fn new(padj: f64, lfc: f64) -> Result<Self> {
        let thresholds = Self { padj, lfc };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Check the values are within the ranges the threshold controls allow
    pub fn validate(&self) -> Result<()> {
        if !self.padj.is_finite() || self.padj <= 0.0 {
            return Err(EdaError::InvalidInput {
                reason: format!("padj threshold must be a positive number, got {}", self.padj),
            });
        }
        if !self.lfc.is_finite() || !(0.0..=MAX_LFC_THRESHOLD).contains(&self.lfc) {
            return Err(EdaError::InvalidInput {
                reason: format!(
                    "LFC threshold must be within [0, {}], got {}",
                    MAX_LFC_THRESHOLD, self.lfc
                ),
            });
        }
        Ok(())
    }
}

/// Classify one gene against the thresholds
///
/// Total over all inputs: NaN in either value makes both comparisons false
/// and yields [`Significance::NotSignificant`].
pub fn classify(padj: f64, log2_fold_change: f64, thresholds: &Thresholds) -> Significance {
    if padj < thresholds.padj && log2_fold_change > thresholds.lfc {
        Significance::Upregulated
    } else if padj < thresholds.padj && log2_fold_change < -thresholds.lfc {
        Significance::Downregulated
    } else {
        Significance::NotSignificant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_examples() {
        let t = Thresholds::default();
        assert_eq!(classify(0.01, 3.0, &t), Significance::Upregulated);
        assert_eq!(classify(0.01, -3.0, &t), Significance::Downregulated);
        assert_eq!(classify(0.2, 5.0, &t), Significance::NotSignificant);
        assert_eq!(classify(0.01, 1.0, &t), Significance::NotSignificant);
    }

    #[test]
    fn test_boundaries_are_not_significant() {
        let t = Thresholds::default();
        assert_eq!(classify(0.05, 3.0, &t), Significance::NotSignificant);
        assert_eq!(classify(0.01, 2.0, &t), Significance::NotSignificant);
        assert_eq!(classify(0.01, -2.0, &t), Significance::NotSignificant);
    }

    #[test]
    fn test_padj_zero_and_nan() {
        let t = Thresholds::default();
        assert_eq!(classify(0.0, 2.5, &t), Significance::Upregulated);
        assert_eq!(classify(f64::NAN, 5.0, &t), Significance::NotSignificant);
        assert_eq!(classify(0.01, f64::NAN, &t), Significance::NotSignificant);
    }

    #[test]
    fn test_zero_lfc_threshold() {
        let t = Thresholds::new(0.05, 0.0).unwrap();
        assert_eq!(classify(0.01, 0.1, &t), Significance::Upregulated);
        assert_eq!(classify(0.01, -0.1, &t), Significance::Downregulated);
        assert_eq!(classify(0.01, 0.0, &t), Significance::NotSignificant);
    }

    #[test]
    fn test_classifier_is_total_over_grid() {
        let values = [-1e9, -5.0, -2.0, -0.5, 0.0, 0.01, 0.05, 0.5, 1.0, 2.0, 5.0, 1e9];
        let thresholds = [
            Thresholds { padj: 0.05, lfc: 2.0 },
            Thresholds { padj: 0.001, lfc: 0.0 },
            Thresholds { padj: 1.0, lfc: 10.0 },
        ];
        for t in &thresholds {
            for &padj in &values {
                for &lfc in &values {
                    let label = classify(padj, lfc, t);
                    let expect_up = padj < t.padj && lfc > t.lfc;
                    let expect_down = padj < t.padj && lfc < -t.lfc;
                    assert_eq!(label == Significance::Upregulated, expect_up);
                    assert_eq!(label == Significance::Downregulated, expect_down);
                }
            }
        }
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Thresholds::new(0.05, 2.0).is_ok());
        assert!(Thresholds::new(0.05, 10.0).is_ok());
        assert!(Thresholds::new(0.0, 2.0).is_err());
        assert!(Thresholds::new(0.05, -0.5).is_err());
        assert!(Thresholds::new(0.05, 10.5).is_err());
        assert!(Thresholds::new(f64::NAN, 2.0).is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Significance::NotSignificant.to_string(), "Not Significant");
        assert!(Significance::Upregulated.is_significant());
        assert!(!Significance::NotSignificant.is_significant());
    }
}
