//! Volcano plot view over a gene table

use rayon::prelude::*;
use serde::Serialize;

use super::genes::{GeneRecord, GeneTable};
use super::significance::{Significance, Thresholds};

/// Headroom added above the tallest point on the y axis
pub const Y_AXIS_HEADROOM: f64 = 20.0;

/// Row of the significant genes table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificantGene<'a> {
    pub ensembl_id: &'a str,
    pub symbol: &'a str,
    pub base_mean: f64,
    pub log2_fold_change: f64,
    pub padj: f64,
    pub significance: Significance,
}

/// Dashed guide lines drawn at the thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdGuides {
    /// Horizontal line at -log10(padj threshold)
    pub neg_log10_padj: f64,
    /// Vertical line at -lfc threshold
    pub lfc_low: f64,
    /// Vertical line at +lfc threshold
    pub lfc_high: f64,
}

/// Classification of every gene under one set of thresholds
///
/// Borrowing the base table keeps it read-only; a new threshold pair means a
/// new view, so labels never outlive the thresholds they were computed for.
#[derive(Debug, Clone)]
pub struct VolcanoView<'a> {
    genes: &'a GeneTable,
    thresholds: Thresholds,
    labels: Vec<Significance>,
}

impl<'a> VolcanoView<'a> {
    /// Classify every gene in `genes`
    pub fn new(genes: &'a GeneTable, thresholds: Thresholds) -> Self {
        let labels: Vec<Significance> = genes
            .records()
            .par_iter()
            .map(|g| g.significance(&thresholds))
            .collect();

        log::debug!(
            "Classified {} genes (padj < {}, |LFC| > {})",
            labels.len(),
            thresholds.padj,
            thresholds.lfc
        );

        Self {
            genes,
            thresholds,
            labels,
        }
    }

    /// Thresholds this view was computed with
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Label of each gene, parallel to the table's records
    pub fn labels(&self) -> &[Significance] {
        &self.labels
    }

    /// Every plotted point with its label
    pub fn points(&self) -> impl Iterator<Item = (&'a GeneRecord, Significance)> + '_ {
        self.genes.records().iter().zip(self.labels.iter().copied())
    }

    /// Genes whose label is not `NotSignificant`, in source order
    pub fn significant_genes(&self) -> Vec<SignificantGene<'a>> {
        self.points()
            .filter(|(_, label)| label.is_significant())
            .map(|(g, significance)| SignificantGene {
                ensembl_id: &g.ensembl_id,
                symbol: &g.symbol,
                base_mean: g.base_mean,
                log2_fold_change: g.log2_fold_change,
                padj: g.padj,
                significance,
            })
            .collect()
    }

    /// Number of significant genes
    pub fn n_significant(&self) -> usize {
        self.labels.iter().filter(|l| l.is_significant()).count()
    }

    /// Number of genes with a given label
    pub fn count(&self, label: Significance) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    /// Guide line positions
    pub fn guides(&self) -> ThresholdGuides {
        ThresholdGuides {
            neg_log10_padj: -self.thresholds.padj.log10(),
            lfc_low: -self.thresholds.lfc,
            lfc_high: self.thresholds.lfc,
        }
    }

    /// Y axis range `[0, max(-log10 padj) + 20]`
    pub fn y_range(&self) -> (f64, f64) {
        let top = self.genes.max_neg_log10_padj().unwrap_or(0.0);
        (0.0, top + Y_AXIS_HEADROOM)
    }

    /// Plot title, thresholds printed with a decimal point (`2.0`, not `2`)
    pub fn title(&self) -> String {
        format!(
            "Volcano Plot (LFC > {:?}, padj < {:?})",
            self.thresholds.lfc, self.thresholds.padj
        )
    }

    /// Summary statistics
    pub fn summary(&self) -> VolcanoSummary {
        VolcanoSummary {
            total_genes: self.genes.n_genes(),
            genes_with_padj: self.genes.records().iter().filter(|g| !g.padj.is_nan()).count(),
            significant: self.n_significant(),
            upregulated: self.count(Significance::Upregulated),
            downregulated: self.count(Significance::Downregulated),
            thresholds: self.thresholds,
        }
    }

    /// Owned snapshot of everything the volcano page shows
    ///
    /// `limit` caps the rows of the significant genes table; the count in the
    /// summary always covers all of them.
    pub fn report(&self, limit: Option<usize>) -> VolcanoReport {
        let mut significant: Vec<SignificantGeneRow> = self
            .significant_genes()
            .into_iter()
            .map(SignificantGeneRow::from)
            .collect();
        if let Some(limit) = limit {
            significant.truncate(limit);
        }

        VolcanoReport {
            title: self.title(),
            summary: self.summary(),
            guides: self.guides(),
            y_range: self.y_range(),
            significant_genes: significant,
        }
    }
}

/// Owned significant gene row for reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificantGeneRow {
    pub ensembl_id: String,
    pub symbol: String,
    pub base_mean: f64,
    pub log2_fold_change: f64,
    pub padj: f64,
    pub significance: Significance,
}

impl From<SignificantGene<'_>> for SignificantGeneRow {
    fn from(g: SignificantGene<'_>) -> Self {
        Self {
            ensembl_id: g.ensembl_id.to_string(),
            symbol: g.symbol.to_string(),
            base_mean: g.base_mean,
            log2_fold_change: g.log2_fold_change,
            padj: g.padj,
            significance: g.significance,
        }
    }
}

/// Counts shown above the significant genes table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolcanoSummary {
    pub total_genes: usize,
    pub genes_with_padj: usize,
    pub significant: usize,
    pub upregulated: usize,
    pub downregulated: usize,
    pub thresholds: Thresholds,
}

impl std::fmt::Display for VolcanoSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Volcano Summary")?;
        writeln!(f, "===============")?;
        writeln!(f, "Total genes: {}", self.total_genes)?;
        writeln!(f, "Genes with padj: {}", self.genes_with_padj)?;
        writeln!(
            f,
            "Significant (padj < {}, |LFC| > {}): {}",
            self.thresholds.padj, self.thresholds.lfc, self.significant
        )?;
        writeln!(f, "  Upregulated: {}", self.upregulated)?;
        writeln!(f, "  Downregulated: {}", self.downregulated)?;
        Ok(())
    }
}

/// Everything the volcano page renders, detached from the base table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolcanoReport {
    pub title: String,
    pub summary: VolcanoSummary,
    pub guides: ThresholdGuides,
    pub y_range: (f64, f64),
    pub significant_genes: Vec<SignificantGeneRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genes() -> GeneTable {
        GeneTable::new(vec![
            GeneRecord::new("ENSG1", "Il1b", 5000.0, 6.2, 0.0),
            GeneRecord::new("ENSG2", "Il6", 800.0, 4.1, 1e-18),
            GeneRecord::new("ENSG3", "Spp1", 210.0, -3.4, 4e-4),
            GeneRecord::new("ENSG4", "Fos", 90.0, 0.4, 0.9),
            GeneRecord::new("ENSG5", "Jun", 40.0, 2.0, 0.001),
            GeneRecord::new("ENSG6", "", 2.0, 8.0, f64::NAN),
        ])
    }

    #[test]
    fn test_default_thresholds() {
        let table = genes();
        let view = VolcanoView::new(&table, Thresholds::default());

        assert_eq!(
            view.labels(),
            &[
                Significance::Upregulated,
                Significance::Upregulated,
                Significance::Downregulated,
                Significance::NotSignificant,
                Significance::NotSignificant,
                Significance::NotSignificant,
            ]
        );
        let significant = view.significant_genes();
        assert_eq!(significant.len(), 3);
        assert_eq!(view.n_significant(), 3);
        assert_eq!(significant[2].symbol, "Spp1");
        assert_eq!(significant[2].significance, Significance::Downregulated);
    }

    #[test]
    fn test_thresholds_change_recomputes() {
        let table = genes();
        let strict = VolcanoView::new(&table, Thresholds::new(1e-10, 5.0).unwrap());
        assert_eq!(strict.n_significant(), 1);

        let loose = VolcanoView::new(&table, Thresholds::new(0.05, 0.0).unwrap());
        assert_eq!(loose.n_significant(), 4);
        assert_eq!(loose.count(Significance::Upregulated), 3);
    }

    #[test]
    fn test_geometry() {
        let table = genes();
        let view = VolcanoView::new(&table, Thresholds::default());

        let guides = view.guides();
        assert!((guides.neg_log10_padj - 1.3010299956639813).abs() < 1e-12);
        assert_eq!(guides.lfc_low, -2.0);
        assert_eq!(guides.lfc_high, 2.0);

        let (lo, hi) = view.y_range();
        assert_eq!(lo, 0.0);
        assert!((hi - 320.0).abs() < 1e-9);
        assert_eq!(view.title(), "Volcano Plot (LFC > 2.0, padj < 0.05)");

        let custom = VolcanoView::new(&table, Thresholds::new(0.01, 1.5).unwrap());
        assert_eq!(custom.title(), "Volcano Plot (LFC > 1.5, padj < 0.01)");
    }

    #[test]
    fn test_summary_and_report() {
        let table = genes();
        let view = VolcanoView::new(&table, Thresholds::default());
        let summary = view.summary();
        assert_eq!(summary.total_genes, 6);
        assert_eq!(summary.genes_with_padj, 5);
        assert_eq!(summary.upregulated, 2);
        assert_eq!(summary.downregulated, 1);
        assert!(summary.to_string().contains("Upregulated: 2"));

        let report = view.report(Some(1));
        assert_eq!(report.significant_genes.len(), 1);
        assert_eq!(report.summary.significant, 3);
        assert_eq!(report.significant_genes[0].symbol, "Il1b");
    }

    #[test]
    fn test_empty_table() {
        let table = GeneTable::default();
        let view = VolcanoView::new(&table, Thresholds::default());
        assert_eq!(view.n_significant(), 0);
        assert_eq!(view.y_range(), (0.0, Y_AXIS_HEADROOM));
    }
}
