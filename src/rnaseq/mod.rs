//! RNA-seq volcano pipeline: load results, classify genes, build the view

mod genes;
mod loader;
mod significance;
mod volcano;

pub use genes::{neg_log10_padj, strip_version, GeneRecord, GeneTable, PADJ_EPSILON};
pub use loader::{
    gene_table_from, load_gene_results, read_gene_results, ARTIFACT_INDEX_COLUMN,
    ENSEMBL_ID_COLUMN, RAW_ID_COLUMN,
};
pub use significance::{
    classify, Significance, Thresholds, DEFAULT_LFC_THRESHOLD, DEFAULT_PADJ_THRESHOLD,
    MAX_LFC_THRESHOLD,
};
pub use volcano::{
    SignificantGene, SignificantGeneRow, ThresholdGuides, VolcanoReport, VolcanoSummary,
    VolcanoView, Y_AXIS_HEADROOM,
};

use std::path::Path;

use crate::error::Result;

/// Load (or reuse) the results at `path` and build the volcano report
pub fn volcano_report<P: AsRef<Path>>(
    path: P,
    thresholds: Thresholds,
    limit: Option<usize>,
) -> Result<VolcanoReport> {
    thresholds.validate()?;
    let genes = load_gene_results(path)?;
    let view = VolcanoView::new(&genes, thresholds);
    Ok(view.report(limit))
}
