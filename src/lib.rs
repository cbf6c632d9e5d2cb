//! rust_omics_eda: data core for RNA-seq volcano and clinical EDA dashboards
//!
//! Two independent pipelines, each loading a CSV once per process and
//! deriving read-only views from it:
//!
//! - [`rnaseq`]: differential expression results, significance calls under
//!   adjustable padj/LFC thresholds, volcano plot geometry.
//! - [`clinical`]: a clinical feature table cleaned at load time, headline
//!   metrics, medication ranking and per-column distributions.
//!
//! # Example
//!
//! ```no_run
//! use rust_omics_eda::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let genes = load_gene_results("data/shrink_results_LPS.csv")?;
//! let view = VolcanoView::new(&genes, Thresholds::new(0.05, 2.0)?);
//! println!("Found {} significant genes", view.n_significant());
//!
//! let clinical = load_clinical("data/train.csv")?;
//! println!("{}", overview(&clinical));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod clinical;
pub mod data;
pub mod error;
pub mod io;
pub mod rnaseq;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clinical::{
        clean_clinical, clinical_report, explore_column, load_clinical, medication_usage,
        overview, read_clinical, CleaningRules, ClinicalReport, ColumnDistribution, Overview,
    };
    pub use crate::data::Table;
    pub use crate::error::{EdaError, Result};
    pub use crate::io::{read_indexed_table, read_table, DEFAULT_CLINICAL_PATH, DEFAULT_RNASEQ_PATH};
    pub use crate::rnaseq::{
        classify, load_gene_results, read_gene_results, volcano_report, GeneRecord, GeneTable,
        Significance, Thresholds, VolcanoReport, VolcanoView,
    };
}
