//! Input operations: CSV reading and the session cache

mod cache;
mod csv;

pub use self::cache::SessionCache;
pub use self::csv::{parse_table, read_indexed_table, read_table};

/// Default RNA-seq differential expression results
pub const DEFAULT_RNASEQ_PATH: &str = "data/shrink_results_LPS.csv";

/// Default clinical training table
pub const DEFAULT_CLINICAL_PATH: &str = "data/train.csv";
