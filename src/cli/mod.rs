//! Command-line interface for rust_omics_eda

use clap::{Parser, Subcommand};

use crate::io::{DEFAULT_CLINICAL_PATH, DEFAULT_RNASEQ_PATH};
use crate::rnaseq::{DEFAULT_LFC_THRESHOLD, DEFAULT_PADJ_THRESHOLD};

#[derive(Parser, Debug)]
#[command(name = "rust_omics_eda")]
#[command(version)]
#[command(about = "RNA-seq volcano and clinical EDA reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify genes and summarize the volcano plot
    #[command(
        long_about = "Classify genes from differential expression results.\n\n\
            A gene is Upregulated when padj < --padj and log2FoldChange > --lfc,\n\
            Downregulated when padj < --padj and log2FoldChange < -(--lfc).\n\
            Values exactly on a threshold are Not Significant.",
        after_long_help = "\
Examples:
  rust_omics_eda volcano
  rust_omics_eda volcano -i results.csv --padj 0.01 --lfc 1.5
  rust_omics_eda volcano --json --limit 25"
    )]
    Volcano {
        /// Path to the RNA-seq results CSV
        #[arg(short, long, default_value = DEFAULT_RNASEQ_PATH,
            long_help = "Path to the RNA-seq results CSV.\n\
                Required columns: X (versioned Ensembl ID), symbol, baseMean,\n\
                log2FoldChange, padj. An 'Unnamed: 0' index column is ignored.")]
        input: String,

        /// Adjusted p-value cutoff
        #[arg(long, default_value_t = DEFAULT_PADJ_THRESHOLD)]
        padj: f64,

        /// Absolute log2 fold change cutoff, 0 to 10
        #[arg(long, default_value_t = DEFAULT_LFC_THRESHOLD)]
        lfc: f64,

        /// Maximum rows of the significant genes table (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize the clinical dataset
    #[command(
        long_about = "Clean the clinical table and print its summary panels.\n\n\
            Administrative columns are dropped, Gender is normalized to M/F,\n\
            and every column from the first one starting with 'b' is cut.",
        after_long_help = "\
Examples:
  rust_omics_eda clinical
  rust_omics_eda clinical -i train.csv --column LOS
  rust_omics_eda clinical --json"
    )]
    Clinical {
        /// Path to the clinical CSV (first column is the row index)
        #[arg(short, long, default_value = DEFAULT_CLINICAL_PATH)]
        input: String,

        /// Column to explore in detail
        #[arg(short, long)]
        column: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_volcano_defaults() {
        let cli = Cli::try_parse_from(["rust_omics_eda", "volcano"]).unwrap();
        match cli.command {
            Commands::Volcano {
                input, padj, lfc, limit, json,
            } => {
                assert_eq!(input, DEFAULT_RNASEQ_PATH);
                assert_eq!(padj, 0.05);
                assert_eq!(lfc, 2.0);
                assert_eq!(limit, 0);
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_clinical_column() {
        let cli =
            Cli::try_parse_from(["rust_omics_eda", "-v", "clinical", "--column", "LOS"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Clinical { column, .. } => assert_eq!(column.as_deref(), Some("LOS")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
