//! Loading RNA-seq results into a [`GeneTable`]

use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;

use super::genes::{strip_version, GeneRecord, GeneTable};
use crate::data::Table;
use crate::error::{EdaError, Result};
use crate::io::{read_table, SessionCache};

/// Raw identifier column written by R's write.csv
pub const RAW_ID_COLUMN: &str = "X";

/// Identifier column after renaming
pub const ENSEMBL_ID_COLUMN: &str = "ensembl_id";

/// Alternative raw identifier headers accepted when `X` is absent
pub const RAW_ID_ALIASES: [&str; 2] = ["gene_id", "ENSEMBL"];

/// Leftover pandas index column
pub const ARTIFACT_INDEX_COLUMN: &str = "Unnamed: 0";

pub const SYMBOL_COLUMN: &str = "symbol";
pub const BASE_MEAN_COLUMN: &str = "baseMean";
pub const LFC_COLUMN: &str = "log2FoldChange";
pub const PADJ_COLUMN: &str = "padj";

lazy_static! {
    static ref GENE_TABLES: SessionCache<GeneTable> = SessionCache::new();
}

/// Read and transform an RNA-seq results CSV
/// Expected columns: X (or gene_id), symbol, baseMean, log2FoldChange, padj
pub fn read_gene_results<P: AsRef<Path>>(path: P) -> Result<GeneTable> {
    let table = read_table(path)?;
    gene_table_from(table)
}

/// Load RNA-seq results once per path for the lifetime of the process
pub fn load_gene_results<P: AsRef<Path>>(path: P) -> Result<Arc<GeneTable>> {
    GENE_TABLES.get_or_load(path.as_ref(), |p| read_gene_results(p))
}

/// Apply the load-time transformation steps to a raw results table
///
/// Steps, in order:
/// 1. Rename the raw identifier column to `ensembl_id`
/// 2. Strip the version suffix from each identifier
/// 3. Drop the `Unnamed: 0` artifact column if present
/// 4. Derive `neg_log10_padj` per row
pub fn gene_table_from(mut table: Table) -> Result<GeneTable> {
    // Step 1: rename
    if !table.has_column(ENSEMBL_ID_COLUMN) {
        let raw = std::iter::once(RAW_ID_COLUMN)
            .chain(RAW_ID_ALIASES)
            .find(|raw| table.has_column(raw))
            .ok_or_else(|| EdaError::MissingColumn {
                column: RAW_ID_COLUMN.to_string(),
            })?;
        table.rename_column(raw, ENSEMBL_ID_COLUMN)?;
    }

    // Step 2: strip versions
    let ids: Vec<String> = text_cells(&table, ENSEMBL_ID_COLUMN)?
        .into_iter()
        .map(|id| id.map_or_else(String::new, |id| strip_version(&id).to_string()))
        .collect();

    // Step 3: drop artifact index
    if !table.drop_columns(&[ARTIFACT_INDEX_COLUMN])?.is_empty() {
        log::debug!("Dropped artifact column '{}'", ARTIFACT_INDEX_COLUMN);
    }

    // Step 4: typed records (neg_log10_padj is derived in GeneRecord::new)
    let symbols = text_cells(&table, SYMBOL_COLUMN)?;
    let base_means = numeric_cells(&table, BASE_MEAN_COLUMN)?;
    let lfcs = numeric_cells(&table, LFC_COLUMN)?;
    let padjs = numeric_cells(&table, PADJ_COLUMN)?;

    let records: Vec<GeneRecord> = ids
        .iter()
        .zip(&symbols)
        .zip(base_means.iter().zip(&lfcs).zip(&padjs))
        .map(|((id, symbol), ((&base_mean, &lfc), &padj))| {
            GeneRecord::new(id, symbol.as_deref().unwrap_or(""), base_mean, lfc, padj)
        })
        .collect();

    let n_na = records.iter().filter(|r| r.padj.is_nan()).count();
    log::info!("Loaded {} genes ({} with NA padj)", records.len(), n_na);

    Ok(GeneTable::new(records))
}

/// Cells of a required column as text
fn text_cells(table: &Table, column: &str) -> Result<Vec<Option<String>>> {
    table
        .text_values(column)
        .ok_or_else(|| EdaError::MissingColumn {
            column: column.to_string(),
        })
}

/// Parse a required numeric column; NA becomes NaN, other text is an error
fn numeric_cells(table: &Table, column: &str) -> Result<Vec<f64>> {
    if let Some(values) = table.numeric_column(column) {
        return Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect());
    }

    text_cells(table, column)?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(f64::NAN),
            Some(cell) => cell.trim().parse::<f64>().map_err(|_| EdaError::InvalidValue {
                column: column.to_string(),
                row,
                value: cell.clone(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_table;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RESULTS_CSV: &str = "\
Unnamed: 0,X,symbol,baseMean,log2FoldChange,lfcSE,pvalue,padj
0,ENSMUSG00000027398.5,Il1b,5120.3,6.2,0.3,1e-90,0
1,ENSMUSG00000025746.12,Il6,830.1,4.1,0.4,1e-20,1e-18
2,ENSMUSG00000029304,Spp1,210.0,-3.4,0.5,1e-6,0.0004
3,ENSMUSG00000021250,Fos,90.0,0.4,0.6,0.5,0.9
4,ENSMUSG00000000001,NA,2.0,0.1,1.2,NA,NA
";

    #[test]
    fn test_transform_steps() {
        let table = parse_table(RESULTS_CSV, false).unwrap();
        let genes = gene_table_from(table).unwrap();

        assert_eq!(genes.n_genes(), 5);
        let il1b = &genes.records()[0];
        assert_eq!(il1b.ensembl_id, "ENSMUSG00000027398");
        assert_eq!(il1b.symbol, "Il1b");
        assert_eq!(il1b.base_mean, 5120.3);
        assert!((il1b.neg_log10_padj - 300.0).abs() < 1e-9);

        assert_eq!(genes.records()[2].ensembl_id, "ENSMUSG00000029304");
        assert!((genes.records()[2].log2_fold_change + 3.4).abs() < 1e-12);

        let unnamed = &genes.records()[4];
        assert_eq!(unnamed.symbol, "");
        assert!(unnamed.padj.is_nan());
    }

    #[test]
    fn test_artifact_column_optional() {
        let csv = "X,symbol,baseMean,log2FoldChange,padj\nENSG1.1,A,1,2.5,0.01\n";
        let genes = gene_table_from(parse_table(csv, false).unwrap()).unwrap();
        assert_eq!(genes.records()[0].ensembl_id, "ENSG1");
    }

    #[test]
    fn test_gene_id_alias_accepted() {
        let csv = "gene_id,symbol,baseMean,log2FoldChange,padj\nENSG7.2,B,1,0,1\n";
        let genes = gene_table_from(parse_table(csv, false).unwrap()).unwrap();
        assert_eq!(genes.records()[0].ensembl_id, "ENSG7");
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "X,symbol,baseMean,log2FoldChange\nENSG1,A,1,2\n";
        let err = gene_table_from(parse_table(csv, false).unwrap()).unwrap_err();
        assert!(matches!(err, EdaError::MissingColumn { ref column } if column == "padj"));

        let csv = "symbol,baseMean,log2FoldChange,padj\nA,1,2,0.1\n";
        let err = gene_table_from(parse_table(csv, false).unwrap()).unwrap_err();
        assert!(matches!(err, EdaError::MissingColumn { ref column } if column == "X"));
    }

    #[test]
    fn test_non_numeric_padj_rejected() {
        let csv = "X,symbol,baseMean,log2FoldChange,padj\nENSG1,A,1,2,small\n";
        let err = gene_table_from(parse_table(csv, false).unwrap()).unwrap_err();
        assert!(matches!(err, EdaError::InvalidValue { row: 0, .. }));
    }

    #[test]
    fn test_pandas_na_markers_read_as_nan() {
        let csv = "X,symbol,baseMean,log2FoldChange,padj\n\
                   ENSG1,A,1,2.5,0.01\n\
                   ENSG2,B,1,3.0,#N/A\n\
                   ENSG3,C,1,-4.0,<NA>\n";
        let genes = gene_table_from(parse_table(csv, false).unwrap()).unwrap();
        assert_eq!(genes.n_genes(), 3);
        assert!(!genes.records()[0].padj.is_nan());
        assert!(genes.records()[1].padj.is_nan());
        assert!(genes.records()[2].padj.is_nan());
        assert_eq!(
            genes.records()[1].significance(&Default::default()),
            crate::rnaseq::Significance::NotSignificant
        );
    }

    #[test]
    fn test_r_write_csv_header() {
        let csv = "\"\",\"X\",\"symbol\",\"baseMean\",\"log2FoldChange\",\"padj\"\n\
                   \"1\",\"ENSMUSG00000027398.5\",\"Il1b\",5120.3,6.2,0\n";
        let table = parse_table(csv, false).unwrap();
        assert!(table.has_column(ARTIFACT_INDEX_COLUMN));

        let genes = gene_table_from(table).unwrap();
        assert_eq!(genes.records()[0].ensembl_id, "ENSMUSG00000027398");
        assert_eq!(genes.records()[0].symbol, "Il1b");
    }

    #[test]
    fn test_load_is_memoized_per_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", RESULTS_CSV).unwrap();

        let first = load_gene_results(file.path()).unwrap();
        let second = load_gene_results(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.n_genes(), 5);
    }

    #[test]
    fn test_missing_file() {
        let err = read_gene_results("/no/such/dir/shrink_results_LPS.csv").unwrap_err();
        assert!(err.is_data_load());
    }
}
