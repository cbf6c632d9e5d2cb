//! CSV reading into [`Table`]

use std::io::Cursor;
use std::path::Path;

use ::csv::ReaderBuilder;
use polars::prelude::*;

use crate::data::{pandas_column_names, Table, NULL_VALUES};
use crate::error::{EdaError, Result};

/// Read a data file, mapping any failure to [`EdaError::DataLoad`]
fn read_data_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| EdaError::DataLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Header names of a CSV source, normalized the way pandas names them
fn read_header(bytes: &[u8]) -> Result<Vec<String>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(bytes);
    let header: Vec<&str> = rdr.headers()?.iter().collect();
    if header.is_empty() {
        return Err(EdaError::EmptyData {
            reason: "CSV file has no header".to_string(),
        });
    }
    Ok(pandas_column_names(&header))
}

/// Reader options: comma-delimited, header row, types inferred over the whole file
///
/// Short rows are padded with nulls; rows with extra fields are an error.
fn csv_options() -> CsvReadOptions {
    let null_values = NullValues::AllColumns(NULL_VALUES.iter().map(|v| (*v).into()).collect());
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
}

/// Parse CSV bytes into a frame carrying pandas-style column names
fn parse_frame(bytes: Vec<u8>) -> Result<DataFrame> {
    let names = read_header(&bytes)?;
    let mut frame = csv_options()
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    if frame.width() != names.len() {
        return Err(EdaError::InvalidInput {
            reason: format!(
                "header has {} names but {} columns were read",
                names.len(),
                frame.width()
            ),
        });
    }

    let read_names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for (read, name) in read_names.iter().zip(&names) {
        if read != name {
            frame.rename(read, name.as_str().into())?;
        }
    }
    Ok(frame)
}

/// Read a CSV file into a table, all columns as features
/// Expected format: first row is the header, comma-delimited
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let frame = parse_frame(read_data_file(path)?)?;
    log::debug!("Read {} rows x {} columns from {}", frame.height(), frame.width(), path.display());
    Ok(Table::new(frame))
}

/// Read a CSV file whose first column is a row index key
pub fn read_indexed_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let frame = parse_frame(read_data_file(path)?)?;
    log::debug!("Read {} rows x {} columns from {}", frame.height(), frame.width(), path.display());
    Table::with_index(frame)
}

/// Parse CSV text already held in memory
pub fn parse_table(text: &str, with_index: bool) -> Result<Table> {
    let frame = parse_frame(text.as_bytes().to_vec())?;
    if with_index {
        Table::with_index(frame)
    } else {
        Ok(Table::new(frame))
    }
}
