//! Tabular data shared by both pipelines

mod frame;

pub use frame::{pandas_column_names, Table, NULL_VALUES};
