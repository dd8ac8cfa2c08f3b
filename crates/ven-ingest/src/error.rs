//! Error types for ven-ingest.
//!
//! All variants are configuration or data-integrity failures: ingestion
//! errors abort the run, they are never retried.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported input format: {0:?} (expected .csv or .parquet)")]
    UnsupportedFormat(PathBuf),

    #[error("column {column:?}: expected {expected}")]
    Schema {
        column:   String,
        expected: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type IngestResult<T> = Result<T, IngestError>;
