//! `ven-ingest` — streaming input sources for the rust_ven framework.
//!
//! # Chunked reading contract
//!
//! Every source exposes `read_until(bound)`:
//!
//! - A **Parquet** source advances through the file's row groups, serving
//!   every group whose maximum timestamp is ≤ `bound` and holding back the
//!   first boundary-crossing group for the next call.  Chunking is lossless
//!   and order-preserving: two `read_until` calls yield exactly the rows one
//!   bigger call would have.
//! - A **CSV** source is fully materialized: the first call returns
//!   everything, later calls return empty.
//!
//! Any other file extension fails fast with
//! [`IngestError::UnsupportedFormat`] naming the offending file — the run
//! aborts rather than guessing.
//!
//! Ingestion performs no model mutation: [`StreamSet::poll`] returns a
//! [`RefreshBatch`] of typed rows and the simulation layer applies them to
//! the factory, orchestrators, and activation clock.

pub mod error;
pub mod row;
pub mod source;
pub mod stream;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{IngestError, IngestResult};
pub use row::{ActivationRow, LinkRow, Row, TraceRow};
pub use source::{CsvSource, InputSource, ParquetSource, SourceFormat};
pub use stream::{RefreshBatch, StreamSet};
