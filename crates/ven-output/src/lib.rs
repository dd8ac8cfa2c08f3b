//! `ven-output` — end-of-run report writers for the rust_ven framework.
//!
//! Two backends behind one trait:
//!
//! | Feature   | Backend | Files created                              |
//! |-----------|---------|--------------------------------------------|
//! | *(none)*  | CSV     | `model_ticks.csv`, `devices.csv`           |
//! | `parquet` | Parquet | `model_ticks.parquet`, `devices.parquet`   |
//!
//! Both implement [`ReportWriter`] and are driven by [`RunRecorder`], a
//! `ven_sim::SimObserver` that buffers one model row per tick and flushes
//! everything — tick rows and per-device rows — once at run completion.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ven_output::{CsvReport, RunRecorder};
//!
//! let writer = CsvReport::new(Path::new("./output"))?;
//! let mut recorder = RunRecorder::new(writer);
//! sim.run(&mut recorder)?;
//! if let Some(e) = recorder.take_error() {
//!     eprintln!("report error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use csv::CsvReport;
pub use error::{OutputError, OutputResult};
pub use observer::RunRecorder;
pub use row::{DeviceRow, ModelTickRow};
pub use writer::ReportWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetReport;
