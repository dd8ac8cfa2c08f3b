//! The `ReportWriter` trait implemented by all backend writers.

use crate::{DeviceRow, ModelTickRow, OutputResult};

/// Trait implemented by the CSV and Parquet report writers.
///
/// Both tables are written once, at run completion — reports are not
/// streamed during ticks.
pub trait ReportWriter {
    /// Write the model-level tick table.
    fn write_model_rows(&mut self, rows: &[ModelTickRow]) -> OutputResult<()>;

    /// Write the per-device totals table.
    fn write_device_rows(&mut self, rows: &[DeviceRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
