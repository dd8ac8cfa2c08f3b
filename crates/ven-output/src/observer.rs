//! `RunRecorder<W>` — bridges `SimObserver` to a `ReportWriter`.

use ven_core::SimTime;
use ven_device::DeviceRegistry;
use ven_sim::{SimObserver, TickStats};

use crate::row::{DeviceRow, ModelTickRow};
use crate::writer::ReportWriter;
use crate::OutputError;

/// A [`SimObserver`] that buffers one model row per tick and writes both
/// report tables (tick summaries and per-device totals) once at run end.
///
/// Errors from the writer are stored internally because observer hooks have
/// no return value.  After `sim.run()` returns, check with
/// [`take_error`][Self::take_error].
pub struct RunRecorder<W: ReportWriter> {
    writer:     W,
    model_rows: Vec<ModelTickRow>,
    last_error: Option<OutputError>,
}

impl<W: ReportWriter> RunRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            model_rows: Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run completed.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Tick rows buffered so far.
    pub fn model_rows(&self) -> &[ModelTickRow] {
        &self.model_rows
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: ReportWriter> SimObserver for RunRecorder<W> {
    fn on_tick_end(&mut self, now: SimTime, stats: &TickStats) {
        self.model_rows.push(ModelTickRow::from_stats(now.0, stats));
    }

    fn on_sim_end(&mut self, _final_time: SimTime, registry: &DeviceRegistry) {
        let mut device_rows: Vec<DeviceRow> =
            registry.iter().map(DeviceRow::from_device).collect();
        device_rows.sort_unstable_by_key(|r| r.device_id);

        let rows = std::mem::take(&mut self.model_rows);
        let result = self.writer.write_model_rows(&rows);
        self.store_err(result);
        let result = self.writer.write_device_rows(&device_rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
