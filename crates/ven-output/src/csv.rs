//! CSV report backend.
//!
//! Creates two files in the configured output directory:
//! - `model_ticks.csv`
//! - `devices.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::ReportWriter;
use crate::{DeviceRow, ModelTickRow, OutputResult};

/// Writes run reports to two CSV files.
pub struct CsvReport {
    model:    Writer<File>,
    devices:  Writer<File>,
    finished: bool,
}

impl CsvReport {
    /// Open (or create) the two CSV files in `dir` and write the headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut model = Writer::from_path(dir.join("model_ticks.csv"))?;
        model.write_record([
            "time",
            "active_vehicles",
            "active_stations",
            "active_controllers",
            "active_roadside",
            "uplink_delivered",
            "uplink_dropped",
            "sidelink_delivered",
            "sidelink_dropped",
            "backhaul_delivered",
            "backhaul_dropped",
            "responses_delivered",
        ])?;

        let mut devices = Writer::from_path(dir.join("devices.csv"))?;
        devices.write_record([
            "device_id",
            "kind",
            "payloads_up",
            "payloads_down",
            "bytes_up",
            "bytes_down",
            "wireless_remaining",
            "wired_remaining",
            "battery_remaining",
            "overdrawn",
        ])?;

        Ok(Self { model, devices, finished: false })
    }
}

impl ReportWriter for CsvReport {
    fn write_model_rows(&mut self, rows: &[ModelTickRow]) -> OutputResult<()> {
        for row in rows {
            self.model.write_record(&[
                row.time.to_string(),
                row.active_vehicles.to_string(),
                row.active_stations.to_string(),
                row.active_controllers.to_string(),
                row.active_roadside.to_string(),
                row.uplink_delivered.to_string(),
                row.uplink_dropped.to_string(),
                row.sidelink_delivered.to_string(),
                row.sidelink_dropped.to_string(),
                row.backhaul_delivered.to_string(),
                row.backhaul_dropped.to_string(),
                row.responses_delivered.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_device_rows(&mut self, rows: &[DeviceRow]) -> OutputResult<()> {
        for row in rows {
            self.devices.write_record(&[
                row.device_id.to_string(),
                row.kind.to_string(),
                row.payloads_up.to_string(),
                row.payloads_down.to_string(),
                row.bytes_up.to_string(),
                row.bytes_down.to_string(),
                row.wireless_remaining.to_string(),
                row.wired_remaining.to_string(),
                row.battery_remaining.to_string(),
                (row.overdrawn as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.model.flush()?;
        self.devices.flush()?;
        Ok(())
    }
}
