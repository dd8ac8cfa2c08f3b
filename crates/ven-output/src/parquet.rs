//! Parquet report backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `model_ticks.parquet`
//! - `devices.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    BooleanBuilder, Float64Builder, StringBuilder, UInt32Builder, UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::ReportWriter;
use crate::{DeviceRow, ModelTickRow, OutputResult};

fn model_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time",                DataType::UInt64, false),
        Field::new("active_vehicles",     DataType::UInt32, false),
        Field::new("active_stations",     DataType::UInt32, false),
        Field::new("active_controllers",  DataType::UInt32, false),
        Field::new("active_roadside",     DataType::UInt32, false),
        Field::new("uplink_delivered",    DataType::UInt64, false),
        Field::new("uplink_dropped",      DataType::UInt64, false),
        Field::new("sidelink_delivered",  DataType::UInt64, false),
        Field::new("sidelink_dropped",    DataType::UInt64, false),
        Field::new("backhaul_delivered",  DataType::UInt64, false),
        Field::new("backhaul_dropped",    DataType::UInt64, false),
        Field::new("responses_delivered", DataType::UInt64, false),
    ]))
}

fn device_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("device_id",          DataType::UInt32,  false),
        Field::new("kind",               DataType::Utf8,    false),
        Field::new("payloads_up",        DataType::UInt64,  false),
        Field::new("payloads_down",      DataType::UInt64,  false),
        Field::new("bytes_up",           DataType::Float64, false),
        Field::new("bytes_down",         DataType::Float64, false),
        Field::new("wireless_remaining", DataType::Float64, false),
        Field::new("wired_remaining",    DataType::Float64, false),
        Field::new("battery_remaining",  DataType::Float64, false),
        Field::new("overdrawn",          DataType::Boolean, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes run reports to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without it cannot be opened by Parquet readers.
pub struct ParquetReport {
    model:         Option<ArrowWriter<File>>,
    devices:       Option<ArrowWriter<File>>,
    model_schema:  Arc<Schema>,
    device_schema: Arc<Schema>,
}

impl ParquetReport {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let model_schema = model_schema();
        let device_schema = device_schema();

        let model_file = File::create(dir.join("model_ticks.parquet"))?;
        let model = ArrowWriter::try_new(
            model_file,
            Arc::clone(&model_schema),
            Some(snappy_props()),
        )?;

        let device_file = File::create(dir.join("devices.parquet"))?;
        let devices = ArrowWriter::try_new(
            device_file,
            Arc::clone(&device_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            model: Some(model),
            devices: Some(devices),
            model_schema,
            device_schema,
        })
    }
}

impl ReportWriter for ParquetReport {
    fn write_model_rows(&mut self, rows: &[ModelTickRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.model.as_mut() else {
            return Ok(());
        };

        let mut times      = UInt64Builder::new();
        let mut vehicles   = UInt32Builder::new();
        let mut stations   = UInt32Builder::new();
        let mut ctrls      = UInt32Builder::new();
        let mut roadside   = UInt32Builder::new();
        let mut up_ok      = UInt64Builder::new();
        let mut up_drop    = UInt64Builder::new();
        let mut side_ok    = UInt64Builder::new();
        let mut side_drop  = UInt64Builder::new();
        let mut back_ok    = UInt64Builder::new();
        let mut back_drop  = UInt64Builder::new();
        let mut resp_ok    = UInt64Builder::new();

        for row in rows {
            times.append_value(row.time);
            vehicles.append_value(row.active_vehicles);
            stations.append_value(row.active_stations);
            ctrls.append_value(row.active_controllers);
            roadside.append_value(row.active_roadside);
            up_ok.append_value(row.uplink_delivered);
            up_drop.append_value(row.uplink_dropped);
            side_ok.append_value(row.sidelink_delivered);
            side_drop.append_value(row.sidelink_dropped);
            back_ok.append_value(row.backhaul_delivered);
            back_drop.append_value(row.backhaul_dropped);
            resp_ok.append_value(row.responses_delivered);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.model_schema),
            vec![
                Arc::new(times.finish()),
                Arc::new(vehicles.finish()),
                Arc::new(stations.finish()),
                Arc::new(ctrls.finish()),
                Arc::new(roadside.finish()),
                Arc::new(up_ok.finish()),
                Arc::new(up_drop.finish()),
                Arc::new(side_ok.finish()),
                Arc::new(side_drop.finish()),
                Arc::new(back_ok.finish()),
                Arc::new(back_drop.finish()),
                Arc::new(resp_ok.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_device_rows(&mut self, rows: &[DeviceRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.devices.as_mut() else {
            return Ok(());
        };

        let mut ids        = UInt32Builder::new();
        let mut kinds      = StringBuilder::new();
        let mut p_up       = UInt64Builder::new();
        let mut p_down     = UInt64Builder::new();
        let mut b_up       = Float64Builder::new();
        let mut b_down     = Float64Builder::new();
        let mut wireless   = Float64Builder::new();
        let mut wired      = Float64Builder::new();
        let mut battery    = Float64Builder::new();
        let mut overdrawn  = BooleanBuilder::new();

        for row in rows {
            ids.append_value(row.device_id);
            kinds.append_value(row.kind);
            p_up.append_value(row.payloads_up);
            p_down.append_value(row.payloads_down);
            b_up.append_value(row.bytes_up);
            b_down.append_value(row.bytes_down);
            wireless.append_value(row.wireless_remaining);
            wired.append_value(row.wired_remaining);
            battery.append_value(row.battery_remaining);
            overdrawn.append_value(row.overdrawn);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.device_schema),
            vec![
                Arc::new(ids.finish()),
                Arc::new(kinds.finish()),
                Arc::new(p_up.finish()),
                Arc::new(p_down.finish()),
                Arc::new(b_up.finish()),
                Arc::new(b_down.finish()),
                Arc::new(wireless.finish()),
                Arc::new(wired.finish()),
                Arc::new(battery.finish()),
                Arc::new(overdrawn.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.model.take() {
            w.close()?;
        }
        if let Some(w) = self.devices.take() {
            w.close()?;
        }
        Ok(())
    }
}
