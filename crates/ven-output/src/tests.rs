//! Integration tests for ven-output.

use ven_orchestrate::DeliveryCounters;
use ven_sim::TickStats;

use crate::row::{DeviceRow, ModelTickRow};

// ── Shared fixtures ───────────────────────────────────────────────────────────

fn model_row(time: u64) -> ModelTickRow {
    let stats = TickStats {
        active_vehicles:    3,
        active_stations:    1,
        active_controllers: 1,
        active_roadside:    0,
        delivery: DeliveryCounters {
            uplink_delivered:    2,
            uplink_dropped:      1,
            sidelink_delivered:  0,
            sidelink_dropped:    3,
            backhaul_delivered:  1,
            backhaul_dropped:    0,
            responses_delivered: 2,
        },
    };
    ModelTickRow::from_stats(time, &stats)
}

fn device_row(id: u32) -> DeviceRow {
    DeviceRow {
        device_id:          id,
        kind:               "vehicle",
        payloads_up:        10,
        payloads_down:      4,
        bytes_up:           1_000.0,
        bytes_down:         50.0,
        wireless_remaining: 123.0,
        wired_remaining:    456.0,
        battery_remaining:  -1.0,
        overdrawn:          true,
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::csv::CsvReport;
    use crate::writer::ReportWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvReport::new(dir.path()).unwrap();
        assert!(dir.path().join("model_ticks.csv").exists());
        assert!(dir.path().join("devices.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvReport::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("model_ticks.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers[0], "time");
        assert_eq!(headers.len(), 12);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("devices.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2[0], "device_id");
        assert_eq!(headers2[1], "kind");
        assert_eq!(headers2.len(), 10);
    }

    #[test]
    fn csv_model_round_trip() {
        let dir = tmp();
        let mut w = CsvReport::new(dir.path()).unwrap();
        w.write_model_rows(&[model_row(0), model_row(100)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("model_ticks.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "100"); // time
        assert_eq!(&rows[0][5], "2");   // uplink_delivered
        assert_eq!(&rows[0][6], "1");   // uplink_dropped
    }

    #[test]
    fn csv_device_round_trip() {
        let dir = tmp();
        let mut w = CsvReport::new(dir.path()).unwrap();
        w.write_device_rows(&[device_row(7)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("devices.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][0], "7");
        assert_eq!(&rows[0][1], "vehicle");
        assert_eq!(&rows[0][9], "1"); // overdrawn
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvReport::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;
    use crate::parquet::ParquetReport;
    use crate::writer::ReportWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetReport::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("model_ticks.parquet").exists());
        assert!(dir.path().join("devices.parquet").exists());
    }

    #[test]
    fn parquet_model_round_trip() {
        let dir = tmp();
        let mut w = ParquetReport::new(dir.path()).unwrap();
        w.write_model_rows(&[model_row(0), model_row(100), model_row(200)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("model_ticks.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let reader = builder.build().unwrap();

        let total: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total, 3);
        assert_eq!(schema.field(0).name(), "time");
        assert_eq!(*schema.field(0).data_type(), DataType::UInt64);
    }

    #[test]
    fn parquet_device_kind_is_utf8() {
        let dir = tmp();
        let mut w = ParquetReport::new(dir.path()).unwrap();
        w.write_device_rows(&[device_row(1)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("devices.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let field = builder.schema().field_with_name("kind").unwrap().clone();
        assert_eq!(*field.data_type(), DataType::Utf8);
    }
}

#[cfg(test)]
mod recorder_tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use ven_core::{SimConfig, SimTime};
    use ven_device::{DeviceKind, StandardFactory};
    use ven_ingest::{CsvSource, InputSource, StreamSet};
    use ven_link::LinkKind;
    use ven_sim::SimBuilder;

    use crate::csv::CsvReport;
    use crate::observer::RunRecorder;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn small_sim_streams() -> StreamSet {
        fn csv<R: ven_ingest::Row>(content: &str) -> CsvSource<R> {
            CsvSource::from_reader(Cursor::new(content.to_owned())).unwrap()
        }
        let mut streams = StreamSet::new();
        streams.add_trace_source(
            DeviceKind::Vehicle,
            InputSource::Csv(csv("time,device_id,lat,lon\n0,1,48.7,9.1\n")),
        );
        streams.add_trace_source(
            DeviceKind::BaseStation,
            InputSource::Csv(csv("time,device_id,lat,lon\n0,101,48.7,9.1\n")),
        );
        streams.add_link_source(
            LinkKind::V2B,
            InputSource::Csv(csv("time,source,target,distance_m\n0,1,101,50.0\n")),
        );
        streams
    }

    #[test]
    fn recorder_writes_both_tables_at_run_end() {
        let dir = tmp();
        let config = SimConfig {
            start_time:         SimTime::ZERO,
            end_time:           SimTime(500),
            step_secs:          100,
            streaming_interval: 500,
            seed:               1,
        };
        let mut sim = SimBuilder::new(config, StandardFactory::with_defaults())
            .streams(small_sim_streams())
            .build()
            .unwrap();

        let writer = CsvReport::new(dir.path()).unwrap();
        let mut recorder = RunRecorder::new(writer);
        sim.run(&mut recorder).unwrap();
        assert!(recorder.take_error().is_none());

        // One model row per tick.
        let mut rdr = csv::Reader::from_path(dir.path().join("model_ticks.csv")).unwrap();
        assert_eq!(rdr.records().count(), 5);

        // One device row per registered device, sorted by id.
        let mut rdr = csv::Reader::from_path(dir.path().join("devices.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "vehicle");
        assert_eq!(&rows[1][0], "101");
        assert_eq!(&rows[1][1], "base_station");
    }

    #[test]
    fn recorder_buffers_until_sim_end() {
        let dir = tmp();
        let writer = CsvReport::new(dir.path()).unwrap();
        let mut recorder = RunRecorder::new(writer);

        use ven_sim::SimObserver;
        let stats = ven_sim::TickStats::default();
        recorder.on_tick_end(SimTime(0), &stats);
        recorder.on_tick_end(SimTime(100), &stats);
        assert_eq!(recorder.model_rows().len(), 2);

        // Nothing hits the file until on_sim_end fires.
        let mut rdr = csv::Reader::from_path(dir.path().join("model_ticks.csv")).unwrap();
        assert_eq!(rdr.records().count(), 0);
    }
}
