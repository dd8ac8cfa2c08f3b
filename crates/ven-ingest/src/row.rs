//! Typed input rows and their CSV/Arrow decoders.
//!
//! # Schemas
//!
//! | Row             | Columns                                         |
//! |-----------------|-------------------------------------------------|
//! | `TraceRow`      | `time:u64, device_id:u32, lat:f64, lon:f64`     |
//! | `LinkRow`       | `time:u64, source:u32, target:u32, distance_m:f64` |
//! | `ActivationRow` | `device_id:u32, enable:u64, disable:u64`        |
//!
//! CSV decoding goes through serde; Arrow decoding downcasts the named
//! columns and fails with a `Schema` error naming the first offending
//! column.

use arrow::array::{Float64Array, UInt32Array, UInt64Array};
use arrow::record_batch::RecordBatch;
use serde::Deserialize;

use ven_core::{DeviceId, GeoPosition, SimTime};
use ven_link::LinkUpdate;

use crate::error::{IngestError, IngestResult};

// ── Row trait ─────────────────────────────────────────────────────────────────

/// A typed input row decodable from both supported formats.
pub trait Row: serde::de::DeserializeOwned + Send + 'static {
    /// The timestamp that orders this row within its source.  Chunk
    /// boundaries cut between rows by this value.
    fn time(&self) -> SimTime;

    /// Decode every row of one Arrow record batch.
    fn decode_batch(batch: &RecordBatch) -> IngestResult<Vec<Self>>;
}

// ── Column helpers ────────────────────────────────────────────────────────────

fn column<'a, A: 'static>(
    batch:    &'a RecordBatch,
    name:     &str,
    expected: &'static str,
) -> IngestResult<&'a A> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<A>())
        .ok_or_else(|| IngestError::Schema { column: name.to_owned(), expected })
}

// ── TraceRow ──────────────────────────────────────────────────────────────────

/// One mobility-trace sample: where a device is at a point in time.
///
/// The first sample of a previously unseen device also announces the
/// device's existence to the factory.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct TraceRow {
    pub time:      u64,
    pub device_id: u32,
    pub lat:       f64,
    pub lon:       f64,
}

impl TraceRow {
    pub fn device(&self) -> DeviceId {
        DeviceId(self.device_id)
    }

    pub fn sample(&self) -> (SimTime, GeoPosition) {
        (SimTime(self.time), GeoPosition::new(self.lat as f32, self.lon as f32))
    }
}

impl Row for TraceRow {
    fn time(&self) -> SimTime {
        SimTime(self.time)
    }

    fn decode_batch(batch: &RecordBatch) -> IngestResult<Vec<Self>> {
        let times   = column::<UInt64Array>(batch, "time", "u64")?;
        let devices = column::<UInt32Array>(batch, "device_id", "u32")?;
        let lats    = column::<Float64Array>(batch, "lat", "f64")?;
        let lons    = column::<Float64Array>(batch, "lon", "f64")?;

        Ok((0..batch.num_rows())
            .map(|i| TraceRow {
                time:      times.value(i),
                device_id: devices.value(i),
                lat:       lats.value(i),
                lon:       lons.value(i),
            })
            .collect())
    }
}

// ── LinkRow ───────────────────────────────────────────────────────────────────

/// One connectivity row: source can reach target at the given distance.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct LinkRow {
    pub time:       u64,
    pub source:     u32,
    pub target:     u32,
    pub distance_m: f64,
}

impl LinkRow {
    /// Convert to the link-table update form.
    pub fn to_update(self) -> LinkUpdate {
        LinkUpdate {
            time:       SimTime(self.time),
            source:     DeviceId(self.source),
            target:     DeviceId(self.target),
            distance_m: self.distance_m,
        }
    }
}

impl Row for LinkRow {
    fn time(&self) -> SimTime {
        SimTime(self.time)
    }

    fn decode_batch(batch: &RecordBatch) -> IngestResult<Vec<Self>> {
        let times     = column::<UInt64Array>(batch, "time", "u64")?;
        let sources   = column::<UInt32Array>(batch, "source", "u32")?;
        let targets   = column::<UInt32Array>(batch, "target", "u32")?;
        let distances = column::<Float64Array>(batch, "distance_m", "f64")?;

        Ok((0..batch.num_rows())
            .map(|i| LinkRow {
                time:       times.value(i),
                source:     sources.value(i),
                target:     targets.value(i),
                distance_m: distances.value(i),
            })
            .collect())
    }
}

// ── ActivationRow ─────────────────────────────────────────────────────────────

/// One activation window for a device.  A device may carry several rows —
/// one per window — which the factory folds into one `ActivationWindow`.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct ActivationRow {
    pub device_id: u32,
    pub enable:    u64,
    pub disable:   u64,
}

impl ActivationRow {
    pub fn device(&self) -> DeviceId {
        DeviceId(self.device_id)
    }

    pub fn pair(&self) -> (SimTime, SimTime) {
        (SimTime(self.enable), SimTime(self.disable))
    }
}

impl Row for ActivationRow {
    /// Ordered by enable time: a window becomes relevant when it can first
    /// activate something.
    fn time(&self) -> SimTime {
        SimTime(self.enable)
    }

    fn decode_batch(batch: &RecordBatch) -> IngestResult<Vec<Self>> {
        let devices  = column::<UInt32Array>(batch, "device_id", "u32")?;
        let enables  = column::<UInt64Array>(batch, "enable", "u64")?;
        let disables = column::<UInt64Array>(batch, "disable", "u64")?;

        Ok((0..batch.num_rows())
            .map(|i| ActivationRow {
                device_id: devices.value(i),
                enable:    enables.value(i),
                disable:   disables.value(i),
            })
            .collect())
    }
}
