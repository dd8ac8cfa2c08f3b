//! Data payloads moving through the uplink/downlink pipeline.

use crate::{DeviceId, SimTime};

/// One unit of data in flight: a sensor reading, an aggregated station
/// upload, or a controller response.
///
/// Payload sizes are plain `f64` byte counts — the model tracks volume, not
/// content.  Fractional bytes can appear after compression and are carried
/// as-is rather than rounded, so repeated simplification stays associative.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payload {
    /// Device that originated this payload.
    pub source: DeviceId,
    /// Simulated time at which the payload was composed.
    pub created_at: SimTime,
    /// Data volume in bytes.
    pub bytes: f64,
}

impl Payload {
    pub fn new(source: DeviceId, created_at: SimTime, bytes: f64) -> Self {
        Self { source, created_at, bytes }
    }

    /// A copy with its volume divided by `factor` (compression).
    ///
    /// A factor ≤ 1.0 leaves the payload unchanged — expansion is not a
    /// thing this model produces.
    pub fn scaled(mut self, factor: f64) -> Self {
        if factor > 1.0 {
            self.bytes /= factor;
        }
        self
    }

    /// An empty payload from `source` — used when a device has nothing to
    /// report this tick but the pipeline still expects an entry.
    pub fn empty(source: DeviceId, at: SimTime) -> Self {
        Self { source, created_at: at, bytes: 0.0 }
    }
}
