//! Pluggable device strategies: mobility, data composition, simplification.
//!
//! The core never inspects strategy internals.  Each device owns boxed
//! strategy objects injected by the factory; stages call the narrow trait
//! surface below and nothing else, so an application can swap in arbitrary
//! models without touching the pipeline.
//!
//! The stock implementations here cover the standard trace-driven setup:
//! positions interpolated from streamed waypoints, sensor volume as
//! rate × elapsed time, aggregation as a sum plus a fixed header, and
//! compression as division by a configured factor.

use std::collections::BTreeMap;

use ven_core::{DeviceId, GeoPosition, Payload, SimTime};

// ── Traits ────────────────────────────────────────────────────────────────────

/// Moves a device through space.
pub trait MobilityModel: Send {
    /// Position at `now`, or `None` if the model has no fix yet.
    fn advance(&mut self, now: SimTime) -> Option<GeoPosition>;

    /// Append streamed trace samples.  Models that ignore traces keep the
    /// default no-op.
    fn extend(&mut self, _samples: &[(SimTime, GeoPosition)]) {}
}

/// Produces a device's outgoing payload each uplink stage.
pub trait DataComposer: Send {
    /// Compose the payload for `source` at `now` from `inputs` (empty for
    /// devices that generate data rather than aggregate it).
    fn compose(&mut self, source: DeviceId, now: SimTime, inputs: &[Payload]) -> Payload;

    /// Re-arm any stage-local time caches after an activation at `now`.
    /// Rate-based composers must not bill the device for time it spent
    /// inactive.
    fn reset(&mut self, _now: SimTime) {}
}

/// Shrinks a payload before it moves up the pipeline.
pub trait DataSimplifier: Send {
    fn simplify(&self, payload: Payload) -> Payload;
}

// ── Mobility implementations ──────────────────────────────────────────────────

/// Trace-driven mobility: the position at `now` is the most recent streamed
/// waypoint at or before `now`.
///
/// Waypoints arrive incrementally through [`MobilityModel::extend`] as
/// streaming ingestion reads the device's trace file; lookups are O(log n)
/// range queries on the `BTreeMap`.
#[derive(Default)]
pub struct TraceMobility {
    waypoints: BTreeMap<SimTime, GeoPosition>,
}

impl TraceMobility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of waypoints currently buffered.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

impl MobilityModel for TraceMobility {
    fn advance(&mut self, now: SimTime) -> Option<GeoPosition> {
        self.waypoints.range(..=now).next_back().map(|(_, &p)| p)
    }

    fn extend(&mut self, samples: &[(SimTime, GeoPosition)]) {
        for &(t, p) in samples {
            self.waypoints.insert(t, p);
        }
    }
}

/// Fixed-position mobility for infrastructure devices.
pub struct Stationary {
    position: Option<GeoPosition>,
}

impl Stationary {
    pub fn at(position: GeoPosition) -> Self {
        Self { position: Some(position) }
    }

    pub fn unplaced() -> Self {
        Self { position: None }
    }
}

impl MobilityModel for Stationary {
    fn advance(&mut self, _now: SimTime) -> Option<GeoPosition> {
        self.position
    }
}

// ── Composer implementations ──────────────────────────────────────────────────

/// Sensor-volume composer: bytes = rate × seconds since the previous
/// composition.
///
/// The `last` cache is the stage-local "previous time" pointer the
/// activation lifecycle resets: after `reset(t)` the first composition
/// charges only for time elapsed since `t`.
pub struct SensorComposer {
    rate_bps: f64,
    last:     Option<SimTime>,
}

impl SensorComposer {
    pub fn new(rate_bps: f64) -> Self {
        Self { rate_bps, last: None }
    }
}

impl DataComposer for SensorComposer {
    fn compose(&mut self, source: DeviceId, now: SimTime, _inputs: &[Payload]) -> Payload {
        let elapsed = match self.last {
            Some(last) if last <= now => now.since(last),
            _ => 0,
        };
        self.last = Some(now);
        Payload::new(source, now, self.rate_bps * elapsed as f64)
    }

    fn reset(&mut self, now: SimTime) {
        self.last = Some(now);
    }
}

/// Aggregation composer: one output payload whose volume is the sum of all
/// inputs plus a fixed framing overhead.
pub struct AggregateComposer {
    overhead_bytes: f64,
}

impl AggregateComposer {
    pub fn new(overhead_bytes: f64) -> Self {
        Self { overhead_bytes }
    }
}

impl DataComposer for AggregateComposer {
    fn compose(&mut self, source: DeviceId, now: SimTime, inputs: &[Payload]) -> Payload {
        if inputs.is_empty() {
            return Payload::empty(source, now);
        }
        let total: f64 = inputs.iter().map(|p| p.bytes).sum();
        Payload::new(source, now, total + self.overhead_bytes)
    }
}

// ── Simplifier implementations ────────────────────────────────────────────────

/// Divide payload volume by a fixed compression factor.
pub struct Compression {
    factor: f64,
}

impl Compression {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl DataSimplifier for Compression {
    fn simplify(&self, payload: Payload) -> Payload {
        payload.scaled(self.factor)
    }
}

/// Identity simplifier.
pub struct NoSimplify;

impl DataSimplifier for NoSimplify {
    fn simplify(&self, payload: Payload) -> Payload {
        payload
    }
}
