//! The four device variants and their stage behavior.
//!
//! # Stage model
//!
//! Every device implements [`Stageable`]: an `uplink_stage` that produces or
//! aggregates data moving toward the controllers, and a `downlink_stage`
//! that consumes responses moving back.  Devices only ever mutate their own
//! state inside a stage; moving payloads *between* devices is orchestrator
//! work, performed between the relevant stages in pipeline order.
//!
//! # Buffers and pipeline ordering
//!
//! Base stations and controllers drain their receive pools in the same tick
//! they were filled, because their uplink stages run after the orchestrator
//! that feeds them.  Roadside units run *before* the edge orchestrator, so a
//! payload handed to an RSU is aggregated and relayed on the following tick —
//! a one-tick store-and-forward latency inherent to the fixed stage order.

use rustc_hash::FxHashMap;

use ven_core::{ComputeHardware, DeviceId, GeoPosition, NetworkHardware, Payload, SimTime};

use crate::activation::ActivationWindow;
use crate::context::StageContext;
use crate::error::DeviceError;
use crate::kind::DeviceKind;
use crate::strategy::{DataComposer, DataSimplifier, MobilityModel};

// ── Accounting rates ──────────────────────────────────────────────────────────

/// Compute cycles charged per composed byte.
const CPU_PER_BYTE: f64 = 1.0;
/// Battery units charged per composed byte (vehicles only carry batteries
/// that matter, but the charge is uniform accounting).
const BATTERY_PER_BYTE: f64 = 0.05;
/// Storage units charged per received byte.
const STORAGE_PER_BYTE: f64 = 1.0;

// ── Shared state ──────────────────────────────────────────────────────────────

/// Volume counters accumulated over the run, surfaced by the output layer.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DeviceCounters {
    pub payloads_up:   u64,
    pub payloads_down: u64,
    pub bytes_up:      f64,
    pub bytes_down:    f64,
}

/// Identity, lifecycle, position, and hardware common to all device kinds.
pub struct DeviceState {
    pub id:       DeviceId,
    pub kind:     DeviceKind,
    pub window:   ActivationWindow,
    pub position: Option<GeoPosition>,
    pub compute:  ComputeHardware,
    pub network:  NetworkHardware,
    pub counters: DeviceCounters,
}

impl DeviceState {
    pub fn new(
        id:      DeviceId,
        kind:    DeviceKind,
        window:  ActivationWindow,
        compute: ComputeHardware,
        network: NetworkHardware,
    ) -> Self {
        Self {
            id,
            kind,
            window,
            position: None,
            compute,
            network,
            counters: DeviceCounters::default(),
        }
    }

    fn charge_compose(&mut self, bytes: f64) {
        self.compute.cpu.consume(bytes * CPU_PER_BYTE);
        self.compute.battery.consume(bytes * BATTERY_PER_BYTE);
    }

    fn charge_receive(&mut self, bytes: f64) {
        self.compute.storage.consume(bytes * STORAGE_PER_BYTE);
    }
}

// ── Stageable ─────────────────────────────────────────────────────────────────

/// The capability every scheduled participant exposes to the scheduler.
///
/// Invariant: neither method is ever invoked while the device is inactive —
/// the scheduler only iterates registered (= active) ids.
pub trait Stageable {
    fn uplink_stage(&mut self, ctx: &StageContext);
    fn downlink_stage(&mut self, ctx: &StageContext);
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// A mobile data source: moves along its trace, composes sensor payloads,
/// and receives responses and sidelink data back.
pub struct Vehicle {
    pub state: DeviceState,
    mobility:   Box<dyn MobilityModel>,
    composer:   Box<dyn DataComposer>,
    simplifier: Box<dyn DataSimplifier>,
    /// Sidelink volume as a fraction of the uplink payload.
    sidelink_fraction: f64,
    uplink:   Option<Payload>,
    sidelink: Option<Payload>,
    inbox:    Vec<Payload>,
}

impl Vehicle {
    pub fn new(
        state:             DeviceState,
        mobility:          Box<dyn MobilityModel>,
        composer:          Box<dyn DataComposer>,
        simplifier:        Box<dyn DataSimplifier>,
        sidelink_fraction: f64,
    ) -> Self {
        Self {
            state,
            mobility,
            composer,
            simplifier,
            sidelink_fraction,
            uplink:   None,
            sidelink: None,
            inbox:    Vec::new(),
        }
    }

    /// Append streamed trace waypoints to the mobility model.
    pub fn push_trace(&mut self, samples: &[(SimTime, GeoPosition)]) {
        self.mobility.extend(samples);
    }

    /// Uplink payload composed this tick, if any.  Taken by the edge
    /// orchestrator; a second call in the same tick returns `None`.
    pub fn take_uplink(&mut self) -> Option<Payload> {
        self.uplink.take()
    }

    /// Sidelink payload composed this tick, if any.
    pub fn take_sidelink(&mut self) -> Option<Payload> {
        self.sidelink.take()
    }

    /// Receive a downlink response or sidelink payload from a peer.
    pub fn deliver(&mut self, payload: Payload) {
        self.state.charge_receive(payload.bytes);
        self.inbox.push(payload);
    }
}

impl Stageable for Vehicle {
    fn uplink_stage(&mut self, ctx: &StageContext) {
        if let Some(pos) = self.mobility.advance(ctx.now) {
            self.state.position = Some(pos);
        }

        let raw = self.composer.compose(self.state.id, ctx.now, &[]);
        let payload = self.simplifier.simplify(raw);
        self.state.charge_compose(payload.bytes);
        self.state.counters.payloads_up += 1;
        self.state.counters.bytes_up += payload.bytes;

        self.sidelink = Some(Payload::new(
            self.state.id,
            ctx.now,
            payload.bytes * self.sidelink_fraction,
        ));
        self.uplink = Some(payload);
    }

    fn downlink_stage(&mut self, _ctx: &StageContext) {
        for payload in self.inbox.drain(..) {
            self.state.counters.payloads_down += 1;
            self.state.counters.bytes_down += payload.bytes;
        }
        // Storage was charged on receipt; nothing else to do until the next
        // uplink composes fresh data.
    }
}

// ── BaseStation ───────────────────────────────────────────────────────────────

/// Infrastructure aggregation point: pools vehicle/RSU payloads delivered by
/// the edge orchestrator, composes them into one backhaul payload, and fans
/// the controller's response back out to the devices it served.
pub struct BaseStation {
    pub state: DeviceState,
    composer:   Box<dyn DataComposer>,
    simplifier: Box<dyn DataSimplifier>,
    pool:       Vec<Payload>,
    /// Sources whose payloads arrived this tick, in arrival order.
    served:     Vec<DeviceId>,
    composed:   Option<Payload>,
    response:   Option<Payload>,
    responses:  FxHashMap<DeviceId, Payload>,
}

impl BaseStation {
    pub fn new(
        state:      DeviceState,
        composer:   Box<dyn DataComposer>,
        simplifier: Box<dyn DataSimplifier>,
    ) -> Self {
        Self {
            state,
            composer,
            simplifier,
            pool:      Vec::new(),
            served:    Vec::new(),
            composed:  None,
            response:  None,
            responses: FxHashMap::default(),
        }
    }

    /// Accept one access-side payload (edge orchestrator, uplink phase).
    pub fn receive_uplink(&mut self, payload: Payload) {
        self.state.charge_receive(payload.bytes);
        self.served.push(payload.source);
        self.pool.push(payload);
    }

    /// Composed backhaul payload, taken by the cloud orchestrator.
    pub fn take_composed(&mut self) -> Option<Payload> {
        self.composed.take()
    }

    /// Accept the controller response (cloud orchestrator, downlink phase).
    pub fn receive_response(&mut self, payload: Payload) {
        self.state.charge_receive(payload.bytes);
        self.response = Some(payload);
    }

    /// Per-device response map built by `downlink_stage`, drained by the
    /// edge orchestrator.
    pub fn take_responses(&mut self) -> FxHashMap<DeviceId, Payload> {
        std::mem::take(&mut self.responses)
    }
}

impl Stageable for BaseStation {
    fn uplink_stage(&mut self, ctx: &StageContext) {
        let inputs: Vec<Payload> = self
            .pool
            .drain(..)
            .map(|p| self.simplifier.simplify(p))
            .collect();
        if inputs.is_empty() {
            return;
        }

        let composed = self.composer.compose(self.state.id, ctx.now, &inputs);
        self.state.charge_compose(composed.bytes);
        self.state.counters.payloads_up += 1;
        self.state.counters.bytes_up += composed.bytes;
        self.composed = Some(composed);
    }

    fn downlink_stage(&mut self, ctx: &StageContext) {
        let Some(response) = self.response.take() else {
            self.served.clear();
            return;
        };
        self.state.counters.payloads_down += 1;
        self.state.counters.bytes_down += response.bytes;

        if self.served.is_empty() {
            return;
        }

        // Split the controller response evenly across the devices served
        // this tick; a device served twice gets a proportionally larger cut.
        let share = response.bytes / self.served.len() as f64;
        for device in self.served.drain(..) {
            let entry = self
                .responses
                .entry(device)
                .or_insert_with(|| Payload::empty(self.state.id, ctx.now));
            entry.bytes += share;
        }
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Edge/cloud controller: ingests station backhaul payloads and synthesizes
/// one response per originating station.
pub struct Controller {
    pub state: DeviceState,
    /// Response volume as a fraction of the ingested request volume.
    response_factor: f64,
    ingest:    Vec<Payload>,
    processed: Vec<Payload>,
}

impl Controller {
    pub fn new(state: DeviceState, response_factor: f64) -> Self {
        Self {
            state,
            response_factor,
            ingest:    Vec::new(),
            processed: Vec::new(),
        }
    }

    /// Accept one station payload (cloud orchestrator, uplink phase).
    pub fn receive_ingest(&mut self, payload: Payload) {
        self.state.charge_receive(payload.bytes);
        self.ingest.push(payload);
    }

    /// Per-station responses generated by `downlink_stage`, drained by the
    /// cloud orchestrator.
    pub fn take_responses(&mut self) -> Vec<(DeviceId, Payload)> {
        self.processed
            .drain(..)
            .map(|p| {
                let response = Payload::new(self.state.id, p.created_at, p.bytes * self.response_factor);
                (p.source, response)
            })
            .collect()
    }
}

impl Stageable for Controller {
    fn uplink_stage(&mut self, _ctx: &StageContext) {
        for payload in self.ingest.drain(..) {
            self.state.charge_compose(payload.bytes);
            self.state.counters.payloads_up += 1;
            self.state.counters.bytes_up += payload.bytes;
            self.processed.push(payload);
        }
    }

    fn downlink_stage(&mut self, _ctx: &StageContext) {
        // Responses are synthesized lazily in take_responses; the stage only
        // accounts for the outbound volume.
        let out: f64 = self.processed.iter().map(|p| p.bytes * self.response_factor).sum();
        self.state.counters.payloads_down += self.processed.len() as u64;
        self.state.counters.bytes_down += out;
    }
}

// ── RoadsideUnit ──────────────────────────────────────────────────────────────

/// Fixed access point for vehicles outside base-station coverage: pools
/// access-side payloads and relays an aggregated payload station-ward, plus
/// a small status payload to neighboring units.
pub struct RoadsideUnit {
    pub state: DeviceState,
    composer:   Box<dyn DataComposer>,
    simplifier: Box<dyn DataSimplifier>,
    sidelink_fraction: f64,
    pool:     Vec<Payload>,
    relay:    Option<Payload>,
    sidelink: Option<Payload>,
    inbox:    Vec<Payload>,
}

impl RoadsideUnit {
    pub fn new(
        state:             DeviceState,
        composer:          Box<dyn DataComposer>,
        simplifier:        Box<dyn DataSimplifier>,
        sidelink_fraction: f64,
    ) -> Self {
        Self {
            state,
            composer,
            simplifier,
            sidelink_fraction,
            pool:     Vec::new(),
            relay:    None,
            sidelink: None,
            inbox:    Vec::new(),
        }
    }

    /// Accept one access-side payload (vehicle via v2r, or a neighboring
    /// unit via r2r).
    pub fn receive_uplink(&mut self, payload: Payload) {
        self.state.charge_receive(payload.bytes);
        self.pool.push(payload);
    }

    /// Aggregated relay payload, taken by the edge orchestrator for r2b
    /// forwarding.
    pub fn take_relay(&mut self) -> Option<Payload> {
        self.relay.take()
    }

    /// Status payload for r2r neighbors, taken by the edge orchestrator.
    pub fn take_sidelink(&mut self) -> Option<Payload> {
        self.sidelink.take()
    }

    /// Receive a downlink response.
    pub fn deliver(&mut self, payload: Payload) {
        self.state.charge_receive(payload.bytes);
        self.inbox.push(payload);
    }
}

impl Stageable for RoadsideUnit {
    fn uplink_stage(&mut self, ctx: &StageContext) {
        let inputs: Vec<Payload> = self
            .pool
            .drain(..)
            .map(|p| self.simplifier.simplify(p))
            .collect();
        if inputs.is_empty() {
            return;
        }

        let relay = self.composer.compose(self.state.id, ctx.now, &inputs);
        self.state.charge_compose(relay.bytes);
        self.state.counters.payloads_up += 1;
        self.state.counters.bytes_up += relay.bytes;

        self.sidelink = Some(Payload::new(
            self.state.id,
            ctx.now,
            relay.bytes * self.sidelink_fraction,
        ));
        self.relay = Some(relay);
    }

    fn downlink_stage(&mut self, _ctx: &StageContext) {
        for payload in self.inbox.drain(..) {
            self.state.counters.payloads_down += 1;
            self.state.counters.bytes_down += payload.bytes;
        }
    }
}

// ── Device ────────────────────────────────────────────────────────────────────

/// The closed device union dispatched by the scheduler.
pub enum Device {
    Vehicle(Vehicle),
    BaseStation(BaseStation),
    Controller(Controller),
    Roadside(RoadsideUnit),
}

impl Device {
    pub fn id(&self) -> DeviceId {
        self.state().id
    }

    pub fn kind(&self) -> DeviceKind {
        self.state().kind
    }

    pub fn state(&self) -> &DeviceState {
        match self {
            Device::Vehicle(v)     => &v.state,
            Device::BaseStation(b) => &b.state,
            Device::Controller(c)  => &c.state,
            Device::Roadside(r)    => &r.state,
        }
    }

    pub fn state_mut(&mut self) -> &mut DeviceState {
        match self {
            Device::Vehicle(v)     => &mut v.state,
            Device::BaseStation(b) => &mut b.state,
            Device::Controller(c)  => &mut c.state,
            Device::Roadside(r)    => &mut r.state,
        }
    }

    /// Run the requested stage.  Callers guarantee the device is active.
    pub fn run_uplink(&mut self, ctx: &StageContext) {
        match self {
            Device::Vehicle(v)     => v.uplink_stage(ctx),
            Device::BaseStation(b) => b.uplink_stage(ctx),
            Device::Controller(c)  => c.uplink_stage(ctx),
            Device::Roadside(r)    => r.uplink_stage(ctx),
        }
    }

    pub fn run_downlink(&mut self, ctx: &StageContext) {
        match self {
            Device::Vehicle(v)     => v.downlink_stage(ctx),
            Device::BaseStation(b) => b.downlink_stage(ctx),
            Device::Controller(c)  => c.downlink_stage(ctx),
            Device::Roadside(r)    => r.downlink_stage(ctx),
        }
    }

    /// Transition Inactive → Active at `t` and re-arm stage-local caches.
    pub fn activate(&mut self, t: SimTime) -> Result<(), DeviceError> {
        let id = self.id();
        self.state_mut().window.activate(id, t)?;
        match self {
            Device::Vehicle(v)     => v.composer.reset(t),
            Device::BaseStation(b) => b.composer.reset(t),
            Device::Roadside(r)    => r.composer.reset(t),
            Device::Controller(_)  => {}
        }
        Ok(())
    }

    /// Transition Active → Inactive at `t`, advancing the window cursor.
    pub fn deactivate(&mut self, t: SimTime) -> Result<(), DeviceError> {
        let id = self.id();
        self.state_mut().window.deactivate(id, t)
    }
}
