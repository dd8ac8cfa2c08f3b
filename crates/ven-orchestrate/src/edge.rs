//! `EdgeOrchestrator` — binds mobile devices to access infrastructure and
//! relays sidelink traffic.
//!
//! # Per-tick state
//!
//! The vehicle→station assignment snapshot is rebuilt from the current
//! link-table slice every uplink stage and carries nothing across ticks;
//! the only persistent state is membership (mutated exclusively by the
//! activation clock) and the link tables themselves (append-only, fed by
//! streaming ingestion).
//!
//! # Candidate filtering
//!
//! Link tables can reference devices that are currently inactive — traces
//! and connectivity are streamed independently of the lifecycle.  Every
//! selection therefore filters candidates to current membership first; a
//! vehicle whose entire candidate list is inactive is treated exactly like
//! one with no entry at all (payload dropped, counted).

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use ven_core::{DeviceId, Payload, SimRng};
use ven_device::{DeviceKind, DeviceRegistry, StageContext};
use ven_link::{AllocatorStrategy, LinkEntry, LinkTable, LinkUpdate};

use crate::counters::DeliveryCounters;
use crate::error::{OrchestratorError, OrchestratorResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Edge-layer allocation policy, parsed and validated at build time.
#[derive(Copy, Clone, Debug)]
pub struct EdgeConfig {
    /// How a vehicle picks its access target among v2b/v2r candidates.
    pub allocator: AllocatorStrategy,
    /// How a device picks its sidelink neighbor set.
    pub sidelink: AllocatorStrategy,
    /// Sidelink neighbor count (`n` of nearest-n / random-n).
    pub sidelink_n: usize,
}

// ── EdgeOrchestrator ──────────────────────────────────────────────────────────

pub struct EdgeOrchestrator {
    config: EdgeConfig,

    vehicles: BTreeSet<DeviceId>,
    stations: BTreeSet<DeviceId>,
    roadside: BTreeSet<DeviceId>,

    v2b: LinkTable,
    v2v: LinkTable,
    v2r: LinkTable,
    r2b: LinkTable,
    r2r: LinkTable,

    /// Current-tick vehicle → access-target snapshot; cleared every uplink.
    assignments: FxHashMap<DeviceId, DeviceId>,
    counters: DeliveryCounters,
}

impl EdgeOrchestrator {
    pub fn new(config: EdgeConfig) -> Self {
        Self {
            config,
            vehicles: BTreeSet::new(),
            stations: BTreeSet::new(),
            roadside: BTreeSet::new(),
            v2b: LinkTable::new(),
            v2v: LinkTable::new(),
            v2r: LinkTable::new(),
            r2b: LinkTable::new(),
            r2r: LinkTable::new(),
            assignments: FxHashMap::default(),
            counters: DeliveryCounters::default(),
        }
    }

    // ── Membership (activation clock only) ────────────────────────────────

    /// Track a newly activated device.  Kinds this layer does not
    /// orchestrate (controllers) are ignored.
    pub fn add(&mut self, kind: DeviceKind, id: DeviceId) {
        match kind {
            DeviceKind::Vehicle      => { self.vehicles.insert(id); }
            DeviceKind::BaseStation  => { self.stations.insert(id); }
            DeviceKind::RoadsideUnit => { self.roadside.insert(id); }
            DeviceKind::Controller   => {}
        }
    }

    /// Stop tracking a deactivated device.  Removing a device this layer
    /// should have been tracking but was not is an internal-consistency
    /// error.
    pub fn remove(&mut self, kind: DeviceKind, id: DeviceId) -> OrchestratorResult<()> {
        let removed = match kind {
            DeviceKind::Vehicle      => self.vehicles.remove(&id),
            DeviceKind::BaseStation  => self.stations.remove(&id),
            DeviceKind::RoadsideUnit => self.roadside.remove(&id),
            DeviceKind::Controller   => return Ok(()),
        };
        if removed {
            Ok(())
        } else {
            Err(OrchestratorError::NotTracked { device: id, kind })
        }
    }

    pub fn tracks(&self, id: DeviceId) -> bool {
        self.vehicles.contains(&id) || self.stations.contains(&id) || self.roadside.contains(&id)
    }

    // ── Link-table feeds (streaming ingestion only) ───────────────────────

    pub fn update_v2b_links(&mut self, rows: impl IntoIterator<Item = LinkUpdate>) {
        self.v2b.update(rows);
    }

    pub fn update_v2v_links(&mut self, rows: impl IntoIterator<Item = LinkUpdate>) {
        self.v2v.update(rows);
    }

    pub fn update_v2r_links(&mut self, rows: impl IntoIterator<Item = LinkUpdate>) {
        self.v2r.update(rows);
    }

    pub fn update_r2b_links(&mut self, rows: impl IntoIterator<Item = LinkUpdate>) {
        self.r2b.update(rows);
    }

    pub fn update_r2r_links(&mut self, rows: impl IntoIterator<Item = LinkUpdate>) {
        self.r2r.update(rows);
    }

    // ── Telemetry ─────────────────────────────────────────────────────────

    /// Drain this tick's delivery counters.
    pub fn drain_counters(&mut self) -> DeliveryCounters {
        self.counters.drain()
    }

    /// The vehicle → access-target snapshot of the current tick.
    pub fn assignments(&self) -> &FxHashMap<DeviceId, DeviceId> {
        &self.assignments
    }

    // ── Stages ────────────────────────────────────────────────────────────

    /// Uplink: collect vehicle payloads, bind each vehicle to an access
    /// target, deliver grouped payloads, relay sidelink traffic, and forward
    /// roadside-unit relays station-ward.
    pub fn uplink_stage(
        &mut self,
        ctx:      &StageContext,
        registry: &mut DeviceRegistry,
        rng:      &mut SimRng,
    ) -> OrchestratorResult<()> {
        self.assignments.clear();
        let now = ctx.now;

        // ── Vehicle uplink + sidelink collection ──────────────────────────
        let mut uplinks:   Vec<(DeviceId, Payload)> = Vec::new();
        let mut sidelinks: Vec<(DeviceId, Payload)> = Vec::new();
        for &vid in &self.vehicles {
            let vehicle = registry.vehicle_mut(vid)?;
            if let Some(p) = vehicle.take_uplink() {
                vehicle.state.network.wireless.consume(p.bytes);
                uplinks.push((vid, p));
            }
            if let Some(p) = vehicle.take_sidelink() {
                sidelinks.push((vid, p));
            }
        }

        // ── Access binding and grouped delivery ───────────────────────────
        let mut grouped: FxHashMap<DeviceId, Vec<Payload>> = FxHashMap::default();
        for (vid, payload) in uplinks {
            let station = self
                .pick_target(&self.v2b, now, vid, &self.stations, rng)
                .or_else(|| self.pick_target(&self.v2r, now, vid, &self.roadside, rng));
            match station {
                None => self.counters.uplink_dropped += 1,
                Some(target) => {
                    self.assignments.insert(vid, target);
                    grouped.entry(target).or_default().push(payload);
                }
            }
        }

        let mut targets: Vec<DeviceId> = grouped.keys().copied().collect();
        targets.sort_unstable();
        for target in targets {
            let payloads = grouped.remove(&target).unwrap_or_default();
            if self.stations.contains(&target) {
                let station = registry.base_station_mut(target)?;
                for p in payloads {
                    station.state.network.wireless.consume(p.bytes);
                    station.receive_uplink(p);
                    self.counters.uplink_delivered += 1;
                }
            } else {
                let unit = registry.roadside_mut(target)?;
                for p in payloads {
                    unit.state.network.wireless.consume(p.bytes);
                    unit.receive_uplink(p);
                    self.counters.uplink_delivered += 1;
                }
            }
        }

        // ── Vehicle sidelink relay ────────────────────────────────────────
        for (vid, payload) in sidelinks {
            let candidates = filter_members(self.v2v.candidates(now, vid), &self.vehicles, vid);
            let neighbors = self
                .config
                .sidelink
                .pick_n(&candidates, self.config.sidelink_n, rng);
            if neighbors.is_empty() {
                self.counters.sidelink_dropped += 1;
                continue;
            }
            for neighbor in neighbors {
                registry.vehicle_mut(vid)?.state.network.wireless.consume(payload.bytes);
                let peer = registry.vehicle_mut(neighbor)?;
                peer.state.network.wireless.consume(payload.bytes);
                peer.deliver(payload);
                self.counters.sidelink_delivered += 1;
            }
        }

        // ── Roadside-unit relay and sidelink ──────────────────────────────
        let roadside: Vec<DeviceId> = self.roadside.iter().copied().collect();
        for rid in roadside {
            let unit = registry.roadside_mut(rid)?;
            let relay = unit.take_relay();
            let sidelink = unit.take_sidelink();

            if let Some(p) = relay {
                // Relays ride the wired backhaul toward a fixed station.
                match self.pick_target(&self.r2b, now, rid, &self.stations, rng) {
                    None => self.counters.uplink_dropped += 1,
                    Some(target) => {
                        registry.roadside_mut(rid)?.state.network.wired.consume(p.bytes);
                        let station = registry.base_station_mut(target)?;
                        station.state.network.wired.consume(p.bytes);
                        station.receive_uplink(p);
                        self.counters.uplink_delivered += 1;
                    }
                }
            }

            if let Some(p) = sidelink {
                let candidates = filter_members(self.r2r.candidates(now, rid), &self.roadside, rid);
                let neighbors = self
                    .config
                    .sidelink
                    .pick_n(&candidates, self.config.sidelink_n, rng);
                if neighbors.is_empty() {
                    self.counters.sidelink_dropped += 1;
                    continue;
                }
                for neighbor in neighbors {
                    registry.roadside_mut(rid)?.state.network.wireless.consume(p.bytes);
                    let peer = registry.roadside_mut(neighbor)?;
                    peer.state.network.wireless.consume(p.bytes);
                    peer.receive_uplink(p);
                    self.counters.sidelink_delivered += 1;
                }
            }
        }

        Ok(())
    }

    /// Downlink: drain each station's per-device response map and deliver.
    ///
    /// A response addressed to a device no longer tracked here is fatal —
    /// the addressee must have been active this tick to have produced the
    /// uplink payload the response answers.
    pub fn downlink_stage(
        &mut self,
        _ctx:     &StageContext,
        registry: &mut DeviceRegistry,
    ) -> OrchestratorResult<()> {
        let stations: Vec<DeviceId> = self.stations.iter().copied().collect();
        for sid in stations {
            let station = registry.base_station_mut(sid)?;
            let mut responses: Vec<(DeviceId, Payload)> =
                station.take_responses().into_iter().collect();
            // FxHashMap iteration order is arbitrary; deliver in id order.
            responses.sort_unstable_by_key(|&(id, _)| id);

            for (device, payload) in responses {
                if !self.vehicles.contains(&device) && !self.roadside.contains(&device) {
                    return Err(OrchestratorError::UnknownRecipient(device));
                }
                registry.base_station_mut(sid)?.state.network.wireless.consume(payload.bytes);
                let receiver = registry.get_mut(device)?;
                receiver.state_mut().network.wireless.consume(payload.bytes);
                registry.deliver_downlink(device, payload)?;
                self.counters.responses_delivered += 1;
            }
        }
        Ok(())
    }

    // ── Selection helper ──────────────────────────────────────────────────

    /// Pick one target for `source` from `table`'s slice at `now`, filtered
    /// to `members`.  `None` means no candidate — the caller counts a drop.
    fn pick_target(
        &self,
        table:   &LinkTable,
        now:     ven_core::SimTime,
        source:  DeviceId,
        members: &BTreeSet<DeviceId>,
        rng:     &mut SimRng,
    ) -> Option<DeviceId> {
        let candidates = filter_members(table.candidates(now, source), members, source);
        self.config.allocator.pick(&candidates, rng)
    }
}

/// Candidates restricted to currently tracked devices, excluding `this`.
fn filter_members(
    candidates: &[LinkEntry],
    members:    &BTreeSet<DeviceId>,
    this:       DeviceId,
) -> Vec<LinkEntry> {
    candidates
        .iter()
        .filter(|e| e.target != this && members.contains(&e.target))
        .copied()
        .collect()
}
