//! `CloudOrchestrator` — routes station backhaul payloads to controllers.
//!
//! Unlike the edge layer, the station→controller binding is static: it is
//! rebuilt only when streaming ingestion delivers new b2c rows, never per
//! tick.  An empty update batch leaves the existing routing untouched.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use ven_core::{DeviceId, Payload};
use ven_device::{DeviceKind, DeviceRegistry, StageContext};
use ven_link::LinkUpdate;

use crate::counters::DeliveryCounters;
use crate::error::{OrchestratorError, OrchestratorResult};

pub struct CloudOrchestrator {
    stations:    BTreeSet<DeviceId>,
    controllers: BTreeSet<DeviceId>,

    /// Static station → controller routing, lowest-distance binding wins.
    b2c: FxHashMap<DeviceId, DeviceId>,

    counters: DeliveryCounters,
}

impl Default for CloudOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl CloudOrchestrator {
    pub fn new() -> Self {
        Self {
            stations:    BTreeSet::new(),
            controllers: BTreeSet::new(),
            b2c:         FxHashMap::default(),
            counters:    DeliveryCounters::default(),
        }
    }

    // ── Membership (activation clock only) ────────────────────────────────

    pub fn add(&mut self, kind: DeviceKind, id: DeviceId) {
        match kind {
            DeviceKind::BaseStation => { self.stations.insert(id); }
            DeviceKind::Controller  => { self.controllers.insert(id); }
            DeviceKind::Vehicle | DeviceKind::RoadsideUnit => {}
        }
    }

    pub fn remove(&mut self, kind: DeviceKind, id: DeviceId) -> OrchestratorResult<()> {
        let removed = match kind {
            DeviceKind::BaseStation => self.stations.remove(&id),
            DeviceKind::Controller  => self.controllers.remove(&id),
            DeviceKind::Vehicle | DeviceKind::RoadsideUnit => return Ok(()),
        };
        if removed {
            Ok(())
        } else {
            Err(OrchestratorError::NotTracked { device: id, kind })
        }
    }

    pub fn tracks(&self, id: DeviceId) -> bool {
        self.stations.contains(&id) || self.controllers.contains(&id)
    }

    // ── Routing-table rebuild (streaming ingestion only) ──────────────────

    /// Merge newly streamed b2c rows: each station in the batch is re-bound
    /// to its lowest-distance controller; stations absent from the batch
    /// keep their existing binding.  An empty batch changes nothing.
    pub fn update_b2c_links(&mut self, rows: &[LinkUpdate]) {
        let mut best: FxHashMap<DeviceId, (DeviceId, f64)> = FxHashMap::default();
        for row in rows {
            match best.get(&row.source) {
                Some(&(_, d)) if d <= row.distance_m => {}
                _ => {
                    best.insert(row.source, (row.target, row.distance_m));
                }
            }
        }
        for (station, (controller, _)) in best {
            self.b2c.insert(station, controller);
        }
    }

    /// The current station → controller binding.
    pub fn route_of(&self, station: DeviceId) -> Option<DeviceId> {
        self.b2c.get(&station).copied()
    }

    /// Drain this tick's delivery counters.
    pub fn drain_counters(&mut self) -> DeliveryCounters {
        self.counters.drain()
    }

    // ── Stages ────────────────────────────────────────────────────────────

    /// Uplink: take each station's composed payload and forward it over the
    /// wired backhaul to its bound controller.  A station with no binding
    /// (or a binding to an inactive controller) drops its payload, counted.
    pub fn uplink_stage(
        &mut self,
        _ctx:     &StageContext,
        registry: &mut DeviceRegistry,
    ) -> OrchestratorResult<()> {
        let stations: Vec<DeviceId> = self.stations.iter().copied().collect();
        for sid in stations {
            let Some(payload) = registry.base_station_mut(sid)?.take_composed() else {
                continue;
            };

            let target = self
                .b2c
                .get(&sid)
                .copied()
                .filter(|c| self.controllers.contains(c));
            match target {
                None => self.counters.backhaul_dropped += 1,
                Some(cid) => {
                    registry.base_station_mut(sid)?.state.network.wired.consume(payload.bytes);
                    let controller = registry.controller_mut(cid)?;
                    controller.state.network.wired.consume(payload.bytes);
                    controller.receive_ingest(payload);
                    self.counters.backhaul_delivered += 1;
                }
            }
        }
        Ok(())
    }

    /// Downlink: take each controller's per-station responses and deliver
    /// them back over the wired backhaul.
    pub fn downlink_stage(
        &mut self,
        _ctx:     &StageContext,
        registry: &mut DeviceRegistry,
    ) -> OrchestratorResult<()> {
        let controllers: Vec<DeviceId> = self.controllers.iter().copied().collect();
        for cid in controllers {
            let mut responses: Vec<(DeviceId, Payload)> =
                registry.controller_mut(cid)?.take_responses();
            responses.sort_unstable_by_key(|&(id, _)| id);

            for (station, payload) in responses {
                if !self.stations.contains(&station) {
                    return Err(OrchestratorError::UnknownRecipient(station));
                }
                registry.controller_mut(cid)?.state.network.wired.consume(payload.bytes);
                let receiver = registry.base_station_mut(station)?;
                receiver.state.network.wired.consume(payload.bytes);
                receiver.receive_response(payload);
                self.counters.responses_delivered += 1;
            }
        }
        Ok(())
    }
}
