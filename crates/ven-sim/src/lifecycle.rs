//! `ActivationClock` — drives the device lifecycle from precomputed maps.
//!
//! # Map construction
//!
//! For every tracked device, each `(enable, disable)` window pair lands in
//! two per-kind maps: `time → ids to activate` and `time → ids to
//! deactivate`.  The maps are built once at setup and extended incrementally
//! whenever streaming ingestion materializes new devices — never rebuilt
//! from scratch mid-run.
//!
//! # Ordering
//!
//! Activation: `activate` → `scheduler.register` → orchestrator `add`, so a
//! device is fully wired before any stage of the same tick can reference
//! it.  Deactivation mirrors it exactly: orchestrator `remove` →
//! `scheduler.unregister` → `deactivate`, so no stage can observe a
//! half-deactivated device.  Within one tick activations run before
//! deactivations, which lets a degenerate `[t, t]` window pass through
//! without ever being staged.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use ven_core::{DeviceId, SimTime};
use ven_device::{Device, DeviceKind, DeviceRegistry};
use ven_orchestrate::{CloudOrchestrator, EdgeOrchestrator};

use crate::error::SimResult;
use crate::scheduler::OrderedMultiStageScheduler;

type TimeTable = BTreeMap<SimTime, Vec<DeviceId>>;

#[derive(Default)]
pub struct ActivationClock {
    activations:   FxHashMap<DeviceKind, TimeTable>,
    deactivations: FxHashMap<DeviceKind, TimeTable>,
}

impl ActivationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device's windows to the activation/deactivation maps.
    ///
    /// Call exactly once per device, right after construction.  A device
    /// with zero retained windows contributes nothing and will never be
    /// scheduled.
    pub fn track_device(&mut self, device: &Device) {
        let id = device.id();
        let kind = device.kind();
        for (enable, disable) in device.state().window.pairs() {
            self.activations
                .entry(kind)
                .or_default()
                .entry(enable)
                .or_default()
                .push(id);
            self.deactivations
                .entry(kind)
                .or_default()
                .entry(disable)
                .or_default()
                .push(id);
        }
    }

    /// Number of future transition times still pending (both directions).
    pub fn pending_transitions(&self) -> usize {
        self.activations.values().map(BTreeMap::len).sum::<usize>()
            + self.deactivations.values().map(BTreeMap::len).sum::<usize>()
    }

    /// Apply every transition scheduled for `now`.
    ///
    /// Returns `(activated, deactivated)` counts.  Timing mismatches
    /// between these maps and a device's own window are fatal — they mean
    /// the maps were built wrong, not that the data is transiently off.
    pub fn apply(
        &mut self,
        now:       SimTime,
        registry:  &mut DeviceRegistry,
        scheduler: &mut OrderedMultiStageScheduler,
        edge:      &mut EdgeOrchestrator,
        cloud:     &mut CloudOrchestrator,
    ) -> SimResult<(usize, usize)> {
        let mut activated = 0;
        let mut deactivated = 0;

        for kind in DeviceKind::ALL {
            let Some(table) = self.activations.get_mut(&kind) else { continue };
            let Some(mut ids) = table.remove(&now) else { continue };
            ids.sort_unstable();
            for id in ids {
                registry.get_mut(id)?.activate(now)?;
                scheduler.register(kind, id)?;
                edge.add(kind, id);
                cloud.add(kind, id);
                activated += 1;
            }
        }

        for kind in DeviceKind::ALL {
            let Some(table) = self.deactivations.get_mut(&kind) else { continue };
            let Some(mut ids) = table.remove(&now) else { continue };
            ids.sort_unstable();
            for id in ids {
                edge.remove(kind, id)?;
                cloud.remove(kind, id)?;
                scheduler.unregister(kind, id)?;
                registry.get_mut(id)?.deactivate(now)?;
                deactivated += 1;
            }
        }

        Ok((activated, deactivated))
    }
}
