//! `OrderedMultiStageScheduler` — the control-flow backbone of every tick.
//!
//! # Ordering guarantees
//!
//! The entry sequence is fixed at construction and walked front to back on
//! every `step()`.  Within one device entry, the active ids are snapshotted
//! (sorted ascending), shuffled with the injected seeded RNG, and staged in
//! that order.  The shuffle exists to avoid incidental ordering bias in
//! aggregation; it never reorders across entries or between phases.
//!
//! # Snapshot visibility
//!
//! The id list is snapshotted before a bucket executes, so a device
//! registered mid-step (by an earlier stage of the same tick) joins the
//! pipeline at the *next* tick, never retroactively within the current
//! bucket.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use ven_core::{DeviceId, SimRng};
use ven_device::{DeviceKind, DeviceRegistry, StageContext};
use ven_orchestrate::{CloudOrchestrator, EdgeOrchestrator};

use crate::error::{SimError, SimResult};
use crate::stage::{StageActor, StagePhase, TypeStageEntry};

pub struct OrderedMultiStageScheduler {
    entries: Vec<TypeStageEntry>,
    /// Live membership: device-kind → set of currently active ids.
    buckets: FxHashMap<DeviceKind, BTreeSet<DeviceId>>,
    /// Seeded RNG for the per-kind shuffle (and the orchestrators' random
    /// allocator picks, which draw from the same stream).
    rng: SimRng,
}

impl OrderedMultiStageScheduler {
    pub fn new(entries: Vec<TypeStageEntry>, rng: SimRng) -> Self {
        let buckets = DeviceKind::ALL
            .into_iter()
            .map(|k| (k, BTreeSet::new()))
            .collect();
        Self { entries, buckets, rng }
    }

    pub fn entries(&self) -> &[TypeStageEntry] {
        &self.entries
    }

    // ── Membership (activation clock only) ────────────────────────────────

    pub fn register(&mut self, kind: DeviceKind, id: DeviceId) -> SimResult<()> {
        if self.buckets.entry(kind).or_default().insert(id) {
            Ok(())
        } else {
            Err(SimError::AlreadyRegistered { device: id, kind })
        }
    }

    pub fn unregister(&mut self, kind: DeviceKind, id: DeviceId) -> SimResult<()> {
        if self.buckets.entry(kind).or_default().remove(&id) {
            Ok(())
        } else {
            Err(SimError::NotRegistered { device: id, kind })
        }
    }

    pub fn is_registered(&self, kind: DeviceKind, id: DeviceId) -> bool {
        self.buckets.get(&kind).is_some_and(|b| b.contains(&id))
    }

    pub fn active_count(&self, kind: DeviceKind) -> usize {
        self.buckets.get(&kind).map_or(0, BTreeSet::len)
    }

    /// Sorted snapshot of one kind's active ids.
    pub fn bucket(&self, kind: DeviceKind) -> Vec<DeviceId> {
        self.buckets
            .get(&kind)
            .map_or_else(Vec::new, |b| b.iter().copied().collect())
    }

    // ── Stage execution ───────────────────────────────────────────────────

    /// Execute every pipeline entry in fixed order for the current tick.
    ///
    /// An empty bucket is a no-op, not an error.
    pub fn step(
        &mut self,
        ctx:      &StageContext,
        registry: &mut DeviceRegistry,
        edge:     &mut EdgeOrchestrator,
        cloud:    &mut CloudOrchestrator,
    ) -> SimResult<()> {
        for i in 0..self.entries.len() {
            let entry = self.entries[i];
            match entry.actor {
                StageActor::Devices(kind) => {
                    let mut ids = self.bucket(kind);
                    self.rng.shuffle(&mut ids);
                    for id in ids {
                        let device = registry.get_mut(id)?;
                        debug_assert!(
                            device.state().window.is_active(),
                            "scheduler staged inactive device {id}"
                        );
                        match entry.phase {
                            StagePhase::Uplink   => device.run_uplink(ctx),
                            StagePhase::Downlink => device.run_downlink(ctx),
                        }
                    }
                }
                StageActor::EdgeOrchestrator => match entry.phase {
                    StagePhase::Uplink   => edge.uplink_stage(ctx, registry, &mut self.rng)?,
                    StagePhase::Downlink => edge.downlink_stage(ctx, registry)?,
                },
                StageActor::CloudOrchestrator => match entry.phase {
                    StagePhase::Uplink   => cloud.uplink_stage(ctx, registry)?,
                    StagePhase::Downlink => cloud.downlink_stage(ctx, registry)?,
                },
            }
        }
        Ok(())
    }
}
