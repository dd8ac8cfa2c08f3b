//! The `Sim` struct and its tick loop.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use rustc_hash::FxHashMap;

use ven_core::{DeviceId, SimClock, SimConfig, SimTime};
use ven_device::{ActivationWindow, DeviceFactory, DeviceKind, DeviceRegistry, StageContext};
use ven_ingest::{RefreshBatch, StreamSet, TraceRow};
use ven_link::LinkKind;
use ven_orchestrate::{CloudOrchestrator, DeliveryCounters, EdgeOrchestrator};

use crate::error::SimResult;
use crate::lifecycle::ActivationClock;
use crate::observer::{SimObserver, TickStats};
use crate::scheduler::OrderedMultiStageScheduler;

/// The main simulation runner.
///
/// Holds the whole model — device population, scheduler, orchestrators,
/// activation clock, and streaming sources — and drives it tick by tick.
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<F: DeviceFactory> {
    /// Global configuration (times, streaming interval, seed).
    pub config: SimConfig,

    /// Simulation clock — the single source of "now".
    pub clock: SimClock,

    /// The full device population, active or not.
    pub registry: DeviceRegistry,

    /// Edge layer: vehicle↔station/RSU binding and sidelink relay.
    pub edge: EdgeOrchestrator,

    /// Cloud layer: station→controller backhaul.
    pub cloud: CloudOrchestrator,

    pub(crate) scheduler: OrderedMultiStageScheduler,
    pub(crate) lifecycle: ActivationClock,
    pub(crate) streams:   StreamSet,
    pub(crate) factory:   F,

    /// Activation windows streamed for devices that have not yet appeared
    /// in any trace.  Consumed when the device is materialized; windows
    /// arriving after construction are ignored (a window is immutable once
    /// built).
    pub(crate) pending_windows: FxHashMap<DeviceId, Vec<(SimTime, SimTime)>>,
}

impl<F: DeviceFactory> Sim<F> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current time to `config.end_time`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let never_stop = AtomicBool::new(false);
        self.run_until(observer, &never_stop)
    }

    /// Like [`run`](Self::run), but checks `stop` at every tick boundary
    /// and returns early once it is set — cooperative cancellation for
    /// long runs driven from another thread.
    pub fn run_until<O: SimObserver>(
        &mut self,
        observer: &mut O,
        stop:     &AtomicBool,
    ) -> SimResult<()> {
        while !self.clock.finished() && !stop.load(Ordering::Relaxed) {
            self.process_tick(observer)?;

            self.clock.advance();
            if !self.clock.finished()
                && self.clock.is_streaming_boundary(self.config.streaming_interval)
            {
                self.refresh(observer)?;
            }
        }
        observer.on_sim_end(self.clock.current, &self.registry);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores the end
    /// time).  Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.process_tick(observer)?;
            self.clock.advance();
            if self.clock.is_streaming_boundary(self.config.streaming_interval) {
                self.refresh(observer)?;
            }
        }
        Ok(())
    }

    /// Number of currently active devices of `kind`.
    pub fn active_count(&self, kind: DeviceKind) -> usize {
        self.scheduler.active_count(kind)
    }

    /// `true` if `id` is currently registered for scheduling.
    pub fn is_scheduled(&self, id: DeviceId, kind: DeviceKind) -> bool {
        self.scheduler.is_registered(kind, id)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current;
        observer.on_tick_start(now);

        // ── Phase ①: lifecycle transitions ────────────────────────────────
        self.lifecycle.apply(
            now,
            &mut self.registry,
            &mut self.scheduler,
            &mut self.edge,
            &mut self.cloud,
        )?;

        // ── Phases ② + ③: the ordered stage pipeline ─────────────────────
        let ctx = StageContext::new(now, self.clock.step_secs);
        self.scheduler
            .step(&ctx, &mut self.registry, &mut self.edge, &mut self.cloud)?;

        // ── Tick summary ──────────────────────────────────────────────────
        let mut delivery = DeliveryCounters::default();
        delivery.merge(self.edge.drain_counters());
        delivery.merge(self.cloud.drain_counters());
        let stats = TickStats {
            active_vehicles:    self.scheduler.active_count(DeviceKind::Vehicle),
            active_stations:    self.scheduler.active_count(DeviceKind::BaseStation),
            active_controllers: self.scheduler.active_count(DeviceKind::Controller),
            active_roadside:    self.scheduler.active_count(DeviceKind::RoadsideUnit),
            delivery,
        };
        observer.on_tick_end(now, &stats);
        Ok(())
    }

    // ── Streaming refresh ─────────────────────────────────────────────────

    /// Pull the next data horizon and fold it into the live model.
    ///
    /// Runs synchronously between ticks; the next `step()` only ever sees a
    /// fully applied refresh.
    pub(crate) fn refresh<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current;
        let until = now.offset(self.config.streaming_interval);
        let batch = self.streams.poll(until)?;
        self.apply_refresh(batch)?;
        observer.on_refresh(now, until);
        Ok(())
    }

    pub(crate) fn apply_refresh(&mut self, batch: RefreshBatch) -> SimResult<()> {
        // ① Stash streamed activation windows so that devices materialized
        //   from this same batch's traces pick them up.
        for (_, rows) in &batch.activations {
            for row in rows {
                self.pending_windows
                    .entry(row.device())
                    .or_default()
                    .push(row.pair());
            }
        }

        // ② Traces: materialize unseen devices, extend known ones.
        for (kind, rows) in &batch.traces {
            self.apply_traces(*kind, rows)?;
        }

        // ③ Links: feed the orchestrators' tables.
        for (kind, rows) in &batch.links {
            let updates = rows.iter().map(|r| r.to_update());
            match kind {
                LinkKind::V2B => self.edge.update_v2b_links(updates),
                LinkKind::V2V => self.edge.update_v2v_links(updates),
                LinkKind::V2R => self.edge.update_v2r_links(updates),
                LinkKind::R2B => self.edge.update_r2b_links(updates),
                LinkKind::R2R => self.edge.update_r2r_links(updates),
                LinkKind::B2C => {
                    let rows: Vec<_> = updates.collect();
                    self.cloud.update_b2c_links(&rows);
                }
            }
        }

        Ok(())
    }

    fn apply_traces(&mut self, kind: DeviceKind, rows: &[TraceRow]) -> SimResult<()> {
        // Group samples per device, ordered by id for deterministic
        // construction order.
        let mut by_device: BTreeMap<DeviceId, Vec<(SimTime, ven_core::GeoPosition)>> =
            BTreeMap::new();
        for row in rows {
            by_device.entry(row.device()).or_default().push(row.sample());
        }

        for (id, samples) in by_device {
            if self.registry.contains(id) {
                // Later rows for a known device append mobility data; the
                // same id surfacing under a different kind means the trace
                // files reintroduced it, which is fatal.
                if self.registry.get(id)?.kind() != kind {
                    return Err(ven_device::DeviceError::DuplicateDevice(id).into());
                }
                self.registry.push_trace(id, &samples)?;
                continue;
            }

            // A previously unseen device: build its window from streamed
            // activation rows, defaulting to always-on.  The lower clip
            // bound is the *current* time, not sim start — an enable time
            // that already passed could otherwise never fire.
            let horizon = self.clock.current;
            let window = match self.pending_windows.remove(&id) {
                Some(pairs) => ActivationWindow::new(pairs, horizon, self.config.end_time),
                None => ActivationWindow::always_on(horizon, self.config.end_time),
            };

            let position = samples.first().map(|&(_, p)| p);
            let device = self.factory.create(id, kind, window, position)?;
            // Permanently inactive devices are still constructed (they stay
            // addressable) but contribute no transitions.
            self.lifecycle.track_device(&device);
            self.registry.insert(device)?;
            self.registry.push_trace(id, &samples)?;
        }
        Ok(())
    }
}
