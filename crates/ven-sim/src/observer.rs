//! Simulation observer trait for progress reporting and data collection.

use ven_core::SimTime;
use ven_device::{DeviceKind, DeviceRegistry};
use ven_orchestrate::DeliveryCounters;

/// Per-tick summary handed to observers after the stages ran.
#[derive(Copy, Clone, Debug, Default)]
pub struct TickStats {
    pub active_vehicles:   usize,
    pub active_stations:   usize,
    pub active_controllers: usize,
    pub active_roadside:   usize,
    /// Merged edge + cloud delivery counters for this tick.
    pub delivery: DeliveryCounters,
}

impl TickStats {
    pub fn active_of(&self, kind: DeviceKind) -> usize {
        match kind {
            DeviceKind::Vehicle      => self.active_vehicles,
            DeviceKind::BaseStation  => self.active_stations,
            DeviceKind::Controller   => self.active_controllers,
            DeviceKind::RoadsideUnit => self.active_roadside,
        }
    }
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Progress printing, logging, and output
/// collection all hang off this trait rather than living inside the core.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { every: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, now: SimTime, stats: &TickStats) {
///         if now.0 % self.every == 0 {
///             println!("{now}: {} vehicles active", stats.active_vehicles);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before lifecycle transitions.
    fn on_tick_start(&mut self, _now: SimTime) {}

    /// Called at the end of each tick with that tick's summary.
    fn on_tick_end(&mut self, _now: SimTime, _stats: &TickStats) {}

    /// Called after each streaming refresh completed, with the horizon it
    /// pulled data for.
    fn on_refresh(&mut self, _now: SimTime, _until: SimTime) {}

    /// Called once after the final tick, with read access to the full
    /// device population for end-of-run reporting.
    fn on_sim_end(&mut self, _final_time: SimTime, _registry: &DeviceRegistry) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run`
/// but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
