//! Fluent builder for constructing a [`Sim`].

use rustc_hash::FxHashMap;

use ven_core::{DeviceId, SimConfig, SimRng, SimTime};
use ven_device::{ActivationWindow, DeviceFactory, DeviceKind};
use ven_ingest::StreamSet;
use ven_link::AllocatorStrategy;
use ven_orchestrate::{CloudOrchestrator, EdgeConfig, EdgeOrchestrator};

use crate::error::SimResult;
use crate::lifecycle::ActivationClock;
use crate::observer::NoopObserver;
use crate::scheduler::OrderedMultiStageScheduler;
use crate::sim::Sim;
use crate::stage::pipeline_entries;

/// Fluent builder for [`Sim<F>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — times, streaming interval, seed
/// - `F: DeviceFactory` — how streamed trace identities become devices
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                               |
/// |---------------------------|---------------------------------------|
/// | `.streams(s)`             | No input sources                      |
/// | `.allocator(name)`        | `"nearest"`                           |
/// | `.sidelink(name, n)`      | `"nearest"`, n = 1                    |
/// | `.with_device(id, kind, …)` | No pre-registered devices           |
///
/// Strategy names are parsed (and rejected) here, at build time — a
/// misconfigured run never starts.  `build()` also performs the initial
/// streaming refresh covering `[start, start + streaming_interval)`.
pub struct SimBuilder<F: DeviceFactory> {
    config:    SimConfig,
    factory:   F,
    streams:   StreamSet,
    allocator: String,
    sidelink:  String,
    sidelink_n: usize,
    devices:   Vec<(DeviceId, DeviceKind, Option<Vec<(SimTime, SimTime)>>)>,
}

impl<F: DeviceFactory> SimBuilder<F> {
    pub fn new(config: SimConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            streams:    StreamSet::new(),
            allocator:  "nearest".to_owned(),
            sidelink:   "nearest".to_owned(),
            sidelink_n: 1,
            devices:    Vec::new(),
        }
    }

    /// Supply the run's input sources.
    pub fn streams(mut self, streams: StreamSet) -> Self {
        self.streams = streams;
        self
    }

    /// Access-allocation strategy name (`"nearest"` or `"random"`).
    pub fn allocator(mut self, name: &str) -> Self {
        self.allocator = name.to_owned();
        self
    }

    /// Sidelink strategy name and neighbor count.
    pub fn sidelink(mut self, name: &str, n: usize) -> Self {
        self.sidelink = name.to_owned();
        self.sidelink_n = n;
        self
    }

    /// Pre-register a device at build time (typically infrastructure that
    /// is not streamed).  `windows` of `None` means always-on for the run.
    pub fn with_device(
        mut self,
        id:      DeviceId,
        kind:    DeviceKind,
        windows: Option<Vec<(SimTime, SimTime)>>,
    ) -> Self {
        self.devices.push((id, kind, windows));
        self
    }

    /// Validate the configuration, wire the model, and perform the initial
    /// streaming refresh.
    pub fn build(self) -> SimResult<Sim<F>> {
        self.config.validate()?;

        let edge_config = EdgeConfig {
            allocator:  AllocatorStrategy::parse(&self.allocator)?,
            sidelink:   AllocatorStrategy::parse(&self.sidelink)?,
            sidelink_n: self.sidelink_n,
        };

        let scheduler =
            OrderedMultiStageScheduler::new(pipeline_entries(), SimRng::new(self.config.seed));

        let mut sim = Sim {
            clock:           self.config.make_clock(),
            registry:        ven_device::DeviceRegistry::new(),
            edge:            EdgeOrchestrator::new(edge_config),
            cloud:           CloudOrchestrator::new(),
            scheduler,
            lifecycle:       ActivationClock::new(),
            streams:         self.streams,
            factory:         self.factory,
            pending_windows: FxHashMap::default(),
            config:          self.config,
        };

        // ── Pre-registered devices ────────────────────────────────────────
        for (id, kind, windows) in self.devices {
            let window = match windows {
                Some(pairs) => {
                    ActivationWindow::new(pairs, sim.config.start_time, sim.config.end_time)
                }
                None => ActivationWindow::always_on(sim.config.start_time, sim.config.end_time),
            };
            let device = sim.factory.create(id, kind, window, None)?;
            sim.lifecycle.track_device(&device);
            sim.registry.insert(device)?;
        }

        // ── Initial refresh: the first streaming horizon ──────────────────
        sim.refresh(&mut NoopObserver)?;

        Ok(sim)
    }
}
