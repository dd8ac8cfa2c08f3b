//! Device construction from per-kind model configuration.

use rustc_hash::FxHashMap;

use ven_core::{ComputeHardware, DeviceId, GeoPosition, NetworkHardware};

use crate::activation::ActivationWindow;
use crate::device::{BaseStation, Controller, Device, DeviceState, RoadsideUnit, Vehicle};
use crate::error::{DeviceError, DeviceResult};
use crate::kind::DeviceKind;
use crate::strategy::{AggregateComposer, Compression, MobilityModel, SensorComposer, TraceMobility};

// ── Model configuration ───────────────────────────────────────────────────────

/// Per-kind model weights.  One struct covers all four kinds; fields that a
/// kind does not use are simply ignored by its constructor.
#[derive(Clone, Debug)]
pub struct DeviceModelConfig {
    /// Sensor data rate in bytes per simulated second (vehicles).
    pub data_rate_bps: f64,
    /// Sidelink volume as a fraction of the uplink payload (vehicles, RSUs).
    pub sidelink_fraction: f64,
    /// Compression factor applied by the kind's simplifier.
    pub compression_factor: f64,
    /// Fixed framing overhead added per aggregation (stations, RSUs).
    pub aggregation_overhead_bytes: f64,
    /// Response volume as a fraction of the request (controllers).
    pub response_factor: f64,

    // Hardware capacities.
    pub cpu_capacity:      f64,
    pub gpu_capacity:      f64,
    pub memory_capacity:   f64,
    pub battery_capacity:  f64,
    pub storage_capacity:  f64,
    pub wireless_capacity: f64,
    pub wired_capacity:    f64,
}

impl DeviceModelConfig {
    fn compute(&self) -> ComputeHardware {
        ComputeHardware::new(
            self.cpu_capacity,
            self.gpu_capacity,
            self.memory_capacity,
            self.battery_capacity,
            self.storage_capacity,
        )
    }

    fn network(&self) -> NetworkHardware {
        NetworkHardware::new(self.wireless_capacity, self.wired_capacity)
    }
}

// ── Factory ───────────────────────────────────────────────────────────────────

/// Constructs devices from streamed trace identities.
///
/// The core calls this through the trait only; applications may substitute
/// their own factory to inject custom mobility or composition strategies.
pub trait DeviceFactory {
    fn create(
        &self,
        id:       DeviceId,
        kind:     DeviceKind,
        window:   ActivationWindow,
        position: Option<GeoPosition>,
    ) -> DeviceResult<Device>;
}

/// The stock factory: trace-driven vehicles, stationary infrastructure,
/// strategies parameterized by [`DeviceModelConfig`].
pub struct StandardFactory {
    models: FxHashMap<DeviceKind, DeviceModelConfig>,
}

impl StandardFactory {
    pub fn new(models: FxHashMap<DeviceKind, DeviceModelConfig>) -> Self {
        Self { models }
    }

    /// Config for `kind`, or the fail-fast missing-model error.
    fn model(&self, kind: DeviceKind) -> DeviceResult<&DeviceModelConfig> {
        self.models.get(&kind).ok_or(DeviceError::MissingModel(kind))
    }
}

impl DeviceFactory for StandardFactory {
    fn create(
        &self,
        id:       DeviceId,
        kind:     DeviceKind,
        window:   ActivationWindow,
        position: Option<GeoPosition>,
    ) -> DeviceResult<Device> {
        let cfg = self.model(kind)?;
        let mut state = DeviceState::new(id, kind, window, cfg.compute(), cfg.network());
        state.position = position;

        let device = match kind {
            DeviceKind::Vehicle => {
                let mut mobility = TraceMobility::new();
                if let Some(pos) = position {
                    mobility.extend(&[(ven_core::SimTime::ZERO, pos)]);
                }
                Device::Vehicle(Vehicle::new(
                    state,
                    Box::new(mobility),
                    Box::new(SensorComposer::new(cfg.data_rate_bps)),
                    Box::new(Compression::new(cfg.compression_factor)),
                    cfg.sidelink_fraction,
                ))
            }
            DeviceKind::BaseStation => Device::BaseStation(BaseStation::new(
                state,
                Box::new(AggregateComposer::new(cfg.aggregation_overhead_bytes)),
                Box::new(Compression::new(cfg.compression_factor)),
            )),
            DeviceKind::Controller => Device::Controller(Controller::new(state, cfg.response_factor)),
            DeviceKind::RoadsideUnit => Device::Roadside(RoadsideUnit::new(
                state,
                Box::new(AggregateComposer::new(cfg.aggregation_overhead_bytes)),
                Box::new(Compression::new(cfg.compression_factor)),
                cfg.sidelink_fraction,
            )),
        };
        Ok(device)
    }
}

// ── Test/default helpers ──────────────────────────────────────────────────────

impl Default for DeviceModelConfig {
    /// Modest defaults useful for tests and quick-start setups.
    fn default() -> Self {
        Self {
            data_rate_bps:              1_000.0,
            sidelink_fraction:          0.1,
            compression_factor:         2.0,
            aggregation_overhead_bytes: 64.0,
            response_factor:            0.05,
            cpu_capacity:               1e9,
            gpu_capacity:               1e9,
            memory_capacity:            1e9,
            battery_capacity:           1e9,
            storage_capacity:           1e9,
            wireless_capacity:          1e9,
            wired_capacity:             1e9,
        }
    }
}

impl StandardFactory {
    /// A factory with [`DeviceModelConfig::default`] for every kind.
    pub fn with_defaults() -> Self {
        let models = DeviceKind::ALL
            .into_iter()
            .map(|k| (k, DeviceModelConfig::default()))
            .collect();
        Self::new(models)
    }
}
