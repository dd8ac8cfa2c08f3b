//! `ven-device` — the simulated device population.
//!
//! # What lives here
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`activation`] | `ActivationWindow` — the enable/disable lifecycle machine |
//! | [`kind`]       | `DeviceKind` — the closed set of device categories        |
//! | [`strategy`]   | Mobility / composer / simplifier traits and stock impls   |
//! | [`device`]     | The four device variants and the `Device` dispatch enum   |
//! | [`context`]    | `StageContext` passed into every stage call               |
//! | [`registry`]   | `DeviceRegistry` — id-keyed storage with typed accessors  |
//! | [`factory`]    | `DeviceFactory` trait and `StandardFactory`               |
//!
//! # Lifecycle invariant
//!
//! A device is constructed inactive, transitions Active/Inactive only when
//! the activation clock drives its window, and is never destroyed mid-run.
//! Stage methods must never be invoked while the device is inactive — the
//! scheduler's registry membership enforces this.

pub mod activation;
pub mod context;
pub mod device;
pub mod error;
pub mod factory;
pub mod kind;
pub mod registry;
pub mod strategy;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use activation::ActivationWindow;
pub use context::StageContext;
pub use device::{
    BaseStation, Controller, Device, DeviceCounters, DeviceState, RoadsideUnit, Stageable, Vehicle,
};
pub use error::{DeviceError, DeviceResult};
pub use factory::{DeviceFactory, DeviceModelConfig, StandardFactory};
pub use kind::DeviceKind;
pub use registry::DeviceRegistry;
pub use strategy::{
    AggregateComposer, Compression, DataComposer, DataSimplifier, MobilityModel, NoSimplify,
    SensorComposer, Stationary, TraceMobility,
};
