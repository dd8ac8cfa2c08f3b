//! Resource accounting for device hardware.
//!
//! # Overdraft semantics
//!
//! `consume` never clamps and never fails: a ledger is a pure accounting
//! metric, not admission control.  Consumption beyond capacity drives
//! `remaining()` negative and flips `overdrawn()`, which the output layer
//! surfaces per device.  Stages and orchestrators charge ledgers but never
//! branch on them.

/// Tracks consumption against one scalar capacity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceLedger {
    /// Nominal capacity in the resource's own unit (bytes, joules, cycles…).
    pub capacity: f64,
    /// Total amount consumed so far.
    pub consumed: f64,
}

impl ResourceLedger {
    pub fn new(capacity: f64) -> Self {
        Self { capacity, consumed: 0.0 }
    }

    /// Record `amount` of consumption.  Negative remainders are allowed.
    #[inline]
    pub fn consume(&mut self, amount: f64) {
        self.consumed += amount;
    }

    /// Capacity minus consumption; negative once overdrawn.
    #[inline]
    pub fn remaining(&self) -> f64 {
        self.capacity - self.consumed
    }

    /// `true` once consumption has exceeded capacity.
    #[inline]
    pub fn overdrawn(&self) -> bool {
        self.consumed > self.capacity
    }
}

// ── Hardware bundles ──────────────────────────────────────────────────────────

/// Computing hardware of one device.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComputeHardware {
    pub cpu:     ResourceLedger,
    pub gpu:     ResourceLedger,
    pub memory:  ResourceLedger,
    pub battery: ResourceLedger,
    pub storage: ResourceLedger,
}

impl ComputeHardware {
    pub fn new(cpu: f64, gpu: f64, memory: f64, battery: f64, storage: f64) -> Self {
        Self {
            cpu:     ResourceLedger::new(cpu),
            gpu:     ResourceLedger::new(gpu),
            memory:  ResourceLedger::new(memory),
            battery: ResourceLedger::new(battery),
            storage: ResourceLedger::new(storage),
        }
    }

    /// `true` if any component ledger is overdrawn.
    pub fn overdrawn(&self) -> bool {
        self.cpu.overdrawn()
            || self.gpu.overdrawn()
            || self.memory.overdrawn()
            || self.battery.overdrawn()
            || self.storage.overdrawn()
    }
}

/// Network hardware of one device: wireless capacity for the radio access
/// side (vehicle↔station, sidelink) and wired capacity for the backhaul
/// (station↔controller).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkHardware {
    pub wireless: ResourceLedger,
    pub wired:    ResourceLedger,
}

impl NetworkHardware {
    pub fn new(wireless: f64, wired: f64) -> Self {
        Self {
            wireless: ResourceLedger::new(wireless),
            wired:    ResourceLedger::new(wired),
        }
    }

    pub fn overdrawn(&self) -> bool {
        self.wireless.overdrawn() || self.wired.overdrawn()
    }
}
