//! Delivery telemetry shared by both orchestrators.

/// Per-tick delivery counts, drained into the tick report after each step.
///
/// `*_dropped` counts payloads discarded because no candidate target
/// existed at the tick — deliberate degraded-service behavior under sparse
/// connectivity, kept separate from delivered counts so telemetry can tell
/// silence from failure.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DeliveryCounters {
    /// Access-side payloads handed to a base station or roadside unit.
    pub uplink_delivered: u64,
    /// Access-side payloads dropped for lack of any candidate.
    pub uplink_dropped: u64,

    /// Sidelink payloads relayed to a neighbor.
    pub sidelink_delivered: u64,
    /// Sidelink payloads dropped because the neighbor set was empty.
    pub sidelink_dropped: u64,

    /// Backhaul payloads routed station → controller.
    pub backhaul_delivered: u64,
    /// Backhaul payloads dropped because no controller binding existed.
    pub backhaul_dropped: u64,

    /// Responses delivered back to their addressee.
    pub responses_delivered: u64,
}

impl DeliveryCounters {
    /// Take the current counts and reset to zero for the next tick.
    pub fn drain(&mut self) -> DeliveryCounters {
        std::mem::take(self)
    }

    /// Fold another counter set into this one.
    pub fn merge(&mut self, other: DeliveryCounters) {
        self.uplink_delivered    += other.uplink_delivered;
        self.uplink_dropped      += other.uplink_dropped;
        self.sidelink_delivered  += other.sidelink_delivered;
        self.sidelink_dropped    += other.sidelink_dropped;
        self.backhaul_delivered  += other.backhaul_delivered;
        self.backhaul_dropped    += other.backhaul_dropped;
        self.responses_delivered += other.responses_delivered;
    }
}
