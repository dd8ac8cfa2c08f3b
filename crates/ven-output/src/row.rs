//! Plain data row types written by report backends.

use ven_device::Device;
use ven_orchestrate::DeliveryCounters;
use ven_sim::TickStats;

/// Model-level summary of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTickRow {
    pub time: u64,

    pub active_vehicles:    u32,
    pub active_stations:    u32,
    pub active_controllers: u32,
    pub active_roadside:    u32,

    pub uplink_delivered:    u64,
    pub uplink_dropped:      u64,
    pub sidelink_delivered:  u64,
    pub sidelink_dropped:    u64,
    pub backhaul_delivered:  u64,
    pub backhaul_dropped:    u64,
    pub responses_delivered: u64,
}

impl ModelTickRow {
    /// Build a row from the observer-facing tick summary.
    pub fn from_stats(time: u64, stats: &TickStats) -> Self {
        let DeliveryCounters {
            uplink_delivered,
            uplink_dropped,
            sidelink_delivered,
            sidelink_dropped,
            backhaul_delivered,
            backhaul_dropped,
            responses_delivered,
        } = stats.delivery;

        Self {
            time,
            active_vehicles:    stats.active_vehicles as u32,
            active_stations:    stats.active_stations as u32,
            active_controllers: stats.active_controllers as u32,
            active_roadside:    stats.active_roadside as u32,
            uplink_delivered,
            uplink_dropped,
            sidelink_delivered,
            sidelink_dropped,
            backhaul_delivered,
            backhaul_dropped,
            responses_delivered,
        }
    }
}

/// Per-device totals at run completion.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub device_id: u32,
    pub kind:      &'static str,

    pub payloads_up:   u64,
    pub payloads_down: u64,
    pub bytes_up:      f64,
    pub bytes_down:    f64,

    pub wireless_remaining: f64,
    pub wired_remaining:    f64,
    pub battery_remaining:  f64,
    /// `true` if any compute or network ledger was driven past capacity.
    pub overdrawn: bool,
}

impl DeviceRow {
    pub fn from_device(device: &Device) -> Self {
        let state = device.state();
        Self {
            device_id:          state.id.0,
            kind:               state.kind.name(),
            payloads_up:        state.counters.payloads_up,
            payloads_down:      state.counters.payloads_down,
            bytes_up:           state.counters.bytes_up,
            bytes_down:         state.counters.bytes_down,
            wireless_remaining: state.network.wireless.remaining(),
            wired_remaining:    state.network.wired.remaining(),
            battery_remaining:  state.compute.battery.remaining(),
            overdrawn:          state.compute.overdrawn() || state.network.overdrawn(),
        }
    }
}
