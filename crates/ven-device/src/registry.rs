//! `DeviceRegistry` — id-keyed storage for the whole device population.
//!
//! Devices live here for the entire run: constructed at setup or injected by
//! streaming ingestion, toggled Active/Inactive by the activation clock, and
//! only dropped at process teardown.  Inactive devices remain addressable;
//! exclusion from scheduling is the scheduler's membership, not removal from
//! this map.

use rustc_hash::FxHashMap;

use ven_core::{DeviceId, GeoPosition, Payload, SimTime};

use crate::device::{BaseStation, Controller, Device, RoadsideUnit, Vehicle};
use crate::error::{DeviceError, DeviceResult};
use crate::kind::DeviceKind;

/// All devices of one run, keyed by id.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: FxHashMap<DeviceId, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a newly constructed device.
    ///
    /// A duplicate id is fatal: it means either a data error in the trace
    /// files or a bug in incremental ingestion bookkeeping.
    pub fn insert(&mut self, device: Device) -> DeviceResult<()> {
        let id = device.id();
        if self.devices.contains_key(&id) {
            return Err(DeviceError::DuplicateDevice(id));
        }
        self.devices.insert(id, device);
        Ok(())
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.devices.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, id: DeviceId) -> DeviceResult<&Device> {
        self.devices.get(&id).ok_or(DeviceError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: DeviceId) -> DeviceResult<&mut Device> {
        self.devices.get_mut(&id).ok_or(DeviceError::NotFound(id))
    }

    /// Iterate all devices in unspecified order.  Callers needing a
    /// deterministic order must sort the ids themselves.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// All ids of one kind, sorted ascending.
    pub fn ids_of_kind(&self, kind: DeviceKind) -> Vec<DeviceId> {
        let mut ids: Vec<DeviceId> = self
            .devices
            .values()
            .filter(|d| d.kind() == kind)
            .map(|d| d.id())
            .collect();
        ids.sort_unstable();
        ids
    }

    // ── Typed accessors ───────────────────────────────────────────────────
    //
    // A kind mismatch means a routing table pointed a payload at the wrong
    // population — an internal-consistency error, not a data condition.

    pub fn vehicle_mut(&mut self, id: DeviceId) -> DeviceResult<&mut Vehicle> {
        match self.get_mut(id)? {
            Device::Vehicle(v) => Ok(v),
            other => Err(kind_mismatch(id, DeviceKind::Vehicle, other)),
        }
    }

    pub fn base_station_mut(&mut self, id: DeviceId) -> DeviceResult<&mut BaseStation> {
        match self.get_mut(id)? {
            Device::BaseStation(b) => Ok(b),
            other => Err(kind_mismatch(id, DeviceKind::BaseStation, other)),
        }
    }

    pub fn controller_mut(&mut self, id: DeviceId) -> DeviceResult<&mut Controller> {
        match self.get_mut(id)? {
            Device::Controller(c) => Ok(c),
            other => Err(kind_mismatch(id, DeviceKind::Controller, other)),
        }
    }

    pub fn roadside_mut(&mut self, id: DeviceId) -> DeviceResult<&mut RoadsideUnit> {
        match self.get_mut(id)? {
            Device::Roadside(r) => Ok(r),
            other => Err(kind_mismatch(id, DeviceKind::RoadsideUnit, other)),
        }
    }

    // ── Ingestion hooks ───────────────────────────────────────────────────

    /// Append streamed trace waypoints to a vehicle's mobility model; for
    /// stationary kinds the first sample fixes the device position.
    pub fn push_trace(
        &mut self,
        id:      DeviceId,
        samples: &[(SimTime, GeoPosition)],
    ) -> DeviceResult<()> {
        match self.get_mut(id)? {
            Device::Vehicle(v) => v.push_trace(samples),
            other => {
                if other.state().position.is_none() {
                    if let Some(&(_, pos)) = samples.first() {
                        other.state_mut().position = Some(pos);
                    }
                }
            }
        }
        Ok(())
    }

    /// Deliver a downlink payload to a vehicle or roadside unit.
    pub fn deliver_downlink(&mut self, id: DeviceId, payload: Payload) -> DeviceResult<()> {
        match self.get_mut(id)? {
            Device::Vehicle(v)  => v.deliver(payload),
            Device::Roadside(r) => r.deliver(payload),
            other => {
                return Err(kind_mismatch(id, DeviceKind::Vehicle, other));
            }
        }
        Ok(())
    }
}

fn kind_mismatch(id: DeviceId, expected: DeviceKind, found: &Device) -> DeviceError {
    DeviceError::KindMismatch { device: id, expected, found: found.kind() }
}
