//! Strongly typed device identifier.
//!
//! Every simulated device — vehicle, base station, controller, or roadside
//! unit — draws its id from one shared integer namespace, because the link
//! tables streamed from trace files reference sources and targets across
//! device categories.  The id alone therefore never implies a category; pair
//! it with a `DeviceKind` where the distinction matters.

use std::fmt;

/// Identifier of one simulated device.
///
/// `Copy + Ord + Hash` so it can be used as a map key and sorted collection
/// element without ceremony.  The inner integer is `pub` for direct use in
/// test fixtures and row decoding.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceId(pub u32);

impl DeviceId {
    /// Sentinel meaning "no valid device" — equivalent to `u32::MAX`.
    pub const INVALID: DeviceId = DeviceId(u32::MAX);

    /// Cast to `usize` for indexing into dense per-device arrays.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for DeviceId {
    /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl From<DeviceId> for usize {
    #[inline(always)]
    fn from(id: DeviceId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for DeviceId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<DeviceId, Self::Error> {
        u32::try_from(n).map(DeviceId)
    }
}
