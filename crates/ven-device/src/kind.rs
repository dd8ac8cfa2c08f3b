//! The closed set of device categories.

use std::fmt;

/// Category tag for every simulated device.
///
/// The set is closed on purpose: the scheduler buckets its registry by this
/// tag and the stage pipeline names each variant explicitly, so an open
/// trait-object hierarchy would buy nothing but dynamic dispatch.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceKind {
    Vehicle,
    BaseStation,
    Controller,
    RoadsideUnit,
}

impl DeviceKind {
    /// All kinds, in uplink pipeline order (data source first).
    pub const ALL: [DeviceKind; 4] = [
        DeviceKind::Vehicle,
        DeviceKind::RoadsideUnit,
        DeviceKind::BaseStation,
        DeviceKind::Controller,
    ];

    /// Short lowercase name used in output rows and error messages.
    pub fn name(self) -> &'static str {
        match self {
            DeviceKind::Vehicle      => "vehicle",
            DeviceKind::BaseStation  => "base_station",
            DeviceKind::Controller   => "controller",
            DeviceKind::RoadsideUnit => "roadside_unit",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
