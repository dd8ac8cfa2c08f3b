//! The closed set of link-table kinds streamed from input files.

use std::fmt;

/// Which connectivity table a streamed link row feeds.
///
/// Naming follows the trace-file convention: `v` vehicle, `b` base station,
/// `r` roadside unit, `c` controller.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum LinkKind {
    /// Vehicle → base station (access binding).
    V2B,
    /// Vehicle → vehicle (sidelink neighbors).
    V2V,
    /// Vehicle → roadside unit (access fallback).
    V2R,
    /// Roadside unit → base station (relay backhaul).
    R2B,
    /// Roadside unit → roadside unit (sidelink neighbors).
    R2R,
    /// Base station → controller (static backhaul binding).
    B2C,
}

impl LinkKind {
    pub const ALL: [LinkKind; 6] = [
        LinkKind::V2B,
        LinkKind::V2V,
        LinkKind::V2R,
        LinkKind::R2B,
        LinkKind::R2R,
        LinkKind::B2C,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LinkKind::V2B => "v2b",
            LinkKind::V2V => "v2v",
            LinkKind::V2R => "v2r",
            LinkKind::R2B => "r2b",
            LinkKind::R2R => "r2r",
            LinkKind::B2C => "b2c",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
