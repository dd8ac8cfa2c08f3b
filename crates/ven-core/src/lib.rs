//! `ven-core` — foundational types for the `rust_ven` vehicular edge-network
//! simulator.
//!
//! This crate is a dependency of every other `ven-*` crate.  It intentionally
//! has no `ven-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                            |
//! |---------------|-----------------------------------------------------|
//! | [`ids`]       | `DeviceId`                                          |
//! | [`geo`]       | `GeoPosition`, haversine distance                   |
//! | [`time`]      | `SimTime`, `SimClock`, `SimConfig`                  |
//! | [`rng`]       | `SimRng` (seeded, injected into the scheduler)      |
//! | [`payload`]   | `Payload`                                           |
//! | [`resources`] | `ResourceLedger`, compute/network hardware bundles  |
//! | [`error`]     | `VenError`, `VenResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod geo;
pub mod ids;
pub mod payload;
pub mod resources;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{VenError, VenResult};
pub use geo::GeoPosition;
pub use ids::DeviceId;
pub use payload::Payload;
pub use resources::{ComputeHardware, NetworkHardware, ResourceLedger};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, SimTime};
