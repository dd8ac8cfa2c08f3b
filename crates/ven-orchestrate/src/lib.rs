//! `ven-orchestrate` — the two orchestration layers between device stages.
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`edge`]    | `EdgeOrchestrator` — vehicle↔station/RSU binding, sidelink |
//! | [`cloud`]   | `CloudOrchestrator` — static station→controller backhaul   |
//! | [`counters`]| `DeliveryCounters` — delivered/dropped telemetry           |
//!
//! Both orchestrators are scheduled participants: the scheduler invokes
//! their uplink stage between the populations they bridge (after vehicles
//! and roadside units, before base stations; after base stations, before
//! controllers) and their downlink stage at the mirrored position.
//!
//! Dropped payloads are telemetry, not errors: sparse connectivity is a
//! modeled operating condition, and the counters keep it distinguishable
//! from a true fault.

pub mod cloud;
pub mod counters;
pub mod edge;
pub mod error;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cloud::CloudOrchestrator;
pub use counters::DeliveryCounters;
pub use edge::{EdgeConfig, EdgeOrchestrator};
pub use error::{OrchestratorError, OrchestratorResult};
