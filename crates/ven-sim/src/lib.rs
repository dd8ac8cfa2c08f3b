//! `ven-sim` — the simulation core of the rust_ven framework.
//!
//! # Tick anatomy
//!
//! ```text
//! for each tick at time t:
//!   ① Lifecycle — the activation clock activates/deactivates devices whose
//!                 windows transition at t (registering/unregistering them
//!                 with the scheduler and orchestrators).
//!   ② Uplink    — Vehicle → RoadsideUnit → EdgeOrchestrator → BaseStation
//!                 → CloudOrchestrator → Controller, each stage invoked on
//!                 every active device of its kind (order shuffled within
//!                 the kind, never across stages).
//!   ③ Downlink  — the exact mirror of ②.
//!   ④ Advance   — the clock steps forward; if the new time lands on a
//!                 streaming boundary, ingestion pulls the next data
//!                 horizon and refreshes devices, link tables, and the
//!                 activation maps before the next tick begins.
//! ```
//!
//! # Determinism
//!
//! Stage order across kinds is fixed at build time and never mutated.  The
//! only permitted nondeterminism is the per-kind shuffle and the random
//! allocator, both drawing from one seeded RNG injected into the scheduler —
//! the same seed reproduces a run exactly.

pub mod builder;
pub mod error;
pub mod lifecycle;
pub mod observer;
pub mod scheduler;
pub mod sim;
pub mod stage;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use lifecycle::ActivationClock;
pub use observer::{NoopObserver, SimObserver, TickStats};
pub use scheduler::OrderedMultiStageScheduler;
pub use sim::Sim;
pub use stage::{StageActor, StagePhase, TypeStageEntry, pipeline_entries};
