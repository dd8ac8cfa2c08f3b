//! Stage context passed explicitly into every stage call.
//!
//! Devices hold no back-reference to the model; everything a stage needs
//! beyond the device's own state arrives through this struct, which keeps
//! stage methods pure given their inputs.

use ven_core::SimTime;

/// Per-tick context shared by every device and orchestrator stage.
#[derive(Copy, Clone, Debug)]
pub struct StageContext {
    /// Current simulated time.
    pub now: SimTime,
    /// Simulated seconds per tick.
    pub step_secs: u64,
}

impl StageContext {
    #[inline]
    pub fn new(now: SimTime, step_secs: u64) -> Self {
        Self { now, step_secs }
    }
}
