//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `SimTime` counter in
//! whole simulated seconds.  The clock advances in fixed increments of
//! `step_secs`; every schedule lookup, activation window, and link-table
//! bucket is keyed by these integer times, so all time arithmetic is exact
//! (no floating-point drift) and comparisons are O(1).
//!
//! The streaming-ingestion cadence is also expressed in `SimTime`: whenever
//! the clock lands on a multiple of `streaming_interval`, new input data is
//! pulled and the live model refreshed.

use std::fmt;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulated timestamp in seconds since time zero.
///
/// Stored as `u64`: at one-second resolution a u64 lasts ~585 billion years,
/// far longer than any conceivable run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Return the time `secs` seconds after `self`.
    #[inline]
    pub fn offset(self, secs: u64) -> SimTime {
        SimTime(self.0 + secs)
    }

    /// Seconds elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0 - earlier.0
    }

    /// `true` if `self` lands exactly on a multiple of `interval`.
    #[inline]
    pub fn is_multiple_of(self, interval: u64) -> bool {
        interval != 0 && self.0 % interval == 0
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Drives simulated time from `start` to `end` in fixed `step_secs` increments.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current simulated time — advanced by [`SimClock::advance`].
    pub current: SimTime,
    /// Simulated seconds per step.
    pub step_secs: u64,
    /// End of the run (exclusive: the tick at `end` is not executed).
    pub end: SimTime,
}

impl SimClock {
    pub fn new(start: SimTime, step_secs: u64, end: SimTime) -> Self {
        Self { current: start, step_secs, end }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current = SimTime(self.current.0 + self.step_secs);
    }

    /// `true` once the clock has reached or passed the end of the run.
    #[inline]
    pub fn finished(&self) -> bool {
        self.current >= self.end
    }

    /// `true` if the current time lands on a streaming-refresh boundary.
    #[inline]
    pub fn is_streaming_boundary(&self, interval: u64) -> bool {
        self.current.is_multiple_of(interval)
    }

    /// Total steps remaining from the current position.
    pub fn steps_remaining(&self) -> u64 {
        if self.finished() {
            0
        } else {
            (self.end.0 - self.current.0).div_ceil(self.step_secs)
        }
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (step {}s, ends {})", self.current, self.step_secs, self.end)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to `SimBuilder`; the core never parses configuration files itself.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated time of the first tick.
    pub start_time: SimTime,

    /// End of the run (exclusive).
    pub end_time: SimTime,

    /// Simulated seconds per tick.
    pub step_secs: u64,

    /// Cadence (in simulated seconds) at which streaming ingestion pulls new
    /// input data and refreshes the live model.  Must be a positive multiple
    /// of `step_secs` so refresh boundaries always coincide with ticks.
    pub streaming_interval: u64,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,
}

impl SimConfig {
    /// Validate the configuration's internal consistency.
    pub fn validate(&self) -> Result<(), crate::VenError> {
        if self.step_secs == 0 {
            return Err(crate::VenError::Config("step_secs must be > 0".into()));
        }
        if self.end_time <= self.start_time {
            return Err(crate::VenError::Config(format!(
                "end_time {} must be after start_time {}",
                self.end_time, self.start_time
            )));
        }
        if self.streaming_interval == 0 || self.streaming_interval % self.step_secs != 0 {
            return Err(crate::VenError::Config(format!(
                "streaming_interval {} must be a positive multiple of step_secs {}",
                self.streaming_interval, self.step_secs
            )));
        }
        Ok(())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_time, self.step_secs, self.end_time)
    }
}
