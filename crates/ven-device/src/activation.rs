//! `ActivationWindow` — per-device enable/disable time intervals.
//!
//! # Window model
//!
//! A device carries an ordered list of `(enable, disable)` pairs clipped to
//! the simulation bounds at construction.  A device is eligible for
//! scheduling during `[enable, disable)`: the activation clock activates it
//! at `enable` (before any stage of that tick runs) and deactivates it at
//! `disable` (again before the tick's stages), so the disable tick itself is
//! never scheduled.
//!
//! The pair list is immutable after construction; the only mutable state is
//! an internal cursor advanced exactly once per activate/deactivate cycle,
//! which is what allows a device to come and go several times over one run.

use ven_core::{DeviceId, SimTime};

use crate::error::DeviceError;

/// Ordered, clipped enable/disable intervals plus the lifecycle cursor.
#[derive(Clone, Debug)]
pub struct ActivationWindow {
    enables:  Vec<SimTime>,
    disables: Vec<SimTime>,
    /// Index of the pair the device is currently in (if active) or will
    /// enter next (if inactive).  `cursor == enables.len()` means exhausted.
    cursor:   usize,
    active:   bool,
}

impl ActivationWindow {
    /// Build a window list from raw `(enable, disable)` pairs, clipping to
    /// `[sim_start, sim_end]` and dropping pairs entirely outside the run.
    ///
    /// Pairs are sorted by enable time; a pair whose clipped `enable` would
    /// exceed its clipped `disable` is dropped.
    pub fn new(pairs: Vec<(SimTime, SimTime)>, sim_start: SimTime, sim_end: SimTime) -> Self {
        let mut clipped: Vec<(SimTime, SimTime)> = pairs
            .into_iter()
            .filter(|&(enable, disable)| enable <= disable)
            .filter(|&(enable, disable)| disable >= sim_start && enable <= sim_end)
            .map(|(enable, disable)| (enable.max(sim_start), disable.min(sim_end)))
            .collect();
        clipped.sort_unstable_by_key(|&(enable, _)| enable);

        debug_assert!(
            clipped.windows(2).all(|w| w[0].1 <= w[1].0),
            "activation windows must not overlap"
        );

        let (enables, disables) = clipped.into_iter().unzip();
        Self { enables, disables, cursor: 0, active: false }
    }

    /// A single window spanning the whole run — base stations, controllers,
    /// and any device the input data carries no activation rows for.
    pub fn always_on(sim_start: SimTime, sim_end: SimTime) -> Self {
        Self::new(vec![(sim_start, sim_end)], sim_start, sim_end)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if no windows survived clipping — the device is permanently
    /// inactive and must never be registered with the scheduler.
    pub fn is_empty(&self) -> bool {
        self.enables.is_empty()
    }

    /// `true` while the device is between its current enable and disable.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `true` once every window has been passed through.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.enables.len()
    }

    /// The time at which the device must next activate, if it is currently
    /// inactive and has windows left.
    pub fn next_enable(&self) -> Option<SimTime> {
        if self.active || self.is_exhausted() {
            None
        } else {
            Some(self.enables[self.cursor])
        }
    }

    /// The time at which the device must next deactivate, if it is active.
    pub fn next_disable(&self) -> Option<SimTime> {
        if self.active {
            Some(self.disables[self.cursor])
        } else {
            None
        }
    }

    /// `true` if `t` falls inside any window's scheduled span `[enable, disable)`.
    pub fn contains(&self, t: SimTime) -> bool {
        self.enables
            .iter()
            .zip(&self.disables)
            .any(|(&enable, &disable)| enable <= t && t < disable)
    }

    /// All `(enable, disable)` pairs, in order.  Used by the activation
    /// clock to precompute its time → device-id maps.
    pub fn pairs(&self) -> impl Iterator<Item = (SimTime, SimTime)> + '_ {
        self.enables.iter().copied().zip(self.disables.iter().copied())
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Transition Inactive → Active.
    ///
    /// Fails unless `t` is exactly the current enable time: any mismatch
    /// means the activation maps and this window disagree, which is a bug in
    /// map construction and treated as fatal by the caller.
    pub fn activate(&mut self, device: DeviceId, t: SimTime) -> Result<(), DeviceError> {
        match self.next_enable() {
            Some(enable) if enable == t => {
                self.active = true;
                Ok(())
            }
            expected => Err(DeviceError::WrongActivationTime { device, at: t, expected }),
        }
    }

    /// Transition Active → Inactive and advance the cursor to the next pair.
    pub fn deactivate(&mut self, device: DeviceId, t: SimTime) -> Result<(), DeviceError> {
        match self.next_disable() {
            Some(disable) if disable == t => {
                self.active = false;
                self.cursor += 1;
                Ok(())
            }
            expected => Err(DeviceError::WrongDeactivationTime { device, at: t, expected }),
        }
    }
}
