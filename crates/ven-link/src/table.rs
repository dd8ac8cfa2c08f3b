//! `LinkTable` — append-only, time-bucketed connectivity.
//!
//! # Slice semantics
//!
//! Streamed link rows land in the bucket of their own timestamp.  A query at
//! time `t` resolves to the *newest bucket at or before `t`*: connectivity
//! holds until the next streamed update supersedes it.  Before the first
//! bucket the slice is empty — a device with no link data yet simply has no
//! candidates.
//!
//! Buckets are never evicted; total growth is bounded by the simulation
//! length times the streaming cadence, not by anything unbounded.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use ven_core::{DeviceId, SimTime};

/// One ranked candidate: a target device and its distance from the source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkEntry {
    pub target:     DeviceId,
    pub distance_m: f64,
}

/// A streamed link-table row, prior to bucketing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkUpdate {
    pub time:       SimTime,
    pub source:     DeviceId,
    pub target:     DeviceId,
    pub distance_m: f64,
}

/// Time-bucketed `(source → ranked candidates)` connectivity table.
#[derive(Default)]
pub struct LinkTable {
    buckets: BTreeMap<SimTime, FxHashMap<DeviceId, Vec<LinkEntry>>>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge newly streamed rows.  Touched candidate lists are re-sorted by
    /// ascending distance (ties broken by target id for determinism).
    /// An empty batch leaves the table untouched.
    pub fn update(&mut self, rows: impl IntoIterator<Item = LinkUpdate>) {
        let mut touched: Vec<(SimTime, DeviceId)> = Vec::new();

        for row in rows {
            let entries = self
                .buckets
                .entry(row.time)
                .or_default()
                .entry(row.source)
                .or_default();
            entries.push(LinkEntry { target: row.target, distance_m: row.distance_m });
            touched.push((row.time, row.source));
        }

        touched.sort_unstable();
        touched.dedup();
        for (time, source) in touched {
            if let Some(entries) = self.buckets.get_mut(&time).and_then(|b| b.get_mut(&source)) {
                entries.sort_unstable_by(|a, b| {
                    a.distance_m
                        .total_cmp(&b.distance_m)
                        .then(a.target.cmp(&b.target))
                });
            }
        }
    }

    /// The time of the bucket a query at `t` resolves to, if any.
    pub fn bucket_at(&self, t: SimTime) -> Option<SimTime> {
        self.buckets.range(..=t).next_back().map(|(&time, _)| time)
    }

    /// Ranked candidates for `source` at time `t`.  Empty when the source is
    /// unknown to the current slice — the caller treats that as "no
    /// connectivity this tick", not an error.
    pub fn candidates(&self, t: SimTime, source: DeviceId) -> &[LinkEntry] {
        self.bucket_at(t)
            .and_then(|bucket| self.buckets[&bucket].get(&source))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Up to `n` nearest candidates for `source` at `t`.  Returns all of
    /// them when fewer than `n` exist; never pads, never errors.
    pub fn select_n(&self, t: SimTime, source: DeviceId, n: usize) -> &[LinkEntry] {
        let all = self.candidates(t, source);
        &all[..n.min(all.len())]
    }

    /// All source ids present in the slice at `t`, sorted ascending.
    pub fn sources_at(&self, t: SimTime) -> Vec<DeviceId> {
        match self.bucket_at(t) {
            None => Vec::new(),
            Some(bucket) => {
                let mut ids: Vec<DeviceId> = self.buckets[&bucket].keys().copied().collect();
                ids.sort_unstable();
                ids
            }
        }
    }

    /// Number of distinct time buckets held.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
