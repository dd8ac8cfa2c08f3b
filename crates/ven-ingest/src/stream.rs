//! `StreamSet` — the tracked input sources of one run.

use std::path::Path;

use ven_core::SimTime;
use ven_device::DeviceKind;
use ven_link::LinkKind;

use crate::error::IngestResult;
use crate::row::{ActivationRow, LinkRow, TraceRow};
use crate::source::InputSource;

/// Everything one refresh pulled: typed rows grouped by what they feed.
///
/// The simulation layer applies these in a fixed order — traces to the
/// device factory, links to the orchestrators, activations to the clock —
/// so the batch itself is inert data.
#[derive(Default)]
pub struct RefreshBatch {
    pub traces:      Vec<(DeviceKind, Vec<TraceRow>)>,
    pub links:       Vec<(LinkKind, Vec<LinkRow>)>,
    pub activations: Vec<(DeviceKind, Vec<ActivationRow>)>,
}

impl RefreshBatch {
    /// `true` if the refresh yielded no rows at all.
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(|(_, r)| r.is_empty())
            && self.links.iter().all(|(_, r)| r.is_empty())
            && self.activations.iter().all(|(_, r)| r.is_empty())
    }
}

/// The named input sources of one run.
///
/// Sources are registered at build time (failing fast on unsupported
/// formats) and polled synchronously at every streaming boundary; `poll`
/// runs to completion before the refreshed tables are used, so a tick never
/// observes a partial refresh.
#[derive(Default)]
pub struct StreamSet {
    traces:      Vec<(DeviceKind, InputSource<TraceRow>)>,
    links:       Vec<(LinkKind, InputSource<LinkRow>)>,
    activations: Vec<(DeviceKind, InputSource<ActivationRow>)>,
}

impl StreamSet {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Source registration ───────────────────────────────────────────────

    pub fn add_trace_path(&mut self, kind: DeviceKind, path: &Path) -> IngestResult<()> {
        self.traces.push((kind, InputSource::open(path)?));
        Ok(())
    }

    pub fn add_link_path(&mut self, kind: LinkKind, path: &Path) -> IngestResult<()> {
        self.links.push((kind, InputSource::open(path)?));
        Ok(())
    }

    pub fn add_activation_path(&mut self, kind: DeviceKind, path: &Path) -> IngestResult<()> {
        self.activations.push((kind, InputSource::open(path)?));
        Ok(())
    }

    /// Register an already-opened trace source (tests, in-memory data).
    pub fn add_trace_source(&mut self, kind: DeviceKind, source: InputSource<TraceRow>) {
        self.traces.push((kind, source));
    }

    pub fn add_link_source(&mut self, kind: LinkKind, source: InputSource<LinkRow>) {
        self.links.push((kind, source));
    }

    pub fn add_activation_source(&mut self, kind: DeviceKind, source: InputSource<ActivationRow>) {
        self.activations.push((kind, source));
    }

    /// Number of registered sources across all roles.
    pub fn source_count(&self) -> usize {
        self.traces.len() + self.links.len() + self.activations.len()
    }

    // ── Polling ───────────────────────────────────────────────────────────

    /// Pull the next batch from every tracked source up to `until`.
    ///
    /// Sources are polled in registration order; a failing source aborts
    /// the whole refresh (and the run — ingestion errors are fatal).
    pub fn poll(&mut self, until: SimTime) -> IngestResult<RefreshBatch> {
        let mut batch = RefreshBatch::default();

        for (kind, source) in &mut self.traces {
            batch.traces.push((*kind, source.read_until(until)?));
        }
        for (kind, source) in &mut self.links {
            batch.links.push((*kind, source.read_until(until)?));
        }
        for (kind, source) in &mut self.activations {
            batch.activations.push((*kind, source.read_until(until)?));
        }

        Ok(batch)
    }
}
