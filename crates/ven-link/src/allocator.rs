//! Allocator strategies — how a source picks targets from its candidates.

use ven_core::{DeviceId, SimRng};

use crate::error::LinkError;
use crate::table::LinkEntry;

/// Names accepted by [`AllocatorStrategy::parse`].
const VALID_STRATEGIES: &[&str] = &["nearest", "random"];

/// Target-selection policy over a ranked candidate list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AllocatorStrategy {
    /// Deterministic: the lowest-distance candidate(s) first.
    Nearest,
    /// Uniform pick(s) among all ranked candidates.
    Random,
}

impl AllocatorStrategy {
    /// Parse a configured strategy name.
    ///
    /// Any unknown name fails fast at configuration time — a misspelled
    /// strategy must never silently fall back to a default.
    pub fn parse(name: &str) -> Result<Self, LinkError> {
        match name {
            "nearest" => Ok(AllocatorStrategy::Nearest),
            "random"  => Ok(AllocatorStrategy::Random),
            other => Err(LinkError::InvalidStrategy {
                name:  other.to_owned(),
                valid: VALID_STRATEGIES,
            }),
        }
    }

    /// Pick one target, or `None` if there are no candidates.
    pub fn pick(self, candidates: &[LinkEntry], rng: &mut SimRng) -> Option<DeviceId> {
        match self {
            AllocatorStrategy::Nearest => candidates.first().map(|e| e.target),
            AllocatorStrategy::Random  => rng.choose(candidates).map(|e| e.target),
        }
    }

    /// Pick up to `n` distinct targets.
    ///
    /// `Nearest` takes the ranked prefix; `Random` a uniform subset of size
    /// `min(n, available)`.  Fewer than `n` candidates yields all of them.
    pub fn pick_n(self, candidates: &[LinkEntry], n: usize, rng: &mut SimRng) -> Vec<DeviceId> {
        match self {
            AllocatorStrategy::Nearest => candidates
                .iter()
                .take(n)
                .map(|e| e.target)
                .collect(),
            AllocatorStrategy::Random => rng
                .sample_n(candidates, n)
                .into_iter()
                .map(|e| e.target)
                .collect(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AllocatorStrategy::Nearest => "nearest",
            AllocatorStrategy::Random  => "random",
        }
    }
}

impl std::fmt::Display for AllocatorStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
