//! The fixed stage pipeline.

use ven_device::DeviceKind;

/// Who executes a pipeline entry: one device population, or one of the two
/// orchestration layers (which are scheduled participants like any other).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StageActor {
    Devices(DeviceKind),
    EdgeOrchestrator,
    CloudOrchestrator,
}

/// The two scheduler phases per tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StagePhase {
    /// Data moves from vehicles toward controllers.
    Uplink,
    /// Responses move back from controllers toward vehicles.
    Downlink,
}

/// One entry of the ordered pipeline, fixed at model-build time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeStageEntry {
    pub actor: StageActor,
    pub phase: StagePhase,
}

/// The canonical pipeline: the physical uplink chain, then its exact mirror
/// for the downlink.  This ordering is load-bearing — it encodes which
/// buffers are filled before which stage drains them — and the scheduler
/// never reorders across entries.
pub fn pipeline_entries() -> Vec<TypeStageEntry> {
    let uplink = [
        StageActor::Devices(DeviceKind::Vehicle),
        StageActor::Devices(DeviceKind::RoadsideUnit),
        StageActor::EdgeOrchestrator,
        StageActor::Devices(DeviceKind::BaseStation),
        StageActor::CloudOrchestrator,
        StageActor::Devices(DeviceKind::Controller),
    ];

    uplink
        .iter()
        .map(|&actor| TypeStageEntry { actor, phase: StagePhase::Uplink })
        .chain(
            uplink
                .iter()
                .rev()
                .map(|&actor| TypeStageEntry { actor, phase: StagePhase::Downlink }),
        )
        .collect()
}
