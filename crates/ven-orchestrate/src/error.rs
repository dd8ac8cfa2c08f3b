//! Error types for ven-orchestrate.

use thiserror::Error;

use ven_core::DeviceId;
use ven_device::{DeviceError, DeviceKind};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A response was addressed to a device the orchestrator no longer
    /// tracks.  The device must have been active to originate the uplink
    /// payload that produced this response, so this signals corrupted
    /// bookkeeping, not a data condition.
    #[error("response addressed to untracked device {0}")]
    UnknownRecipient(DeviceId),

    #[error("device {device} ({kind}) was not tracked by this orchestrator")]
    NotTracked {
        device: DeviceId,
        kind:   DeviceKind,
    },

    #[error(transparent)]
    Device(#[from] DeviceError),
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
