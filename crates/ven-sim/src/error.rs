//! Error types for ven-sim.

use thiserror::Error;

use ven_core::{DeviceId, VenError};
use ven_device::{DeviceError, DeviceKind};
use ven_ingest::IngestError;
use ven_link::LinkError;
use ven_orchestrate::OrchestratorError;

#[derive(Debug, Error)]
pub enum SimError {
    /// Scheduler asked to unregister a device it never knew about — the
    /// activation clock and the registry have diverged.
    #[error("device {device} ({kind}) is not registered with the scheduler")]
    NotRegistered {
        device: DeviceId,
        kind:   DeviceKind,
    },

    /// Scheduler asked to register a device twice without a deactivation in
    /// between.
    #[error("device {device} ({kind}) is already registered with the scheduler")]
    AlreadyRegistered {
        device: DeviceId,
        kind:   DeviceKind,
    },

    #[error(transparent)]
    Core(#[from] VenError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

pub type SimResult<T> = Result<T, SimError>;
