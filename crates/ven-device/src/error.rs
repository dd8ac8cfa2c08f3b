//! Error types for ven-device.
//!
//! The two timing variants signal that the activation clock's precomputed
//! maps and a device's own window disagree — an internal-consistency bug,
//! never a recoverable condition.

use thiserror::Error;

use ven_core::{DeviceId, SimTime};

use crate::kind::DeviceKind;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device {device} cannot activate at {at}: next enable time is {expected:?}")]
    WrongActivationTime {
        device:   DeviceId,
        at:       SimTime,
        expected: Option<SimTime>,
    },

    #[error("device {device} cannot deactivate at {at}: next disable time is {expected:?}")]
    WrongDeactivationTime {
        device:   DeviceId,
        at:       SimTime,
        expected: Option<SimTime>,
    },

    #[error("device {0} already exists in the registry")]
    DuplicateDevice(DeviceId),

    #[error("device {0} not found in the registry")]
    NotFound(DeviceId),

    #[error("device {device} is a {found}, expected a {expected}")]
    KindMismatch {
        device:   DeviceId,
        expected: DeviceKind,
        found:    DeviceKind,
    },

    #[error("no device model configured for kind {0}")]
    MissingModel(DeviceKind),
}

pub type DeviceResult<T> = Result<T, DeviceError>;
