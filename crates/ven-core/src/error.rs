//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `VenError` via `From` impls or wrap `VenError` as one variant.  Both
//! patterns are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::DeviceId;

/// The top-level error type for `ven-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum VenError {
    #[error("device {0} not found")]
    DeviceNotFound(DeviceId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `ven-*` crates.
pub type VenResult<T> = Result<T, VenError>;
