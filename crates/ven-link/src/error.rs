//! Error types for ven-link.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("invalid allocator strategy {name:?}: expected one of {valid:?}")]
    InvalidStrategy {
        name:  String,
        valid: &'static [&'static str],
    },
}

pub type LinkResult<T> = Result<T, LinkError>;
