//! Error type used by the crate.

use thiserror::Error;

/// Error enum shared by the geometry model and the format readers built on it.
#[derive(Debug, Clone, Error)]
pub enum MagellanError {
    /// Input buffer ended before the structurally required payload.
    #[error("not enough data: {0}")]
    NotEnoughData(String),

    /// Malformed input: bad byte-order marker, bad token stream, inconsistent counts.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// Unrecognized geometry type code/keyword, or a casting precondition violated.
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometryType(String),

    /// Semantic violation, e.g. an open ring where closure is required.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}
