//! Error type of the GML importer.

use magellan_geom::MagellanError;
use thiserror::Error;

/// Errors produced while turning a GML tree into a geometry.
#[derive(Debug, Clone, Error)]
pub enum GmlError {
    /// The element name is not a geometry this importer understands.
    #[error("unsupported GML element <{0}>")]
    UnsupportedElement(String),

    /// Structurally broken input: missing required children, bad coordinate
    /// text, inconsistent counts.
    #[error("invalid GML: {0}")]
    Invalid(String),

    /// The element tree nests deeper than the hard recursion cap.
    #[error("GML nesting exceeds {0} levels")]
    TooDeep(usize),

    /// A structurally valid tree produced an invalid geometry.
    #[error(transparent)]
    Geometry(#[from] MagellanError),
}
