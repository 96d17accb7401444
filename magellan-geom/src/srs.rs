//! Shared spatial reference system handle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Spatial reference system description.
///
/// The model never interprets the definition (coordinate transformation is out
/// of scope); it only carries the handle along with geometries. Geometries
/// share a reference via [`SrsRef`], so the same instance outlives the longest
/// holder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Srs {
    definition: String,
}

/// Reference-counted handle to a shared [`Srs`].
pub type SrsRef = Arc<Srs>;

impl Srs {
    /// Creates a reference system from an opaque definition string (e.g. WKT CRS or a URN).
    pub fn new(definition: impl Into<String>) -> SrsRef {
        Arc::new(Srs {
            definition: definition.into(),
        })
    }

    /// Creates a reference system from an EPSG code.
    pub fn epsg(code: u32) -> SrsRef {
        Self::new(format!("EPSG:{code}"))
    }

    /// The definition string this system was created from.
    pub fn definition(&self) -> &str {
        &self.definition
    }
}
