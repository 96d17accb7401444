//! Curve geometries: line strings, circular strings, compound curves, rings.

mod circular_string;
mod compound;
mod line_string;

pub use circular_string::CircularString;
pub use compound::CompoundCurve;
pub use line_string::{LineString, LinearRing};

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::envelope::Envelope;
use crate::error::MagellanError;
use crate::options::ArcOptions;
use crate::srs::SrsRef;
use crate::types::GeometryType;

/// Any curve: the member type of compound curves, curve polygon rings and
/// multi curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    /// Straight segments.
    LineString(LineString),
    /// Circular arcs.
    CircularString(CircularString),
    /// A chain of the two above.
    Compound(CompoundCurve),
}

impl Curve {
    /// Flattened type of the curve.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Curve::LineString(_) => GeometryType::LineString,
            Curve::CircularString(_) => GeometryType::CircularString,
            Curve::Compound(_) => GeometryType::CompoundCurve,
        }
    }

    /// True if the curve has no points.
    pub fn is_empty(&self) -> bool {
        match self {
            Curve::LineString(c) => c.is_empty(),
            Curve::CircularString(c) => c.is_empty(),
            Curve::Compound(c) => c.is_empty(),
        }
    }

    /// True if the curve ends exactly where it starts.
    pub fn is_closed(&self) -> bool {
        match self {
            Curve::LineString(c) => c.is_closed(),
            Curve::CircularString(c) => c.is_closed(),
            Curve::Compound(c) => c.is_closed(),
        }
    }

    /// First point of the curve.
    pub fn start_point(&self) -> Option<&Coord> {
        match self {
            Curve::LineString(c) => c.start_point(),
            Curve::CircularString(c) => c.start_point(),
            Curve::Compound(c) => c.start_point(),
        }
    }

    /// Last point of the curve.
    pub fn end_point(&self) -> Option<&Coord> {
        match self {
            Curve::LineString(c) => c.end_point(),
            Curve::CircularString(c) => c.end_point(),
            Curve::Compound(c) => c.end_point(),
        }
    }

    /// True if the curve stores Z values.
    pub fn has_z(&self) -> bool {
        match self {
            Curve::LineString(c) => c.seq().has_z(),
            Curve::CircularString(c) => c.seq().has_z(),
            Curve::Compound(c) => c.has_z(),
        }
    }

    /// True if the curve stores M values.
    pub fn has_m(&self) -> bool {
        match self {
            Curve::LineString(c) => c.seq().has_m(),
            Curve::CircularString(c) => c.seq().has_m(),
            Curve::Compound(c) => c.has_m(),
        }
    }

    /// Number of stored points. Joint points of a compound curve are counted
    /// once per owning segment.
    pub fn point_count(&self) -> usize {
        match self {
            Curve::LineString(c) => c.num_points(),
            Curve::CircularString(c) => c.num_points(),
            Curve::Compound(c) => c.segments().iter().map(|s| s.point_count()).sum(),
        }
    }

    /// Reverses the curve direction in place.
    pub fn reverse(&mut self) {
        match self {
            Curve::LineString(c) => c.reverse(),
            Curve::CircularString(c) => c.reverse(),
            Curve::Compound(c) => c.reverse(),
        }
    }

    /// XY bounding box of the curve's control points.
    pub fn envelope(&self) -> Envelope {
        match self {
            Curve::LineString(c) => c.envelope(),
            Curve::CircularString(c) => c.envelope(),
            Curve::Compound(c) => c.envelope(),
        }
    }

    /// The associated spatial reference system.
    pub fn srs(&self) -> Option<&SrsRef> {
        match self {
            Curve::LineString(c) => c.srs(),
            Curve::CircularString(c) => c.srs(),
            Curve::Compound(c) => c.srs(),
        }
    }

    /// Assigns the (shared) spatial reference system.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        match self {
            Curve::LineString(c) => c.set_srs(srs),
            Curve::CircularString(c) => c.set_srs(srs),
            Curve::Compound(c) => c.set_srs(srs),
        }
    }

    /// Structural validation of the curve.
    pub fn validate(&self) -> Result<(), MagellanError> {
        match self {
            Curve::LineString(_) => Ok(()),
            Curve::CircularString(c) => c.validate(),
            Curve::Compound(_) => Ok(()),
        }
    }

    /// Approximates the curve with straight segments.
    ///
    /// A line string is returned as-is (cloned); arcs are stroked at the
    /// configured angular step.
    pub fn linearize(&self, options: &ArcOptions) -> LineString {
        match self {
            Curve::LineString(c) => c.clone(),
            Curve::CircularString(c) => c.linearize(options),
            Curve::Compound(c) => c.linearize(options),
        }
    }
}

impl From<LineString> for Curve {
    fn from(value: LineString) -> Self {
        Curve::LineString(value)
    }
}

impl From<CircularString> for Curve {
    fn from(value: CircularString) -> Self {
        Curve::CircularString(value)
    }
}

impl From<CompoundCurve> for Curve {
    fn from(value: CompoundCurve) -> Self {
        Curve::Compound(value)
    }
}
