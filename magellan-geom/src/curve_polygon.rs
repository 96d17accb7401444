//! Polygon generalized to curve rings.

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, LinearRing};
use crate::envelope::Envelope;
use crate::error::MagellanError;
use crate::options::ArcOptions;
use crate::polygon::Polygon;
use crate::srs::SrsRef;

/// A surface bounded by arbitrary curves (line strings, circular strings or
/// compound curves). Ring index 0 is the exterior.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePolygon {
    rings: Vec<Curve>,
    has_z: bool,
    has_m: bool,
    srs: Option<SrsRef>,
}

impl CurvePolygon {
    /// Creates an empty curve polygon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a curve polygon from an exterior ring.
    pub fn from_exterior(ring: Curve) -> Self {
        let mut polygon = Self::new();
        polygon.push_ring(ring);
        polygon
    }

    /// Appends a ring, taking ownership. The first pushed ring fixes the
    /// dimension flags; later rings are coerced to them.
    pub fn push_ring(&mut self, ring: Curve) {
        if self.rings.is_empty() {
            self.has_z = ring.has_z();
            self.has_m = ring.has_m();
        }
        self.rings.push(ring);
    }

    /// All rings, exterior first.
    pub fn rings(&self) -> &[Curve] {
        &self.rings
    }

    /// Consumes self returning the rings, exterior first.
    pub fn into_rings(self) -> Vec<Curve> {
        self.rings
    }

    /// The exterior ring, if the polygon is not empty.
    pub fn exterior_ring(&self) -> Option<&Curve> {
        self.rings.first()
    }

    /// The interior rings.
    pub fn interior_rings(&self) -> &[Curve] {
        self.rings.get(1..).unwrap_or(&[])
    }

    /// Number of interior rings.
    pub fn num_interior_rings(&self) -> usize {
        self.rings.len().saturating_sub(1)
    }

    /// True if the polygon has no rings or only empty rings.
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(|r| r.is_empty())
    }

    /// True if the rings store Z values.
    pub fn has_z(&self) -> bool {
        self.has_z
    }

    /// True if the rings store M values.
    pub fn has_m(&self) -> bool {
        self.has_m
    }

    /// XY bounding box of the ring control points.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        for ring in &self.rings {
            env.merge(&ring.envelope());
        }
        env
    }

    /// Checks that every non-empty ring is structurally valid and closed.
    pub fn validate(&self) -> Result<(), MagellanError> {
        for ring in &self.rings {
            ring.validate()?;
            if !ring.is_empty() && !ring.is_closed() {
                return Err(MagellanError::InvalidGeometry(
                    "curve polygon ring is not closed".into(),
                ));
            }
        }
        Ok(())
    }

    /// Approximates every curve ring with straight segments, producing a
    /// plain polygon.
    pub fn linearize(&self, options: &ArcOptions) -> Polygon {
        let mut polygon = Polygon::new();
        for ring in &self.rings {
            let mut line = ring.linearize(options);
            line.seq_mut().close();
            polygon.push_ring(LinearRing::from_seq(line.into_seq()));
        }
        polygon
    }

    /// The associated spatial reference system.
    pub fn srs(&self) -> Option<&SrsRef> {
        self.srs.as_ref()
    }

    /// Assigns the (shared) spatial reference system to self and all rings.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        for ring in &mut self.rings {
            ring.set_srs(srs.clone());
        }
        self.srs = srs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CircularString, LineString};

    #[test]
    fn closed_curve_rings_validate() {
        let full_circle = CircularString::from_xy([
            (0.0, 0.0),
            (1.0, 1.0),
            (2.0, 0.0),
            (1.0, -1.0),
            (0.0, 0.0),
        ]);
        let polygon = CurvePolygon::from_exterior(Curve::CircularString(full_circle));
        assert!(polygon.validate().is_ok());
        assert_eq!(polygon.num_interior_rings(), 0);
    }

    #[test]
    fn open_ring_fails_validation() {
        let open = LineString::from_xy([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let polygon = CurvePolygon::from_exterior(Curve::LineString(open));
        assert!(polygon.validate().is_err());
    }
}
