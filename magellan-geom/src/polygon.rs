//! Polygon with linear rings.

use serde::{Deserialize, Serialize};

use crate::curve::LinearRing;
use crate::envelope::Envelope;
use crate::error::MagellanError;
use crate::srs::SrsRef;

/// A surface bounded by linear rings: one exterior ring and zero or more
/// interior rings (holes). Ring index 0 is the exterior.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    rings: Vec<LinearRing>,
    has_z: bool,
    has_m: bool,
    srs: Option<SrsRef>,
}

impl Polygon {
    /// Creates an empty polygon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a polygon from an exterior ring.
    pub fn from_exterior(ring: LinearRing) -> Self {
        let mut polygon = Self::new();
        polygon.push_ring(ring);
        polygon
    }

    /// Creates a polygon from an exterior ring and interior rings.
    pub fn from_rings(exterior: LinearRing, interior: impl IntoIterator<Item = LinearRing>) -> Self {
        let mut polygon = Self::from_exterior(exterior);
        for ring in interior {
            polygon.push_ring(ring);
        }
        polygon
    }

    /// Appends a ring, taking ownership. The first pushed ring becomes the
    /// exterior and fixes the polygon's dimension flags; later rings are
    /// coerced to those flags.
    pub fn push_ring(&mut self, mut ring: LinearRing) {
        if self.rings.is_empty() {
            self.has_z = ring.seq().has_z();
            self.has_m = ring.seq().has_m();
        } else {
            ring.seq_mut().set_dimensions(self.has_z, self.has_m);
        }
        self.rings.push(ring);
    }

    /// All rings, exterior first.
    pub fn rings(&self) -> &[LinearRing] {
        &self.rings
    }

    /// Consumes self returning the rings, exterior first.
    pub fn into_rings(self) -> Vec<LinearRing> {
        self.rings
    }

    /// The exterior ring, if the polygon is not empty.
    pub fn exterior_ring(&self) -> Option<&LinearRing> {
        self.rings.first()
    }

    /// The interior rings.
    pub fn interior_rings(&self) -> &[LinearRing] {
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

    /// Changes the dimension flags of the polygon and all its rings.
    pub fn set_dimensions(&mut self, has_z: bool, has_m: bool) {
        self.has_z = has_z;
        self.has_m = has_m;
        for ring in &mut self.rings {
            ring.seq_mut().set_dimensions(has_z, has_m);
        }
    }

    /// Unsigned area of the exterior ring minus the hole areas.
    pub fn area(&self) -> f64 {
        let Some(exterior) = self.exterior_ring() else {
            return 0.0;
        };
        let holes: f64 = self.interior_rings().iter().map(|r| r.area()).sum();
        (exterior.area() - holes).max(0.0)
    }

    /// XY bounding box of the exterior ring.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        for ring in &self.rings {
            env.merge(&ring.envelope());
        }
        env
    }

    /// Closes every unclosed non-empty ring by repeating its first point.
    pub fn close_rings(&mut self) {
        for ring in &mut self.rings {
            ring.close();
        }
    }

    /// Checks each ring's closure and point count.
    pub fn validate(&self) -> Result<(), MagellanError> {
        for ring in &self.rings {
            ring.validate()?;
        }
        Ok(())
    }

    /// The associated spatial reference system.
    pub fn srs(&self) -> Option<&SrsRef> {
        self.srs.as_ref()
    }

    /// Assigns the (shared) spatial reference system.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        self.srs = srs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{Coord, CoordSeq};

    #[test]
    fn ring_roles() {
        let polygon = Polygon::from_rings(
            LinearRing::from_xy([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            [LinearRing::from_xy([
                (2.0, 2.0),
                (2.0, 4.0),
                (4.0, 4.0),
                (4.0, 2.0),
                (2.0, 2.0),
            ])],
        );
        assert_eq!(polygon.num_interior_rings(), 1);
        assert_eq!(polygon.area(), 96.0);
        assert!(polygon.validate().is_ok());
    }

    #[test]
    fn ring_dimensions_follow_polygon() {
        let mut polygon = Polygon::from_exterior(LinearRing::from_seq(CoordSeq::from_coords(
            [
                Coord::xyz(0.0, 0.0, 1.0),
                Coord::xyz(1.0, 0.0, 1.0),
                Coord::xyz(1.0, 1.0, 1.0),
                Coord::xyz(0.0, 0.0, 1.0),
            ],
            true,
            false,
        )));
        assert!(polygon.has_z());

        // 2D hole is promoted to the polygon's dimensions.
        polygon.push_ring(LinearRing::from_xy([
            (0.2, 0.2),
            (0.4, 0.2),
            (0.3, 0.4),
            (0.2, 0.2),
        ]));
        assert!(polygon.interior_rings()[0].seq().has_z());
    }
}
