//! Point geometry.

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::envelope::Envelope;
use crate::srs::SrsRef;

/// A single location, possibly empty.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    coord: Option<Coord>,
    has_z: bool,
    has_m: bool,
    srs: Option<SrsRef>,
}

impl Point {
    /// Creates an empty 2D point.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an empty point with the given dimension flags.
    pub fn empty_with_dimensions(has_z: bool, has_m: bool) -> Self {
        Self {
            coord: None,
            has_z,
            has_m,
            srs: None,
        }
    }

    /// Creates a 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            coord: Some(Coord::xy(x, y)),
            ..Default::default()
        }
    }

    /// Creates a 3D point.
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            coord: Some(Coord::xyz(x, y, z)),
            has_z: true,
            ..Default::default()
        }
    }

    /// Creates a point from a coordinate tuple and explicit dimension flags.
    pub fn from_coord(coord: Coord, has_z: bool, has_m: bool) -> Self {
        Self {
            coord: Some(coord),
            has_z,
            has_m,
            srs: None,
        }
    }

    /// The coordinate, if the point is not empty.
    pub fn coord(&self) -> Option<&Coord> {
        self.coord.as_ref()
    }

    /// X of a non-empty point.
    pub fn x(&self) -> Option<f64> {
        self.coord.map(|c| c.x)
    }

    /// Y of a non-empty point.
    pub fn y(&self) -> Option<f64> {
        self.coord.map(|c| c.y)
    }

    /// Z of a non-empty 3D point.
    pub fn z(&self) -> Option<f64> {
        self.coord.filter(|_| self.has_z).map(|c| c.z)
    }

    /// M of a non-empty measured point.
    pub fn m(&self) -> Option<f64> {
        self.coord.filter(|_| self.has_m).map(|c| c.m)
    }

    /// True if the point stores a Z value.
    pub fn has_z(&self) -> bool {
        self.has_z
    }

    /// True if the point stores an M value.
    pub fn has_m(&self) -> bool {
        self.has_m
    }

    /// Changes the dimension flags.
    pub fn set_dimensions(&mut self, has_z: bool, has_m: bool) {
        self.has_z = has_z;
        self.has_m = has_m;
    }

    /// True if the point holds no coordinate.
    pub fn is_empty(&self) -> bool {
        self.coord.is_none()
    }

    /// Degenerate bounding box of the point.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        if let Some(c) = &self.coord {
            env.extend(c.x, c.y);
        }
        env
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

    #[test]
    fn empty_point() {
        let p = Point::empty();
        assert!(p.is_empty());
        assert_eq!(p.x(), None);
        assert!(!p.envelope().is_init());
    }

    #[test]
    fn dimension_flags_gate_accessors() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(p.z(), None);
        let p = Point::new_3d(1.0, 2.0, 3.0);
        assert_eq!(p.z(), Some(3.0));
        assert_eq!(p.m(), None);
    }
}
