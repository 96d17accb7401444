//! Coordinate tuples and coordinate sequences.

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;

/// A single coordinate tuple.
///
/// `z` and `m` are always present in storage; whether they are meaningful is
/// decided by the dimension flags of the sequence (or geometry) holding the
/// coordinate.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Coord {
    /// Easting / longitude.
    pub x: f64,
    /// Northing / latitude.
    pub y: f64,
    /// Elevation, meaningful when the owning sequence has Z.
    pub z: f64,
    /// Measure, meaningful when the owning sequence has M.
    pub m: f64,
}

impl Coord {
    /// Creates a 2D coordinate.
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// Creates a 3D coordinate.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Default::default()
        }
    }

    /// Creates a measured 2D coordinate.
    pub fn xym(x: f64, y: f64, m: f64) -> Self {
        Self {
            x,
            y,
            m,
            ..Default::default()
        }
    }

    /// Creates a measured 3D coordinate.
    pub fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self { x, y, z, m }
    }

    /// Bit-for-bit equality of the horizontal coordinates.
    ///
    /// No tolerance is applied: closure of rings and segment chaining are
    /// defined over exact double representations.
    pub fn bit_eq_xy(&self, other: &Coord) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }

    /// Bit-for-bit equality including the Z coordinate.
    pub fn bit_eq_xyz(&self, other: &Coord) -> bool {
        self.bit_eq_xy(other) && self.z.to_bits() == other.z.to_bits()
    }

    /// Squared euclidian distance to `other` in the XY plane.
    pub fn distance_sq(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidian distance to `other` in the XY plane.
    pub fn distance(&self, other: &Coord) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

/// An ordered sequence of coordinates with common dimension flags.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordSeq {
    coords: Vec<Coord>,
    has_z: bool,
    has_m: bool,
}

impl CoordSeq {
    /// Creates an empty 2D sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sequence with the given dimension flags.
    pub fn with_dimensions(has_z: bool, has_m: bool) -> Self {
        Self {
            coords: vec![],
            has_z,
            has_m,
        }
    }

    /// Creates a sequence from 2D coordinates.
    pub fn from_xy(coords: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            coords: coords
                .into_iter()
                .map(|(x, y)| Coord::xy(x, y))
                .collect(),
            has_z: false,
            has_m: false,
        }
    }

    /// Creates a sequence from coordinate tuples and explicit dimension flags.
    pub fn from_coords(
        coords: impl IntoIterator<Item = Coord>,
        has_z: bool,
        has_m: bool,
    ) -> Self {
        Self {
            coords: coords.into_iter().collect(),
            has_z,
            has_m,
        }
    }

    /// True if the sequence stores Z values.
    pub fn has_z(&self) -> bool {
        self.has_z
    }

    /// True if the sequence stores M values.
    pub fn has_m(&self) -> bool {
        self.has_m
    }

    /// Changes the dimension flags, keeping stored values as they are.
    pub fn set_dimensions(&mut self, has_z: bool, has_m: bool) {
        self.has_z = has_z;
        self.has_m = has_m;
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// True if the sequence holds no coordinates.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Ref to the coordinate at `index`.
    pub fn get(&self, index: usize) -> Option<&Coord> {
        self.coords.get(index)
    }

    /// Mutable ref to the coordinate at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Coord> {
        self.coords.get_mut(index)
    }

    /// First coordinate, if any.
    pub fn first(&self) -> Option<&Coord> {
        self.coords.first()
    }

    /// Last coordinate, if any.
    pub fn last(&self) -> Option<&Coord> {
        self.coords.last()
    }

    /// Appends a coordinate.
    pub fn push(&mut self, coord: Coord) {
        self.coords.push(coord);
    }

    /// Iterates over the coordinates.
    pub fn iter(&self) -> impl Iterator<Item = &Coord> {
        self.coords.iter()
    }

    /// Consumes the sequence returning the raw coordinate storage.
    pub fn into_coords(self) -> Vec<Coord> {
        self.coords
    }

    /// Direct access to the coordinate storage.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Mutable access to the coordinate storage.
    pub fn coords_mut(&mut self) -> &mut [Coord] {
        &mut self.coords
    }

    /// Reverses the coordinate order in place.
    pub fn reverse(&mut self) {
        self.coords.reverse();
    }

    /// True if the first and last coordinates are bit-for-bit equal.
    ///
    /// Z participates in the comparison when the sequence has Z; M never does.
    /// An empty sequence is not closed.
    pub fn is_closed(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(first), Some(last)) if self.has_z => first.bit_eq_xyz(last),
            (Some(first), Some(last)) => first.bit_eq_xy(last),
            _ => false,
        }
    }

    /// Appends a copy of the first coordinate if the sequence is not closed yet.
    pub fn close(&mut self) {
        if !self.coords.is_empty() && !self.is_closed() {
            let first = self.coords[0];
            self.coords.push(first);
        }
    }

    /// Accumulates the XY bounds of all coordinates into `envelope`.
    pub fn extend_envelope(&self, envelope: &mut Envelope) {
        for c in &self.coords {
            envelope.extend(c.x, c.y);
        }
    }

    /// Z range over the sequence, when it has Z and is not empty.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        if !self.has_z || self.coords.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for c in &self.coords {
            min = min.min(c.z);
            max = max.max(c.z);
        }
        Some((min, max))
    }
}

impl FromIterator<Coord> for CoordSeq {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        Self {
            coords: iter.into_iter().collect(),
            has_z: false,
            has_m: false,
        }
    }
}
