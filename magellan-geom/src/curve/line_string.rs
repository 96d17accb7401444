//! Straight-segment curves and the ring specialization.

use serde::{Deserialize, Serialize};

use crate::analysis::{ring_signed_area, Winding};
use crate::coord::{Coord, CoordSeq};
use crate::envelope::Envelope;
use crate::error::MagellanError;
use crate::srs::SrsRef;

/// A curve of straight line segments between consecutive points.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    seq: CoordSeq,
    srs: Option<SrsRef>,
}

impl LineString {
    /// Creates an empty line string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a line string over the given coordinate sequence.
    pub fn from_seq(seq: CoordSeq) -> Self {
        Self { seq, srs: None }
    }

    /// Creates a 2D line string from coordinate pairs.
    pub fn from_xy(coords: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::from_seq(CoordSeq::from_xy(coords))
    }

    /// The underlying coordinate sequence.
    pub fn seq(&self) -> &CoordSeq {
        &self.seq
    }

    /// Mutable access to the underlying coordinate sequence.
    pub fn seq_mut(&mut self) -> &mut CoordSeq {
        &mut self.seq
    }

    /// Consumes self returning the coordinate sequence.
    pub fn into_seq(self) -> CoordSeq {
        self.seq
    }

    /// Appends a point.
    pub fn push(&mut self, coord: Coord) {
        self.seq.push(coord);
    }

    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.seq.len()
    }

    /// True if the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// True if the first and last points are bit-for-bit equal.
    pub fn is_closed(&self) -> bool {
        self.seq.is_closed()
    }

    /// First point of the curve.
    pub fn start_point(&self) -> Option<&Coord> {
        self.seq.first()
    }

    /// Last point of the curve.
    pub fn end_point(&self) -> Option<&Coord> {
        self.seq.last()
    }

    /// Reverses point order in place.
    pub fn reverse(&mut self) {
        self.seq.reverse();
    }

    /// XY bounding box of the curve.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        self.seq.extend_envelope(&mut env);
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

    /// Reinterprets the line string as a linear ring without copying.
    ///
    /// The spatial reference is dropped: rings are polygon internals and
    /// follow the polygon's reference system.
    pub fn into_ring(self) -> LinearRing {
        LinearRing { seq: self.seq }
    }
}

/// A closed [`LineString`] used as a polygon boundary.
///
/// The storage is identical to a line string; only the intended use differs.
/// Construction is permissive (parsers may produce unclosed rings from bad
/// input); [`LinearRing::validate`] applies the closure requirement.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRing {
    seq: CoordSeq,
}

impl LinearRing {
    /// Creates an empty ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ring over the given coordinate sequence.
    pub fn from_seq(seq: CoordSeq) -> Self {
        Self { seq }
    }

    /// Creates a 2D ring from coordinate pairs.
    pub fn from_xy(coords: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::from_seq(CoordSeq::from_xy(coords))
    }

    /// The underlying coordinate sequence.
    pub fn seq(&self) -> &CoordSeq {
        &self.seq
    }

    /// Mutable access to the underlying coordinate sequence.
    pub fn seq_mut(&mut self) -> &mut CoordSeq {
        &mut self.seq
    }

    /// Consumes self returning the coordinate sequence.
    pub fn into_seq(self) -> CoordSeq {
        self.seq
    }

    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.seq.len()
    }

    /// True if the ring has no points.
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// True if the first and last points are bit-for-bit equal.
    pub fn is_closed(&self) -> bool {
        self.seq.is_closed()
    }

    /// Closes the ring by repeating the first point if needed.
    pub fn close(&mut self) {
        self.seq.close();
    }

    /// Reverses point order (flips the winding).
    pub fn reverse(&mut self) {
        self.seq.reverse();
    }

    /// XY bounding box of the ring.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        self.seq.extend_envelope(&mut env);
        env
    }

    /// Signed shoelace area: positive for counterclockwise winding.
    pub fn signed_area(&self) -> f64 {
        ring_signed_area(&self.seq)
    }

    /// Unsigned area enclosed by the ring.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Winding direction of the ring.
    pub fn winding(&self) -> Winding {
        if self.signed_area() >= 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// Checks that a non-empty ring is closed and has at least 4 points.
    pub fn validate(&self) -> Result<(), MagellanError> {
        if self.seq.is_empty() {
            return Ok(());
        }
        if self.seq.len() < 4 {
            return Err(MagellanError::InvalidGeometry(format!(
                "ring has only {} points",
                self.seq.len()
            )));
        }
        if !self.is_closed() {
            return Err(MagellanError::InvalidGeometry(
                "ring is not closed".into(),
            ));
        }
        Ok(())
    }

    /// Reinterprets the ring as a line string without copying.
    pub fn into_line_string(self) -> LineString {
        LineString {
            seq: self.seq,
            srs: None,
        }
    }
}

impl From<LinearRing> for LineString {
    fn from(value: LinearRing) -> Self {
        value.into_line_string()
    }
}

impl From<LineString> for LinearRing {
    fn from(value: LineString) -> Self {
        value.into_ring()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> LinearRing {
        LinearRing::from_xy([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)])
    }

    #[test]
    fn ring_area_and_winding() {
        let ring = unit_square();
        assert_eq!(ring.signed_area(), 1.0);
        assert_eq!(ring.winding(), Winding::CounterClockwise);

        let mut cw = ring.clone();
        cw.reverse();
        assert_eq!(cw.signed_area(), -1.0);
        assert_eq!(cw.winding(), Winding::Clockwise);
    }

    #[test]
    fn ring_validation() {
        assert!(unit_square().validate().is_ok());
        assert!(LinearRing::new().validate().is_ok());

        let open = LinearRing::from_xy([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!(open.validate().is_err());

        let degenerate = LinearRing::from_xy([(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert!(degenerate.validate().is_err());
    }

    #[test]
    fn ring_line_string_cast_is_lossless() {
        let ring = unit_square();
        let ls: LineString = ring.clone().into();
        assert_eq!(ls.num_points(), 5);
        let back: LinearRing = ls.into();
        assert_eq!(back, ring);
    }
}
