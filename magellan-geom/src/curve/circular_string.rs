//! Circular arc curves.

use serde::{Deserialize, Serialize};

use crate::arc;
use crate::coord::{Coord, CoordSeq};
use crate::curve::LineString;
use crate::envelope::Envelope;
use crate::error::MagellanError;
use crate::options::ArcOptions;
use crate::srs::SrsRef;

/// A curve of circular arcs.
///
/// Points at even indices are arc endpoints, points at odd indices are the
/// intermediate points defining each arc, so a valid non-empty curve has an
/// odd point count of at least 3.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularString {
    seq: CoordSeq,
    srs: Option<SrsRef>,
}

impl CircularString {
    /// Creates an empty circular string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a circular string over the given coordinate sequence.
    pub fn from_seq(seq: CoordSeq) -> Self {
        Self { seq, srs: None }
    }

    /// Creates a 2D circular string from coordinate pairs.
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

    /// Number of arcs.
    pub fn num_arcs(&self) -> usize {
        if self.seq.len() < 3 {
            0
        } else {
            (self.seq.len() - 1) / 2
        }
    }

    /// The three control points of arc `index`.
    pub fn arc(&self, index: usize) -> Option<(&Coord, &Coord, &Coord)> {
        let i = index * 2;
        Some((self.seq.get(i)?, self.seq.get(i + 1)?, self.seq.get(i + 2)?))
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

    /// Checks the odd-point-count structure of a non-empty curve.
    pub fn validate(&self) -> Result<(), MagellanError> {
        if self.seq.is_empty() {
            return Ok(());
        }
        if self.seq.len() < 3 || self.seq.len() % 2 == 0 {
            return Err(MagellanError::InvalidGeometry(format!(
                "circular string has {} points, expected an odd count >= 3",
                self.seq.len()
            )));
        }
        Ok(())
    }

    /// XY bounding box of the control points.
    ///
    /// Arc bulges can extend beyond the control points; for an exact envelope
    /// linearize first. The control-point box is what the containment
    /// pre-filters need.
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

    /// Approximates the curve with straight segments at the configured
    /// angular step.
    pub fn linearize(&self, options: &ArcOptions) -> LineString {
        arc::stroke::circular_string_to_line_string(self, options)
    }
}
