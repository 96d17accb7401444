//! Compound curves: chains of line strings and circular strings.

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::curve::{Curve, LineString};
use crate::envelope::Envelope;
use crate::error::MagellanError;
use crate::options::ArcOptions;
use crate::srs::SrsRef;

/// An ordered chain of curve segments.
///
/// Consecutive segments must join end-to-start bit-identically. Compound
/// segments are legal *input* but are flattened on insertion, so the stored
/// segments are only line strings and circular strings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundCurve {
    segments: Vec<Curve>,
    srs: Option<SrsRef>,
}

impl CompoundCurve {
    /// Creates an empty compound curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment, flattening nested compound curves.
    ///
    /// Fails with [`MagellanError::InvalidGeometry`] if the segment is empty
    /// or does not start exactly where the previous segment ends.
    pub fn push_segment(&mut self, segment: Curve) -> Result<(), MagellanError> {
        match segment {
            Curve::Compound(compound) => {
                for inner in compound.segments {
                    self.push_segment(inner)?;
                }
                Ok(())
            }
            segment => {
                if segment.is_empty() {
                    return Err(MagellanError::InvalidGeometry(
                        "empty segment in compound curve".into(),
                    ));
                }
                if let Some(last) = self.segments.last() {
                    let end = last.end_point();
                    let start = segment.start_point();
                    let joined = match (end, start) {
                        (Some(e), Some(s)) if segment.has_z() => e.bit_eq_xyz(s),
                        (Some(e), Some(s)) => e.bit_eq_xy(s),
                        _ => false,
                    };
                    if !joined {
                        return Err(MagellanError::InvalidGeometry(
                            "compound curve segments are not contiguous".into(),
                        ));
                    }
                }
                self.segments.push(segment);
                Ok(())
            }
        }
    }

    /// The stored segments.
    pub fn segments(&self) -> &[Curve] {
        &self.segments
    }

    /// Consumes self returning the segments.
    pub fn into_segments(self) -> Vec<Curve> {
        self.segments
    }

    /// Number of segments.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// True if the curve has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First point of the first segment.
    pub fn start_point(&self) -> Option<&Coord> {
        self.segments.first().and_then(|s| s.start_point())
    }

    /// Last point of the last segment.
    pub fn end_point(&self) -> Option<&Coord> {
        self.segments.last().and_then(|s| s.end_point())
    }

    /// True if the chain ends exactly where it starts.
    pub fn is_closed(&self) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) if self.has_z() => start.bit_eq_xyz(end),
            (Some(start), Some(end)) => start.bit_eq_xy(end),
            _ => false,
        }
    }

    /// True if the segments store Z values.
    pub fn has_z(&self) -> bool {
        self.segments.first().is_some_and(|s| s.has_z())
    }

    /// True if the segments store M values.
    pub fn has_m(&self) -> bool {
        self.segments.first().is_some_and(|s| s.has_m())
    }

    /// Reverses the chain: segment order and every segment's point order.
    pub fn reverse(&mut self) {
        self.segments.reverse();
        for segment in &mut self.segments {
            segment.reverse();
        }
    }

    /// XY bounding box over all segments.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        for segment in &self.segments {
            env.merge(&segment.envelope());
        }
        env
    }

    /// The associated spatial reference system.
    pub fn srs(&self) -> Option<&SrsRef> {
        self.srs.as_ref()
    }

    /// Assigns the (shared) spatial reference system to self and all segments.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        for segment in &mut self.segments {
            segment.set_srs(srs.clone());
        }
        self.srs = srs;
    }

    /// Approximates the whole chain with straight segments.
    ///
    /// Joint points shared by consecutive segments appear once in the output.
    pub fn linearize(&self, options: &ArcOptions) -> LineString {
        let mut out = LineString::new();
        for (i, segment) in self.segments.iter().enumerate() {
            let line = segment.linearize(options);
            let seq = line.into_seq();
            let skip = usize::from(i > 0 && !seq.is_empty());
            let (has_z, has_m) = (seq.has_z(), seq.has_m());
            if i == 0 {
                out.seq_mut().set_dimensions(has_z, has_m);
            }
            for coord in seq.into_coords().into_iter().skip(skip) {
                out.push(coord);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CircularString;

    #[test]
    fn contiguous_segments_accepted() {
        let mut cc = CompoundCurve::new();
        cc.push_segment(Curve::LineString(LineString::from_xy([
            (0.0, 0.0),
            (1.0, 0.0),
        ])))
        .unwrap();
        cc.push_segment(Curve::CircularString(CircularString::from_xy([
            (1.0, 0.0),
            (2.0, 1.0),
            (3.0, 0.0),
        ])))
        .unwrap();
        assert_eq!(cc.num_segments(), 2);
        assert_eq!(cc.end_point().unwrap().x, 3.0);
        assert!(!cc.is_closed());
    }

    #[test]
    fn discontinuity_rejected() {
        let mut cc = CompoundCurve::new();
        cc.push_segment(Curve::LineString(LineString::from_xy([
            (0.0, 0.0),
            (1.0, 0.0),
        ])))
        .unwrap();
        let err = cc.push_segment(Curve::LineString(LineString::from_xy([
            (1.0 + 1e-15, 0.0),
            (2.0, 0.0),
        ])));
        assert!(err.is_err());
    }

    #[test]
    fn nested_compound_is_flattened() {
        let mut inner = CompoundCurve::new();
        inner
            .push_segment(Curve::LineString(LineString::from_xy([
                (1.0, 0.0),
                (2.0, 0.0),
            ])))
            .unwrap();

        let mut outer = CompoundCurve::new();
        outer
            .push_segment(Curve::LineString(LineString::from_xy([
                (0.0, 0.0),
                (1.0, 0.0),
            ])))
            .unwrap();
        outer.push_segment(Curve::Compound(inner)).unwrap();

        assert_eq!(outer.num_segments(), 2);
        assert!(outer
            .segments()
            .iter()
            .all(|s| !matches!(s, Curve::Compound(_))));
    }
}
