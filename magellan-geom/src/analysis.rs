//! Planar analysis primitives: orientation, area, containment.

use serde::{Deserialize, Serialize};

use crate::coord::{Coord, CoordSeq};

/// Winding direction of a ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winding {
    /// Negative shoelace area.
    Clockwise,
    /// Positive shoelace area.
    CounterClockwise,
}

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Right turn.
    Clockwise,
    /// Left turn.
    Counterclockwise,
    /// No turn.
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    pub fn triplet(p: &Coord, q: &Coord, r: &Coord) -> Self {
        let v = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
        if v == 0.0 {
            Self::Collinear
        } else if v > 0.0 {
            Self::Clockwise
        } else {
            Self::Counterclockwise
        }
    }
}

/// Classification of a point against a ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointLocation {
    /// Strictly inside the ring.
    Inside,
    /// Strictly outside the ring.
    Outside,
    /// Exactly on the ring boundary.
    Boundary,
}

/// Signed shoelace area of a closed coordinate sequence.
///
/// Positive for counterclockwise winding. The sequence is treated as closed
/// whether or not the final closing point is present.
pub fn ring_signed_area(seq: &CoordSeq) -> f64 {
    let coords = seq.coords();
    if coords.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..coords.len() {
        let a = &coords[i];
        let b = &coords[(i + 1) % coords.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Winding of a closed coordinate sequence, by the sign of the shoelace area.
pub fn ring_winding(seq: &CoordSeq) -> Winding {
    if ring_signed_area(seq) >= 0.0 {
        Winding::CounterClockwise
    } else {
        Winding::Clockwise
    }
}

fn on_segment(a: &Coord, b: &Coord, p: &Coord) -> bool {
    if Orientation::triplet(a, b, p) != Orientation::Collinear {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// True if segments `(a1, a2)` and `(b1, b2)` share at least one point.
pub fn segments_intersect(a1: &Coord, a2: &Coord, b1: &Coord, b2: &Coord) -> bool {
    let o1 = Orientation::triplet(a1, a2, b1);
    let o2 = Orientation::triplet(a1, a2, b2);
    let o3 = Orientation::triplet(b1, b2, a1);
    let o4 = Orientation::triplet(b1, b2, a2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    o1 == Orientation::Collinear && on_segment(a1, a2, b1)
        || o2 == Orientation::Collinear && on_segment(a1, a2, b2)
        || o3 == Orientation::Collinear && on_segment(b1, b2, a1)
        || o4 == Orientation::Collinear && on_segment(b1, b2, a2)
}

/// Classifies a point against a closed ring.
///
/// The boundary test is exact (zero cross product), matching the bit-exact
/// closure semantics of rings; the interior test is an even-odd ray crossing.
pub fn locate_point_in_ring(seq: &CoordSeq, point: &Coord) -> PointLocation {
    let coords = seq.coords();
    if coords.len() < 3 {
        return PointLocation::Outside;
    }

    let mut inside = false;
    for i in 0..coords.len() {
        let a = &coords[i];
        let b = &coords[(i + 1) % coords.len()];

        if on_segment(a, b, point) {
            return PointLocation::Boundary;
        }

        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }

    if inside {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

/// True if any edge of ring `a` properly crosses an edge of ring `b`.
///
/// Shared/touching edges do not count as a crossing: valid adjacent rings may
/// touch along their boundaries.
pub fn rings_cross(a: &CoordSeq, b: &CoordSeq) -> bool {
    let ca = a.coords();
    let cb = b.coords();
    if ca.len() < 2 || cb.len() < 2 {
        return false;
    }
    for i in 0..ca.len() - 1 {
        for j in 0..cb.len() - 1 {
            let (a1, a2) = (&ca[i], &ca[i + 1]);
            let (b1, b2) = (&cb[j], &cb[j + 1]);
            let o1 = Orientation::triplet(a1, a2, b1);
            let o2 = Orientation::triplet(a1, a2, b2);
            let o3 = Orientation::triplet(b1, b2, a1);
            let o4 = Orientation::triplet(b1, b2, a2);
            // A proper crossing puts the endpoints strictly on opposite sides.
            if o1 != o2
                && o3 != o4
                && o1 != Orientation::Collinear
                && o2 != Orientation::Collinear
                && o3 != Orientation::Collinear
                && o4 != Orientation::Collinear
            {
                return true;
            }
        }
    }
    false
}

/// Full polygon-in-ring containment: every vertex of `inner` is inside or on
/// the boundary of `outer`, at least one vertex strictly inside, and no edges
/// cross.
pub fn ring_contains_ring(outer: &CoordSeq, inner: &CoordSeq) -> bool {
    if rings_cross(outer, inner) {
        return false;
    }
    let mut any_inside = false;
    for coord in inner.iter() {
        match locate_point_in_ring(outer, coord) {
            PointLocation::Outside => return false,
            PointLocation::Inside => any_inside = true,
            PointLocation::Boundary => {}
        }
    }
    any_inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> CoordSeq {
        CoordSeq::from_xy([
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
            (x0, y0),
        ])
    }

    #[test]
    fn point_location() {
        let ring = square(0.0, 0.0, 10.0);
        assert_eq!(
            locate_point_in_ring(&ring, &Coord::xy(5.0, 5.0)),
            PointLocation::Inside
        );
        assert_eq!(
            locate_point_in_ring(&ring, &Coord::xy(15.0, 5.0)),
            PointLocation::Outside
        );
        assert_eq!(
            locate_point_in_ring(&ring, &Coord::xy(0.0, 5.0)),
            PointLocation::Boundary
        );
        assert_eq!(
            locate_point_in_ring(&ring, &Coord::xy(10.0, 10.0)),
            PointLocation::Boundary
        );
    }

    #[test]
    fn area_sign_matches_winding() {
        let ccw = square(0.0, 0.0, 2.0);
        assert_eq!(ring_signed_area(&ccw), 4.0);
        assert_eq!(ring_winding(&ccw), Winding::CounterClockwise);

        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(ring_signed_area(&cw), -4.0);
        assert_eq!(ring_winding(&cw), Winding::Clockwise);
    }

    #[test]
    fn containment() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square(2.0, 2.0, 2.0);
        assert!(ring_contains_ring(&outer, &inner));
        assert!(!ring_contains_ring(&inner, &outer));

        let overlapping = square(5.0, 5.0, 10.0);
        assert!(rings_cross(&outer, &overlapping));
        assert!(!ring_contains_ring(&outer, &overlapping));
    }

    #[test]
    fn touching_rings_do_not_cross() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 0.0, 10.0);
        assert!(!rings_cross(&a, &b));
    }

    #[test]
    fn segment_intersection() {
        let a1 = Coord::xy(0.0, 0.0);
        let a2 = Coord::xy(2.0, 2.0);
        let b1 = Coord::xy(0.0, 2.0);
        let b2 = Coord::xy(2.0, 0.0);
        assert!(segments_intersect(&a1, &a2, &b1, &b2));

        let c1 = Coord::xy(3.0, 3.0);
        let c2 = Coord::xy(4.0, 3.0);
        assert!(!segments_intersect(&a1, &a2, &c1, &c2));
    }
}
