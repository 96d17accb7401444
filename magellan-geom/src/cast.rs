//! Ownership-transferring casts between structurally compatible variants.
//!
//! Every cast consumes its input, moves the owned children into the target
//! wrapper and never clones coordinate storage. A failing cast consumes the
//! input too, mirroring the destroy-on-failure contract of the original
//! interface.

use crate::curve::{Curve, LinearRing};
use crate::curve_polygon::CurvePolygon;
use crate::error::MagellanError;
use crate::multi::{MultiCurve, MultiLineString, MultiPolygon, MultiSurface, Surface};
use crate::polygon::Polygon;

impl From<Polygon> for CurvePolygon {
    fn from(value: Polygon) -> Self {
        let srs = value.srs().cloned();
        let mut out = CurvePolygon::new();
        for ring in value.into_rings() {
            out.push_ring(Curve::LineString(ring.into_line_string()));
        }
        out.set_srs(srs);
        out
    }
}

impl TryFrom<CurvePolygon> for Polygon {
    type Error = MagellanError;

    /// Fails if any ring is not a plain line string: a true curve ring cannot
    /// be silently flattened.
    fn try_from(value: CurvePolygon) -> Result<Self, Self::Error> {
        let srs = value.srs().cloned();
        let mut out = Polygon::new();
        for ring in value.into_rings() {
            match ring {
                Curve::LineString(line) => out.push_ring(line.into_ring()),
                other => {
                    return Err(MagellanError::UnsupportedGeometryType(format!(
                        "cannot cast a curve polygon with a {} ring to polygon",
                        other.geometry_type().wkt_keyword()
                    )))
                }
            }
        }
        out.set_srs(srs);
        Ok(out)
    }
}

impl From<MultiPolygon> for MultiSurface {
    fn from(value: MultiPolygon) -> Self {
        let srs = value.srs().cloned();
        let mut out: MultiSurface = value
            .into_members()
            .into_iter()
            .map(Surface::Polygon)
            .collect();
        out.set_srs(srs);
        out
    }
}

impl TryFrom<MultiSurface> for MultiPolygon {
    type Error = MagellanError;

    fn try_from(value: MultiSurface) -> Result<Self, Self::Error> {
        let srs = value.srs().cloned();
        let mut out = MultiPolygon::new();
        for surface in value.into_members() {
            match surface {
                Surface::Polygon(p) => out.push(p),
                Surface::CurvePolygon(_) => {
                    return Err(MagellanError::UnsupportedGeometryType(
                        "multi surface member is not a polygon".into(),
                    ))
                }
            }
        }
        out.set_srs(srs);
        Ok(out)
    }
}

impl From<MultiLineString> for MultiCurve {
    fn from(value: MultiLineString) -> Self {
        let srs = value.srs().cloned();
        let mut out: MultiCurve = value
            .into_members()
            .into_iter()
            .map(Curve::LineString)
            .collect();
        out.set_srs(srs);
        out
    }
}

impl TryFrom<MultiCurve> for MultiLineString {
    type Error = MagellanError;

    fn try_from(value: MultiCurve) -> Result<Self, Self::Error> {
        let srs = value.srs().cloned();
        let mut out = MultiLineString::new();
        for curve in value.into_members() {
            match curve {
                Curve::LineString(l) => out.push(l),
                other => {
                    return Err(MagellanError::UnsupportedGeometryType(format!(
                        "multi curve member is a {}, not a line string",
                        other.geometry_type().wkt_keyword()
                    )))
                }
            }
        }
        out.set_srs(srs);
        Ok(out)
    }
}

/// Builds a polygon from a curve used as a ring, failing on non-linear curves.
pub fn curve_to_linear_ring(curve: Curve) -> Result<LinearRing, MagellanError> {
    match curve {
        Curve::LineString(line) => Ok(line.into_ring()),
        other => Err(MagellanError::UnsupportedGeometryType(format!(
            "a {} cannot be used as a linear ring",
            other.geometry_type().wkt_keyword()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CircularString, LineString};
    use assert_matches::assert_matches;

    fn linear_curve_polygon() -> CurvePolygon {
        let mut cp = CurvePolygon::new();
        cp.push_ring(Curve::LineString(LineString::from_xy([
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (0.0, 4.0),
            (0.0, 0.0),
        ])));
        cp.push_ring(Curve::LineString(LineString::from_xy([
            (1.0, 1.0),
            (2.0, 1.0),
            (2.0, 2.0),
            (1.0, 1.0),
        ])));
        cp
    }

    #[test]
    fn polygon_cast_round_trips() {
        let original = linear_curve_polygon();
        let polygon = Polygon::try_from(original.clone()).unwrap();
        assert_eq!(polygon.num_interior_rings(), 1);
        let back = CurvePolygon::from(polygon);
        assert_eq!(back, original);
    }

    #[test]
    fn curve_ring_blocks_polygon_cast() {
        let mut cp = linear_curve_polygon();
        cp.push_ring(Curve::CircularString(CircularString::from_xy([
            (0.5, 0.5),
            (0.7, 0.6),
            (0.9, 0.5),
            (0.7, 0.4),
            (0.5, 0.5),
        ])));
        assert_matches!(
            Polygon::try_from(cp),
            Err(MagellanError::UnsupportedGeometryType(_))
        );
    }

    #[test]
    fn multi_casts() {
        let mut mp = MultiPolygon::new();
        mp.push(Polygon::try_from(linear_curve_polygon()).unwrap());
        let ms = MultiSurface::from(mp.clone());
        assert_eq!(ms.len(), 1);
        let back = MultiPolygon::try_from(ms).unwrap();
        assert_eq!(back, mp);

        let mut mc = MultiCurve::new();
        mc.push(Curve::CircularString(CircularString::from_xy([
            (0.0, 0.0),
            (1.0, 1.0),
            (2.0, 0.0),
        ])));
        assert_matches!(
            MultiLineString::try_from(mc),
            Err(MagellanError::UnsupportedGeometryType(_))
        );
    }
}
