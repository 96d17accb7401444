//! Geometry collections and their constrained subtypes.

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, LineString};
use crate::curve_polygon::CurvePolygon;
use crate::envelope::Envelope;
use crate::error::MagellanError;
use crate::geometry::Geometry;
use crate::options::ArcOptions;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::srs::SrsRef;
use crate::types::GeometryType;

/// Any surface: the member type of multi surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    /// Surface with linear rings.
    Polygon(Polygon),
    /// Surface with curve rings.
    CurvePolygon(CurvePolygon),
}

impl Surface {
    /// Flattened type of the surface.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Surface::Polygon(_) => GeometryType::Polygon,
            Surface::CurvePolygon(_) => GeometryType::CurvePolygon,
        }
    }

    /// True if the surface has no coordinates.
    pub fn is_empty(&self) -> bool {
        match self {
            Surface::Polygon(p) => p.is_empty(),
            Surface::CurvePolygon(p) => p.is_empty(),
        }
    }

    /// True if the surface stores Z values.
    pub fn has_z(&self) -> bool {
        match self {
            Surface::Polygon(p) => p.has_z(),
            Surface::CurvePolygon(p) => p.has_z(),
        }
    }

    /// True if the surface stores M values.
    pub fn has_m(&self) -> bool {
        match self {
            Surface::Polygon(p) => p.has_m(),
            Surface::CurvePolygon(p) => p.has_m(),
        }
    }

    /// XY bounding box of the surface.
    pub fn envelope(&self) -> Envelope {
        match self {
            Surface::Polygon(p) => p.envelope(),
            Surface::CurvePolygon(p) => p.envelope(),
        }
    }

    /// Approximates the surface with a plain polygon.
    pub fn linearize(&self, options: &ArcOptions) -> Polygon {
        match self {
            Surface::Polygon(p) => p.clone(),
            Surface::CurvePolygon(p) => p.linearize(options),
        }
    }

    /// Assigns the (shared) spatial reference system.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        match self {
            Surface::Polygon(p) => p.set_srs(srs),
            Surface::CurvePolygon(p) => p.set_srs(srs),
        }
    }
}

macro_rules! collection_common {
    ($name:ident, $member:ty, $field:ident) => {
        impl $name {
            /// Creates an empty collection.
            pub fn new() -> Self {
                Self::default()
            }

            /// The members of the collection.
            pub fn members(&self) -> &[$member] {
                &self.$field
            }

            /// Consumes self returning the members.
            pub fn into_members(self) -> Vec<$member> {
                self.$field
            }

            /// Number of members.
            pub fn len(&self) -> usize {
                self.$field.len()
            }

            /// True if every member is empty (vacuously true with none).
            pub fn is_empty(&self) -> bool {
                self.$field.iter().all(|g| g.is_empty())
            }

            /// XY bounding box over all members.
            pub fn envelope(&self) -> Envelope {
                let mut env = Envelope::empty();
                for member in &self.$field {
                    env.merge(&member.envelope());
                }
                env
            }

            /// The associated spatial reference system.
            pub fn srs(&self) -> Option<&SrsRef> {
                self.srs.as_ref()
            }
        }

        impl FromIterator<$member> for $name {
            fn from_iter<T: IntoIterator<Item = $member>>(iter: T) -> Self {
                let mut collection = Self::new();
                for member in iter {
                    collection.push(member);
                }
                collection
            }
        }
    };
}

/// A collection of points.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPoint {
    points: Vec<Point>,
    srs: Option<SrsRef>,
}

collection_common!(MultiPoint, Point, points);

impl MultiPoint {
    /// Appends a point.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Appends a geometry that must be a point.
    pub fn push_geometry(&mut self, geometry: Geometry) -> Result<(), MagellanError> {
        match geometry {
            Geometry::Point(p) => {
                self.points.push(p);
                Ok(())
            }
            other => Err(MagellanError::UnsupportedGeometryType(format!(
                "multi point cannot hold a {}",
                other.geometry_type().wkt_keyword()
            ))),
        }
    }

    /// Assigns the (shared) spatial reference system to self and all members.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        for p in &mut self.points {
            p.set_srs(srs.clone());
        }
        self.srs = srs;
    }
}

/// A collection of line strings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLineString {
    lines: Vec<LineString>,
    srs: Option<SrsRef>,
}

collection_common!(MultiLineString, LineString, lines);

impl MultiLineString {
    /// Appends a line string.
    pub fn push(&mut self, line: LineString) {
        self.lines.push(line);
    }

    /// Appends a geometry that must be a line string.
    pub fn push_geometry(&mut self, geometry: Geometry) -> Result<(), MagellanError> {
        match geometry {
            Geometry::LineString(l) => {
                self.lines.push(l);
                Ok(())
            }
            other => Err(MagellanError::UnsupportedGeometryType(format!(
                "multi line string cannot hold a {}",
                other.geometry_type().wkt_keyword()
            ))),
        }
    }

    /// Assigns the (shared) spatial reference system to self and all members.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        for l in &mut self.lines {
            l.set_srs(srs.clone());
        }
        self.srs = srs;
    }
}

/// A collection of curves of any kind.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiCurve {
    curves: Vec<Curve>,
    srs: Option<SrsRef>,
}

collection_common!(MultiCurve, Curve, curves);

impl MultiCurve {
    /// Appends a curve.
    pub fn push(&mut self, curve: Curve) {
        self.curves.push(curve);
    }

    /// Appends a geometry that must be a curve.
    pub fn push_geometry(&mut self, geometry: Geometry) -> Result<(), MagellanError> {
        match geometry {
            Geometry::LineString(c) => self.curves.push(Curve::LineString(c)),
            Geometry::CircularString(c) => self.curves.push(Curve::CircularString(c)),
            Geometry::CompoundCurve(c) => self.curves.push(Curve::Compound(c)),
            other => {
                return Err(MagellanError::UnsupportedGeometryType(format!(
                    "multi curve cannot hold a {}",
                    other.geometry_type().wkt_keyword()
                )))
            }
        }
        Ok(())
    }

    /// Assigns the (shared) spatial reference system to self and all members.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        for c in &mut self.curves {
            c.set_srs(srs.clone());
        }
        self.srs = srs;
    }
}

/// A collection of polygons.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
    srs: Option<SrsRef>,
}

collection_common!(MultiPolygon, Polygon, polygons);

impl MultiPolygon {
    /// Appends a polygon.
    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Appends a geometry that must be a polygon.
    pub fn push_geometry(&mut self, geometry: Geometry) -> Result<(), MagellanError> {
        match geometry {
            Geometry::Polygon(p) => {
                self.polygons.push(p);
                Ok(())
            }
            other => Err(MagellanError::UnsupportedGeometryType(format!(
                "multi polygon cannot hold a {}",
                other.geometry_type().wkt_keyword()
            ))),
        }
    }

    /// Assigns the (shared) spatial reference system to self and all members.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        for p in &mut self.polygons {
            p.set_srs(srs.clone());
        }
        self.srs = srs;
    }
}

/// A collection of surfaces of any kind.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSurface {
    surfaces: Vec<Surface>,
    srs: Option<SrsRef>,
}

collection_common!(MultiSurface, Surface, surfaces);

impl MultiSurface {
    /// Appends a surface.
    pub fn push(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    /// Appends a geometry that must be a surface.
    pub fn push_geometry(&mut self, geometry: Geometry) -> Result<(), MagellanError> {
        match geometry {
            Geometry::Polygon(p) => self.surfaces.push(Surface::Polygon(p)),
            Geometry::CurvePolygon(p) => self.surfaces.push(Surface::CurvePolygon(p)),
            other => {
                return Err(MagellanError::UnsupportedGeometryType(format!(
                    "multi surface cannot hold a {}",
                    other.geometry_type().wkt_keyword()
                )))
            }
        }
        Ok(())
    }

    /// Assigns the (shared) spatial reference system to self and all members.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        for s in &mut self.surfaces {
            s.set_srs(srs.clone());
        }
        self.srs = srs;
    }
}

/// A heterogeneous collection of geometries.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryCollection {
    geometries: Vec<Geometry>,
    srs: Option<SrsRef>,
}

collection_common!(GeometryCollection, Geometry, geometries);

impl GeometryCollection {
    /// Appends a geometry of any type.
    pub fn push(&mut self, geometry: Geometry) {
        self.geometries.push(geometry);
    }

    /// Assigns the (shared) spatial reference system to self and all members.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        for g in &mut self.geometries {
            g.set_srs(srs.clone());
        }
        self.srs = srs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn subtype_predicate_enforced() {
        let mut mp = MultiPolygon::new();
        mp.push_geometry(Geometry::Polygon(Polygon::new())).unwrap();
        let err = mp.push_geometry(Geometry::Point(Point::new(0.0, 0.0)));
        assert_matches!(err, Err(MagellanError::UnsupportedGeometryType(_)));
        assert_eq!(mp.len(), 1);
    }

    #[test]
    fn emptiness_is_recursive() {
        let mut collection = GeometryCollection::new();
        assert!(collection.is_empty());
        collection.push(Geometry::Point(Point::empty()));
        assert!(collection.is_empty());
        collection.push(Geometry::Point(Point::new(1.0, 1.0)));
        assert!(!collection.is_empty());
        assert_eq!(collection.len(), 2);
    }
}
