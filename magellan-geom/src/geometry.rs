//! The closed set of geometry variants.

use serde::{Deserialize, Serialize};

use crate::arc;
use crate::curve::{CircularString, CompoundCurve, Curve, LineString};
use crate::curve_polygon::CurvePolygon;
use crate::envelope::{Envelope, Envelope3};
use crate::error::MagellanError;
use crate::multi::{
    GeometryCollection, MultiCurve, MultiLineString, MultiPoint, MultiPolygon, MultiSurface,
    Surface,
};
use crate::options::ArcOptions;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::srs::SrsRef;
use crate::types::GeometryType;

/// Any geometry value.
///
/// The variant set is closed: every dispatch in the crate is an exhaustive
/// match over this enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// A single location.
    Point(Point),
    /// Straight segments.
    LineString(LineString),
    /// Circular arcs.
    CircularString(CircularString),
    /// A chain of line strings and circular strings.
    CompoundCurve(CompoundCurve),
    /// A surface with linear rings.
    Polygon(Polygon),
    /// A surface with curve rings.
    CurvePolygon(CurvePolygon),
    /// A collection of points.
    MultiPoint(MultiPoint),
    /// A collection of line strings.
    MultiLineString(MultiLineString),
    /// A collection of curves.
    MultiCurve(MultiCurve),
    /// A collection of polygons.
    MultiPolygon(MultiPolygon),
    /// A collection of surfaces.
    MultiSurface(MultiSurface),
    /// A heterogeneous collection.
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// Flattened type discriminant of the value.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::CircularString(_) => GeometryType::CircularString,
            Geometry::CompoundCurve(_) => GeometryType::CompoundCurve,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::CurvePolygon(_) => GeometryType::CurvePolygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiCurve(_) => GeometryType::MultiCurve,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::MultiSurface(_) => GeometryType::MultiSurface,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    /// True if the geometry holds no coordinates.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(g) => g.is_empty(),
            Geometry::LineString(g) => g.is_empty(),
            Geometry::CircularString(g) => g.is_empty(),
            Geometry::CompoundCurve(g) => g.is_empty(),
            Geometry::Polygon(g) => g.is_empty(),
            Geometry::CurvePolygon(g) => g.is_empty(),
            Geometry::MultiPoint(g) => g.is_empty(),
            Geometry::MultiLineString(g) => g.is_empty(),
            Geometry::MultiCurve(g) => g.is_empty(),
            Geometry::MultiPolygon(g) => g.is_empty(),
            Geometry::MultiSurface(g) => g.is_empty(),
            Geometry::GeometryCollection(g) => g.is_empty(),
        }
    }

    /// True if the geometry stores Z values.
    pub fn has_z(&self) -> bool {
        match self {
            Geometry::Point(g) => g.has_z(),
            Geometry::LineString(g) => g.seq().has_z(),
            Geometry::CircularString(g) => g.seq().has_z(),
            Geometry::CompoundCurve(g) => g.has_z(),
            Geometry::Polygon(g) => g.has_z(),
            Geometry::CurvePolygon(g) => g.has_z(),
            Geometry::MultiPoint(g) => g.members().first().is_some_and(|m| m.has_z()),
            Geometry::MultiLineString(g) => g.members().first().is_some_and(|m| m.seq().has_z()),
            Geometry::MultiCurve(g) => g.members().first().is_some_and(|m| m.has_z()),
            Geometry::MultiPolygon(g) => g.members().first().is_some_and(|m| m.has_z()),
            Geometry::MultiSurface(g) => g.members().first().is_some_and(|m| m.has_z()),
            Geometry::GeometryCollection(g) => g.members().first().is_some_and(|m| m.has_z()),
        }
    }

    /// True if the geometry stores M values.
    pub fn has_m(&self) -> bool {
        match self {
            Geometry::Point(g) => g.has_m(),
            Geometry::LineString(g) => g.seq().has_m(),
            Geometry::CircularString(g) => g.seq().has_m(),
            Geometry::CompoundCurve(g) => g.has_m(),
            Geometry::Polygon(g) => g.has_m(),
            Geometry::CurvePolygon(g) => g.has_m(),
            Geometry::MultiPoint(g) => g.members().first().is_some_and(|m| m.has_m()),
            Geometry::MultiLineString(g) => g.members().first().is_some_and(|m| m.seq().has_m()),
            Geometry::MultiCurve(g) => g.members().first().is_some_and(|m| m.has_m()),
            Geometry::MultiPolygon(g) => g.members().first().is_some_and(|m| m.has_m()),
            Geometry::MultiSurface(g) => g.members().first().is_some_and(|m| m.has_m()),
            Geometry::GeometryCollection(g) => g.members().first().is_some_and(|m| m.has_m()),
        }
    }

    /// Coordinate dimension: 2, 3 with Z, plus 1 with M.
    pub fn coordinate_dimension(&self) -> usize {
        2 + usize::from(self.has_z()) + usize::from(self.has_m())
    }

    /// XY bounding box by recursive min/max reduction over all coordinates.
    pub fn envelope(&self) -> Envelope {
        match self {
            Geometry::Point(g) => g.envelope(),
            Geometry::LineString(g) => g.envelope(),
            Geometry::CircularString(g) => g.envelope(),
            Geometry::CompoundCurve(g) => g.envelope(),
            Geometry::Polygon(g) => g.envelope(),
            Geometry::CurvePolygon(g) => g.envelope(),
            Geometry::MultiPoint(g) => g.envelope(),
            Geometry::MultiLineString(g) => g.envelope(),
            Geometry::MultiCurve(g) => g.envelope(),
            Geometry::MultiPolygon(g) => g.envelope(),
            Geometry::MultiSurface(g) => g.envelope(),
            Geometry::GeometryCollection(g) => g.envelope(),
        }
    }

    /// Bounding box including the Z range, when the geometry is 3D.
    pub fn envelope_3d(&self) -> Envelope3 {
        let mut env = Envelope3 {
            xy: self.envelope(),
            z_min: None,
            z_max: None,
        };
        if self.has_z() {
            if let Some((z_min, z_max)) = self.z_range() {
                env.extend_z(z_min, z_max);
            }
        }
        env
    }

    fn z_range(&self) -> Option<(f64, f64)> {
        fn merge(acc: Option<(f64, f64)>, next: Option<(f64, f64)>) -> Option<(f64, f64)> {
            match (acc, next) {
                (Some((a0, a1)), Some((b0, b1))) => Some((a0.min(b0), a1.max(b1))),
                (v, None) | (None, v) => v,
            }
        }
        fn curve_z(curve: &Curve) -> Option<(f64, f64)> {
            match curve {
                Curve::LineString(c) => c.seq().z_range(),
                Curve::CircularString(c) => c.seq().z_range(),
                Curve::Compound(c) => c
                    .segments()
                    .iter()
                    .fold(None, |acc, s| merge(acc, curve_z(s))),
            }
        }

        match self {
            Geometry::Point(g) => g.z().map(|z| (z, z)),
            Geometry::LineString(g) => g.seq().z_range(),
            Geometry::CircularString(g) => g.seq().z_range(),
            Geometry::CompoundCurve(g) => g
                .segments()
                .iter()
                .fold(None, |acc, s| merge(acc, curve_z(s))),
            Geometry::Polygon(g) => g
                .rings()
                .iter()
                .fold(None, |acc, r| merge(acc, r.seq().z_range())),
            Geometry::CurvePolygon(g) => g
                .rings()
                .iter()
                .fold(None, |acc, r| merge(acc, curve_z(r))),
            Geometry::MultiPoint(g) => g
                .members()
                .iter()
                .fold(None, |acc, p| merge(acc, p.z().map(|z| (z, z)))),
            Geometry::MultiLineString(g) => g
                .members()
                .iter()
                .fold(None, |acc, l| merge(acc, l.seq().z_range())),
            Geometry::MultiCurve(g) => g
                .members()
                .iter()
                .fold(None, |acc, c| merge(acc, curve_z(c))),
            Geometry::MultiPolygon(g) => g.members().iter().fold(None, |acc, p| {
                merge(
                    acc,
                    p.rings()
                        .iter()
                        .fold(None, |acc, r| merge(acc, r.seq().z_range())),
                )
            }),
            Geometry::MultiSurface(g) => g.members().iter().fold(None, |acc, s| {
                merge(
                    acc,
                    match s {
                        Surface::Polygon(p) => p
                            .rings()
                            .iter()
                            .fold(None, |acc, r| merge(acc, r.seq().z_range())),
                        Surface::CurvePolygon(p) => {
                            p.rings().iter().fold(None, |acc, r| merge(acc, curve_z(r)))
                        }
                    },
                )
            }),
            Geometry::GeometryCollection(g) => g
                .members()
                .iter()
                .fold(None, |acc, m| merge(acc, m.z_range())),
        }
    }

    /// Total number of stored coordinates.
    pub fn point_count(&self) -> usize {
        match self {
            Geometry::Point(g) => usize::from(!g.is_empty()),
            Geometry::LineString(g) => g.num_points(),
            Geometry::CircularString(g) => g.num_points(),
            Geometry::CompoundCurve(g) => {
                g.segments().iter().map(|s| s.point_count()).sum()
            }
            Geometry::Polygon(g) => g.rings().iter().map(|r| r.num_points()).sum(),
            Geometry::CurvePolygon(g) => g.rings().iter().map(|r| r.point_count()).sum(),
            Geometry::MultiPoint(g) => g.members().iter().filter(|p| !p.is_empty()).count(),
            Geometry::MultiLineString(g) => g.members().iter().map(|l| l.num_points()).sum(),
            Geometry::MultiCurve(g) => g.members().iter().map(|c| c.point_count()).sum(),
            Geometry::MultiPolygon(g) => g
                .members()
                .iter()
                .flat_map(|p| p.rings())
                .map(|r| r.num_points())
                .sum(),
            Geometry::MultiSurface(g) => g
                .members()
                .iter()
                .map(|s| match s {
                    Surface::Polygon(p) => p.rings().iter().map(|r| r.num_points()).sum::<usize>(),
                    Surface::CurvePolygon(p) => {
                        p.rings().iter().map(|r| r.point_count()).sum::<usize>()
                    }
                })
                .sum(),
            Geometry::GeometryCollection(g) => {
                g.members().iter().map(|m| m.point_count()).sum()
            }
        }
    }

    /// Structural validation of the value and its children.
    pub fn validate(&self) -> Result<(), MagellanError> {
        match self {
            Geometry::Point(_) => Ok(()),
            Geometry::LineString(_) => Ok(()),
            Geometry::CircularString(g) => g.validate(),
            Geometry::CompoundCurve(_) => Ok(()),
            Geometry::Polygon(g) => g.validate(),
            Geometry::CurvePolygon(g) => g.validate(),
            Geometry::MultiPoint(_) => Ok(()),
            Geometry::MultiLineString(_) => Ok(()),
            Geometry::MultiCurve(g) => g.members().iter().try_for_each(|c| c.validate()),
            Geometry::MultiPolygon(g) => g.members().iter().try_for_each(|p| p.validate()),
            Geometry::MultiSurface(g) => g.members().iter().try_for_each(|s| match s {
                Surface::Polygon(p) => p.validate(),
                Surface::CurvePolygon(p) => p.validate(),
            }),
            Geometry::GeometryCollection(g) => {
                g.members().iter().try_for_each(|m| m.validate())
            }
        }
    }

    /// The associated spatial reference system.
    pub fn srs(&self) -> Option<&SrsRef> {
        match self {
            Geometry::Point(g) => g.srs(),
            Geometry::LineString(g) => g.srs(),
            Geometry::CircularString(g) => g.srs(),
            Geometry::CompoundCurve(g) => g.srs(),
            Geometry::Polygon(g) => g.srs(),
            Geometry::CurvePolygon(g) => g.srs(),
            Geometry::MultiPoint(g) => g.srs(),
            Geometry::MultiLineString(g) => g.srs(),
            Geometry::MultiCurve(g) => g.srs(),
            Geometry::MultiPolygon(g) => g.srs(),
            Geometry::MultiSurface(g) => g.srs(),
            Geometry::GeometryCollection(g) => g.srs(),
        }
    }

    /// Assigns the (shared) spatial reference system recursively.
    pub fn set_srs(&mut self, srs: Option<SrsRef>) {
        match self {
            Geometry::Point(g) => g.set_srs(srs),
            Geometry::LineString(g) => g.set_srs(srs),
            Geometry::CircularString(g) => g.set_srs(srs),
            Geometry::CompoundCurve(g) => g.set_srs(srs),
            Geometry::Polygon(g) => g.set_srs(srs),
            Geometry::CurvePolygon(g) => g.set_srs(srs),
            Geometry::MultiPoint(g) => g.set_srs(srs),
            Geometry::MultiLineString(g) => g.set_srs(srs),
            Geometry::MultiCurve(g) => g.set_srs(srs),
            Geometry::MultiPolygon(g) => g.set_srs(srs),
            Geometry::MultiSurface(g) => g.set_srs(srs),
            Geometry::GeometryCollection(g) => g.set_srs(srs),
        }
    }

    /// Replaces every curve-typed part with its linear approximation.
    ///
    /// Line-typed geometries are returned unchanged (cloned).
    pub fn linear_geometry(&self, options: &ArcOptions) -> Geometry {
        match self {
            Geometry::CircularString(g) => Geometry::LineString(g.linearize(options)),
            Geometry::CompoundCurve(g) => Geometry::LineString(g.linearize(options)),
            Geometry::CurvePolygon(g) => Geometry::Polygon(g.linearize(options)),
            Geometry::MultiCurve(g) => Geometry::MultiLineString(
                g.members().iter().map(|c| c.linearize(options)).collect(),
            ),
            Geometry::MultiSurface(g) => Geometry::MultiPolygon(
                g.members().iter().map(|s| s.linearize(options)).collect(),
            ),
            Geometry::GeometryCollection(g) => {
                let mut out = GeometryCollection::new();
                for member in g.members() {
                    out.push(member.linear_geometry(options));
                }
                Geometry::GeometryCollection(out)
            }
            other => other.clone(),
        }
    }

    /// Replaces runs of points consistent with circular arcs by true curve
    /// geometries. The inverse of [`Geometry::linear_geometry`] for stroked
    /// arcs.
    pub fn curve_geometry(&self) -> Geometry {
        match self {
            Geometry::LineString(g) => arc::detect::line_string_to_curve(g).into(),
            Geometry::Polygon(g) => {
                let mut out = CurvePolygon::new();
                for ring in g.rings() {
                    out.push_ring(arc::detect::line_string_to_curve(
                        &ring.clone().into_line_string(),
                    ));
                }
                if out
                    .rings()
                    .iter()
                    .all(|r| matches!(r, Curve::LineString(_)))
                {
                    self.clone()
                } else {
                    Geometry::CurvePolygon(out)
                }
            }
            Geometry::MultiLineString(g) => {
                let curves: Vec<Curve> = g
                    .members()
                    .iter()
                    .map(arc::detect::line_string_to_curve)
                    .collect();
                if curves.iter().all(|c| matches!(c, Curve::LineString(_))) {
                    self.clone()
                } else {
                    Geometry::MultiCurve(curves.into_iter().collect())
                }
            }
            Geometry::MultiPolygon(g) => {
                let surfaces: Vec<Geometry> = g
                    .members()
                    .iter()
                    .map(|p| Geometry::Polygon(p.clone()).curve_geometry())
                    .collect();
                if surfaces.iter().all(|s| matches!(s, Geometry::Polygon(_))) {
                    self.clone()
                } else {
                    let mut out = MultiSurface::new();
                    for s in surfaces {
                        match s {
                            Geometry::Polygon(p) => out.push(Surface::Polygon(p)),
                            Geometry::CurvePolygon(p) => out.push(Surface::CurvePolygon(p)),
                            _ => {}
                        }
                    }
                    Geometry::MultiSurface(out)
                }
            }
            Geometry::GeometryCollection(g) => {
                let mut out = GeometryCollection::new();
                for member in g.members() {
                    out.push(member.curve_geometry());
                }
                Geometry::GeometryCollection(out)
            }
            other => other.clone(),
        }
    }
}

impl From<Point> for Geometry {
    fn from(value: Point) -> Self {
        Geometry::Point(value)
    }
}

impl From<LineString> for Geometry {
    fn from(value: LineString) -> Self {
        Geometry::LineString(value)
    }
}

impl From<CircularString> for Geometry {
    fn from(value: CircularString) -> Self {
        Geometry::CircularString(value)
    }
}

impl From<CompoundCurve> for Geometry {
    fn from(value: CompoundCurve) -> Self {
        Geometry::CompoundCurve(value)
    }
}

impl From<Polygon> for Geometry {
    fn from(value: Polygon) -> Self {
        Geometry::Polygon(value)
    }
}

impl From<CurvePolygon> for Geometry {
    fn from(value: CurvePolygon) -> Self {
        Geometry::CurvePolygon(value)
    }
}

impl From<MultiPoint> for Geometry {
    fn from(value: MultiPoint) -> Self {
        Geometry::MultiPoint(value)
    }
}

impl From<MultiLineString> for Geometry {
    fn from(value: MultiLineString) -> Self {
        Geometry::MultiLineString(value)
    }
}

impl From<MultiCurve> for Geometry {
    fn from(value: MultiCurve) -> Self {
        Geometry::MultiCurve(value)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(value: MultiPolygon) -> Self {
        Geometry::MultiPolygon(value)
    }
}

impl From<MultiSurface> for Geometry {
    fn from(value: MultiSurface) -> Self {
        Geometry::MultiSurface(value)
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(value: GeometryCollection) -> Self {
        Geometry::GeometryCollection(value)
    }
}

impl From<Curve> for Geometry {
    fn from(value: Curve) -> Self {
        match value {
            Curve::LineString(c) => Geometry::LineString(c),
            Curve::CircularString(c) => Geometry::CircularString(c),
            Curve::Compound(c) => Geometry::CompoundCurve(c),
        }
    }
}

impl From<Surface> for Geometry {
    fn from(value: Surface) -> Self {
        match value {
            Surface::Polygon(s) => Geometry::Polygon(s),
            Surface::CurvePolygon(s) => Geometry::CurvePolygon(s),
        }
    }
}
