//! Element dispatch: turns a [`GmlNode`] tree into a geometry.

use magellan_geom::arc::arc_parameters;
use magellan_geom::{
    CircularString, CompoundCurve, Coord, CoordSeq, Curve, CurvePolygon, Geometry,
    GeometryCollection, LineString, LinearRing, MultiCurve, MultiLineString, MultiPoint,
    MultiPolygon, MultiSurface, Point, Polygon, Surface,
};

use crate::coords::{node_coords, parse_pos, parse_pos_list};
use crate::error::GmlError;
use crate::node::GmlNode;
use crate::options::GmlOptions;
use crate::topo;

/// Hard recursion cap over the element tree. Exceeding it fails the parse.
pub(crate) const MAX_NESTING_DEPTH: usize = 32;

/// Imports the geometry described by a GML element tree.
pub fn import_geometry(node: &GmlNode, options: &GmlOptions) -> Result<Geometry, GmlError> {
    match import_node(node, options, 0, None) {
        Ok(geometry) => Ok(geometry),
        Err(err) => {
            log::warn!("failed to import <{}>: {err}", node.name());
            Err(err)
        }
    }
}

fn check_depth(depth: usize) -> Result<(), GmlError> {
    if depth > MAX_NESTING_DEPTH {
        Err(GmlError::TooDeep(MAX_NESTING_DEPTH))
    } else {
        Ok(())
    }
}

fn srs_dimension(node: &GmlNode, inherited: Option<usize>) -> Option<usize> {
    node.attr("srsDimension")
        .and_then(|v| v.parse().ok())
        .or(inherited)
}

/// Unwraps a property element (`<xMember>`, `<exterior>`, ...) to the
/// geometry element inside it.
fn property_child<'a>(prop: &'a GmlNode) -> Result<&'a GmlNode, GmlError> {
    prop.first_child()
        .ok_or_else(|| GmlError::Invalid(format!("property <{}> is empty", prop.name())))
}

fn as_curve(geometry: Geometry) -> Result<Curve, GmlError> {
    match geometry {
        Geometry::LineString(g) => Ok(Curve::LineString(g)),
        Geometry::CircularString(g) => Ok(Curve::CircularString(g)),
        Geometry::CompoundCurve(g) => Ok(Curve::Compound(g)),
        other => Err(GmlError::Invalid(format!(
            "{:?} cannot be used as a curve",
            other.geometry_type()
        ))),
    }
}

/// Collects the member geometries of a container element from both the
/// singular (`<xMember>`, one child each) and plural (`<xMembers>`, many
/// children) property forms.
fn member_nodes<'a>(
    node: &'a GmlNode,
    singular: &'a [&'a str],
    plural: &'a [&'a str],
) -> Result<Vec<&'a GmlNode>, GmlError> {
    let mut members = vec![];
    for prop in node.children_named(singular) {
        members.push(property_child(prop)?);
    }
    for prop in node.children_named(plural) {
        members.extend(prop.children());
    }
    Ok(members)
}

fn import_ring(
    node: &GmlNode,
    options: &GmlOptions,
    depth: usize,
    dim: Option<usize>,
) -> Result<Curve, GmlError> {
    as_curve(import_node(node, options, depth, dim)?)
}

fn rings_to_surface(rings: Vec<Curve>) -> Geometry {
    if rings.iter().all(|r| matches!(r, Curve::LineString(_))) {
        let mut polygon = Polygon::new();
        for ring in rings {
            if let Curve::LineString(line) = ring {
                let mut ring = line.into_ring();
                ring.close();
                polygon.push_ring(ring);
            }
        }
        Geometry::Polygon(polygon)
    } else {
        let mut polygon = CurvePolygon::new();
        for ring in rings {
            polygon.push_ring(ring);
        }
        Geometry::CurvePolygon(polygon)
    }
}

fn import_polygon(
    node: &GmlNode,
    options: &GmlOptions,
    depth: usize,
    dim: Option<usize>,
) -> Result<Geometry, GmlError> {
    let mut rings = vec![];
    for prop in node.children_named(&["outerBoundaryIs", "exterior"]) {
        rings.push(import_ring(property_child(prop)?, options, depth, dim)?);
    }
    if rings.len() > 1 {
        return Err(GmlError::Invalid(format!(
            "<{}> has {} exterior rings",
            node.name(),
            rings.len()
        )));
    }
    for prop in node.children_named(&["innerBoundaryIs", "interior"]) {
        rings.push(import_ring(property_child(prop)?, options, depth, dim)?);
    }
    if rings.is_empty() {
        // An empty polygon element is a valid empty polygon.
        return Ok(Polygon::new().into());
    }
    Ok(rings_to_surface(rings))
}

/// Builds the full-circle circular string through three points: the three
/// control points, a fourth on the far side, and the start point again.
fn circle_through(seq: &CoordSeq) -> Result<CircularString, GmlError> {
    let [p0, p1, p2] = match seq.coords() {
        [p0, p1, p2] => [*p0, *p1, *p2],
        other => {
            return Err(GmlError::Invalid(format!(
                "<Circle> has {} points, expected 3",
                other.len()
            )))
        }
    };
    let params = arc_parameters(&p0, &p1, &p2)
        .ok_or_else(|| GmlError::Invalid("<Circle> points are collinear".into()))?;
    let full_turn = if params.is_counterclockwise() {
        std::f64::consts::TAU
    } else {
        -std::f64::consts::TAU
    };
    let alpha3 = (params.alpha2 + params.alpha0 + full_turn) / 2.0;
    let p3 = params.point_at(alpha3);

    let mut out = CoordSeq::with_dimensions(seq.has_z(), false);
    out.push(p0);
    out.push(p1);
    out.push(p2);
    out.push(Coord::xyz(p3.x, p3.y, p0.z));
    out.push(p0);
    Ok(CircularString::from_seq(out))
}

fn child_value(node: &GmlNode, name: &str) -> Result<f64, GmlError> {
    let child = node
        .child(name)
        .ok_or_else(|| GmlError::Invalid(format!("<{}> is missing <{name}>", node.name())))?;
    child
        .text()
        .trim()
        .parse()
        .map_err(|_| GmlError::Invalid(format!("invalid <{name}> value {:?}", child.text())))
}

/// `<ArcByBulge>`: two points plus a bulge distance, the arc midpoint lying
/// `bulge` away from the chord midpoint along its normal (side from the sign
/// of `<normal>`).
fn arc_by_bulge(node: &GmlNode, dim: Option<usize>) -> Result<CircularString, GmlError> {
    let seq = node_coords(node, dim)?;
    let [p0, p1] = match seq.coords() {
        [p0, p1] => [*p0, *p1],
        other => {
            return Err(GmlError::Invalid(format!(
                "<ArcByBulge> has {} points, expected 2",
                other.len()
            )))
        }
    };
    let bulge = child_value(node, "bulge")?;
    let normal = child_value(node, "normal")?;
    let (dx, dy) = (p1.x - p0.x, p1.y - p0.y);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return Err(GmlError::Invalid("<ArcByBulge> chord has zero length".into()));
    }
    let side = if normal < 0.0 { -1.0 } else { 1.0 };
    let mid = Coord::xyz(
        (p0.x + p1.x) / 2.0 - side * bulge * dy / length,
        (p0.y + p1.y) / 2.0 + side * bulge * dx / length,
        (p0.z + p1.z) / 2.0,
    );
    let mut out = CoordSeq::with_dimensions(seq.has_z(), false);
    out.push(p0);
    out.push(mid);
    out.push(p1);
    Ok(CircularString::from_seq(out))
}

fn center_of(node: &GmlNode, dim: Option<usize>) -> Result<Coord, GmlError> {
    if let Some(pos) = node.child("pos") {
        return parse_pos(pos);
    }
    let seq = node_coords(node, dim)?;
    seq.first().copied().ok_or_else(|| {
        GmlError::Invalid(format!("<{}> has no center point", node.name()))
    })
}

/// `<ArcByCenterPoint>`/`<CircleByCenterPoint>`: a center, a radius and
/// (for the arc form) start/end angles in degrees, counterclockwise from
/// the positive X axis.
fn arc_by_center(node: &GmlNode, dim: Option<usize>, full: bool) -> Result<CircularString, GmlError> {
    let center = center_of(node, dim)?;
    let radius = child_value(node, "radius")?;
    let angles: Vec<f64> = if full {
        vec![0.0, 90.0, 180.0, 270.0]
    } else {
        let start = child_value(node, "startAngle")?;
        let end = child_value(node, "endAngle")?;
        vec![start, (start + end) / 2.0, end]
    };
    let mut seq = CoordSeq::new();
    for angle in angles {
        let alpha = angle.to_radians();
        seq.push(Coord::xy(
            center.x + radius * alpha.cos(),
            center.y + radius * alpha.sin(),
        ));
    }
    if full {
        // Repeat the start point exactly so the ring closes bitwise.
        seq.close();
    }
    Ok(CircularString::from_seq(seq))
}

fn segments_to_curve(segments: Vec<Curve>) -> Result<Geometry, GmlError> {
    let mut segments = segments;
    match segments.len() {
        0 => Ok(CompoundCurve::new().into()),
        1 => Ok(match segments.remove(0) {
            Curve::LineString(g) => g.into(),
            Curve::CircularString(g) => g.into(),
            Curve::Compound(g) => g.into(),
        }),
        _ => {
            let mut compound = CompoundCurve::new();
            for segment in segments {
                compound.push_segment(segment)?;
            }
            Ok(compound.into())
        }
    }
}

/// Collapses to a plain multipolygon when no member needs curves.
fn multi_surface_from(members: Vec<Surface>) -> Geometry {
    if members.iter().all(|s| matches!(s, Surface::Polygon(_))) {
        let mut multi = MultiPolygon::new();
        for member in members {
            if let Surface::Polygon(polygon) = member {
                multi.push(polygon);
            }
        }
        multi.into()
    } else {
        let mut multi = MultiSurface::new();
        for member in members {
            multi.push(member);
        }
        multi.into()
    }
}

pub(crate) fn import_node(
    node: &GmlNode,
    options: &GmlOptions,
    depth: usize,
    inherited_dim: Option<usize>,
) -> Result<Geometry, GmlError> {
    check_depth(depth)?;
    let dim = srs_dimension(node, inherited_dim);
    let name = node.bare_name().to_ascii_lowercase();

    match name.as_str() {
        "point" => {
            let seq = node_coords(node, dim)?;
            match seq.len() {
                0 => Ok(Point::empty().into()),
                1 => {
                    let coord = seq.coords()[0];
                    Ok(Point::from_coord(coord, seq.has_z(), false).into())
                }
                n => Err(GmlError::Invalid(format!("<Point> has {n} coordinates"))),
            }
        }
        "linestring" | "linestringsegment" | "geodesicstring" => {
            Ok(LineString::from_seq(node_coords(node, dim)?).into())
        }
        "linearring" => {
            let mut line = LineString::from_seq(node_coords(node, dim)?);
            if !line.is_closed() && line.num_points() > 0 {
                line.seq_mut().close();
            }
            Ok(line.into())
        }
        "arc" | "arcstring" => {
            let arc = CircularString::from_seq(node_coords(node, dim)?);
            if name == "arc" && arc.num_points() != 3 {
                log::warn!(
                    "<{}> has {} points where the schema requires 3",
                    node.name(),
                    arc.num_points()
                );
            }
            arc.validate()?;
            Ok(arc.into())
        }
        "circle" => Ok(circle_through(&node_coords(node, dim)?)?.into()),
        "arcbybulge" => Ok(arc_by_bulge(node, dim)?.into()),
        "arcbycenterpoint" => Ok(arc_by_center(node, dim, false)?.into()),
        "circlebycenterpoint" => Ok(arc_by_center(node, dim, true)?.into()),
        "ring" | "compositecurve" => {
            let mut segments = vec![];
            for member in member_nodes(node, &["curveMember"], &["curveMembers"])? {
                segments.push(as_curve(import_node(member, options, depth + 1, dim)?)?);
            }
            segments_to_curve(segments)
        }
        "curve" => {
            let segments = node
                .child("segments")
                .ok_or_else(|| GmlError::Invalid("<Curve> is missing <segments>".into()))?;
            import_node(segments, options, depth + 1, dim)
        }
        "segments" => {
            let mut segments = vec![];
            for child in node.children() {
                segments.push(as_curve(import_node(child, options, depth + 1, dim)?)?);
            }
            segments_to_curve(segments)
        }
        "polygon" | "polygonpatch" | "triangle" | "rectangle" => {
            import_polygon(node, options, depth, dim)
        }
        "simplepolygon" | "simplerectangle" | "simpletriangle" => {
            let mut ring = LinearRing::from_seq(node_coords(node, dim)?);
            ring.close();
            Ok(Polygon::from_exterior(ring).into())
        }
        "simplemultipoint" => {
            let pos_list = node
                .child("posList")
                .ok_or_else(|| GmlError::Invalid("<SimpleMultiPoint> is missing <posList>".into()))?;
            let seq = parse_pos_list(pos_list, dim)?;
            let mut multi = MultiPoint::new();
            for coord in seq.iter() {
                multi.push(Point::from_coord(*coord, seq.has_z(), false));
            }
            Ok(multi.into())
        }
        "multipoint" => {
            let mut multi = MultiPoint::new();
            for member in member_nodes(node, &["pointMember"], &["pointMembers"])? {
                match import_node(member, options, depth + 1, dim)? {
                    Geometry::Point(p) => multi.push(p),
                    other => {
                        return Err(GmlError::Invalid(format!(
                            "{:?} inside <MultiPoint>",
                            other.geometry_type()
                        )))
                    }
                }
            }
            Ok(multi.into())
        }
        "multilinestring" => {
            let mut multi = MultiLineString::new();
            for member in member_nodes(node, &["lineStringMember"], &["lineStringMembers"])? {
                match import_node(member, options, depth + 1, dim)? {
                    Geometry::LineString(l) => multi.push(l),
                    other => {
                        return Err(GmlError::Invalid(format!(
                            "{:?} inside <MultiLineString>",
                            other.geometry_type()
                        )))
                    }
                }
            }
            Ok(multi.into())
        }
        "multicurve" => {
            let mut curves = vec![];
            for member in member_nodes(node, &["curveMember"], &["curveMembers"])? {
                curves.push(as_curve(import_node(member, options, depth + 1, dim)?)?);
            }
            if curves.iter().all(|c| matches!(c, Curve::LineString(_))) {
                let mut multi = MultiLineString::new();
                for curve in curves {
                    if let Curve::LineString(line) = curve {
                        multi.push(line);
                    }
                }
                Ok(multi.into())
            } else {
                let mut multi = MultiCurve::new();
                for curve in curves {
                    multi.push(curve);
                }
                Ok(multi.into())
            }
        }
        "multipolygon" => {
            let mut multi = MultiPolygon::new();
            for member in member_nodes(node, &["polygonMember"], &["polygonMembers"])? {
                match import_node(member, options, depth + 1, dim)? {
                    Geometry::Polygon(p) => multi.push(p),
                    other => {
                        return Err(GmlError::Invalid(format!(
                            "{:?} inside <MultiPolygon>",
                            other.geometry_type()
                        )))
                    }
                }
            }
            Ok(multi.into())
        }
        "multisurface" | "compositesurface" => {
            let mut members = vec![];
            for member in member_nodes(node, &["surfaceMember"], &["surfaceMembers"])? {
                match import_node(member, options, depth + 1, dim)? {
                    Geometry::Polygon(p) => members.push(Surface::Polygon(p)),
                    Geometry::CurvePolygon(p) => members.push(Surface::CurvePolygon(p)),
                    other => {
                        return Err(GmlError::Invalid(format!(
                            "{:?} inside <{}>",
                            other.geometry_type(),
                            node.name()
                        )))
                    }
                }
            }
            Ok(multi_surface_from(members))
        }
        "multigeometry" | "geometrycollection" => {
            let mut collection = GeometryCollection::new();
            for member in member_nodes(node, &["geometryMember"], &["geometryMembers"])? {
                collection.push(import_node(member, options, depth + 1, dim)?);
            }
            Ok(collection.into())
        }
        "surface" => {
            let patches = node
                .children_named(&["patches", "polygonPatches", "trianglePatches"])
                .next()
                .ok_or_else(|| GmlError::Invalid("<Surface> is missing <patches>".into()))?;
            let mut members = vec![];
            for patch in patches.children() {
                match import_node(patch, options, depth + 1, dim)? {
                    Geometry::Polygon(p) => members.push(Surface::Polygon(p)),
                    Geometry::CurvePolygon(p) => members.push(Surface::CurvePolygon(p)),
                    other => {
                        return Err(GmlError::Invalid(format!(
                            "{:?} inside <patches>",
                            other.geometry_type()
                        )))
                    }
                }
            }
            if members.len() == 1 {
                Ok(match members.remove(0) {
                    Surface::Polygon(p) => p.into(),
                    Surface::CurvePolygon(p) => p.into(),
                })
            } else {
                Ok(multi_surface_from(members))
            }
        }
        "triangulatedsurface" | "tin" => {
            let patches = node
                .children_named(&["trianglePatches", "patches"])
                .next()
                .ok_or_else(|| GmlError::Invalid("<Tin> is missing <trianglePatches>".into()))?;
            let mut multi = MultiPolygon::new();
            for patch in patches.children() {
                match import_node(patch, options, depth + 1, dim)? {
                    Geometry::Polygon(p) => multi.push(p),
                    other => {
                        return Err(GmlError::Invalid(format!(
                            "{:?} inside <trianglePatches>",
                            other.geometry_type()
                        )))
                    }
                }
            }
            Ok(multi.into())
        }
        "solid" => {
            if node.child("interior").is_some() {
                log::warn!("<Solid> interior shells are not supported and were ignored");
            }
            let exterior = node
                .child("exterior")
                .ok_or_else(|| GmlError::Invalid("<Solid> is missing <exterior>".into()))?;
            import_node(property_child(exterior)?, options, depth + 1, dim)
        }
        "orientablesurface" => {
            if node.attr("orientation") == Some("-") {
                log::warn!("<OrientableSurface> reverse orientation is ignored");
            }
            let base = node
                .child("baseSurface")
                .ok_or_else(|| GmlError::Invalid("<OrientableSurface> is missing <baseSurface>".into()))?;
            import_node(property_child(base)?, options, depth + 1, dim)
        }
        "directededge" => topo::directed_edge(node, options, depth, dim),
        "topocurve" => topo::topo_curve(node, options, depth, dim),
        "toposurface" => topo::topo_surface(node, options, depth, dim),
        _ => Err(GmlError::UnsupportedElement(node.name().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use magellan_geom::GeometryType;

    use super::*;

    fn import(node: &GmlNode) -> Result<Geometry, GmlError> {
        import_geometry(node, &GmlOptions::default())
    }

    fn pos_list(values: &str) -> GmlNode {
        GmlNode::new("posList").with_text(values)
    }

    fn line_string(values: &str) -> GmlNode {
        GmlNode::new("LineString").with_child(pos_list(values))
    }

    fn linear_ring(values: &str) -> GmlNode {
        GmlNode::new("LinearRing").with_child(pos_list(values))
    }

    fn wrapped(prop: &str, inner: GmlNode) -> GmlNode {
        GmlNode::new(prop).with_child(inner)
    }

    #[test]
    fn point_from_coordinates_element() {
        let node = GmlNode::new("gml:Point")
            .with_child(GmlNode::new("gml:coordinates").with_text("12,34"));
        let geometry = import(&node).unwrap();
        let Geometry::Point(point) = geometry else {
            panic!("expected a point");
        };
        assert_eq!(point.x(), Some(12.0));
        assert_eq!(point.y(), Some(34.0));
        assert!(!point.has_z());
    }

    #[test]
    fn srs_dimension_is_inherited_by_pos_list() {
        let node = GmlNode::new("LineString")
            .with_attr("srsDimension", "3")
            .with_child(pos_list("0 0 5 1 1 6"));
        let geometry = import(&node).unwrap();
        let Geometry::LineString(line) = geometry else {
            panic!("expected a line string");
        };
        assert_eq!(line.num_points(), 2);
        assert!(line.seq().has_z());
        assert_eq!(line.seq().coords()[1].z, 6.0);
    }

    #[test]
    fn polygon_with_hole() {
        let node = GmlNode::new("Polygon")
            .with_child(wrapped(
                "outerBoundaryIs",
                linear_ring("0 0 10 0 10 10 0 10 0 0"),
            ))
            .with_child(wrapped("innerBoundaryIs", linear_ring("2 2 4 2 4 4 2 4 2 2")));
        let geometry = import(&node).unwrap();
        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.num_interior_rings(), 1);
        assert_relative_eq!(polygon.area(), 96.0);
    }

    #[test]
    fn unclosed_exterior_ring_is_closed() {
        let node = GmlNode::new("Polygon")
            .with_child(wrapped("exterior", linear_ring("0 0 4 0 4 4 0 4")));
        let geometry = import(&node).unwrap();
        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected a polygon");
        };
        let exterior = polygon.exterior_ring().unwrap();
        assert_eq!(exterior.num_points(), 5);
        assert!(exterior.is_closed());
    }

    #[test]
    fn polygon_with_curved_ring_becomes_a_curve_polygon() {
        let ring = GmlNode::new("Ring")
            .with_child(wrapped(
                "curveMember",
                GmlNode::new("Arc").with_child(pos_list("0 0 1 1 2 0")),
            ))
            .with_child(wrapped("curveMember", line_string("2 0 0 0")));
        let node = GmlNode::new("Polygon").with_child(wrapped("exterior", ring));
        let geometry = import(&node).unwrap();
        assert_eq!(geometry.geometry_type(), GeometryType::CurvePolygon);
    }

    #[test]
    fn circle_is_closed_and_passes_the_far_side() {
        let node = GmlNode::new("Circle").with_child(pos_list("0 1 1 0 0 -1"));
        let geometry = import(&node).unwrap();
        let Geometry::CircularString(arc) = geometry else {
            panic!("expected a circular string");
        };
        assert_eq!(arc.num_points(), 5);
        let coords = arc.seq().coords();
        assert_relative_eq!(coords[3].x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(coords[3].y, 0.0, epsilon = 1e-12);
        assert!(coords[4].bit_eq_xy(&coords[0]));
    }

    #[test]
    fn collinear_circle_points_are_rejected() {
        let node = GmlNode::new("Circle").with_child(pos_list("0 0 1 1 2 2"));
        assert_matches!(import(&node), Err(GmlError::Invalid(_)));
    }

    #[test]
    fn arc_by_bulge_displaces_the_chord_midpoint() {
        let node = GmlNode::new("ArcByBulge")
            .with_child(GmlNode::new("bulge").with_text("2"))
            .with_child(GmlNode::new("normal").with_text("1"))
            .with_child(pos_list("0 0 4 0"));
        let geometry = import(&node).unwrap();
        let Geometry::CircularString(arc) = geometry else {
            panic!("expected a circular string");
        };
        let mid = arc.seq().coords()[1];
        assert_relative_eq!(mid.x, 2.0);
        assert_relative_eq!(mid.y, 2.0);
    }

    #[test]
    fn arc_by_center_point_uses_degrees() {
        let node = GmlNode::new("ArcByCenterPoint")
            .with_child(GmlNode::new("pos").with_text("0 0"))
            .with_child(GmlNode::new("radius").with_text("2"))
            .with_child(GmlNode::new("startAngle").with_text("0"))
            .with_child(GmlNode::new("endAngle").with_text("90"));
        let geometry = import(&node).unwrap();
        let Geometry::CircularString(arc) = geometry else {
            panic!("expected a circular string");
        };
        let coords = arc.seq().coords();
        assert_eq!(coords.len(), 3);
        assert_relative_eq!(coords[0].x, 2.0);
        assert_relative_eq!(coords[2].y, 2.0, epsilon = 1e-12);
        let sqrt_half = 2.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(coords[1].x, sqrt_half, epsilon = 1e-12);
        assert_relative_eq!(coords[1].y, sqrt_half, epsilon = 1e-12);
    }

    #[test]
    fn circle_by_center_point_makes_a_full_turn() {
        let node = GmlNode::new("CircleByCenterPoint")
            .with_child(GmlNode::new("pos").with_text("1 1"))
            .with_child(GmlNode::new("radius").with_text("3"));
        let geometry = import(&node).unwrap();
        let Geometry::CircularString(arc) = geometry else {
            panic!("expected a circular string");
        };
        assert_eq!(arc.num_points(), 5);
        assert!(arc.is_closed());
        assert_relative_eq!(arc.seq().coords()[2].x, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn curve_segments_become_a_compound_curve() {
        let segments = GmlNode::new("segments")
            .with_child(GmlNode::new("LineStringSegment").with_child(pos_list("0 0 2 0")))
            .with_child(GmlNode::new("Arc").with_child(pos_list("2 0 3 1 4 0")));
        let node = GmlNode::new("Curve").with_child(segments);
        let geometry = import(&node).unwrap();
        let Geometry::CompoundCurve(curve) = geometry else {
            panic!("expected a compound curve");
        };
        assert_eq!(curve.num_segments(), 2);
    }

    #[test]
    fn single_segment_curve_collapses() {
        let segments =
            GmlNode::new("segments").with_child(line_string("0 0 1 1"));
        let node = GmlNode::new("Curve").with_child(segments);
        assert_eq!(
            import(&node).unwrap().geometry_type(),
            GeometryType::LineString
        );
    }

    #[test]
    fn multi_surface_of_polygons_collapses_to_multi_polygon() {
        let polygon = |values: &str| {
            GmlNode::new("Polygon").with_child(wrapped("exterior", linear_ring(values)))
        };
        let node = GmlNode::new("MultiSurface")
            .with_child(wrapped("surfaceMember", polygon("0 0 1 0 1 1 0 0")))
            .with_child(wrapped("surfaceMember", polygon("5 5 6 5 6 6 5 5")));
        let geometry = import(&node).unwrap();
        assert_eq!(geometry.geometry_type(), GeometryType::MultiPolygon);
    }

    #[test]
    fn multi_surface_keeps_curved_members() {
        let ring = GmlNode::new("Ring").with_child(wrapped(
            "curveMember",
            GmlNode::new("Circle").with_child(pos_list("0 1 1 0 0 -1")),
        ));
        let curved = GmlNode::new("Polygon").with_child(wrapped("exterior", ring));
        let node = GmlNode::new("MultiSurface").with_child(wrapped("surfaceMember", curved));
        let geometry = import(&node).unwrap();
        assert_eq!(geometry.geometry_type(), GeometryType::MultiSurface);
    }

    #[test]
    fn surface_with_one_patch_is_that_patch() {
        let patch = GmlNode::new("PolygonPatch")
            .with_child(wrapped("exterior", linear_ring("0 0 2 0 2 2 0 2 0 0")));
        let node = GmlNode::new("Surface").with_child(wrapped("patches", patch));
        assert_eq!(
            import(&node).unwrap().geometry_type(),
            GeometryType::Polygon
        );
    }

    #[test]
    fn tin_collects_triangles() {
        let triangle = |values: &str| {
            GmlNode::new("Triangle").with_child(wrapped("exterior", linear_ring(values)))
        };
        let patches = GmlNode::new("trianglePatches")
            .with_child(triangle("0 0 1 0 0 1 0 0"))
            .with_child(triangle("1 0 1 1 0 1 1 0"));
        let node = GmlNode::new("TriangulatedSurface").with_child(patches);
        let geometry = import(&node).unwrap();
        let Geometry::MultiPolygon(multi) = geometry else {
            panic!("expected a multi polygon");
        };
        assert_eq!(multi.len(), 2);
    }

    #[test]
    fn solid_imports_its_exterior_shell() {
        let shell = GmlNode::new("CompositeSurface").with_child(wrapped(
            "surfaceMember",
            GmlNode::new("Polygon")
                .with_child(wrapped("exterior", linear_ring("0 0 1 0 1 1 0 0"))),
        ));
        let node = GmlNode::new("Solid").with_child(wrapped("exterior", shell));
        assert_eq!(
            import(&node).unwrap().geometry_type(),
            GeometryType::MultiPolygon
        );
    }

    #[test]
    fn simple_polygon_closes_its_pos_list() {
        let node = GmlNode::new("SimplePolygon").with_child(pos_list("0 0 4 0 4 4 0 4"));
        let geometry = import(&node).unwrap();
        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected a polygon");
        };
        assert_relative_eq!(polygon.area(), 16.0);
        assert!(polygon.exterior_ring().unwrap().is_closed());
    }

    #[test]
    fn simple_multi_point_splits_its_pos_list() {
        let node = GmlNode::new("SimpleMultiPoint").with_child(pos_list("0 0 1 1 2 2"));
        let geometry = import(&node).unwrap();
        let Geometry::MultiPoint(points) = geometry else {
            panic!("expected a multi point");
        };
        assert_eq!(points.len(), 3);
        assert_eq!(points.members()[2].x(), Some(2.0));
    }

    #[test]
    fn multi_geometry_accepts_both_member_forms() {
        let node = GmlNode::new("MultiGeometry")
            .with_child(wrapped(
                "geometryMember",
                GmlNode::new("Point").with_child(GmlNode::new("pos").with_text("1 2")),
            ))
            .with_child(GmlNode::new("geometryMembers").with_child(line_string("0 0 1 1")));
        let geometry = import(&node).unwrap();
        let Geometry::GeometryCollection(collection) = geometry else {
            panic!("expected a collection");
        };
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn multi_point_rejects_non_points() {
        let node = GmlNode::new("MultiPoint")
            .with_child(wrapped("pointMember", line_string("0 0 1 1")));
        assert_matches!(import(&node), Err(GmlError::Invalid(_)));
    }

    #[test]
    fn unknown_elements_are_reported_by_name() {
        let node = GmlNode::new("app:Frob");
        assert_matches!(
            import(&node),
            Err(GmlError::UnsupportedElement(name)) if name == "app:Frob"
        );
    }

    #[test]
    fn runaway_nesting_is_rejected() {
        let mut node = GmlNode::new("Point").with_child(GmlNode::new("pos").with_text("0 0"));
        for _ in 0..40 {
            node = GmlNode::new("MultiGeometry").with_child(wrapped("geometryMember", node));
        }
        assert_matches!(import(&node), Err(GmlError::TooDeep(_)));
    }

    #[test]
    fn orientable_surface_unwraps_its_base() {
        let base = GmlNode::new("Polygon")
            .with_child(wrapped("exterior", linear_ring("0 0 1 0 1 1 0 0")));
        let node = GmlNode::new("OrientableSurface")
            .with_attr("orientation", "-")
            .with_child(wrapped("baseSurface", base));
        assert_eq!(
            import(&node).unwrap().geometry_type(),
            GeometryType::Polygon
        );
    }

    #[test]
    fn linear_ring_outside_a_polygon_is_a_closed_line() {
        let geometry = import(&linear_ring("0 0 1 0 1 1")).unwrap();
        let Geometry::LineString(line) = geometry else {
            panic!("expected a line string");
        };
        assert!(line.is_closed());
        assert_eq!(line.num_points(), 4);
    }
}
