//! GML topology elements: `directedEdge`, `TopoCurve` and `TopoSurface`.
//!
//! Edges carry their own curves; faces are rebuilt by chaining edge curves
//! into rings and, unless the face-hole-negative interpretation is enabled,
//! unioning the face polygons.

use geo::BooleanOps;
use magellan_geom::{
    ArcOptions, Coord, CoordSeq, Geometry, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

use crate::error::GmlError;
use crate::import::import_node;
use crate::node::GmlNode;
use crate::options::GmlOptions;

/// Coordinates closer than this are considered the same topological node.
const NODE_TOLERANCE: f64 = 1e-14;

fn same_node(a: &Coord, b: &Coord) -> bool {
    (a.x - b.x).abs() <= NODE_TOLERANCE && (a.y - b.y).abs() <= NODE_TOLERANCE
}

fn edge_of(directed: &GmlNode) -> Result<&GmlNode, GmlError> {
    directed
        .child("Edge")
        .ok_or_else(|| GmlError::Invalid(format!("<{}> is missing <Edge>", directed.name())))
}

/// Points of the edge's topological nodes, in document order. Nodes without
/// a point representation are skipped.
fn edge_points(
    edge: &GmlNode,
    options: &GmlOptions,
    depth: usize,
    dim: Option<usize>,
) -> Result<Vec<Point>, GmlError> {
    let mut points = vec![];
    for directed_node in edge.children_named(&["directedNode"]) {
        let Some(node) = directed_node.child("Node") else {
            continue;
        };
        let Some(prop) = node.children_named(&["pointProperty", "pointRep"]).next() else {
            continue;
        };
        let Some(inner) = prop.first_child() else {
            continue;
        };
        match import_node(inner, options, depth + 1, dim)? {
            Geometry::Point(point) => points.push(point),
            other => {
                return Err(GmlError::Invalid(format!(
                    "{:?} as a <Node> representation",
                    other.geometry_type()
                )))
            }
        }
    }
    Ok(points)
}

/// The line of one `<directedEdge>`, reversed when its orientation is `-`.
/// Curved edges are linearized; an edge without a curve falls back to the
/// straight line between its two nodes.
fn edge_line(
    directed: &GmlNode,
    options: &GmlOptions,
    depth: usize,
    dim: Option<usize>,
) -> Result<LineString, GmlError> {
    let edge = edge_of(directed)?;
    let mut line = if let Some(prop) = edge.child("curveProperty") {
        let inner = prop
            .first_child()
            .ok_or_else(|| GmlError::Invalid("<curveProperty> is empty".into()))?;
        match import_node(inner, options, depth + 1, dim)? {
            Geometry::LineString(line) => line,
            Geometry::CircularString(arc) => arc.linearize(&ArcOptions::default()),
            Geometry::CompoundCurve(curve) => curve.linearize(&ArcOptions::default()),
            other => {
                return Err(GmlError::Invalid(format!(
                    "{:?} as an <Edge> curve",
                    other.geometry_type()
                )))
            }
        }
    } else {
        let points = edge_points(edge, options, depth, dim)?;
        let coords: Vec<Coord> = points.iter().filter_map(|p| p.coord().copied()).collect();
        if coords.len() != 2 {
            return Err(GmlError::Invalid(
                "<Edge> has no curve and does not connect exactly two nodes".into(),
            ));
        }
        LineString::from_seq(coords.into_iter().collect())
    };
    if directed.attr("orientation") == Some("-") {
        line.reverse();
    }
    Ok(line)
}

pub(crate) fn directed_edge(
    node: &GmlNode,
    options: &GmlOptions,
    depth: usize,
    dim: Option<usize>,
) -> Result<Geometry, GmlError> {
    if options.get_secondary_geometry {
        let mut multi = MultiPoint::new();
        for point in edge_points(edge_of(node)?, options, depth, dim)? {
            multi.push(point);
        }
        return Ok(multi.into());
    }
    Ok(edge_line(node, options, depth, dim)?.into())
}

pub(crate) fn topo_curve(
    node: &GmlNode,
    options: &GmlOptions,
    depth: usize,
    dim: Option<usize>,
) -> Result<Geometry, GmlError> {
    if options.get_secondary_geometry {
        let mut multi = MultiPoint::new();
        for directed in node.children_named(&["directedEdge"]) {
            for point in edge_points(edge_of(directed)?, options, depth, dim)? {
                multi.push(point);
            }
        }
        return Ok(multi.into());
    }
    let mut multi = MultiLineString::new();
    for directed in node.children_named(&["directedEdge"]) {
        multi.push(edge_line(directed, options, depth, dim)?);
    }
    Ok(multi.into())
}

/// Chains edge lines into one closed ring, consuming `edges`. A line joins
/// when its start (or, reversed, its end) coincides with the ring's current
/// end point.
fn assemble_ring(mut edges: Vec<CoordSeq>) -> Result<CoordSeq, GmlError> {
    let mut ring = edges.remove(0);
    while !edges.is_empty() {
        let end = *ring
            .last()
            .ok_or_else(|| GmlError::Invalid("<Face> edge has no points".into()))?;
        if let Some(i) = edges
            .iter()
            .position(|e| e.first().is_some_and(|c| same_node(c, &end)))
        {
            let next = edges.remove(i);
            for coord in next.iter().skip(1) {
                ring.push(*coord);
            }
        } else if let Some(i) = edges
            .iter()
            .position(|e| e.last().is_some_and(|c| same_node(c, &end)))
        {
            let mut next = edges.remove(i);
            next.reverse();
            for coord in next.iter().skip(1) {
                ring.push(*coord);
            }
        } else {
            return Err(GmlError::Invalid(
                "<Face> edges do not chain into a ring".into(),
            ));
        }
    }
    ring.close();
    Ok(ring)
}

fn ring_to_geo(seq: &CoordSeq) -> geo_types::Polygon<f64> {
    let exterior: geo_types::LineString<f64> = seq
        .iter()
        .map(|c| geo_types::Coord { x: c.x, y: c.y })
        .collect();
    geo_types::Polygon::new(exterior, vec![])
}

fn from_geo(multi: geo_types::MultiPolygon<f64>) -> Geometry {
    let mut out = MultiPolygon::new();
    for polygon in multi {
        let mut converted = Polygon::new();
        converted.push_ring(LinearRing::from_xy(
            polygon.exterior().coords().map(|c| (c.x, c.y)),
        ));
        for interior in polygon.interiors() {
            converted.push_ring(LinearRing::from_xy(interior.coords().map(|c| (c.x, c.y))));
        }
        out.push(converted);
    }
    if out.len() == 1 {
        let mut members = out.into_members();
        members.remove(0).into()
    } else {
        out.into()
    }
}

/// Unions the face polygons into one surface.
fn union_faces(faces: Vec<(bool, CoordSeq)>) -> Geometry {
    let mut acc: Option<geo_types::MultiPolygon<f64>> = None;
    for (_, ring) in &faces {
        let polygon = geo_types::MultiPolygon::new(vec![ring_to_geo(ring)]);
        acc = Some(match acc {
            None => polygon,
            Some(current) => current.union(&polygon),
        });
    }
    match acc {
        None => Polygon::new().into(),
        Some(multi) => from_geo(multi),
    }
}

/// One polygon whose exterior comes from positively oriented faces and whose
/// holes come from negatively oriented ones.
fn face_hole_polygon(faces: Vec<(bool, CoordSeq)>) -> Geometry {
    let mut exteriors = vec![];
    let mut holes = vec![];
    for (negative, ring) in faces {
        if negative {
            holes.push(ring);
        } else {
            exteriors.push(ring);
        }
    }
    if exteriors.is_empty() {
        log::warn!("<TopoSurface> has no positively oriented face");
    } else if exteriors.len() > 1 {
        log::warn!(
            "<TopoSurface> has {} positively oriented faces, expected 1",
            exteriors.len()
        );
    }
    let mut polygon = Polygon::new();
    for ring in exteriors.into_iter().chain(holes) {
        polygon.push_ring(LinearRing::from_seq(ring));
    }
    polygon.into()
}

pub(crate) fn topo_surface(
    node: &GmlNode,
    options: &GmlOptions,
    depth: usize,
    dim: Option<usize>,
) -> Result<Geometry, GmlError> {
    let mut faces = vec![];
    for directed_face in node.children_named(&["directedFace"]) {
        let negative = directed_face.attr("orientation") == Some("-");
        let face = directed_face.child("Face").ok_or_else(|| {
            GmlError::Invalid(format!("<{}> is missing <Face>", directed_face.name()))
        })?;
        let mut lines = vec![];
        for directed_edge in face.children_named(&["directedEdge"]) {
            lines.push(edge_line(directed_edge, options, depth + 1, dim)?.into_seq());
        }
        if lines.is_empty() {
            log::warn!("<Face> with no edges was skipped");
            continue;
        }
        faces.push((negative, assemble_ring(lines)?));
    }
    if options.face_hole_negative {
        Ok(face_hole_polygon(faces))
    } else {
        Ok(union_faces(faces))
    }
}

#[cfg(test)]
mod tests {
    use magellan_geom::GeometryType;

    use super::*;
    use crate::import::import_geometry;

    fn pos_node(name: &str, x: f64, y: f64) -> GmlNode {
        GmlNode::new(name).with_child(
            GmlNode::new("Node").with_child(
                GmlNode::new("pointProperty").with_child(
                    GmlNode::new("Point")
                        .with_child(GmlNode::new("pos").with_text(format!("{x} {y}"))),
                ),
            ),
        )
    }

    fn edge(from: (f64, f64), to: (f64, f64)) -> GmlNode {
        GmlNode::new("directedEdge").with_child(
            GmlNode::new("Edge")
                .with_child(pos_node("directedNode", from.0, from.1))
                .with_child(pos_node("directedNode", to.0, to.1))
                .with_child(
                    GmlNode::new("curveProperty").with_child(
                        GmlNode::new("LineString").with_child(
                            GmlNode::new("posList")
                                .with_text(format!("{} {} {} {}", from.0, from.1, to.0, to.1)),
                        ),
                    ),
                ),
        )
    }

    fn face(edges: Vec<GmlNode>) -> GmlNode {
        let mut face = GmlNode::new("Face");
        for e in edges {
            face = face.with_child(e);
        }
        GmlNode::new("directedFace").with_child(face)
    }

    fn square_edges(x: f64, y: f64, size: f64) -> Vec<GmlNode> {
        vec![
            edge((x, y), (x + size, y)),
            edge((x + size, y), (x + size, y + size)),
            edge((x + size, y + size), (x, y + size)),
            edge((x, y + size), (x, y)),
        ]
    }

    #[test]
    fn directed_edge_imports_its_curve() {
        let geometry = import_geometry(&edge((0.0, 0.0), (2.0, 1.0)), &GmlOptions::default())
            .unwrap();
        let Geometry::LineString(line) = geometry else {
            panic!("expected a line string");
        };
        assert_eq!(line.start_point().unwrap().x, 0.0);
        assert_eq!(line.end_point().unwrap().y, 1.0);
    }

    #[test]
    fn reversed_edge_is_flipped() {
        let mut directed = edge((0.0, 0.0), (2.0, 1.0));
        directed = GmlNode::new("directedEdge")
            .with_attr("orientation", "-")
            .with_child(directed.children()[0].clone());
        let geometry = import_geometry(&directed, &GmlOptions::default()).unwrap();
        let Geometry::LineString(line) = geometry else {
            panic!("expected a line string");
        };
        assert_eq!(line.start_point().unwrap().x, 2.0);
        assert_eq!(line.end_point().unwrap().x, 0.0);
    }

    #[test]
    fn secondary_geometry_returns_the_nodes() {
        let options = GmlOptions {
            get_secondary_geometry: true,
            ..Default::default()
        };
        let geometry = import_geometry(&edge((0.0, 0.0), (2.0, 1.0)), &options).unwrap();
        let Geometry::MultiPoint(points) = geometry else {
            panic!("expected the node points");
        };
        assert_eq!(points.len(), 2);
        assert_eq!(points.members()[1].x(), Some(2.0));
    }

    #[test]
    fn topo_curve_collects_edge_lines() {
        let node = GmlNode::new("TopoCurve")
            .with_child(edge((0.0, 0.0), (1.0, 0.0)))
            .with_child(edge((1.0, 0.0), (1.0, 1.0)));
        let geometry = import_geometry(&node, &GmlOptions::default()).unwrap();
        let Geometry::MultiLineString(lines) = geometry else {
            panic!("expected a multi line string");
        };
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn topo_surface_single_face_becomes_a_polygon() {
        let node = GmlNode::new("TopoSurface").with_child(face(square_edges(0.0, 0.0, 4.0)));
        let geometry = import_geometry(&node, &GmlOptions::default()).unwrap();
        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected a polygon, got {:?}", geometry.geometry_type());
        };
        assert!((polygon.area() - 16.0).abs() < 1e-9);
        assert_eq!(polygon.num_interior_rings(), 0);
    }

    #[test]
    fn adjacent_faces_union_into_one_polygon() {
        let node = GmlNode::new("TopoSurface")
            .with_child(face(square_edges(0.0, 0.0, 2.0)))
            .with_child(face(square_edges(2.0, 0.0, 2.0)));
        let geometry = import_geometry(&node, &GmlOptions::default()).unwrap();
        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected a single polygon, got {:?}", geometry.geometry_type());
        };
        assert!((polygon.area() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_faces_stay_a_multi_polygon() {
        let node = GmlNode::new("TopoSurface")
            .with_child(face(square_edges(0.0, 0.0, 1.0)))
            .with_child(face(square_edges(5.0, 5.0, 1.0)));
        let geometry = import_geometry(&node, &GmlOptions::default()).unwrap();
        assert_eq!(geometry.geometry_type(), GeometryType::MultiPolygon);
    }

    #[test]
    fn face_hole_negative_builds_holes_from_orientation() {
        let mut hole = face(square_edges(1.0, 1.0, 2.0));
        hole = GmlNode::new("directedFace")
            .with_attr("orientation", "-")
            .with_child(hole.children()[0].clone());
        let node = GmlNode::new("TopoSurface")
            .with_child(face(square_edges(0.0, 0.0, 4.0)))
            .with_child(hole);
        let options = GmlOptions {
            face_hole_negative: true,
            ..Default::default()
        };
        let geometry = import_geometry(&node, &options).unwrap();
        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.num_interior_rings(), 1);
        assert!((polygon.area() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn edge_without_curve_joins_its_nodes() {
        let directed = GmlNode::new("directedEdge").with_child(
            GmlNode::new("Edge")
                .with_child(pos_node("directedNode", 3.0, 4.0))
                .with_child(pos_node("directedNode", 5.0, 6.0)),
        );
        let geometry = import_geometry(&directed, &GmlOptions::default()).unwrap();
        let Geometry::LineString(line) = geometry else {
            panic!("expected a line string");
        };
        assert_eq!(line.num_points(), 2);
        assert_eq!(line.end_point().unwrap().x, 5.0);
    }
}
