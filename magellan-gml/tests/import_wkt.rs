//! End-to-end checks: GML element trees imported and rendered as WKT.

use magellan_geom::WkbVariant;
use magellan_gml::{import_geometry, GmlNode, GmlOptions};
use magellan_wkx::wkt::write_wkt;

fn wkt_of(node: &GmlNode) -> String {
    let geometry = import_geometry(node, &GmlOptions::default()).unwrap();
    write_wkt(&geometry, WkbVariant::Iso)
}

#[test]
fn point_to_wkt() {
    let node = GmlNode::new("gml:Point")
        .with_child(GmlNode::new("gml:coordinates").with_text("2,49"));
    assert_eq!(wkt_of(&node), "POINT (2 49)");
}

#[test]
fn three_dimensional_point_to_wkt() {
    let node =
        GmlNode::new("Point").with_child(GmlNode::new("pos").with_text("2 49 100"));
    assert_eq!(wkt_of(&node), "POINT Z (2 49 100)");
}

#[test]
fn polygon_with_hole_to_wkt() {
    let ring = |values: &str| {
        GmlNode::new("LinearRing").with_child(GmlNode::new("posList").with_text(values))
    };
    let node = GmlNode::new("Polygon")
        .with_child(GmlNode::new("exterior").with_child(ring("0 0 10 0 10 10 0 10 0 0")))
        .with_child(GmlNode::new("interior").with_child(ring("2 2 4 2 4 4 2 4 2 2")));
    assert_eq!(
        wkt_of(&node),
        "POLYGON ((0 0,10 0,10 10,0 10,0 0),(2 2,4 2,4 4,2 4,2 2))"
    );
}

#[test]
fn curve_to_wkt() {
    let segments = GmlNode::new("segments")
        .with_child(
            GmlNode::new("LineStringSegment")
                .with_child(GmlNode::new("posList").with_text("0 0 2 0")),
        )
        .with_child(GmlNode::new("Arc").with_child(GmlNode::new("posList").with_text("2 0 3 1 4 0")));
    let node = GmlNode::new("Curve").with_child(segments);
    assert_eq!(
        wkt_of(&node),
        "COMPOUNDCURVE ((0 0,2 0),CIRCULARSTRING (2 0,3 1,4 0))"
    );
}

#[test]
fn multi_surface_to_wkt() {
    let polygon = |values: &str| {
        GmlNode::new("surfaceMember").with_child(
            GmlNode::new("Polygon").with_child(
                GmlNode::new("exterior").with_child(
                    GmlNode::new("LinearRing")
                        .with_child(GmlNode::new("posList").with_text(values)),
                ),
            ),
        )
    };
    let node = GmlNode::new("MultiSurface")
        .with_child(polygon("0 0 1 0 1 1 0 0"))
        .with_child(polygon("5 5 6 5 6 6 5 5"));
    assert_eq!(
        wkt_of(&node),
        "MULTIPOLYGON (((0 0,1 0,1 1,0 0)),((5 5,6 5,6 6,5 5)))"
    );
}
