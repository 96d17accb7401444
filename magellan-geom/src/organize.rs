//! Reassembly of flat ring collections into properly nested polygons.
//!
//! Parsers and topology importers often produce polygons one ring at a time
//! with no outer/hole relationship. [`organize_polygons`] reconstructs the
//! nesting: exterior rings become polygon boundaries and contained rings
//! become their holes, following OGC semantics where a ring inside a hole
//! starts a new polygon rather than a hole-of-a-hole.

use std::sync::Once;

use crate::analysis::{
    locate_point_in_ring, ring_contains_ring, rings_cross, PointLocation, Winding,
};
use crate::coord::Coord;
use crate::curve::LinearRing;
use crate::envelope::Envelope;
use crate::geometry::Geometry;
use crate::multi::{GeometryCollection, MultiPolygon};
use crate::options::{OrganizeMethod, OrganizeOptions};
use crate::polygon::Polygon;
use crate::srs::SrsRef;

/// Output of [`organize_polygons`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizeResult {
    /// The reorganized geometry.
    pub geometry: Geometry,
    /// False when the input was inconsistent and the result is a flat
    /// ungrouped fallback (or when no containment analysis was performed).
    pub is_valid: bool,
}

struct RingInfo {
    ring: LinearRing,
    orig_index: usize,
    envelope: Envelope,
    area: f64,
    winding: Winding,
    top_level: bool,
    /// Index (into the sorted list) of the enclosing top-level ring.
    parent: Option<usize>,
}

/// Classifies `inner` against `outer` by sampling: first the vertices of
/// `inner`, then the midpoints of its edges, until a strict inside/outside
/// answer is found. `None` means every sample landed on the boundary.
fn sample_containment(inner: &LinearRing, outer: &LinearRing) -> Option<bool> {
    for coord in inner.seq().iter() {
        match locate_point_in_ring(outer.seq(), coord) {
            PointLocation::Inside => return Some(true),
            PointLocation::Outside => return Some(false),
            PointLocation::Boundary => {}
        }
    }
    let coords = inner.seq().coords();
    for pair in coords.windows(2) {
        let mid = Coord::xy((pair[0].x + pair[1].x) / 2.0, (pair[0].y + pair[1].y) / 2.0);
        match locate_point_in_ring(outer.seq(), &mid) {
            PointLocation::Inside => return Some(true),
            PointLocation::Outside => return Some(false),
            PointLocation::Boundary => {}
        }
    }
    None
}

/// Containment of ring `i` in ring `j`, or `None` when the rings overlap or
/// are coincident and no consistent answer exists.
fn ring_in_ring(inner: &LinearRing, outer: &LinearRing, exact: bool) -> Option<bool> {
    if exact {
        if ring_contains_ring(outer.seq(), inner.seq()) {
            return Some(true);
        }
        if rings_cross(outer.seq(), inner.seq()) {
            return None;
        }
        return Some(false);
    }
    let sampled = sample_containment(inner, outer)?;
    if sampled && rings_cross(outer.seq(), inner.seq()) {
        // An inside sample plus a proper edge crossing means partial overlap.
        return None;
    }
    Some(sampled)
}

fn single_ring(polygon: &Polygon) -> Option<&LinearRing> {
    if polygon.num_interior_rings() == 0 {
        let ring = polygon.exterior_ring()?;
        if ring.num_points() >= 4 {
            return Some(ring);
        }
    }
    None
}

fn flat_fallback(
    polygons: Vec<Geometry>,
    has_non_polygon: bool,
    srs: Option<SrsRef>,
) -> Geometry {
    if has_non_polygon {
        let mut collection: GeometryCollection = polygons.into_iter().collect();
        collection.set_srs(srs);
        Geometry::GeometryCollection(collection)
    } else {
        let mut multi = MultiPolygon::new();
        for geometry in polygons {
            if let Geometry::Polygon(polygon) = geometry {
                multi.push(polygon);
            }
        }
        multi.set_srs(srs);
        Geometry::MultiPolygon(multi)
    }
}

fn assemble(mut infos: Vec<RingInfo>, srs: Option<SrsRef>) -> Geometry {
    // Hole membership was recorded against sorted positions; translate it to
    // the caller's original order before regrouping.
    let mut parent_orig = vec![None; infos.len()];
    for info in &infos {
        if let Some(parent) = info.parent {
            parent_orig[info.orig_index] = Some(infos[parent].orig_index);
        }
    }
    infos.sort_by_key(|info| info.orig_index);

    let mut polygons: Vec<Option<Polygon>> = infos
        .iter()
        .map(|info| {
            info.top_level
                .then(|| Polygon::from_exterior(info.ring.clone()))
        })
        .collect();
    for (index, info) in infos.into_iter().enumerate() {
        if let Some(parent) = parent_orig[index] {
            if let Some(Some(polygon)) = polygons.get_mut(parent) {
                polygon.push_ring(info.ring);
            }
        }
    }

    let mut members: Vec<Polygon> = polygons.into_iter().flatten().collect();
    if members.len() == 1 {
        let mut single = members.remove(0);
        single.set_srs(srs);
        Geometry::Polygon(single)
    } else {
        let mut multi = MultiPolygon::new();
        for member in members {
            multi.push(member);
        }
        multi.set_srs(srs);
        Geometry::MultiPolygon(multi)
    }
}

fn organize_normal(
    mut infos: Vec<RingInfo>,
    exact: bool,
    srs: Option<SrsRef>,
) -> Option<Geometry> {
    infos.sort_by(|a, b| b.area.total_cmp(&a.area));
    for i in 1..infos.len() {
        for j in (0..i).rev() {
            if !infos[j].envelope.contains(&infos[i].envelope) {
                continue;
            }
            match ring_in_ring(&infos[i].ring, &infos[j].ring, exact) {
                Some(true) => {
                    if infos[j].top_level {
                        infos[i].top_level = false;
                        infos[i].parent = Some(j);
                    }
                    // Inside a hole: stays top-level, a separate shape.
                    break;
                }
                Some(false) => {}
                None => return None,
            }
        }
    }
    Some(assemble(infos, srs))
}

fn organize_only_ccw(mut infos: Vec<RingInfo>, exact: bool, srs: Option<SrsRef>) -> Geometry {
    let cw_count = infos
        .iter()
        .filter(|info| info.winding == Winding::Clockwise)
        .count();
    if cw_count == 1 {
        // Single exterior: every counterclockwise ring is trivially its hole.
        let parent = infos
            .iter()
            .position(|info| info.winding == Winding::Clockwise);
        for info in &mut infos {
            if info.winding == Winding::CounterClockwise {
                info.top_level = false;
                info.parent = parent;
            }
        }
        return assemble(infos, srs);
    }

    infos.sort_by(|a, b| b.area.total_cmp(&a.area));
    for i in 0..infos.len() {
        if infos[i].winding != Winding::CounterClockwise {
            continue;
        }
        for j in (0..infos.len()).rev() {
            if j == i
                || infos[j].winding != Winding::Clockwise
                || !infos[j].envelope.contains(&infos[i].envelope)
            {
                continue;
            }
            if ring_in_ring(&infos[i].ring, &infos[j].ring, exact) == Some(true) {
                infos[i].top_level = false;
                infos[i].parent = Some(j);
                break;
            }
        }
    }
    assemble(infos, srs)
}

fn organize_interleaved(mut infos: Vec<RingInfo>, srs: Option<SrsRef>) -> Geometry {
    let mut current_outer: Option<usize> = None;
    let mut current_envelope = Envelope::empty();
    for i in 0..infos.len() {
        if infos[i].winding == Winding::Clockwise {
            current_outer = Some(i);
            current_envelope = infos[i].envelope;
        } else if let Some(outer) = current_outer {
            if let Some(first) = infos[i].ring.seq().first() {
                if !current_envelope.contains_point(first.x, first.y) {
                    log::warn!(
                        "ring {} starts outside the preceding exterior ring; keeping it as its hole anyway",
                        infos[i].orig_index
                    );
                }
            }
            infos[i].top_level = false;
            infos[i].parent = Some(outer);
        } else {
            log::warn!(
                "ring {} is counterclockwise but no exterior ring precedes it; treating it as top level",
                infos[i].orig_index
            );
        }
    }
    assemble(infos, srs)
}

/// Rebuilds nested polygons from a flat list of single-ring polygons.
///
/// On the happy path the result is a [`Polygon`] (one exterior) or a
/// [`MultiPolygon`] with holes assigned to their enclosing exteriors. When the
/// input is inconsistent (overlapping rings, non-polygon members, rings with
/// holes already present) the members are returned ungrouped and
/// [`OrganizeResult::is_valid`] is false.
pub fn organize_polygons(polygons: Vec<Geometry>, options: &OrganizeOptions) -> OrganizeResult {
    let srs = polygons.iter().find_map(|g| g.srs().cloned());
    if polygons.is_empty() {
        return OrganizeResult {
            geometry: Geometry::Polygon(Polygon::new()),
            is_valid: true,
        };
    }

    let has_non_polygon = polygons
        .iter()
        .any(|g| !matches!(g, Geometry::Polygon(_)));
    let mut mixed_up = has_non_polygon;

    let mut infos = Vec::with_capacity(polygons.len());
    for (orig_index, geometry) in polygons.iter().enumerate() {
        let Geometry::Polygon(polygon) = geometry else {
            mixed_up = true;
            continue;
        };
        let Some(ring) = single_ring(polygon) else {
            mixed_up = true;
            continue;
        };
        infos.push(RingInfo {
            envelope: ring.envelope(),
            area: ring.area(),
            winding: ring.winding(),
            ring: ring.clone(),
            orig_index,
            top_level: true,
            parent: None,
        });
    }

    if mixed_up {
        return OrganizeResult {
            geometry: flat_fallback(polygons, has_non_polygon, srs),
            is_valid: false,
        };
    }

    let method = options.method.unwrap_or_else(|| {
        if polygons.len() > 100 {
            static LARGE_INPUT: Once = Once::new();
            LARGE_INPUT.call_once(|| {
                log::warn!(
                    "organizing {} polygons with the quadratic default method; \
                     set OGR_ORGANIZE_POLYGONS to pick a faster one",
                    polygons.len()
                );
            });
        }
        OrganizeMethod::Normal
    });

    match method {
        OrganizeMethod::Skip => OrganizeResult {
            geometry: flat_fallback(polygons, false, srs),
            is_valid: false,
        },
        OrganizeMethod::Normal => match organize_normal(infos, options.exact_containment, srs.clone())
        {
            Some(geometry) => OrganizeResult {
                geometry,
                is_valid: true,
            },
            None => {
                log::warn!("overlapping rings cannot be organized; returning them ungrouped");
                OrganizeResult {
                    geometry: flat_fallback(polygons, false, srs),
                    is_valid: false,
                }
            }
        },
        OrganizeMethod::OnlyCcw => OrganizeResult {
            geometry: organize_only_ccw(infos, options.exact_containment, srs),
            is_valid: true,
        },
        OrganizeMethod::CcwInnerJustAfterCwOuter => OrganizeResult {
            geometry: organize_interleaved(infos, srs),
            is_valid: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn square(x: f64, y: f64, size: f64, ccw: bool) -> Geometry {
        let mut coords = vec![
            (x, y),
            (x + size, y),
            (x + size, y + size),
            (x, y + size),
            (x, y),
        ];
        if !ccw {
            coords.reverse();
        }
        Geometry::Polygon(Polygon::from_exterior(LinearRing::from_xy(coords)))
    }

    #[test]
    fn disjoint_rings_stay_top_level() {
        let input = vec![
            square(0.0, 0.0, 1.0, true),
            square(5.0, 0.0, 1.0, true),
            square(10.0, 0.0, 1.0, true),
        ];
        let result = organize_polygons(input, &OrganizeOptions::default());
        assert!(result.is_valid);
        let multi = assert_matches!(result.geometry, Geometry::MultiPolygon(m) => m);
        assert_eq!(multi.len(), 3);
        for member in multi.members() {
            assert_eq!(member.num_interior_rings(), 0);
        }
    }

    #[test]
    fn contained_ring_becomes_hole() {
        let input = vec![square(0.0, 0.0, 10.0, true), square(2.0, 2.0, 2.0, true)];
        let result = organize_polygons(input, &OrganizeOptions::default());
        assert!(result.is_valid);
        let polygon = assert_matches!(result.geometry, Geometry::Polygon(p) => p);
        assert_eq!(polygon.num_interior_rings(), 1);
    }

    #[test]
    fn ring_inside_hole_is_promoted() {
        let input = vec![
            square(0.0, 0.0, 10.0, true),
            square(2.0, 2.0, 6.0, true),
            square(4.0, 4.0, 1.0, true),
        ];
        let result = organize_polygons(input, &OrganizeOptions::default());
        assert!(result.is_valid);
        let multi = assert_matches!(result.geometry, Geometry::MultiPolygon(m) => m);
        assert_eq!(multi.len(), 2);
        let outer = &multi.members()[0];
        assert_eq!(outer.num_interior_rings(), 1);
        let island = &multi.members()[1];
        assert_eq!(island.num_interior_rings(), 0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let input = vec![square(2.0, 2.0, 2.0, true), square(0.0, 0.0, 10.0, true)];
        let result = organize_polygons(input, &OrganizeOptions::default());
        assert!(result.is_valid);
        let polygon = assert_matches!(result.geometry, Geometry::Polygon(p) => p);
        assert_eq!(polygon.num_interior_rings(), 1);
        assert_eq!(polygon.exterior_ring().unwrap().area(), 100.0);
    }

    #[test]
    fn overlapping_rings_fall_back_flat() {
        let input = vec![square(0.0, 0.0, 10.0, true), square(5.0, 5.0, 10.0, true)];
        let result = organize_polygons(input, &OrganizeOptions::default());
        // Overlap is detected only when a sample lands inside: the second
        // square's corner (5, 5) is strictly inside the first.
        assert!(!result.is_valid);
        let multi = assert_matches!(result.geometry, Geometry::MultiPolygon(m) => m);
        assert_eq!(multi.len(), 2);
    }

    #[test]
    fn skip_method_keeps_everything_flat() {
        let input = vec![square(0.0, 0.0, 10.0, true), square(2.0, 2.0, 2.0, true)];
        let mut options = OrganizeOptions::default();
        options.method = Some(OrganizeMethod::Skip);
        let result = organize_polygons(input, &options);
        assert!(!result.is_valid);
        let multi = assert_matches!(result.geometry, Geometry::MultiPolygon(m) => m);
        assert_eq!(multi.len(), 2);
    }

    #[test]
    fn only_ccw_single_exterior_fast_path() {
        let input = vec![
            square(0.0, 0.0, 10.0, false),
            square(2.0, 2.0, 2.0, true),
            square(6.0, 6.0, 2.0, true),
        ];
        let mut options = OrganizeOptions::default();
        options.method = Some(OrganizeMethod::OnlyCcw);
        let result = organize_polygons(input, &options);
        assert!(result.is_valid);
        let polygon = assert_matches!(result.geometry, Geometry::Polygon(p) => p);
        assert_eq!(polygon.num_interior_rings(), 2);
    }

    #[test]
    fn only_ccw_multiple_exteriors() {
        let input = vec![
            square(0.0, 0.0, 10.0, false),
            square(2.0, 2.0, 2.0, true),
            square(20.0, 0.0, 10.0, false),
            square(22.0, 2.0, 2.0, true),
        ];
        let mut options = OrganizeOptions::default();
        options.method = Some(OrganizeMethod::OnlyCcw);
        let result = organize_polygons(input, &options);
        assert!(result.is_valid);
        let multi = assert_matches!(result.geometry, Geometry::MultiPolygon(m) => m);
        assert_eq!(multi.len(), 2);
        assert!(multi
            .members()
            .iter()
            .all(|p| p.num_interior_rings() == 1));
    }

    #[test]
    fn interleaved_method_groups_by_position() {
        let input = vec![
            square(0.0, 0.0, 10.0, false),
            square(2.0, 2.0, 2.0, true),
            square(20.0, 0.0, 10.0, false),
        ];
        let mut options = OrganizeOptions::default();
        options.method = Some(OrganizeMethod::CcwInnerJustAfterCwOuter);
        let result = organize_polygons(input, &options);
        assert!(result.is_valid);
        let multi = assert_matches!(result.geometry, Geometry::MultiPolygon(m) => m);
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.members()[0].num_interior_rings(), 1);
    }

    #[test]
    fn non_polygon_input_returns_collection() {
        let mut input = vec![square(0.0, 0.0, 10.0, true)];
        input.push(Geometry::Point(crate::point::Point::new(1.0, 1.0)));
        let result = organize_polygons(input, &OrganizeOptions::default());
        assert!(!result.is_valid);
        assert_matches!(result.geometry, Geometry::GeometryCollection(_));
    }

    #[test]
    fn exact_containment_agrees_with_sampling() {
        let input = vec![square(0.0, 0.0, 10.0, true), square(2.0, 2.0, 2.0, true)];
        let mut options = OrganizeOptions::default();
        options.exact_containment = true;
        let result = organize_polygons(input, &options);
        assert!(result.is_valid);
        let polygon = assert_matches!(result.geometry, Geometry::Polygon(p) => p);
        assert_eq!(polygon.num_interior_rings(), 1);
    }
}
