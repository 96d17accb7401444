//! Detection of circular arcs in stroked line strings.

use crate::arc::{arc_parameters, need_switch_arc_order, stealth, ArcParameters};
use crate::coord::{Coord, CoordSeq};
use crate::curve::{CircularString, CompoundCurve, Curve, LineString};

/// A 3-point window already sweeping this much is too coarse to be a useful
/// arc approximation.
const MAX_INITIAL_WINDOW_SWEEP: f64 = 2.0 * 20.0 * std::f64::consts::PI / 180.0;

/// Initial relative agreement required of the per-triple circle parameters.
const RADIUS_TOLERANCE: f64 = 1e-6;

/// Relative disagreement beyond which a run is always broken.
const BREAKDOWN_TOLERANCE: f64 = 1e-3;

/// An arc run recovered from a stroked point sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedArc {
    /// Index of the last point of the run.
    pub end: usize,
    /// First control point (the run's first point).
    pub p0: Coord,
    /// Recovered intermediate control point.
    pub p1: Coord,
    /// Last control point (the run's last point).
    pub p2: Coord,
}

fn unwrap_angle(reference: f64, mut alpha: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    while alpha - reference > PI {
        alpha -= TAU;
    }
    while reference - alpha > PI {
        alpha += TAU;
    }
    alpha
}

fn is_integral(value: f64) -> bool {
    value.fract() == 0.0
}

/// Recovers the intermediate control point from the hidden alpha ratio, if a
/// plausible one is present on the carrier points.
fn stealth_intermediate(
    seq: &CoordSeq,
    start: usize,
    end: usize,
    run_params: &ArcParameters,
) -> Option<Coord> {
    // Need two distinct interior carriers.
    if end - start < 3 {
        return None;
    }
    let coords = seq.coords();
    let p0 = &coords[start];
    let p2 = &coords[end];

    // The writer strokes in canonical endpoint order; read it back the same
    // way so that a reversed list decodes to the reversed arc.
    let switched = need_switch_arc_order(p0, p2);
    let (first_carrier, last_carrier) = if switched {
        (&coords[end - 1], &coords[start + 1])
    } else {
        (&coords[start + 1], &coords[end - 1])
    };

    let low = stealth::get_hidden_value(first_carrier.x, first_carrier.y) as u32;
    let high = stealth::get_hidden_value(last_carrier.x, last_carrier.y) as u32;
    let ratio = stealth::hidden_to_ratio((high << 16) | low)?;
    if !(ratio > 0.0 && ratio < 1.0) {
        return None;
    }

    // Ratio is measured along the canonical direction.
    let ratio = if switched { 1.0 - ratio } else { ratio };
    let alpha1 = run_params.alpha0 + ratio * run_params.sweep();
    let point = run_params.point_at(alpha1);
    let z = p0.z + (p2.z - p0.z) * ratio;
    Some(Coord::xyz(point.x, point.y, z))
}

/// Estimates the intermediate control point geometrically: the middle vertex
/// of the run, snapped to nearby integer coordinates when both endpoints are
/// integral (correcting for coordinate rounding in the source data).
fn estimated_intermediate(
    seq: &CoordSeq,
    start: usize,
    end: usize,
    run_params: &ArcParameters,
) -> Coord {
    let coords = seq.coords();
    let mid = coords[(start + end) / 2];
    let p0 = &coords[start];
    let p2 = &coords[end];

    if is_integral(p0.x) && is_integral(p0.y) && is_integral(p2.x) && is_integral(p2.y) {
        let mut best = (f64::MAX, mid);
        for x in [mid.x.floor(), mid.x.ceil()] {
            for y in [mid.y.floor(), mid.y.ceil()] {
                let d = ((x - run_params.center.x).powi(2) + (y - run_params.center.y).powi(2))
                    .sqrt();
                let deviation = (d - run_params.radius).abs() / run_params.radius;
                if deviation < best.0 {
                    best = (deviation, Coord::xyz(x, y, mid.z));
                }
            }
        }
        if best.0 < 1e-8 {
            return best.1;
        }
    }
    mid
}

/// Scans for a run of points consistent with a single circular arc starting
/// at `start`.
///
/// Returns the run and its recovered 3-point arc, or `None` when the window
/// at `start` is not arc-like. A run must span at least 3 points.
pub fn detect_arc(seq: &CoordSeq, start: usize) -> Option<DetectedArc> {
    let coords = seq.coords();
    if start + 2 >= coords.len() {
        return None;
    }

    let first = arc_parameters(&coords[start], &coords[start + 1], &coords[start + 2])?;
    if first.radius == 0.0 || first.sweep().abs() >= MAX_INITIAL_WINDOW_SWEEP {
        return None;
    }

    let direction = first.sweep().signum();
    let initial_step = (first.alpha1 - first.alpha0)
        .abs()
        .max((first.alpha2 - first.alpha1).abs());
    let inv_radius = 1.0 / first.radius;

    let mut end = start + 2;
    let mut tolerance = RADIUS_TOLERANCE;
    let mut worst_accepted = 0.0f64;
    let mut last_alpha = first.alpha2;

    while end + 1 < coords.len() {
        let Some(next) = arc_parameters(&coords[end - 1], &coords[end], &coords[end + 1]) else {
            break;
        };
        if next.sweep().signum() != direction {
            break;
        }

        let rel_r = (next.radius - first.radius).abs() * inv_radius;
        let rel_cx = (next.center.x - first.center.x).abs() * inv_radius;
        let rel_cy = (next.center.y - first.center.y).abs() * inv_radius;
        let rel = rel_r.max(rel_cx).max(rel_cy);
        if rel > tolerance {
            // Degradation within an order of magnitude of what was already
            // accepted is numeric noise; a bigger jump is a genuine break.
            let plausible = worst_accepted > 0.0
                && rel < BREAKDOWN_TOLERANCE
                && rel.log10() <= worst_accepted.log10() + 1.0;
            if !plausible {
                break;
            }
            tolerance = rel;
        }
        worst_accepted = worst_accepted.max(rel.max(RADIUS_TOLERANCE * 1e-2));

        let raw_alpha = (coords[end + 1].y - first.center.y)
            .atan2(coords[end + 1].x - first.center.x);
        let alpha = unwrap_angle(last_alpha + direction * initial_step, raw_alpha);
        let step = (alpha - last_alpha).abs();
        if step > 2.0 * initial_step + 1e-12 {
            break;
        }
        last_alpha = alpha;
        end += 1;
    }

    let p0 = coords[start];
    let p2 = coords[end];
    let mid_vertex = coords[(start + end) / 2];
    let run_params = arc_parameters(&p0, &mid_vertex, &p2)?;

    let p1 = stealth_intermediate(seq, start, end, &run_params)
        .unwrap_or_else(|| estimated_intermediate(seq, start, end, &run_params));

    Some(DetectedArc { end, p0, p1, p2 })
}

/// Reassembles curve geometry from a stroked line string.
///
/// Arc runs become circular strings, the stretches between them stay line
/// strings; a mixed result is a compound curve, a uniform result collapses to
/// the single curve type found.
pub fn line_string_to_curve(line: &LineString) -> Curve {
    let seq = line.seq();
    let coords = seq.coords();
    let (has_z, has_m) = (seq.has_z(), seq.has_m());
    if coords.len() < 3 {
        return Curve::LineString(line.clone());
    }

    let mut segments: Vec<Curve> = vec![];
    let mut segment_start = 0;
    let mut i = 0;
    while i + 2 < coords.len() {
        let Some(arc) = detect_arc(seq, i) else {
            i += 1;
            continue;
        };
        if i > segment_start {
            let line_part = CoordSeq::from_coords(
                coords[segment_start..=i].iter().copied(),
                has_z,
                has_m,
            );
            segments.push(Curve::LineString(LineString::from_seq(line_part)));
        }
        let arc_seq =
            CoordSeq::from_coords([arc.p0, arc.p1, arc.p2], has_z, has_m);
        segments.push(Curve::CircularString(CircularString::from_seq(arc_seq)));
        segment_start = arc.end;
        i = arc.end;
    }

    if segments.is_empty() {
        return Curve::LineString(line.clone());
    }
    if segment_start < coords.len() - 1 {
        let tail = CoordSeq::from_coords(
            coords[segment_start..].iter().copied(),
            has_z,
            has_m,
        );
        segments.push(Curve::LineString(LineString::from_seq(tail)));
    }

    if segments.len() == 1 {
        return segments.into_iter().next().unwrap_or_else(|| {
            Curve::LineString(line.clone())
        });
    }

    if segments
        .iter()
        .all(|s| matches!(s, Curve::CircularString(_)))
    {
        // Contiguous arcs merge into a single circular string.
        let mut merged = CoordSeq::with_dimensions(has_z, has_m);
        for (index, segment) in segments.into_iter().enumerate() {
            if let Curve::CircularString(cs) = segment {
                for coord in cs.into_seq().into_coords().into_iter().skip(usize::from(index > 0)) {
                    merged.push(coord);
                }
            }
        }
        return Curve::CircularString(CircularString::from_seq(merged));
    }

    let mut compound = CompoundCurve::new();
    for segment in segments {
        // Segments share endpoints by construction.
        if compound.push_segment(segment).is_err() {
            return Curve::LineString(line.clone());
        }
    }
    Curve::Compound(compound)
}
