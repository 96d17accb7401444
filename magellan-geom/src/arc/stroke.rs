//! Linear approximation (stroking) of circular arcs.

use crate::arc::{arc_parameters, need_switch_arc_order, stealth, ArcParameters};
use crate::coord::{Coord, CoordSeq};
use crate::curve::{CircularString, LineString};
use crate::options::{ArcOptions, IntermediatePoint};

/// Smallest number of interior points of a stealth-stroked arc. Keeping the
/// count even leaves the two carrier points distinct and swaps them exactly
/// under list reversal.
const STEALTH_MIN_INTERIOR: usize = 6;

fn effective_step_radians(options: &ArcOptions) -> f64 {
    let degrees = if options.max_step_degrees < 1e-6 {
        4.0
    } else {
        options.max_step_degrees
    };
    degrees.to_radians()
}

/// Number of equal angular steps covering `sweep`, honoring the step size and
/// the minimum chord length.
fn step_count(params: &ArcParameters, sweep: f64, options: &ArcOptions) -> usize {
    let step = effective_step_radians(options);
    let mut steps = (sweep.abs() / step).ceil() as usize;
    if steps < 1 {
        steps = 1;
    }
    let min_chord = options.min_chord_length;
    if min_chord > 0.0 && min_chord < 2.0 * params.radius {
        let min_step = 2.0 * (min_chord / (2.0 * params.radius)).asin();
        if min_step > 0.0 {
            let cap = (sweep.abs() / min_step).floor() as usize;
            steps = steps.min(cap.max(1));
        }
    }
    steps
}

fn interpolate_z(p0: &Coord, p2: &Coord, fraction: f64) -> f64 {
    p0.z + (p2.z - p0.z) * fraction
}

/// Pushes the interior points of a single sweep from `alpha_from` to
/// `alpha_to` (exclusive on both ends).
fn stroke_sweep(
    out: &mut CoordSeq,
    params: &ArcParameters,
    alpha_from: f64,
    alpha_to: f64,
    z_from: &Coord,
    z_to: &Coord,
    steps: usize,
) {
    for i in 1..steps {
        let fraction = i as f64 / steps as f64;
        let alpha = alpha_from + (alpha_to - alpha_from) * fraction;
        let point = params.point_at(alpha);
        out.push(Coord::xyz(
            point.x,
            point.y,
            interpolate_z(z_from, z_to, fraction),
        ));
    }
}

/// Strokes the arc through `p0`, `p1`, `p2` into a line string.
///
/// Collinear input degenerates to the three points joined by straight
/// segments. The arc is always stroked in its canonical endpoint order and
/// reversed afterwards if needed, so both traversal directions produce
/// bit-for-bit mirrored point lists.
pub fn arc_to_line_string(
    p0: &Coord,
    p1: &Coord,
    p2: &Coord,
    has_z: bool,
    options: &ArcOptions,
) -> LineString {
    if need_switch_arc_order(p0, p2) {
        let mut reversed = arc_to_line_string(p2, p1, p0, has_z, options);
        reversed.reverse();
        return reversed;
    }

    let mut seq = CoordSeq::with_dimensions(has_z, false);
    let Some(params) = arc_parameters(p0, p1, p2) else {
        seq.push(*p0);
        seq.push(*p1);
        seq.push(*p2);
        return LineString::from_seq(seq);
    };

    seq.push(*p0);
    match options.intermediate_point {
        IntermediatePoint::Yes => {
            let steps_a = step_count(&params, params.alpha1 - params.alpha0, options);
            let steps_b = step_count(&params, params.alpha2 - params.alpha1, options);
            stroke_sweep(&mut seq, &params, params.alpha0, params.alpha1, p0, p1, steps_a);
            seq.push(*p1);
            stroke_sweep(&mut seq, &params, params.alpha1, params.alpha2, p1, p2, steps_b);
            seq.push(*p2);
        }
        IntermediatePoint::No | IntermediatePoint::Stealth => {
            let stealth = options.intermediate_point == IntermediatePoint::Stealth;
            let mut steps = step_count(&params, params.sweep(), options);
            if stealth {
                // Interior count must be even and at least the stealth
                // minimum; extend by whole steps.
                while steps < STEALTH_MIN_INTERIOR + 1 || (steps - 1) % 2 != 0 {
                    steps += 1;
                }
            }
            stroke_sweep(&mut seq, &params, params.alpha0, params.alpha2, p0, p2, steps);
            seq.push(*p2);

            if stealth && seq.len() >= 4 {
                let ratio = (params.alpha1 - params.alpha0) / params.sweep();
                let hidden = stealth::ratio_to_hidden(ratio);
                let last_interior = seq.len() - 2;
                if let Some(c) = seq.get_mut(1) {
                    stealth::set_hidden_value((hidden & 0xFFFF) as u16, &mut c.x, &mut c.y);
                }
                if let Some(c) = seq.get_mut(last_interior) {
                    stealth::set_hidden_value((hidden >> 16) as u16, &mut c.x, &mut c.y);
                }
            }
        }
    }
    LineString::from_seq(seq)
}

/// Strokes every arc of a circular string, sharing joint points.
pub(crate) fn circular_string_to_line_string(
    cs: &CircularString,
    options: &ArcOptions,
) -> LineString {
    let has_z = cs.seq().has_z();
    let mut out = CoordSeq::with_dimensions(has_z, false);
    for i in 0..cs.num_arcs() {
        let Some((p0, p1, p2)) = cs.arc(i) else {
            break;
        };
        let stroked = arc_to_line_string(p0, p1, p2, has_z, options);
        let coords = stroked.into_seq().into_coords();
        let skip = usize::from(i > 0);
        for coord in coords.into_iter().skip(skip) {
            out.push(coord);
        }
    }
    // A degenerate (sub-3-point) circular string keeps its raw points.
    if cs.num_arcs() == 0 {
        for coord in cs.seq().iter() {
            out.push(*coord);
        }
    }
    LineString::from_seq(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::stealth::get_hidden_value;
    use approx::assert_abs_diff_eq;

    fn assert_on_circle(line: &LineString, cx: f64, cy: f64, r: f64) {
        for c in line.seq().iter() {
            let d = ((c.x - cx).powi(2) + (c.y - cy).powi(2)).sqrt();
            // Stealth bit perturbation is far below this tolerance.
            assert_abs_diff_eq!(d, r, epsilon = 1e-7);
        }
    }

    #[test]
    fn stroked_points_lie_on_the_circle() {
        let line = arc_to_line_string(
            &Coord::xy(1.0, 0.0),
            &Coord::xy(0.0, 1.0),
            &Coord::xy(-1.0, 0.0),
            false,
            &ArcOptions::default(),
        );
        assert!(line.num_points() >= 8);
        assert_on_circle(&line, 0.0, 0.0, 1.0);
        // Exact endpoints are preserved.
        assert_eq!(line.start_point().unwrap(), &Coord::xy(1.0, 0.0));
        assert_eq!(line.end_point().unwrap(), &Coord::xy(-1.0, 0.0));
    }

    #[test]
    fn reversed_arc_strokes_to_reversed_points() {
        let forward = arc_to_line_string(
            &Coord::xy(1.0, 0.0),
            &Coord::xy(0.0, 1.0),
            &Coord::xy(-1.0, 0.0),
            false,
            &ArcOptions::default(),
        );
        let backward = arc_to_line_string(
            &Coord::xy(-1.0, 0.0),
            &Coord::xy(0.0, 1.0),
            &Coord::xy(1.0, 0.0),
            false,
            &ArcOptions::default(),
        );
        let mut reversed = backward;
        reversed.reverse();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn stealth_bits_are_placed_symmetrically() {
        let line = arc_to_line_string(
            &Coord::xy(10.0, 0.0),
            &Coord::xy(0.0, 10.0),
            &Coord::xy(-10.0, 0.0),
            false,
            &ArcOptions::default(),
        );
        let seq = line.seq();
        let n = seq.len();
        assert!(n >= STEALTH_MIN_INTERIOR + 2);

        // The canonical stroke direction for these endpoints starts at
        // (10, 0), so the first interior point carries the low half.
        let first = seq.get(1).unwrap();
        let last = seq.get(n - 2).unwrap();
        let low = get_hidden_value(first.x, first.y) as u32;
        let high = get_hidden_value(last.x, last.y) as u32;
        let ratio = crate::arc::stealth::hidden_to_ratio((high << 16) | low).unwrap();
        assert_abs_diff_eq!(ratio, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn explicit_intermediate_point_is_a_vertex() {
        let mut options = ArcOptions::default();
        options
            .set("ADD_INTERMEDIATE_POINT", "YES")
            .unwrap();
        let line = arc_to_line_string(
            &Coord::xy(1.0, 0.0),
            &Coord::xy(0.0, 1.0),
            &Coord::xy(-1.0, 0.0),
            false,
            &options,
        );
        assert!(line.seq().iter().any(|c| c.bit_eq_xy(&Coord::xy(0.0, 1.0))));
    }

    #[test]
    fn collinear_input_stays_straight() {
        let line = arc_to_line_string(
            &Coord::xy(2.0, 2.0),
            &Coord::xy(1.0, 1.0),
            &Coord::xy(0.0, 0.0),
            false,
            &ArcOptions::default(),
        );
        assert_eq!(line.num_points(), 3);
    }

    #[test]
    fn z_is_interpolated_by_angle() {
        let line = arc_to_line_string(
            &Coord::xyz(1.0, 0.0, 0.0),
            &Coord::xyz(0.0, 1.0, 5.0),
            &Coord::xyz(-1.0, 0.0, 10.0),
            true,
            &ArcOptions::default(),
        );
        let seq = line.seq();
        let mid = seq.get(seq.len() / 2).unwrap();
        assert_abs_diff_eq!(mid.z, 5.0, epsilon = 0.5);
        assert_eq!(seq.last().unwrap().z, 10.0);
    }
}
