//! Circular arc geometry: parameter recovery, stroking, detection.

pub mod detect;
pub mod stealth;
pub mod stroke;

use nalgebra::{Matrix2, Point2, Vector2};

use crate::coord::Coord;

/// Determinant threshold below which three points are treated as collinear,
/// after normalizing by the squared magnitude of the chords.
const COLLINEARITY_EPS: f64 = 1e-8;

/// Parameters of the circle through three points, with angles ordered along
/// the traversal direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcParameters {
    /// Circle center.
    pub center: Point2<f64>,
    /// Circle radius.
    pub radius: f64,
    /// Angle of the first point.
    pub alpha0: f64,
    /// Angle of the intermediate point; between `alpha0` and `alpha2`.
    pub alpha1: f64,
    /// Angle of the last point. Greater than `alpha0` for counterclockwise
    /// arcs, smaller for clockwise ones.
    pub alpha2: f64,
}

impl ArcParameters {
    /// True if the arc is traversed counterclockwise.
    pub fn is_counterclockwise(&self) -> bool {
        self.alpha2 >= self.alpha0
    }

    /// Signed angular sweep from the first to the last point.
    pub fn sweep(&self) -> f64 {
        self.alpha2 - self.alpha0
    }

    /// Point on the circle at the given angle.
    pub fn point_at(&self, alpha: f64) -> Point2<f64> {
        Point2::new(
            self.center.x + self.radius * alpha.cos(),
            self.center.y + self.radius * alpha.sin(),
        )
    }
}

/// Computes the circle through `p0`, `p1`, `p2`.
///
/// Returns `None` for collinear points, with one exception: `p0 == p2` with a
/// distinct `p1` is taken as a full circle whose diameter is the `p0`–`p1`
/// chord. That diameter rule is an approximation inherited from the legacy
/// behavior; it is exact only when `p1` is the true antipode of `p0`.
pub fn arc_parameters(p0: &Coord, p1: &Coord, p2: &Coord) -> Option<ArcParameters> {
    let d01 = Vector2::new(p1.x - p0.x, p1.y - p0.y);
    let d12 = Vector2::new(p2.x - p1.x, p2.y - p1.y);

    // Full circle given by two antipodal points.
    if p0.bit_eq_xy(p2) && !p0.bit_eq_xy(p1) {
        let center = Point2::new((p0.x + p1.x) / 2.0, (p0.y + p1.y) / 2.0);
        let radius = p0.distance(p1) / 2.0;
        let alpha0 = (p0.y - center.y).atan2(p0.x - center.x);
        return Some(ArcParameters {
            center,
            radius,
            alpha0,
            alpha1: alpha0 + std::f64::consts::PI,
            alpha2: alpha0 + 2.0 * std::f64::consts::PI,
        });
    }

    let det = d01.x * d12.y - d01.y * d12.x;
    let scale = d01
        .x
        .abs()
        .max(d01.y.abs())
        .max(d12.x.abs())
        .max(d12.y.abs());
    if scale == 0.0 || det.abs() < COLLINEARITY_EPS * scale * scale {
        return None;
    }

    // Perpendicular bisectors of the two chords meet at the center.
    let a = Matrix2::new(d01.x, d01.y, d12.x, d12.y);
    let b = Vector2::new(
        d01.x * (p0.x + p1.x) / 2.0 + d01.y * (p0.y + p1.y) / 2.0,
        d12.x * (p1.x + p2.x) / 2.0 + d12.y * (p1.y + p2.y) / 2.0,
    );
    let center = a.lu().solve(&b)?;
    let center = Point2::new(center.x, center.y);
    let radius = ((p0.x - center.x).powi(2) + (p0.y - center.y).powi(2)).sqrt();

    let alpha0 = (p0.y - center.y).atan2(p0.x - center.x);
    let mut alpha1 = (p1.y - center.y).atan2(p1.x - center.x);
    let mut alpha2 = (p2.y - center.y).atan2(p2.x - center.x);

    let tau = std::f64::consts::TAU;
    if det > 0.0 {
        // Counterclockwise: angles increase along the arc.
        while alpha1 < alpha0 {
            alpha1 += tau;
        }
        while alpha2 < alpha1 {
            alpha2 += tau;
        }
    } else {
        // Clockwise: angles decrease along the arc.
        while alpha1 > alpha0 {
            alpha1 -= tau;
        }
        while alpha2 > alpha1 {
            alpha2 -= tau;
        }
    }

    Some(ArcParameters {
        center,
        radius,
        alpha0,
        alpha1,
        alpha2,
    })
}

/// Canonical arc ordering: an arc should be stroked from the endpoint that
/// compares greater, so that stroking the same arc from either direction
/// yields bit-for-bit reversed point lists.
pub fn need_switch_arc_order(p0: &Coord, p2: &Coord) -> bool {
    p0.x < p2.x || (p0.x == p2.x && p0.y < p2.y)
}
