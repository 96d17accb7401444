//! Axis-aligned bounding boxes.

use num_traits::Bounded;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle.
///
/// A fresh envelope is "inverted" (`min > max`) and reports [`Envelope::is_init`]
/// `false` until at least one point is merged into it.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<N = f64> {
    /// Minimum X.
    pub x_min: N,
    /// Minimum Y.
    pub y_min: N,
    /// Maximum X.
    pub x_max: N,
    /// Maximum Y.
    pub y_max: N,
}

impl<N: num_traits::Num + Bounded + PartialOrd + Copy> Envelope<N> {
    /// Creates an envelope from explicit bounds.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Creates an inverted envelope that any merged point will initialize.
    pub fn empty() -> Self {
        Self {
            x_min: N::max_value(),
            y_min: N::max_value(),
            x_max: N::min_value(),
            y_max: N::min_value(),
        }
    }

    /// True once at least one point has been merged in.
    pub fn is_init(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max
    }

    /// Grows the envelope to include the point.
    pub fn extend(&mut self, x: N, y: N) {
        if x < self.x_min {
            self.x_min = x;
        }
        if x > self.x_max {
            self.x_max = x;
        }
        if y < self.y_min {
            self.y_min = y;
        }
        if y > self.y_max {
            self.y_max = y;
        }
    }

    /// Grows the envelope to include all of `other`.
    pub fn merge(&mut self, other: &Self) {
        if !other.is_init() {
            return;
        }
        self.extend(other.x_min, other.y_min);
        self.extend(other.x_max, other.y_max);
    }

    /// True if `other` lies entirely inside self (boundaries included).
    pub fn contains(&self, other: &Self) -> bool {
        self.x_min <= other.x_min
            && self.y_min <= other.y_min
            && self.x_max >= other.x_max
            && self.y_max >= other.y_max
    }

    /// True if the point lies inside self (boundaries included).
    pub fn contains_point(&self, x: N, y: N) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }

    /// True if the two envelopes share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }

    /// Width of the envelope.
    pub fn width(&self) -> N {
        self.x_max - self.x_min
    }

    /// Height of the envelope.
    pub fn height(&self) -> N {
        self.y_max - self.y_min
    }
}

impl<N: num_traits::Num + Bounded + PartialOrd + Copy> Default for Envelope<N> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Bounding box with a Z range.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope3 {
    /// Horizontal bounds.
    pub xy: Envelope,
    /// Minimum Z, when any 3D coordinate was merged.
    pub z_min: Option<f64>,
    /// Maximum Z, when any 3D coordinate was merged.
    pub z_max: Option<f64>,
}

impl Envelope3 {
    /// Merges a Z range into the envelope.
    pub fn extend_z(&mut self, z_min: f64, z_max: f64) {
        self.z_min = Some(self.z_min.map_or(z_min, |v| v.min(z_min)));
        self.z_max = Some(self.z_max.map_or(z_max, |v| v.max(z_max)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_and_contains() {
        let mut env = Envelope::empty();
        assert!(!env.is_init());
        env.extend(1.0, 2.0);
        env.extend(-1.0, 5.0);
        assert!(env.is_init());
        assert_eq!(env, Envelope::new(-1.0, 2.0, 1.0, 5.0));

        let inner = Envelope::new(-0.5, 2.5, 0.5, 4.0);
        assert!(env.contains(&inner));
        assert!(!inner.contains(&env));
        assert!(env.intersects(&inner));

        let disjoint = Envelope::new(10.0, 10.0, 11.0, 11.0);
        assert!(!env.intersects(&disjoint));
    }
}
