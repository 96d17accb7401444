//! Well-known binary and well-known text codecs for `magellan-geom`
//! geometries.
//!
//! [`wkb::read_wkb`]/[`wkb::write_wkb`] handle the binary encoding in both
//! byte orders and both the ISO and legacy-25D type-code schemes;
//! [`wkt::read_wkt`]/[`wkt::write_wkt`] handle the text encoding. Both
//! readers report failures through [`magellan_geom::MagellanError`].

use magellan_geom::{parse_bool, ArcOptions, Geometry, MagellanError};

pub mod wkb;
pub mod wkt;

/// Nesting levels beyond this are treated as corrupt input rather than
/// recursed into.
pub(crate) const MAX_NESTING_DEPTH: usize = 32;

/// Post-processing applied to freshly decoded geometries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportOptions {
    /// Replace curve geometries with stroked linear approximations
    /// (`OGR_STROKE_CURVE`).
    pub stroke_curves: bool,
    /// Stroking parameters used when `stroke_curves` is on.
    pub arc: ArcOptions,
}

impl ImportOptions {
    /// Sets an option by its recognized name; arc option names are accepted
    /// here too.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), MagellanError> {
        if name.eq_ignore_ascii_case("OGR_STROKE_CURVE") {
            self.stroke_curves = parse_bool(value)?;
            return Ok(());
        }
        self.arc.set(name, value)
    }

    /// Applies the configured post-processing to a decoded geometry.
    pub fn apply(&self, geometry: Geometry) -> Geometry {
        if self.stroke_curves {
            geometry.linear_geometry(&self.arc)
        } else {
            geometry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn stroke_curve_option_linearizes_imports() {
        let mut options = ImportOptions::default();
        options.set("OGR_STROKE_CURVE", "YES").unwrap();
        options.set("OGR_ARC_STEPSIZE", "10").unwrap();

        let (geometry, _) = wkt::read_wkt("CIRCULARSTRING (0 0,1 1,2 0)").unwrap();
        let line = assert_matches!(options.apply(geometry), Geometry::LineString(l) => l);
        assert!(line.num_points() > 3);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut options = ImportOptions::default();
        assert_matches!(
            options.set("OGR_SOMETHING_ELSE", "YES"),
            Err(MagellanError::CorruptData(_))
        );
    }
}
