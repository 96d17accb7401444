//! Option structs for the configurable algorithms.
//!
//! The option *names* recognized by the `set` constructors are a compatibility
//! contract with the configuration-driven interface of the original tools;
//! the structs themselves are plain values passed explicitly into the entry
//! points.

use serde::{Deserialize, Serialize};

use crate::error::MagellanError;

/// Parses a configuration-style boolean (`YES`/`NO`, `TRUE`/`FALSE`,
/// `ON`/`OFF`, `1`/`0`, any case).
pub fn parse_bool(value: &str) -> Result<bool, MagellanError> {
    match value.to_ascii_uppercase().as_str() {
        "YES" | "TRUE" | "ON" | "1" => Ok(true),
        "NO" | "FALSE" | "OFF" | "0" => Ok(false),
        other => Err(MagellanError::CorruptData(format!(
            "cannot parse {other:?} as a boolean"
        ))),
    }
}

/// How a stroked arc records its original intermediate point.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntermediatePoint {
    /// Hide the exact angle ratio in unused low-order coordinate bits.
    #[default]
    Stealth,
    /// Insert the intermediate point as a literal vertex.
    Yes,
    /// Do not represent the intermediate point; round-tripping becomes lossy.
    No,
}

/// Options of the curve stroking and detection engines.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcOptions {
    /// Largest angular step of the linear approximation, in degrees
    /// (`OGR_ARC_STEPSIZE`).
    pub max_step_degrees: f64,
    /// Minimum chord length of an emitted segment (`OGR_ARC_MINLENGTH`).
    pub min_chord_length: f64,
    /// Intermediate point handling (`ADD_INTERMEDIATE_POINT`).
    pub intermediate_point: IntermediatePoint,
}

impl Default for ArcOptions {
    fn default() -> Self {
        Self {
            max_step_degrees: 4.0,
            min_chord_length: 0.0,
            intermediate_point: IntermediatePoint::default(),
        }
    }
}

impl ArcOptions {
    /// Sets an option by its recognized name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), MagellanError> {
        match name.to_ascii_uppercase().as_str() {
            "OGR_ARC_STEPSIZE" => {
                self.max_step_degrees = value.parse().map_err(|_| {
                    MagellanError::CorruptData(format!("invalid step size {value:?}"))
                })?;
                Ok(())
            }
            "OGR_ARC_MINLENGTH" => {
                self.min_chord_length = value.parse().map_err(|_| {
                    MagellanError::CorruptData(format!("invalid minimum length {value:?}"))
                })?;
                Ok(())
            }
            "ADD_INTERMEDIATE_POINT" => {
                self.intermediate_point = match value.to_ascii_uppercase().as_str() {
                    "STEALTH" => IntermediatePoint::Stealth,
                    v => {
                        if parse_bool(v)? {
                            IntermediatePoint::Yes
                        } else {
                            IntermediatePoint::No
                        }
                    }
                };
                Ok(())
            }
            other => Err(MagellanError::CorruptData(format!(
                "unknown arc option {other:?}"
            ))),
        }
    }
}

/// Ring organization method.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganizeMethod {
    /// Full containment analysis.
    #[default]
    Normal,
    /// No analysis: every ring becomes a top-level polygon.
    Skip,
    /// Counterclockwise rings are holes, clockwise rings are shells.
    OnlyCcw,
    /// Input interleaves each shell with its holes immediately after it.
    CcwInnerJustAfterCwOuter,
}

impl OrganizeMethod {
    /// Looks a method up by its recognized option value.
    pub fn from_name(name: &str) -> Result<OrganizeMethod, MagellanError> {
        match name.to_ascii_uppercase().as_str() {
            "DEFAULT" => Ok(OrganizeMethod::Normal),
            "SKIP" => Ok(OrganizeMethod::Skip),
            "ONLY_CCW" => Ok(OrganizeMethod::OnlyCcw),
            "CCW_INNER_JUST_AFTER_CW_OUTER" => Ok(OrganizeMethod::CcwInnerJustAfterCwOuter),
            other => Err(MagellanError::CorruptData(format!(
                "unknown polygon organization method {other:?}"
            ))),
        }
    }
}

/// Options of the polygon ring organizer.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeOptions {
    /// Chosen method; `None` selects [`OrganizeMethod::Normal`] and enables
    /// the large-input warning.
    pub method: Option<OrganizeMethod>,
    /// Use full polygon containment tests instead of sampled point tests
    /// (`OGR_DEBUG_ORGANIZE_POLYGONS`).
    pub exact_containment: bool,
}

impl OrganizeOptions {
    /// Sets an option by its recognized name (`METHOD`,
    /// `OGR_ORGANIZE_POLYGONS`, `OGR_DEBUG_ORGANIZE_POLYGONS`).
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), MagellanError> {
        match name.to_ascii_uppercase().as_str() {
            "METHOD" | "OGR_ORGANIZE_POLYGONS" => {
                self.method = Some(OrganizeMethod::from_name(value)?);
                Ok(())
            }
            "OGR_DEBUG_ORGANIZE_POLYGONS" => {
                self.exact_containment = parse_bool(value)?;
                Ok(())
            }
            other => Err(MagellanError::CorruptData(format!(
                "unknown organize option {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_option_names() {
        let mut opts = ArcOptions::default();
        assert_eq!(opts.max_step_degrees, 4.0);
        opts.set("OGR_ARC_STEPSIZE", "10").unwrap();
        opts.set("ogr_arc_minlength", "0.5").unwrap();
        opts.set("ADD_INTERMEDIATE_POINT", "YES").unwrap();
        assert_eq!(opts.max_step_degrees, 10.0);
        assert_eq!(opts.min_chord_length, 0.5);
        assert_eq!(opts.intermediate_point, IntermediatePoint::Yes);
        assert!(opts.set("NO_SUCH_OPTION", "1").is_err());
    }

    #[test]
    fn organize_option_names() {
        let mut opts = OrganizeOptions::default();
        opts.set("METHOD", "ONLY_CCW").unwrap();
        assert_eq!(opts.method, Some(OrganizeMethod::OnlyCcw));
        opts.set("OGR_ORGANIZE_POLYGONS", "skip").unwrap();
        assert_eq!(opts.method, Some(OrganizeMethod::Skip));
        opts.set("OGR_DEBUG_ORGANIZE_POLYGONS", "TRUE").unwrap();
        assert!(opts.exact_containment);
        assert!(opts.set("METHOD", "FASTEST").is_err());
    }
}
