use magellan_geom::parse_bool;

use crate::error::GmlError;

/// Knobs controlling how GML topology elements are interpreted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GmlOptions {
    /// For topology elements, return the node points instead of the edge
    /// curves.
    pub get_secondary_geometry: bool,
    /// Assemble `TopoSurface` by treating positively-oriented faces as
    /// exterior rings and negatively-oriented faces as holes, instead of
    /// running a polygon union over the faces.
    pub face_hole_negative: bool,
}

impl GmlOptions {
    /// Sets an option by its configuration name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), GmlError> {
        match name.to_ascii_uppercase().as_str() {
            "GML_GET_SECONDARY_GEOM" => self.get_secondary_geometry = parse_bool(value)?,
            "GML_FACE_HOLE_NEGATIVE" => self.face_hole_negative = parse_bool(value)?,
            other => {
                return Err(GmlError::Invalid(format!("unknown GML option {other:?}")));
            }
        }
        Ok(())
    }
}
