//! Geometry type discriminants and their wire encodings.

use serde::{Deserialize, Serialize};

use crate::error::MagellanError;

/// Legacy "25D" flag: the high bit of the type code marks a 3D geometry.
pub const WKB_25D_FLAG: u32 = 0x8000_0000;

/// Flattened geometry type discriminant.
///
/// Values are the base WKB type codes. Z/M decoration is carried separately by
/// geometries and composed into wire codes by [`GeometryType::wkb_code`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum GeometryType {
    /// A single location.
    Point = 1,
    /// A sequence of straight line segments.
    LineString = 2,
    /// A surface bounded by linear rings.
    Polygon = 3,
    /// A collection of points.
    MultiPoint = 4,
    /// A collection of line strings.
    MultiLineString = 5,
    /// A collection of polygons.
    MultiPolygon = 6,
    /// A heterogeneous collection.
    GeometryCollection = 7,
    /// A sequence of circular arcs.
    CircularString = 8,
    /// A chain of line strings and circular strings.
    CompoundCurve = 9,
    /// A surface bounded by arbitrary curves.
    CurvePolygon = 10,
    /// A collection of curves.
    MultiCurve = 11,
    /// A collection of surfaces.
    MultiSurface = 12,
}

/// Which Z/M decoration scheme wire codes use.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum WkbVariant {
    /// ISO SQL/MM: `code + 1000*Z + 2000*M`.
    #[default]
    Iso,
    /// Legacy scheme: Z is the `0x80000000` bit, M cannot be represented.
    ///
    /// Writers asked for legacy output fall back to ISO codes for measured
    /// geometries rather than dropping the M values.
    Legacy,
}

impl GeometryType {
    /// All discriminants, in WKB code order.
    pub const ALL: [GeometryType; 12] = [
        GeometryType::Point,
        GeometryType::LineString,
        GeometryType::Polygon,
        GeometryType::MultiPoint,
        GeometryType::MultiLineString,
        GeometryType::MultiPolygon,
        GeometryType::GeometryCollection,
        GeometryType::CircularString,
        GeometryType::CompoundCurve,
        GeometryType::CurvePolygon,
        GeometryType::MultiCurve,
        GeometryType::MultiSurface,
    ];

    /// Base WKB code of the flattened type.
    pub fn base_code(self) -> u32 {
        self as u32
    }

    /// Decodes a wire type code into the flattened type and its Z/M flags.
    ///
    /// Both the ISO scheme (+1000/+2000/+3000) and the legacy 25D high bit are
    /// accepted.
    pub fn from_wkb_code(code: u32) -> Result<(GeometryType, bool, bool), MagellanError> {
        let mut has_z = false;
        let mut has_m = false;
        let mut base = code;

        if base & WKB_25D_FLAG != 0 {
            has_z = true;
            base &= !WKB_25D_FLAG;
        }
        match base / 1000 {
            0 => {}
            1 => has_z = true,
            2 => has_m = true,
            3 => {
                has_z = true;
                has_m = true;
            }
            _ => {
                return Err(MagellanError::UnsupportedGeometryType(format!(
                    "unknown wkb type code {code}"
                )))
            }
        }
        base %= 1000;

        let flat = match base {
            1 => GeometryType::Point,
            2 => GeometryType::LineString,
            3 => GeometryType::Polygon,
            4 => GeometryType::MultiPoint,
            5 => GeometryType::MultiLineString,
            6 => GeometryType::MultiPolygon,
            7 => GeometryType::GeometryCollection,
            8 => GeometryType::CircularString,
            9 => GeometryType::CompoundCurve,
            10 => GeometryType::CurvePolygon,
            11 => GeometryType::MultiCurve,
            12 => GeometryType::MultiSurface,
            _ => {
                return Err(MagellanError::UnsupportedGeometryType(format!(
                    "unknown wkb type code {code}"
                )))
            }
        };
        Ok((flat, has_z, has_m))
    }

    /// Composes the wire type code for this type with the given decoration.
    pub fn wkb_code(self, has_z: bool, has_m: bool, variant: WkbVariant) -> u32 {
        match variant {
            WkbVariant::Legacy if !has_m => {
                if has_z {
                    self.base_code() | WKB_25D_FLAG
                } else {
                    self.base_code()
                }
            }
            _ => {
                let mut code = self.base_code();
                if has_z {
                    code += 1000;
                }
                if has_m {
                    code += 2000;
                }
                code
            }
        }
    }

    /// WKT keyword of the type.
    pub fn wkt_keyword(self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
            GeometryType::CircularString => "CIRCULARSTRING",
            GeometryType::CompoundCurve => "COMPOUNDCURVE",
            GeometryType::CurvePolygon => "CURVEPOLYGON",
            GeometryType::MultiCurve => "MULTICURVE",
            GeometryType::MultiSurface => "MULTISURFACE",
        }
    }

    /// Looks a type up by its WKT keyword, case-insensitively.
    pub fn from_wkt_keyword(keyword: &str) -> Option<GeometryType> {
        GeometryType::ALL
            .into_iter()
            .find(|t| t.wkt_keyword().eq_ignore_ascii_case(keyword))
    }

    /// True for the curve types (usable as a compound curve segment or a
    /// curve polygon ring).
    pub fn is_curve(self) -> bool {
        matches!(
            self,
            GeometryType::LineString | GeometryType::CircularString | GeometryType::CompoundCurve
        )
    }

    /// True for the surface types.
    pub fn is_surface(self) -> bool {
        matches!(self, GeometryType::Polygon | GeometryType::CurvePolygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_codes_round_trip() {
        for t in GeometryType::ALL {
            for (has_z, has_m) in [(false, false), (true, false), (false, true), (true, true)] {
                let code = t.wkb_code(has_z, has_m, WkbVariant::Iso);
                assert_eq!(
                    GeometryType::from_wkb_code(code).unwrap(),
                    (t, has_z, has_m)
                );
            }
        }
    }

    #[test]
    fn legacy_25d_codes() {
        let code = GeometryType::Polygon.wkb_code(true, false, WkbVariant::Legacy);
        assert_eq!(code, 3 | WKB_25D_FLAG);
        assert_eq!(
            GeometryType::from_wkb_code(code).unwrap(),
            (GeometryType::Polygon, true, false)
        );

        // Legacy cannot carry M: writers are expected to switch to ISO.
        let code = GeometryType::Point.wkb_code(false, true, WkbVariant::Legacy);
        assert_eq!(code, 2001);
    }

    #[test]
    fn unknown_codes_rejected() {
        assert!(GeometryType::from_wkb_code(0).is_err());
        assert!(GeometryType::from_wkb_code(13).is_err());
        assert!(GeometryType::from_wkb_code(4001).is_err());
    }

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        assert_eq!(
            GeometryType::from_wkt_keyword("circularstring"),
            Some(GeometryType::CircularString)
        );
        assert_eq!(GeometryType::from_wkt_keyword("nonsense"), None);
    }
}
