//! Vector geometry model with circular-arc support.
//!
//! The crate provides the simple-features geometry types (points, line
//! strings, polygons and their multi-variants) plus the curve family
//! (circular strings, compound curves, curve polygons), along with the
//! algorithms that connect the two worlds: curve stroking, arc detection in
//! stroked data, and reorganization of flat ring lists into nested polygons.
//!
//! Wire formats live in separate crates: `magellan-wkx` for WKB/WKT and
//! `magellan-gml` for GML trees.

pub mod analysis;
pub mod arc;
pub mod organize;

mod cast;
mod coord;
mod curve;
mod curve_polygon;
mod envelope;
mod error;
mod geometry;
mod multi;
mod options;
mod point;
mod polygon;
mod srs;
mod types;

pub use cast::curve_to_linear_ring;
pub use coord::{Coord, CoordSeq};
pub use curve::{CircularString, CompoundCurve, Curve, LineString, LinearRing};
pub use curve_polygon::CurvePolygon;
pub use envelope::{Envelope, Envelope3};
pub use error::MagellanError;
pub use geometry::Geometry;
pub use multi::{
    GeometryCollection, MultiCurve, MultiLineString, MultiPoint, MultiPolygon, MultiSurface,
    Surface,
};
pub use options::{
    parse_bool, ArcOptions, IntermediatePoint, OrganizeMethod, OrganizeOptions,
};
pub use point::Point;
pub use polygon::Polygon;
pub use srs::{Srs, SrsRef};
pub use types::{GeometryType, WkbVariant};
