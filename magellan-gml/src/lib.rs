//! GML geometry import for magellan.
//!
//! The importer does not parse XML itself. It consumes a [`GmlNode`] tree,
//! an attributed element tree that any XML reader can produce, and builds
//! [`magellan_geom::Geometry`] values from it. Namespace prefixes on element
//! and attribute names are ignored; element dispatch is case-insensitive.
//!
//! ```
//! use magellan_gml::{import_geometry, GmlNode, GmlOptions};
//!
//! let node = GmlNode::new("gml:Point")
//!     .with_child(GmlNode::new("gml:pos").with_text("12.5 -3.0"));
//! let geometry = import_geometry(&node, &GmlOptions::default()).unwrap();
//! assert_eq!(geometry.point_count(), 1);
//! ```

mod coords;
mod error;
mod import;
mod node;
mod options;
mod topo;

pub use coords::{parse_coordinates, parse_pos, parse_pos_list};
pub use error::GmlError;
pub use import::import_geometry;
pub use node::GmlNode;
pub use options::GmlOptions;
