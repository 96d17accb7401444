//! Coordinate extraction from the three GML coordinate encodings.
//!
//! GML 2 carries `<coordinates>` text with configurable separator characters
//! or per-point `<coord>` children; GML 3 carries `<pos>`/`<posList>` with an
//! explicit dimension count.

use magellan_geom::{Coord, CoordSeq};

use crate::error::GmlError;
use crate::node::GmlNode;

fn parse_value(token: &str, decimal: char) -> Result<f64, GmlError> {
    let normalized;
    let token = if decimal != '.' {
        normalized = token.replace(decimal, ".");
        normalized.as_str()
    } else {
        token
    };
    token
        .parse::<f64>()
        .map_err(|_| GmlError::Invalid(format!("cannot parse coordinate value {token:?}")))
}

fn single_char_attr(node: &GmlNode, name: &str, default: char) -> Result<char, GmlError> {
    match node.attr(name) {
        None => Ok(default),
        Some(value) => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(GmlError::Invalid(format!(
                    "attribute {name}={value:?} is not a single character"
                ))),
            }
        }
    }
}

/// Parses a `<coordinates>` element.
///
/// Tuples are separated by the `ts` character (whitespace collapsing when it
/// is a space), values within a tuple by `cs`. When no tuple contains a `cs`
/// the text is reinterpreted as a single tuple with `ts`-separated values,
/// which accepts the common nonconforming form `<coordinates>1 2</coordinates>`.
/// Empty text yields an empty sequence.
pub fn parse_coordinates(node: &GmlNode) -> Result<CoordSeq, GmlError> {
    let decimal = single_char_attr(node, "decimal", '.')?;
    let cs = single_char_attr(node, "cs", ',')?;
    let ts = single_char_attr(node, "ts", ' ')?;

    let text = node.text().trim();
    if text.is_empty() {
        return Ok(CoordSeq::new());
    }

    let tuples: Vec<&str> = if ts == ' ' {
        text.split_whitespace().collect()
    } else {
        text.split(ts).map(str::trim).filter(|t| !t.is_empty()).collect()
    };

    if !tuples.iter().any(|t| t.contains(cs)) && tuples.len() > 1 {
        // Ambiguous separators: treat the whole text as one tuple.
        let values = tuples
            .iter()
            .map(|t| parse_value(t, decimal))
            .collect::<Result<Vec<_>, _>>()?;
        return seq_from_values(&values, values.len());
    }

    let mut seq = CoordSeq::new();
    for (index, tuple) in tuples.iter().enumerate() {
        let values = tuple
            .split(cs)
            .map(|t| parse_value(t.trim(), decimal))
            .collect::<Result<Vec<_>, _>>()?;
        push_tuple(&mut seq, &values, index == 0)?;
    }
    Ok(seq)
}

fn seq_from_values(values: &[f64], dimension: usize) -> Result<CoordSeq, GmlError> {
    let mut seq = CoordSeq::new();
    if values.is_empty() {
        return Ok(seq);
    }
    if !(2..=3).contains(&dimension) || values.len() % dimension != 0 {
        return Err(GmlError::Invalid(format!(
            "{} coordinate values do not divide into {dimension}-dimensional tuples",
            values.len()
        )));
    }
    if dimension == 3 {
        seq.set_dimensions(true, false);
    }
    for tuple in values.chunks(dimension) {
        seq.push(match tuple {
            [x, y] => Coord::xy(*x, *y),
            [x, y, z] => Coord::xyz(*x, *y, *z),
            _ => unreachable!(),
        });
    }
    Ok(seq)
}

fn push_tuple(seq: &mut CoordSeq, values: &[f64], first: bool) -> Result<(), GmlError> {
    match values.len() {
        2 => {
            if first {
                seq.set_dimensions(false, false);
            } else if seq.has_z() {
                return Err(GmlError::Invalid(
                    "mixed 2D and 3D coordinate tuples".into(),
                ));
            }
            seq.push(Coord::xy(values[0], values[1]));
        }
        3 => {
            if first {
                seq.set_dimensions(true, false);
            } else if !seq.has_z() {
                return Err(GmlError::Invalid(
                    "mixed 2D and 3D coordinate tuples".into(),
                ));
            }
            seq.push(Coord::xyz(values[0], values[1], values[2]));
        }
        other => {
            return Err(GmlError::Invalid(format!(
                "coordinate tuple has {other} values, expected 2 or 3"
            )))
        }
    }
    Ok(())
}

/// Parses a `<pos>` element into a single coordinate.
pub fn parse_pos(node: &GmlNode) -> Result<Coord, GmlError> {
    let values = whitespace_values(node)?;
    match values.as_slice() {
        [x, y] => Ok(Coord::xy(*x, *y)),
        [x, y, z, ..] => Ok(Coord::xyz(*x, *y, *z)),
        _ => Err(GmlError::Invalid(format!(
            "<pos> has {} values, expected at least 2",
            values.len()
        ))),
    }
}

/// Parses a `<posList>` element.
///
/// The dimension comes from a local `srsDimension` attribute, then from the
/// inherited value, then defaults to 2.
pub fn parse_pos_list(
    node: &GmlNode,
    inherited_dimension: Option<usize>,
) -> Result<CoordSeq, GmlError> {
    let dimension = match node.attr("srsDimension") {
        Some(value) => value.parse::<usize>().map_err(|_| {
            GmlError::Invalid(format!("invalid srsDimension {value:?}"))
        })?,
        None => inherited_dimension.unwrap_or(2),
    };
    let values = whitespace_values(node)?;
    seq_from_values(&values, dimension)
}

fn whitespace_values(node: &GmlNode) -> Result<Vec<f64>, GmlError> {
    node.text()
        .split_whitespace()
        .map(|t| parse_value(t, '.'))
        .collect()
}

/// Parses a `<coord>` element with `<X>`, `<Y>` and optional `<Z>` children.
pub fn parse_coord(node: &GmlNode) -> Result<Coord, GmlError> {
    let axis = |name: &str| -> Result<f64, GmlError> {
        let child = node
            .child(name)
            .ok_or_else(|| GmlError::Invalid(format!("<coord> is missing <{name}>")))?;
        parse_value(child.text().trim(), '.')
    };
    let x = axis("X")?;
    let y = axis("Y")?;
    match node.child("Z") {
        Some(z) => Ok(Coord::xyz(x, y, parse_value(z.text().trim(), '.')?)),
        None => Ok(Coord::xy(x, y)),
    }
}

/// Extracts the coordinate sequence of a geometry element, trying each of
/// the three encodings in turn.
pub fn node_coords(node: &GmlNode, inherited_dimension: Option<usize>) -> Result<CoordSeq, GmlError> {
    if let Some(coordinates) = node.child("coordinates") {
        return parse_coordinates(coordinates);
    }
    if let Some(pos_list) = node.child("posList") {
        return parse_pos_list(pos_list, inherited_dimension);
    }
    let pos_children: Vec<&GmlNode> = node.children_named(&["pos"]).collect();
    if !pos_children.is_empty() {
        let coords = pos_children
            .iter()
            .map(|p| parse_pos(p))
            .collect::<Result<Vec<_>, _>>()?;
        let has_z = pos_children
            .iter()
            .any(|p| p.text().split_whitespace().count() >= 3);
        return Ok(CoordSeq::from_coords(coords, has_z, false));
    }
    let coord_children: Vec<&GmlNode> = node.children_named(&["coord"]).collect();
    if !coord_children.is_empty() {
        let mut seq = CoordSeq::new();
        for (index, child) in coord_children.iter().enumerate() {
            let has_z = child.child("Z").is_some();
            if index == 0 {
                seq.set_dimensions(has_z, false);
            }
            seq.push(parse_coord(child)?);
        }
        return Ok(seq);
    }
    Err(GmlError::Invalid(format!(
        "<{}> carries no recognized coordinate encoding",
        node.name()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_default_separators() {
        let node = GmlNode::new("coordinates").with_text("1,2 3,4 5,6");
        let seq = parse_coordinates(&node).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(1), Some(&Coord::xy(3.0, 4.0)));
    }

    #[test]
    fn coordinates_custom_separators() {
        let node = GmlNode::new("coordinates")
            .with_attr("decimal", ",")
            .with_attr("cs", ";")
            .with_attr("ts", "|")
            .with_text("1,5;2 | 3;4,5");
        let seq = parse_coordinates(&node).unwrap();
        assert_eq!(seq.get(0), Some(&Coord::xy(1.5, 2.0)));
        assert_eq!(seq.get(1), Some(&Coord::xy(3.0, 4.5)));
    }

    #[test]
    fn coordinates_tolerant_single_tuple() {
        // Nonconforming but common: space-separated values of one point.
        let node = GmlNode::new("coordinates").with_text("1 2");
        let seq = parse_coordinates(&node).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(0), Some(&Coord::xy(1.0, 2.0)));
    }

    #[test]
    fn empty_coordinates_is_empty_sequence() {
        let node = GmlNode::new("coordinates").with_text("   ");
        assert!(parse_coordinates(&node).unwrap().is_empty());
    }

    #[test]
    fn pos_list_dimensions() {
        let node = GmlNode::new("posList")
            .with_attr("srsDimension", "3")
            .with_text("1 2 3 4 5 6");
        let seq = parse_pos_list(&node, None).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.has_z());

        let node = GmlNode::new("posList").with_text("1 2 3 4");
        let seq = parse_pos_list(&node, None).unwrap();
        assert_eq!(seq.len(), 2);

        let node = GmlNode::new("posList").with_text("1 2 3 4 5");
        assert!(parse_pos_list(&node, None).is_err());
    }

    #[test]
    fn inherited_dimension_applies() {
        let node = GmlNode::new("posList").with_text("1 2 3 4 5 6");
        let seq = parse_pos_list(&node, Some(3)).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.has_z());
    }

    #[test]
    fn coord_children() {
        let node = GmlNode::new("coord")
            .with_child(GmlNode::new("X").with_text("1"))
            .with_child(GmlNode::new("Y").with_text("2"))
            .with_child(GmlNode::new("Z").with_text("3"));
        assert_eq!(parse_coord(&node).unwrap(), Coord::xyz(1.0, 2.0, 3.0));
    }
}
