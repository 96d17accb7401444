//! Well-known text reader and writer.
//!
//! The reader is a recursive-descent parser keyed on the leading geometry
//! keyword. `EMPTY` is accepted wherever a geometry body may appear,
//! including as an empty-ring marker inside polygon ring lists. The reader
//! returns the unconsumed remainder of the input so callers can scan a
//! buffer holding more than one geometry.

use magellan_geom::{
    CircularString, CompoundCurve, Coord, CoordSeq, Curve, CurvePolygon, Geometry,
    GeometryCollection, GeometryType, LineString, LinearRing, MagellanError, MultiCurve,
    MultiLineString, MultiPoint, MultiPolygon, MultiSurface, Point, Polygon, Surface, WkbVariant,
};

use crate::MAX_NESTING_DEPTH;

/// Coordinate dimensions of the geometry being parsed.
///
/// A `Z`/`M`/`ZM` suffix fixes the dimensions up front; otherwise the first
/// coordinate tuple decides and later tuples must agree.
#[derive(Debug, Copy, Clone)]
struct Dims {
    has_z: bool,
    has_m: bool,
    explicit: bool,
}

impl Dims {
    fn value_count(&self) -> usize {
        2 + usize::from(self.has_z) + usize::from(self.has_m)
    }

    fn apply(&mut self, values: usize) -> Result<(), MagellanError> {
        if self.explicit {
            if values != self.value_count() {
                return Err(MagellanError::CorruptData(format!(
                    "coordinate has {values} values where {} were declared",
                    self.value_count()
                )));
            }
            return Ok(());
        }
        match values {
            2 => {}
            3 => self.has_z = true,
            4 => {
                self.has_z = true;
                self.has_m = true;
            }
            other => {
                return Err(MagellanError::CorruptData(format!(
                    "coordinate has {other} values, expected 2 to 4"
                )))
            }
        }
        self.explicit = true;
        Ok(())
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// Consumes a run of letters, if the input starts with one.
    fn take_word(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(word)
    }

    fn peek_word(&mut self) -> Option<&'a str> {
        let mut probe = Cursor { rest: self.rest };
        probe.take_word()
    }

    fn take_char(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.rest.starts_with(expected) {
            self.rest = &self.rest[expected.len_utf8()..];
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), MagellanError> {
        if self.take_char(expected) {
            Ok(())
        } else {
            Err(MagellanError::CorruptData(format!(
                "expected `{expected}` at `{}`",
                self.rest.chars().take(20).collect::<String>()
            )))
        }
    }

    fn take_number(&mut self) -> Result<f64, MagellanError> {
        self.skip_ws();
        let end = self
            .rest
            .find(|c: char| !matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
            .unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        let value = token.parse::<f64>().map_err(|_| {
            MagellanError::CorruptData(format!(
                "expected a number at `{}`",
                self.rest.chars().take(20).collect::<String>()
            ))
        })?;
        self.rest = rest;
        Ok(value)
    }

    /// True if the next token starts a number.
    fn at_number(&mut self) -> bool {
        self.skip_ws();
        self.rest
            .starts_with(|c: char| matches!(c, '0'..='9' | '+' | '-' | '.'))
    }

    fn take_empty(&mut self) -> bool {
        if self
            .peek_word()
            .is_some_and(|w| w.eq_ignore_ascii_case("EMPTY"))
        {
            self.take_word();
            true
        } else {
            false
        }
    }
}

fn take_dims(cur: &mut Cursor) -> Dims {
    let mut dims = Dims {
        has_z: false,
        has_m: false,
        explicit: false,
    };
    if let Some(word) = cur.peek_word() {
        match word.to_ascii_uppercase().as_str() {
            "Z" => {
                cur.take_word();
                dims.has_z = true;
                dims.explicit = true;
            }
            "M" => {
                cur.take_word();
                dims.has_m = true;
                dims.explicit = true;
            }
            "ZM" => {
                cur.take_word();
                dims.has_z = true;
                dims.has_m = true;
                dims.explicit = true;
            }
            _ => {}
        }
    }
    dims
}

fn parse_tuple(cur: &mut Cursor, dims: &mut Dims) -> Result<Coord, MagellanError> {
    let mut values = [0.0f64; 4];
    let mut count = 0;
    while cur.at_number() {
        if count == 4 {
            return Err(MagellanError::CorruptData(
                "coordinate has more than 4 values".into(),
            ));
        }
        values[count] = cur.take_number()?;
        count += 1;
    }
    if count < 2 {
        return Err(MagellanError::CorruptData(
            "coordinate has fewer than 2 values".into(),
        ));
    }
    dims.apply(count)?;
    let mut coord = Coord::xy(values[0], values[1]);
    let mut next = 2;
    if dims.has_z {
        coord.z = values[next];
        next += 1;
    }
    if dims.has_m {
        coord.m = values[next];
    }
    Ok(coord)
}

/// Parses `EMPTY` or a parenthesized comma-separated tuple list.
fn parse_seq(cur: &mut Cursor, dims: &mut Dims) -> Result<CoordSeq, MagellanError> {
    if cur.take_empty() {
        return Ok(CoordSeq::with_dimensions(dims.has_z, dims.has_m));
    }
    cur.expect_char('(')?;
    let mut seq = CoordSeq::with_dimensions(dims.has_z, dims.has_m);
    loop {
        let coord = parse_tuple(cur, dims)?;
        seq.set_dimensions(dims.has_z, dims.has_m);
        seq.push(coord);
        if !cur.take_char(',') {
            break;
        }
    }
    cur.expect_char(')')?;
    Ok(seq)
}

fn parse_polygon_body(cur: &mut Cursor, mut dims: Dims) -> Result<Polygon, MagellanError> {
    let mut polygon = Polygon::new();
    polygon.set_dimensions(dims.has_z, dims.has_m);
    if cur.take_empty() {
        return Ok(polygon);
    }
    cur.expect_char('(')?;
    loop {
        // An EMPTY marker in a ring list stands for an empty ring.
        if cur.take_empty() {
            polygon.push_ring(LinearRing::new());
        } else {
            polygon.push_ring(LinearRing::from_seq(parse_seq(cur, &mut dims)?));
        }
        if !cur.take_char(',') {
            break;
        }
    }
    cur.expect_char(')')?;
    polygon.set_dimensions(dims.has_z, dims.has_m);
    Ok(polygon)
}

/// Parses a curve position: a tagged CIRCULARSTRING/COMPOUNDCURVE or a bare
/// tuple list standing for a line string.
fn parse_curve(cur: &mut Cursor, dims: Dims, depth: usize) -> Result<Curve, MagellanError> {
    if let Some(word) = cur.peek_word() {
        if word.eq_ignore_ascii_case("EMPTY") {
            cur.take_word();
            return Ok(Curve::LineString(LineString::new()));
        }
        let upper = word.to_ascii_uppercase();
        return match GeometryType::from_wkt_keyword(&upper) {
            Some(GeometryType::CircularString) | Some(GeometryType::CompoundCurve)
            | Some(GeometryType::LineString) => {
                match parse_geometry(cur, depth + 1)? {
                    Geometry::LineString(g) => Ok(Curve::LineString(g)),
                    Geometry::CircularString(g) => Ok(Curve::CircularString(g)),
                    Geometry::CompoundCurve(g) => Ok(Curve::Compound(g)),
                    // parse_geometry returned what the keyword dictated.
                    _ => Err(MagellanError::CorruptData("not a curve".into())),
                }
            }
            _ => Err(MagellanError::UnsupportedGeometryType(format!(
                "`{word}` cannot appear in a curve position"
            ))),
        };
    }
    let mut dims = dims;
    Ok(Curve::LineString(LineString::from_seq(parse_seq(
        cur, &mut dims,
    )?)))
}

/// Parses a surface position: a tagged CURVEPOLYGON/POLYGON or a bare
/// polygon ring list.
fn parse_surface(cur: &mut Cursor, dims: Dims, depth: usize) -> Result<Surface, MagellanError> {
    if let Some(word) = cur.peek_word() {
        if !word.eq_ignore_ascii_case("EMPTY") {
            let upper = word.to_ascii_uppercase();
            return match GeometryType::from_wkt_keyword(&upper) {
                Some(GeometryType::Polygon) | Some(GeometryType::CurvePolygon) => {
                    match parse_geometry(cur, depth + 1)? {
                        Geometry::Polygon(g) => Ok(Surface::Polygon(g)),
                        Geometry::CurvePolygon(g) => Ok(Surface::CurvePolygon(g)),
                        _ => Err(MagellanError::CorruptData("not a surface".into())),
                    }
                }
                _ => Err(MagellanError::UnsupportedGeometryType(format!(
                    "`{word}` cannot appear in a surface position"
                ))),
            };
        }
    }
    Ok(Surface::Polygon(parse_polygon_body(cur, dims)?))
}

fn parse_geometry(cur: &mut Cursor, depth: usize) -> Result<Geometry, MagellanError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(MagellanError::CorruptData(format!(
            "geometry nesting exceeds {MAX_NESTING_DEPTH} levels"
        )));
    }
    let word = cur.take_word().ok_or_else(|| {
        MagellanError::CorruptData(format!(
            "expected a geometry keyword at `{}`",
            cur.rest.chars().take(20).collect::<String>()
        ))
    })?;
    let upper = word.to_ascii_uppercase();
    let geometry_type = GeometryType::from_wkt_keyword(&upper).ok_or_else(|| {
        MagellanError::UnsupportedGeometryType(format!("unknown keyword `{word}`"))
    })?;
    let mut dims = take_dims(cur);

    match geometry_type {
        GeometryType::Point => {
            if cur.take_empty() {
                return Ok(Point::empty_with_dimensions(dims.has_z, dims.has_m).into());
            }
            cur.expect_char('(')?;
            let coord = parse_tuple(cur, &mut dims)?;
            cur.expect_char(')')?;
            Ok(Point::from_coord(coord, dims.has_z, dims.has_m).into())
        }
        GeometryType::LineString => Ok(LineString::from_seq(parse_seq(cur, &mut dims)?).into()),
        GeometryType::CircularString => {
            Ok(CircularString::from_seq(parse_seq(cur, &mut dims)?).into())
        }
        GeometryType::CompoundCurve => {
            let mut compound = CompoundCurve::new();
            if cur.take_empty() {
                return Ok(compound.into());
            }
            cur.expect_char('(')?;
            loop {
                compound.push_segment(parse_curve(cur, dims, depth)?)?;
                if !cur.take_char(',') {
                    break;
                }
            }
            cur.expect_char(')')?;
            Ok(compound.into())
        }
        GeometryType::Polygon => Ok(parse_polygon_body(cur, dims)?.into()),
        GeometryType::CurvePolygon => {
            let mut polygon = CurvePolygon::new();
            if cur.take_empty() {
                return Ok(polygon.into());
            }
            cur.expect_char('(')?;
            loop {
                polygon.push_ring(parse_curve(cur, dims, depth)?);
                if !cur.take_char(',') {
                    break;
                }
            }
            cur.expect_char(')')?;
            Ok(polygon.into())
        }
        GeometryType::MultiPoint => {
            let mut multi = MultiPoint::new();
            if cur.take_empty() {
                return Ok(multi.into());
            }
            cur.expect_char('(')?;
            loop {
                // Both `(1 2, 3 4)` and `((1 2), (3 4))` forms occur.
                if cur.take_empty() {
                    multi.push(Point::empty_with_dimensions(dims.has_z, dims.has_m));
                } else if cur.take_char('(') {
                    let coord = parse_tuple(cur, &mut dims)?;
                    cur.expect_char(')')?;
                    multi.push(Point::from_coord(coord, dims.has_z, dims.has_m));
                } else {
                    let coord = parse_tuple(cur, &mut dims)?;
                    multi.push(Point::from_coord(coord, dims.has_z, dims.has_m));
                }
                if !cur.take_char(',') {
                    break;
                }
            }
            cur.expect_char(')')?;
            Ok(multi.into())
        }
        GeometryType::MultiLineString => {
            let mut multi = MultiLineString::new();
            if cur.take_empty() {
                return Ok(multi.into());
            }
            cur.expect_char('(')?;
            loop {
                let mut member_dims = dims;
                multi.push(LineString::from_seq(parse_seq(cur, &mut member_dims)?));
                if !cur.take_char(',') {
                    break;
                }
            }
            cur.expect_char(')')?;
            Ok(multi.into())
        }
        GeometryType::MultiCurve => {
            let mut multi = MultiCurve::new();
            if cur.take_empty() {
                return Ok(multi.into());
            }
            cur.expect_char('(')?;
            loop {
                multi.push(parse_curve(cur, dims, depth)?);
                if !cur.take_char(',') {
                    break;
                }
            }
            cur.expect_char(')')?;
            Ok(multi.into())
        }
        GeometryType::MultiPolygon => {
            let mut multi = MultiPolygon::new();
            if cur.take_empty() {
                return Ok(multi.into());
            }
            cur.expect_char('(')?;
            loop {
                multi.push(parse_polygon_body(cur, dims)?);
                if !cur.take_char(',') {
                    break;
                }
            }
            cur.expect_char(')')?;
            Ok(multi.into())
        }
        GeometryType::MultiSurface => {
            let mut multi = MultiSurface::new();
            if cur.take_empty() {
                return Ok(multi.into());
            }
            cur.expect_char('(')?;
            loop {
                multi.push(parse_surface(cur, dims, depth)?);
                if !cur.take_char(',') {
                    break;
                }
            }
            cur.expect_char(')')?;
            Ok(multi.into())
        }
        GeometryType::GeometryCollection => {
            let mut collection = GeometryCollection::new();
            if cur.take_empty() {
                return Ok(collection.into());
            }
            cur.expect_char('(')?;
            loop {
                collection.push(parse_geometry(cur, depth + 1)?);
                if !cur.take_char(',') {
                    break;
                }
            }
            cur.expect_char(')')?;
            Ok(collection.into())
        }
    }
}

/// Parses a geometry from the start of `input`.
///
/// Returns the geometry and the unconsumed remainder of the input.
pub fn read_wkt(input: &str) -> Result<(Geometry, &str), MagellanError> {
    let mut cur = Cursor { rest: input };
    let geometry = parse_geometry(&mut cur, 0)?;
    Ok((geometry, cur.rest))
}

fn fmt_number(out: &mut String, value: f64) {
    use std::fmt::Write;
    // `{}` is shortest-round-trip for f64 and prints integral values bare.
    let _ = write!(out, "{value}");
}

fn fmt_coord(out: &mut String, coord: &Coord, has_z: bool, has_m: bool) {
    fmt_number(out, coord.x);
    out.push(' ');
    fmt_number(out, coord.y);
    if has_z {
        out.push(' ');
        fmt_number(out, coord.z);
    }
    if has_m {
        out.push(' ');
        fmt_number(out, coord.m);
    }
}

fn fmt_seq(out: &mut String, seq: &CoordSeq, has_z: bool, has_m: bool) {
    out.push('(');
    for (index, coord) in seq.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        fmt_coord(out, coord, has_z, has_m);
    }
    out.push(')');
}

struct WktWriter {
    out: String,
    variant: WkbVariant,
}

impl WktWriter {
    /// Writes the keyword with its dimension suffix and resolves which
    /// dimensions the body should carry. Legacy output keeps Z without a
    /// suffix and drops M entirely.
    fn keyword(&mut self, geometry_type: GeometryType, has_z: bool, has_m: bool) -> (bool, bool) {
        self.out.push_str(geometry_type.wkt_keyword());
        let dims = match self.variant {
            WkbVariant::Iso => {
                match (has_z, has_m) {
                    (true, true) => self.out.push_str(" ZM"),
                    (true, false) => self.out.push_str(" Z"),
                    (false, true) => self.out.push_str(" M"),
                    (false, false) => {}
                }
                (has_z, has_m)
            }
            WkbVariant::Legacy => (has_z, false),
        };
        self.out.push(' ');
        dims
    }

    fn body_seq(&mut self, seq: &CoordSeq, has_z: bool, has_m: bool) {
        if seq.is_empty() {
            self.out.push_str("EMPTY");
        } else {
            fmt_seq(&mut self.out, seq, has_z, has_m);
        }
    }

    /// Writes a curve in a ring/segment position: line strings appear as
    /// bare tuple lists, the other curve types carry their keyword.
    fn curve(&mut self, curve: &Curve) {
        match curve {
            Curve::LineString(g) => {
                let (has_z, has_m) = self.legacy_dims(g.seq().has_z(), g.seq().has_m());
                self.body_seq(g.seq(), has_z, has_m);
            }
            Curve::CircularString(g) => self.circular_string(g),
            Curve::Compound(g) => self.compound_curve(g),
        }
    }

    fn circular_string(&mut self, g: &CircularString) {
        let (has_z, has_m) =
            self.keyword(GeometryType::CircularString, g.seq().has_z(), g.seq().has_m());
        self.body_seq(g.seq(), has_z, has_m);
    }

    fn compound_curve(&mut self, g: &CompoundCurve) {
        self.keyword(GeometryType::CompoundCurve, g.has_z(), g.has_m());
        if g.is_empty() {
            self.out.push_str("EMPTY");
            return;
        }
        self.out.push('(');
        for (index, segment) in g.segments().iter().enumerate() {
            if index > 0 {
                self.out.push(',');
            }
            self.curve(segment);
        }
        self.out.push(')');
    }

    fn polygon(&mut self, g: &Polygon) {
        let (has_z, has_m) = self.keyword(GeometryType::Polygon, g.has_z(), g.has_m());
        self.polygon_body(g, has_z, has_m);
    }

    fn curve_polygon(&mut self, g: &CurvePolygon) {
        self.keyword(GeometryType::CurvePolygon, g.has_z(), g.has_m());
        if g.is_empty() {
            self.out.push_str("EMPTY");
            return;
        }
        self.out.push('(');
        for (index, ring) in g.rings().iter().enumerate() {
            if index > 0 {
                self.out.push(',');
            }
            self.curve(ring);
        }
        self.out.push(')');
    }

    fn legacy_dims(&self, has_z: bool, has_m: bool) -> (bool, bool) {
        match self.variant {
            WkbVariant::Iso => (has_z, has_m),
            WkbVariant::Legacy => (has_z, false),
        }
    }

    fn polygon_body(&mut self, polygon: &Polygon, has_z: bool, has_m: bool) {
        if polygon.is_empty() {
            self.out.push_str("EMPTY");
            return;
        }
        self.out.push('(');
        for (index, ring) in polygon.rings().iter().enumerate() {
            if index > 0 {
                self.out.push(',');
            }
            self.body_seq(ring.seq(), has_z, has_m);
        }
        self.out.push(')');
    }

    fn geometry(&mut self, geometry: &Geometry) {
        let geometry_type = geometry.geometry_type();
        match geometry {
            Geometry::Point(g) => {
                let (has_z, has_m) = self.keyword(geometry_type, g.has_z(), g.has_m());
                match g.coord() {
                    Some(coord) => {
                        self.out.push('(');
                        fmt_coord(&mut self.out, coord, has_z, has_m);
                        self.out.push(')');
                    }
                    None => self.out.push_str("EMPTY"),
                }
            }
            Geometry::LineString(g) => {
                let (has_z, has_m) =
                    self.keyword(geometry_type, g.seq().has_z(), g.seq().has_m());
                self.body_seq(g.seq(), has_z, has_m);
            }
            Geometry::CircularString(g) => self.circular_string(g),
            Geometry::CompoundCurve(g) => self.compound_curve(g),
            Geometry::Polygon(g) => self.polygon(g),
            Geometry::CurvePolygon(g) => self.curve_polygon(g),
            Geometry::MultiPoint(g) => {
                let (has_z, has_m) =
                    self.keyword(geometry_type, geometry.has_z(), geometry.has_m());
                if g.is_empty() {
                    self.out.push_str("EMPTY");
                    return;
                }
                self.out.push('(');
                for (index, member) in g.members().iter().enumerate() {
                    if index > 0 {
                        self.out.push(',');
                    }
                    match member.coord() {
                        Some(coord) => {
                            self.out.push('(');
                            fmt_coord(&mut self.out, coord, has_z, has_m);
                            self.out.push(')');
                        }
                        None => self.out.push_str("EMPTY"),
                    }
                }
                self.out.push(')');
            }
            Geometry::MultiLineString(g) => {
                let (has_z, has_m) =
                    self.keyword(geometry_type, geometry.has_z(), geometry.has_m());
                if g.is_empty() {
                    self.out.push_str("EMPTY");
                    return;
                }
                self.out.push('(');
                for (index, member) in g.members().iter().enumerate() {
                    if index > 0 {
                        self.out.push(',');
                    }
                    self.body_seq(member.seq(), has_z, has_m);
                }
                self.out.push(')');
            }
            Geometry::MultiCurve(g) => {
                self.keyword(geometry_type, geometry.has_z(), geometry.has_m());
                if g.is_empty() {
                    self.out.push_str("EMPTY");
                    return;
                }
                self.out.push('(');
                for (index, member) in g.members().iter().enumerate() {
                    if index > 0 {
                        self.out.push(',');
                    }
                    self.curve(member);
                }
                self.out.push(')');
            }
            Geometry::MultiPolygon(g) => {
                let (has_z, has_m) =
                    self.keyword(geometry_type, geometry.has_z(), geometry.has_m());
                if g.is_empty() {
                    self.out.push_str("EMPTY");
                    return;
                }
                self.out.push('(');
                for (index, member) in g.members().iter().enumerate() {
                    if index > 0 {
                        self.out.push(',');
                    }
                    self.polygon_body(member, has_z, has_m);
                }
                self.out.push(')');
            }
            Geometry::MultiSurface(g) => {
                self.keyword(geometry_type, geometry.has_z(), geometry.has_m());
                if g.is_empty() {
                    self.out.push_str("EMPTY");
                    return;
                }
                self.out.push('(');
                for (index, member) in g.members().iter().enumerate() {
                    if index > 0 {
                        self.out.push(',');
                    }
                    match member {
                        Surface::Polygon(p) => self.polygon(p),
                        Surface::CurvePolygon(p) => self.curve_polygon(p),
                    }
                }
                self.out.push(')');
            }
            Geometry::GeometryCollection(g) => {
                self.keyword(geometry_type, false, false);
                if g.is_empty() {
                    self.out.push_str("EMPTY");
                    return;
                }
                self.out.push('(');
                for (index, member) in g.members().iter().enumerate() {
                    if index > 0 {
                        self.out.push(',');
                    }
                    self.geometry(member);
                }
                self.out.push(')');
            }
        }
    }
}

/// Formats a geometry as well-known text.
///
/// [`WkbVariant::Iso`] writes `Z`/`M`/`ZM` dimension suffixes and all stored
/// dimensions; [`WkbVariant::Legacy`] writes Z values without a suffix and
/// drops measures.
pub fn write_wkt(geometry: &Geometry, variant: WkbVariant) -> String {
    let mut writer = WktWriter {
        out: String::with_capacity(16 + geometry.point_count() * 24),
        variant,
    };
    writer.geometry(geometry);
    writer.out
}
