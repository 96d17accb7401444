//! Well-known binary reader and writer.
//!
//! Every geometry starts with a 1-byte byte-order marker and a 4-byte type
//! code; the payload layout then depends on the variant. Plain polygon rings
//! are raw coordinate arrays without their own header, curve polygon rings
//! and collection members are full recursively-encoded geometries.

use bytes::{Buf, BufMut};
use magellan_geom::{
    CircularString, CompoundCurve, Coord, CoordSeq, Curve, CurvePolygon, Geometry,
    GeometryCollection, GeometryType, LineString, LinearRing, MagellanError, MultiCurve,
    MultiLineString, MultiPoint, MultiPolygon, MultiSurface, Point, Polygon, Surface, WkbVariant,
};

use crate::MAX_NESTING_DEPTH;

/// Byte order of an encoded geometry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ByteOrder {
    /// Big-endian (XDR), marker byte 0.
    BigEndian,
    /// Little-endian (NDR), marker byte 1.
    #[default]
    LittleEndian,
}

fn read_u8(buf: &mut &[u8]) -> Result<u8, MagellanError> {
    if buf.remaining() < 1 {
        return Err(MagellanError::NotEnoughData(
            "buffer ended at a byte-order marker".into(),
        ));
    }
    Ok(buf.get_u8())
}

fn read_u32(buf: &mut &[u8], order: ByteOrder) -> Result<u32, MagellanError> {
    if buf.remaining() < 4 {
        return Err(MagellanError::NotEnoughData(
            "buffer ended inside a 4-byte field".into(),
        ));
    }
    Ok(match order {
        ByteOrder::BigEndian => buf.get_u32(),
        ByteOrder::LittleEndian => buf.get_u32_le(),
    })
}

fn read_f64(buf: &mut &[u8], order: ByteOrder) -> Result<f64, MagellanError> {
    if buf.remaining() < 8 {
        return Err(MagellanError::NotEnoughData(
            "buffer ended inside a coordinate".into(),
        ));
    }
    Ok(match order {
        ByteOrder::BigEndian => buf.get_f64(),
        ByteOrder::LittleEndian => buf.get_f64_le(),
    })
}

fn read_coord(
    buf: &mut &[u8],
    order: ByteOrder,
    has_z: bool,
    has_m: bool,
) -> Result<Coord, MagellanError> {
    let x = read_f64(buf, order)?;
    let y = read_f64(buf, order)?;
    let z = if has_z { read_f64(buf, order)? } else { 0.0 };
    let m = if has_m { read_f64(buf, order)? } else { 0.0 };
    Ok(Coord::xyzm(x, y, z, m))
}

fn coord_size(has_z: bool, has_m: bool) -> usize {
    8 * (2 + usize::from(has_z) + usize::from(has_m))
}

/// Reads a point count followed by that many coordinate tuples.
fn read_seq(
    buf: &mut &[u8],
    order: ByteOrder,
    has_z: bool,
    has_m: bool,
) -> Result<CoordSeq, MagellanError> {
    let count = read_u32(buf, order)? as usize;
    if buf.remaining() < count.saturating_mul(coord_size(has_z, has_m)) {
        return Err(MagellanError::NotEnoughData(format!(
            "{count} coordinates declared but only {} bytes remain",
            buf.remaining()
        )));
    }
    let mut seq = CoordSeq::with_dimensions(has_z, has_m);
    for _ in 0..count {
        seq.push(read_coord(buf, order, has_z, has_m)?);
    }
    Ok(seq)
}

fn ring_curve(geometry: Geometry) -> Result<Curve, MagellanError> {
    match geometry {
        Geometry::LineString(g) => Ok(Curve::LineString(g)),
        Geometry::CircularString(g) => Ok(Curve::CircularString(g)),
        Geometry::CompoundCurve(g) => Ok(Curve::Compound(g)),
        other => Err(MagellanError::CorruptData(format!(
            "{:?} is not a valid curve polygon ring",
            other.geometry_type()
        ))),
    }
}

fn read_geometry(buf: &mut &[u8], depth: usize) -> Result<Geometry, MagellanError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(MagellanError::CorruptData(format!(
            "geometry nesting exceeds {MAX_NESTING_DEPTH} levels"
        )));
    }
    let order = match read_u8(buf)? {
        0 => ByteOrder::BigEndian,
        1 => ByteOrder::LittleEndian,
        other => {
            return Err(MagellanError::CorruptData(format!(
                "invalid byte-order marker {other:#04x}"
            )))
        }
    };
    let code = read_u32(buf, order)?;
    let (geometry_type, has_z, has_m) = GeometryType::from_wkb_code(code)?;

    match geometry_type {
        GeometryType::Point => {
            let coord = read_coord(buf, order, has_z, has_m)?;
            // Empty points travel as all-NaN coordinates.
            if coord.x.is_nan() && coord.y.is_nan() {
                Ok(Point::empty_with_dimensions(has_z, has_m).into())
            } else {
                Ok(Point::from_coord(coord, has_z, has_m).into())
            }
        }
        GeometryType::LineString => {
            Ok(LineString::from_seq(read_seq(buf, order, has_z, has_m)?).into())
        }
        GeometryType::CircularString => {
            Ok(CircularString::from_seq(read_seq(buf, order, has_z, has_m)?).into())
        }
        GeometryType::CompoundCurve => {
            let count = read_u32(buf, order)? as usize;
            let mut compound = CompoundCurve::new();
            for _ in 0..count {
                let segment = match read_geometry(buf, depth + 1)? {
                    Geometry::LineString(g) => Curve::LineString(g),
                    Geometry::CircularString(g) => Curve::CircularString(g),
                    other => {
                        return Err(MagellanError::CorruptData(format!(
                            "{:?} is not a valid compound curve segment",
                            other.geometry_type()
                        )))
                    }
                };
                compound.push_segment(segment)?;
            }
            Ok(compound.into())
        }
        GeometryType::Polygon => {
            let count = read_u32(buf, order)? as usize;
            let mut polygon = Polygon::new();
            polygon.set_dimensions(has_z, has_m);
            for _ in 0..count {
                polygon.push_ring(LinearRing::from_seq(read_seq(buf, order, has_z, has_m)?));
            }
            Ok(polygon.into())
        }
        GeometryType::CurvePolygon => {
            let count = read_u32(buf, order)? as usize;
            let mut polygon = CurvePolygon::new();
            for _ in 0..count {
                polygon.push_ring(ring_curve(read_geometry(buf, depth + 1)?)?);
            }
            Ok(polygon.into())
        }
        GeometryType::MultiPoint => {
            let mut multi = MultiPoint::new();
            read_members(buf, order, depth, |g| multi.push_geometry(g))?;
            Ok(multi.into())
        }
        GeometryType::MultiLineString => {
            let mut multi = MultiLineString::new();
            read_members(buf, order, depth, |g| multi.push_geometry(g))?;
            Ok(multi.into())
        }
        GeometryType::MultiCurve => {
            let mut multi = MultiCurve::new();
            read_members(buf, order, depth, |g| multi.push_geometry(g))?;
            Ok(multi.into())
        }
        GeometryType::MultiPolygon => {
            let mut multi = MultiPolygon::new();
            read_members(buf, order, depth, |g| multi.push_geometry(g))?;
            Ok(multi.into())
        }
        GeometryType::MultiSurface => {
            let mut multi = MultiSurface::new();
            read_members(buf, order, depth, |g| multi.push_geometry(g))?;
            Ok(multi.into())
        }
        GeometryType::GeometryCollection => {
            let mut collection = GeometryCollection::new();
            read_members(buf, order, depth, |g| {
                collection.push(g);
                Ok(())
            })?;
            Ok(collection.into())
        }
    }
}

fn read_members(
    buf: &mut &[u8],
    order: ByteOrder,
    depth: usize,
    mut push: impl FnMut(Geometry) -> Result<(), MagellanError>,
) -> Result<(), MagellanError> {
    let count = read_u32(buf, order)? as usize;
    for _ in 0..count {
        push(read_geometry(buf, depth + 1)?)?;
    }
    Ok(())
}

/// Decodes a geometry from well-known binary.
///
/// Trailing bytes after the encoded geometry are ignored.
pub fn read_wkb(data: &[u8]) -> Result<Geometry, MagellanError> {
    if data.len() < 9 {
        return Err(MagellanError::NotEnoughData(format!(
            "{} bytes is shorter than the 9-byte header",
            data.len()
        )));
    }
    let mut buf = data;
    read_geometry(&mut buf, 0)
}

/// Exact encoded size of `geometry` in bytes.
///
/// [`write_wkb`] always produces a buffer of exactly this length.
pub fn wkb_size(geometry: &Geometry) -> usize {
    let header = 9;
    match geometry {
        Geometry::Point(g) => header + coord_size(g.has_z(), g.has_m()),
        Geometry::LineString(g) => header + seq_size(g.seq()),
        Geometry::CircularString(g) => header + seq_size(g.seq()),
        Geometry::CompoundCurve(g) => header + 4 + g.segments().iter().map(curve_size).sum::<usize>(),
        Geometry::Polygon(g) => {
            header + 4 + g.rings().iter().map(|r| seq_size(r.seq())).sum::<usize>()
        }
        Geometry::CurvePolygon(g) => {
            header + 4 + g.rings().iter().map(curve_size).sum::<usize>()
        }
        Geometry::MultiPoint(g) => {
            header
                + 4
                + g.members()
                    .iter()
                    .map(|p| header + coord_size(p.has_z(), p.has_m()))
                    .sum::<usize>()
        }
        Geometry::MultiLineString(g) => {
            header + 4 + g.members().iter().map(|l| header + seq_size(l.seq())).sum::<usize>()
        }
        Geometry::MultiCurve(g) => header + 4 + g.members().iter().map(curve_size).sum::<usize>(),
        Geometry::MultiPolygon(g) => {
            header
                + 4
                + g.members()
                    .iter()
                    .map(|p| header + 4 + p.rings().iter().map(|r| seq_size(r.seq())).sum::<usize>())
                    .sum::<usize>()
        }
        Geometry::MultiSurface(g) => {
            header
                + 4
                + g.members()
                    .iter()
                    .map(|s| match s {
                        Surface::Polygon(p) => {
                            header + 4 + p.rings().iter().map(|r| seq_size(r.seq())).sum::<usize>()
                        }
                        Surface::CurvePolygon(p) => {
                            header + 4 + p.rings().iter().map(curve_size).sum::<usize>()
                        }
                    })
                    .sum::<usize>()
        }
        Geometry::GeometryCollection(g) => {
            header + 4 + g.members().iter().map(wkb_size).sum::<usize>()
        }
    }
}

fn seq_size(seq: &CoordSeq) -> usize {
    4 + seq.len() * coord_size(seq.has_z(), seq.has_m())
}

fn curve_size(curve: &Curve) -> usize {
    match curve {
        Curve::LineString(g) => 9 + seq_size(g.seq()),
        Curve::CircularString(g) => 9 + seq_size(g.seq()),
        Curve::Compound(g) => 9 + 4 + g.segments().iter().map(curve_size).sum::<usize>(),
    }
}

struct Writer {
    out: Vec<u8>,
    order: ByteOrder,
    variant: WkbVariant,
}

impl Writer {
    fn put_u32(&mut self, value: u32) {
        match self.order {
            ByteOrder::BigEndian => self.out.put_u32(value),
            ByteOrder::LittleEndian => self.out.put_u32_le(value),
        }
    }

    fn put_f64(&mut self, value: f64) {
        match self.order {
            ByteOrder::BigEndian => self.out.put_f64(value),
            ByteOrder::LittleEndian => self.out.put_f64_le(value),
        }
    }

    fn put_header(&mut self, geometry_type: GeometryType, has_z: bool, has_m: bool) {
        self.out.put_u8(match self.order {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1,
        });
        self.put_u32(geometry_type.wkb_code(has_z, has_m, self.variant));
    }

    fn put_coord(&mut self, coord: &Coord, has_z: bool, has_m: bool) {
        self.put_f64(coord.x);
        self.put_f64(coord.y);
        if has_z {
            self.put_f64(coord.z);
        }
        if has_m {
            self.put_f64(coord.m);
        }
    }

    fn put_seq(&mut self, seq: &CoordSeq) {
        self.put_u32(seq.len() as u32);
        for coord in seq.iter() {
            self.put_coord(coord, seq.has_z(), seq.has_m());
        }
    }

    fn put_point(&mut self, point: &Point) {
        self.put_header(GeometryType::Point, point.has_z(), point.has_m());
        match point.coord() {
            Some(coord) => self.put_coord(coord, point.has_z(), point.has_m()),
            None => {
                let nan = Coord::xyzm(f64::NAN, f64::NAN, f64::NAN, f64::NAN);
                self.put_coord(&nan, point.has_z(), point.has_m());
            }
        }
    }

    fn put_line_string(&mut self, line: &LineString) {
        self.put_header(
            GeometryType::LineString,
            line.seq().has_z(),
            line.seq().has_m(),
        );
        self.put_seq(line.seq());
    }

    fn put_circular_string(&mut self, arc: &CircularString) {
        self.put_header(
            GeometryType::CircularString,
            arc.seq().has_z(),
            arc.seq().has_m(),
        );
        self.put_seq(arc.seq());
    }

    fn put_compound_curve(&mut self, compound: &CompoundCurve) {
        self.put_header(
            GeometryType::CompoundCurve,
            compound.has_z(),
            compound.has_m(),
        );
        self.put_u32(compound.num_segments() as u32);
        for segment in compound.segments() {
            self.put_curve(segment);
        }
    }

    fn put_curve(&mut self, curve: &Curve) {
        match curve {
            Curve::LineString(g) => self.put_line_string(g),
            Curve::CircularString(g) => self.put_circular_string(g),
            Curve::Compound(g) => self.put_compound_curve(g),
        }
    }

    fn put_polygon(&mut self, polygon: &Polygon) {
        self.put_header(GeometryType::Polygon, polygon.has_z(), polygon.has_m());
        self.put_u32(polygon.rings().len() as u32);
        for ring in polygon.rings() {
            self.put_seq(ring.seq());
        }
    }

    fn put_curve_polygon(&mut self, polygon: &CurvePolygon) {
        self.put_header(
            GeometryType::CurvePolygon,
            polygon.has_z(),
            polygon.has_m(),
        );
        self.put_u32(polygon.rings().len() as u32);
        for ring in polygon.rings() {
            self.put_curve(ring);
        }
    }

    fn put_geometry(&mut self, geometry: &Geometry) {
        match geometry {
            Geometry::Point(g) => self.put_point(g),
            Geometry::LineString(g) => self.put_line_string(g),
            Geometry::CircularString(g) => self.put_circular_string(g),
            Geometry::CompoundCurve(g) => self.put_compound_curve(g),
            Geometry::Polygon(g) => self.put_polygon(g),
            Geometry::CurvePolygon(g) => self.put_curve_polygon(g),
            Geometry::MultiPoint(g) => {
                self.put_header(GeometryType::MultiPoint, geometry.has_z(), geometry.has_m());
                self.put_u32(g.len() as u32);
                for member in g.members() {
                    self.put_point(member);
                }
            }
            Geometry::MultiLineString(g) => {
                self.put_header(
                    GeometryType::MultiLineString,
                    geometry.has_z(),
                    geometry.has_m(),
                );
                self.put_u32(g.len() as u32);
                for member in g.members() {
                    self.put_line_string(member);
                }
            }
            Geometry::MultiCurve(g) => {
                self.put_header(GeometryType::MultiCurve, geometry.has_z(), geometry.has_m());
                self.put_u32(g.len() as u32);
                for member in g.members() {
                    self.put_curve(member);
                }
            }
            Geometry::MultiPolygon(g) => {
                self.put_header(
                    GeometryType::MultiPolygon,
                    geometry.has_z(),
                    geometry.has_m(),
                );
                self.put_u32(g.len() as u32);
                for member in g.members() {
                    self.put_polygon(member);
                }
            }
            Geometry::MultiSurface(g) => {
                self.put_header(
                    GeometryType::MultiSurface,
                    geometry.has_z(),
                    geometry.has_m(),
                );
                self.put_u32(g.len() as u32);
                for member in g.members() {
                    match member {
                        Surface::Polygon(p) => self.put_polygon(p),
                        Surface::CurvePolygon(p) => self.put_curve_polygon(p),
                    }
                }
            }
            Geometry::GeometryCollection(g) => {
                self.put_header(
                    GeometryType::GeometryCollection,
                    geometry.has_z(),
                    geometry.has_m(),
                );
                self.put_u32(g.len() as u32);
                for member in g.members() {
                    self.put_geometry(member);
                }
            }
        }
    }
}

/// Encodes a geometry to well-known binary.
///
/// The result length always equals [`wkb_size`] for the same geometry.
pub fn write_wkb(geometry: &Geometry, order: ByteOrder, variant: WkbVariant) -> Vec<u8> {
    let mut writer = Writer {
        out: Vec::with_capacity(wkb_size(geometry)),
        order,
        variant,
    };
    writer.put_geometry(geometry);
    writer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn round_trip(geometry: Geometry) {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            for variant in [WkbVariant::Iso, WkbVariant::Legacy] {
                let data = write_wkb(&geometry, order, variant);
                assert_eq!(data.len(), wkb_size(&geometry));
                let back = read_wkb(&data).unwrap();
                assert_eq!(back, geometry);
            }
        }
    }

    #[test]
    fn point_little_endian_layout() {
        let data = write_wkb(
            &Point::new(1.0, 2.0).into(),
            ByteOrder::LittleEndian,
            WkbVariant::Iso,
        );
        assert_eq!(data.len(), 21);
        assert_eq!(data[0], 1);
        assert_eq!(u32::from_le_bytes([data[1], data[2], data[3], data[4]]), 1);
        assert_eq!(
            f64::from_le_bytes(data[5..13].try_into().unwrap()),
            1.0
        );
    }

    #[test]
    fn point_round_trips() {
        round_trip(Point::new(1.5, -2.5).into());
        round_trip(Point::new_3d(1.5, -2.5, 100.0).into());
    }

    #[test]
    fn empty_point_round_trips() {
        let data = write_wkb(
            &Point::empty().into(),
            ByteOrder::LittleEndian,
            WkbVariant::Iso,
        );
        let back = read_wkb(&data).unwrap();
        let point = assert_matches!(back, Geometry::Point(p) => p);
        assert!(point.is_empty());
    }

    #[test]
    fn polygon_rings_are_raw_tuples() {
        let mut polygon = Polygon::new();
        polygon.push_ring(LinearRing::from_xy([
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 0.0),
        ]));
        polygon.push_ring(LinearRing::from_xy([
            (2.0, 1.0),
            (8.0, 1.0),
            (8.0, 4.0),
            (2.0, 1.0),
        ]));
        let geometry: Geometry = polygon.into();
        let data = write_wkb(&geometry, ByteOrder::LittleEndian, WkbVariant::Iso);
        // 9 header + 4 ring count + 2 rings of (4 + 4 * 16).
        assert_eq!(data.len(), 9 + 4 + 2 * (4 + 4 * 16));
        round_trip(geometry);
    }

    #[test]
    fn curve_polygon_rings_are_full_geometries() {
        let mut polygon = CurvePolygon::new();
        polygon.push_ring(Curve::CircularString(CircularString::from_xy([
            (0.0, 0.0),
            (1.0, 1.0),
            (2.0, 0.0),
            (1.0, -1.0),
            (0.0, 0.0),
        ])));
        let geometry: Geometry = polygon.into();
        let data = write_wkb(&geometry, ByteOrder::LittleEndian, WkbVariant::Iso);
        // The ring carries its own 9-byte header.
        assert_eq!(data.len(), 9 + 4 + 9 + 4 + 5 * 16);
        round_trip(geometry);
    }

    #[test]
    fn compound_curve_round_trips() {
        let mut compound = CompoundCurve::new();
        compound
            .push_segment(Curve::CircularString(CircularString::from_xy([
                (0.0, 0.0),
                (1.0, 1.0),
                (2.0, 0.0),
            ])))
            .unwrap();
        compound
            .push_segment(Curve::LineString(LineString::from_xy([
                (2.0, 0.0),
                (5.0, 0.0),
            ])))
            .unwrap();
        round_trip(compound.into());
    }

    #[test]
    fn collections_round_trip() {
        let mut multi = MultiPolygon::new();
        let mut polygon = Polygon::new();
        polygon.push_ring(LinearRing::from_xy([
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 0.0),
        ]));
        multi.push(polygon);
        round_trip(multi.into());

        let mut collection = GeometryCollection::new();
        collection.push(Point::new(1.0, 2.0).into());
        collection.push(LineString::from_xy([(0.0, 0.0), (1.0, 1.0)]).into());
        round_trip(collection.into());
    }

    #[test]
    fn legacy_25d_code_is_understood() {
        let geometry: Geometry = Point::new_3d(1.0, 2.0, 3.0).into();
        let data = write_wkb(&geometry, ByteOrder::LittleEndian, WkbVariant::Legacy);
        let code = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);
        assert_eq!(code, 0x8000_0001);
        assert_eq!(read_wkb(&data).unwrap(), geometry);
    }

    #[test]
    fn bad_byte_order_marker_is_corrupt() {
        let mut data = write_wkb(
            &Point::new(1.0, 2.0).into(),
            ByteOrder::LittleEndian,
            WkbVariant::Iso,
        );
        data[0] = 2;
        assert_matches!(read_wkb(&data), Err(MagellanError::CorruptData(_)));
    }

    #[test]
    fn unknown_type_code_is_unsupported() {
        let mut data = write_wkb(
            &Point::new(1.0, 2.0).into(),
            ByteOrder::LittleEndian,
            WkbVariant::Iso,
        );
        data[1] = 99;
        assert_matches!(
            read_wkb(&data),
            Err(MagellanError::UnsupportedGeometryType(_))
        );
    }

    #[test]
    fn truncated_buffer_is_not_enough_data() {
        let data = write_wkb(
            &LineString::from_xy([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).into(),
            ByteOrder::LittleEndian,
            WkbVariant::Iso,
        );
        assert_matches!(read_wkb(&data[..8]), Err(MagellanError::NotEnoughData(_)));
        assert_matches!(
            read_wkb(&data[..data.len() - 1]),
            Err(MagellanError::NotEnoughData(_))
        );
    }

    #[test]
    fn declared_count_beyond_buffer_is_not_enough_data() {
        let mut data = write_wkb(
            &LineString::from_xy([(0.0, 0.0), (1.0, 1.0)]).into(),
            ByteOrder::LittleEndian,
            WkbVariant::Iso,
        );
        // Inflate the declared point count far beyond the payload.
        data[5..9].copy_from_slice(&u32::MAX.to_le_bytes());
        assert_matches!(read_wkb(&data), Err(MagellanError::NotEnoughData(_)));
    }

    #[test]
    fn runaway_nesting_is_rejected() {
        // A geometry collection that claims itself as its only member, deep
        // enough to trip the depth cap.
        let mut data = vec![];
        for _ in 0..40 {
            data.push(1u8);
            data.extend_from_slice(&7u32.to_le_bytes());
            data.extend_from_slice(&1u32.to_le_bytes());
        }
        data.push(1u8);
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&1.0f64.to_le_bytes());
        data.extend_from_slice(&2.0f64.to_le_bytes());
        assert_matches!(read_wkb(&data), Err(MagellanError::CorruptData(_)));
    }
}
