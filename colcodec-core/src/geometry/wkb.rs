//! Well-Known Binary reader and writer.
//!
//! <https://dev.mysql.com/doc/refman/8.0/en/gis-data-formats.html#gis-wkb-format>
//!
//! Every element count in the input is checked against the bytes that remain before
//! anything is allocated, and nesting is capped at [`MAX_DEPTH`] levels.

use bytes::BufMut;

use super::{
    Geometry, GeometryCollection, GeometryKind, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use crate::io::{BufExt, ShortRead};

/// Deepest nesting of geometry collections the reader accepts.
pub const MAX_DEPTH: usize = 64;

// byte order marker (1) + type (4)
const HEADER_LEN: usize = 5;
const POINT_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WkbError {
    #[error("truncated WKB data: {0}")]
    Truncated(#[from] ShortRead),

    #[error("invalid WKB byte order marker {0:#04x}")]
    ByteOrder(u8),

    #[error("unknown WKB geometry type {0}")]
    UnknownType(u32),

    #[error("expected WKB {expected} inside a multi-geometry, found {found}")]
    UnexpectedMember {
        expected: GeometryKind,
        found: GeometryKind,
    },

    #[error("WKB {kind} declares {count} elements but only {remaining} bytes remain")]
    Count {
        kind: GeometryKind,
        count: u32,
        remaining: usize,
    },

    #[error("WKB geometry collections nested deeper than {MAX_DEPTH} levels")]
    TooDeep,

    #[error("{0} trailing bytes after WKB geometry")]
    Trailing(usize),
}

/// Reads exactly one geometry from `buf`.
pub fn read(mut buf: &[u8]) -> Result<Geometry, WkbError> {
    let geometry = Reader { buf: &mut buf }.geometry(0)?;

    if !buf.is_empty() {
        return Err(WkbError::Trailing(buf.len()));
    }

    Ok(geometry)
}

/// Appends the little-endian WKB form of `geometry` to `buf`.
pub fn write(geometry: &Geometry, buf: &mut Vec<u8>) {
    match geometry {
        Geometry::Point(point) => {
            write_header(buf, GeometryKind::Point);
            write_point(buf, point);
        }

        Geometry::LineString(line) => {
            write_header(buf, GeometryKind::LineString);
            write_points(buf, line.points());
        }

        Geometry::Polygon(polygon) => {
            write_header(buf, GeometryKind::Polygon);
            write_polygon(buf, polygon);
        }

        Geometry::MultiPoint(multi) => {
            write_header(buf, GeometryKind::MultiPoint);
            write_count(buf, multi.points.len());

            for point in &multi.points {
                write_header(buf, GeometryKind::Point);
                write_point(buf, point);
            }
        }

        Geometry::MultiLineString(multi) => {
            write_header(buf, GeometryKind::MultiLineString);
            write_count(buf, multi.lines.len());

            for line in &multi.lines {
                write_header(buf, GeometryKind::LineString);
                write_points(buf, line.points());
            }
        }

        Geometry::MultiPolygon(multi) => {
            write_header(buf, GeometryKind::MultiPolygon);
            write_count(buf, multi.polygons.len());

            for polygon in &multi.polygons {
                write_header(buf, GeometryKind::Polygon);
                write_polygon(buf, polygon);
            }
        }

        Geometry::GeometryCollection(collection) => {
            write_header(buf, GeometryKind::GeometryCollection);
            write_count(buf, collection.shapes.len());

            for shape in &collection.shapes {
                write(shape, buf);
            }
        }
    }
}

/// Number of bytes [`write`] produces for `geometry`.
pub fn size_hint(geometry: &Geometry) -> usize {
    fn points(n: usize) -> usize {
        4 + n * POINT_LEN
    }

    fn polygon(p: &Polygon) -> usize {
        4 + p.rings.iter().map(|r| points(r.len())).sum::<usize>()
    }

    HEADER_LEN
        + match geometry {
            Geometry::Point(_) => POINT_LEN,
            Geometry::LineString(line) => points(line.len()),
            Geometry::Polygon(p) => polygon(p),
            Geometry::MultiPoint(m) => 4 + m.points.len() * (HEADER_LEN + POINT_LEN),
            Geometry::MultiLineString(m) => {
                4 + m
                    .lines
                    .iter()
                    .map(|l| HEADER_LEN + points(l.len()))
                    .sum::<usize>()
            }
            Geometry::MultiPolygon(m) => {
                4 + m
                    .polygons
                    .iter()
                    .map(|p| HEADER_LEN + polygon(p))
                    .sum::<usize>()
            }
            Geometry::GeometryCollection(c) => 4 + c.shapes.iter().map(size_hint).sum::<usize>(),
        }
}

fn write_header(buf: &mut Vec<u8>, kind: GeometryKind) {
    // little endian
    buf.put_u8(1);
    buf.put_u32_le(kind.wkb_code());
}

fn write_count(buf: &mut Vec<u8>, count: usize) {
    // anything past u32::MAX elements is larger than a LONGBLOB anyway
    buf.put_u32_le(u32::try_from(count).unwrap_or(u32::MAX));
}

fn write_point(buf: &mut Vec<u8>, point: &Point) {
    buf.put_f64_le(point.x);
    buf.put_f64_le(point.y);
}

fn write_points(buf: &mut Vec<u8>, points: &[Point]) {
    write_count(buf, points.len());

    for point in points {
        write_point(buf, point);
    }
}

fn write_polygon(buf: &mut Vec<u8>, polygon: &Polygon) {
    write_count(buf, polygon.rings.len());

    for ring in &polygon.rings {
        write_points(buf, ring.points());
    }
}

struct Reader<'a, 'b> {
    buf: &'b mut &'a [u8],
}

impl Reader<'_, '_> {
    fn header(&mut self) -> Result<(bool, GeometryKind), WkbError> {
        let little_endian = match self.buf.checked_u8()? {
            0 => false,
            1 => true,
            other => return Err(WkbError::ByteOrder(other)),
        };

        let code = self.buf.checked_u32(little_endian)?;
        let kind = GeometryKind::from_wkb_code(code).ok_or(WkbError::UnknownType(code))?;

        Ok((little_endian, kind))
    }

    // Reads an element count and checks that `count` elements of at least `min_len`
    // bytes each can still fit in the buffer.
    fn count(
        &mut self,
        little_endian: bool,
        kind: GeometryKind,
        min_len: usize,
    ) -> Result<usize, WkbError> {
        let count = self.buf.checked_u32(little_endian)?;
        let remaining = self.buf.len();

        let fits = usize::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(min_len))
            .is_some_and(|needed| needed <= remaining);

        if !fits {
            return Err(WkbError::Count {
                kind,
                count,
                remaining,
            });
        }

        // `fits` guarantees the conversion succeeds
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn geometry(&mut self, depth: usize) -> Result<Geometry, WkbError> {
        if depth > MAX_DEPTH {
            return Err(WkbError::TooDeep);
        }

        let (le, kind) = self.header()?;

        Ok(match kind {
            GeometryKind::Point => Geometry::Point(self.point(le)?),
            GeometryKind::LineString => Geometry::LineString(self.line_string(le)?),
            GeometryKind::Polygon => Geometry::Polygon(self.polygon(le)?),

            GeometryKind::MultiPoint => {
                let count = self.count(le, kind, HEADER_LEN + POINT_LEN)?;
                let mut points = Vec::with_capacity(count);

                for _ in 0..count {
                    let le = self.member(GeometryKind::Point)?;
                    points.push(self.point(le)?);
                }

                Geometry::MultiPoint(MultiPoint::new(points))
            }

            GeometryKind::MultiLineString => {
                let count = self.count(le, kind, HEADER_LEN + 4)?;
                let mut lines = Vec::with_capacity(count);

                for _ in 0..count {
                    let le = self.member(GeometryKind::LineString)?;
                    lines.push(self.line_string(le)?);
                }

                Geometry::MultiLineString(MultiLineString::new(lines))
            }

            GeometryKind::MultiPolygon => {
                let count = self.count(le, kind, HEADER_LEN + 4)?;
                let mut polygons = Vec::with_capacity(count);

                for _ in 0..count {
                    let le = self.member(GeometryKind::Polygon)?;
                    polygons.push(self.polygon(le)?);
                }

                Geometry::MultiPolygon(MultiPolygon::new(polygons))
            }

            GeometryKind::GeometryCollection => {
                let count = self.count(le, kind, HEADER_LEN + 4)?;
                let mut shapes = Vec::with_capacity(count);

                for _ in 0..count {
                    shapes.push(self.geometry(depth + 1)?);
                }

                Geometry::GeometryCollection(GeometryCollection::new(shapes))
            }

            GeometryKind::Any => return Err(WkbError::UnknownType(0)),
        })
    }

    fn member(&mut self, expected: GeometryKind) -> Result<bool, WkbError> {
        let (le, found) = self.header()?;

        if found != expected {
            return Err(WkbError::UnexpectedMember { expected, found });
        }

        Ok(le)
    }

    fn point(&mut self, le: bool) -> Result<Point, WkbError> {
        let x = self.buf.checked_f64(le)?;
        let y = self.buf.checked_f64(le)?;

        Ok(Point::new(x, y))
    }

    fn line_string(&mut self, le: bool) -> Result<LineString, WkbError> {
        let count = self.count(le, GeometryKind::LineString, POINT_LEN)?;
        let mut points = Vec::with_capacity(count);

        for _ in 0..count {
            points.push(self.point(le)?);
        }

        Ok(LineString::new(points))
    }

    fn polygon(&mut self, le: bool) -> Result<Polygon, WkbError> {
        let count = self.count(le, GeometryKind::Polygon, 4)?;
        let mut rings = Vec::with_capacity(count);

        for _ in 0..count {
            rings.push(self.line_string(le)?);
        }

        Ok(Polygon::new(rings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_reads_a_big_endian_point() {
        let mut buf = vec![0, 0, 0, 0, 1];
        buf.extend_from_slice(&1.5_f64.to_be_bytes());
        buf.extend_from_slice(&(-2.0_f64).to_be_bytes());

        assert_eq!(read(&buf).unwrap(), Geometry::Point(Point::new(1.5, -2.0)));
    }

    #[test]
    fn it_writes_what_it_reads() {
        let geometry = Geometry::GeometryCollection(GeometryCollection::new(vec![
            Point::new(0., 0.).into(),
            LineString::from(vec![(10., 10.), (20., 10.), (20., 20.), (10., 20.), (10., 10.)])
                .into(),
            MultiPolygon::new(vec![Polygon::new(vec![LineString::from(vec![
                (0., 0.),
                (1., 0.),
                (1., 1.),
                (0., 0.),
            ])])])
            .into(),
        ]));

        let mut buf = Vec::new();
        write(&geometry, &mut buf);

        assert_eq!(buf.len(), size_hint(&geometry));
        assert_eq!(read(&buf).unwrap(), geometry);
    }

    #[test]
    fn it_rejects_counts_larger_than_the_buffer() {
        // LINESTRING claiming 1_000_000 points with none present
        let mut buf = vec![1, 2, 0, 0, 0];
        buf.extend_from_slice(&1_000_000_u32.to_le_bytes());

        assert!(matches!(
            read(&buf),
            Err(WkbError::Count {
                kind: GeometryKind::LineString,
                count: 1_000_000,
                ..
            })
        ));
    }

    #[test]
    fn it_rejects_truncated_points() {
        let buf = [1, 1, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(read(&buf), Err(WkbError::Truncated(_))));
    }

    #[test]
    fn it_rejects_deep_nesting() {
        let mut buf = Vec::new();

        for _ in 0..=MAX_DEPTH + 1 {
            buf.extend_from_slice(&[1, 7, 0, 0, 0, 1, 0, 0, 0]);
        }

        assert!(matches!(read(&buf), Err(WkbError::TooDeep)));
    }

    #[test]
    fn it_rejects_mismatched_members() {
        // MULTIPOINT containing a LINESTRING header
        let mut buf = vec![1, 4, 0, 0, 0, 1, 0, 0, 0];
        buf.extend_from_slice(&[1, 2, 0, 0, 0]);
        buf.extend_from_slice(&[0; 16]);

        assert!(matches!(
            read(&buf),
            Err(WkbError::UnexpectedMember {
                expected: GeometryKind::Point,
                found: GeometryKind::LineString
            })
        ));
    }
}
