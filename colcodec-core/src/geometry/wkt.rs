use std::fmt::{self, Write};

use super::{Geometry, LineString, Point, Polygon};

pub(super) fn write_geometry(f: &mut impl Write, geometry: &Geometry) -> fmt::Result {
    match geometry {
        Geometry::Point(point) => {
            f.write_str("POINT(")?;
            write_point(f, point)?;
            f.write_char(')')
        }

        Geometry::LineString(line) => {
            if line.is_empty() {
                return f.write_str("LINESTRING EMPTY");
            }

            f.write_str("LINESTRING")?;
            write_points(f, line.points())
        }

        Geometry::Polygon(polygon) => {
            if polygon.rings.is_empty() {
                return f.write_str("POLYGON EMPTY");
            }

            f.write_str("POLYGON")?;
            write_polygon(f, polygon)
        }

        Geometry::MultiPoint(multi) => {
            if multi.points.is_empty() {
                return f.write_str("MULTIPOINT EMPTY");
            }

            f.write_str("MULTIPOINT")?;
            write_points(f, &multi.points)
        }

        Geometry::MultiLineString(multi) => {
            if multi.lines.is_empty() {
                return f.write_str("MULTILINESTRING EMPTY");
            }

            f.write_str("MULTILINESTRING")?;
            write_lines(f, &multi.lines)
        }

        Geometry::MultiPolygon(multi) => {
            if multi.polygons.is_empty() {
                return f.write_str("MULTIPOLYGON EMPTY");
            }

            f.write_str("MULTIPOLYGON(")?;
            for (i, polygon) in multi.polygons.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }

                write_polygon(f, polygon)?;
            }
            f.write_char(')')
        }

        Geometry::GeometryCollection(collection) => {
            if collection.shapes.is_empty() {
                return f.write_str("GEOMETRYCOLLECTION EMPTY");
            }

            f.write_str("GEOMETRYCOLLECTION(")?;
            for (i, shape) in collection.shapes.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }

                write_geometry(f, shape)?;
            }
            f.write_char(')')
        }
    }
}

fn write_point(f: &mut impl Write, point: &Point) -> fmt::Result {
    write!(f, "{} {}", point.x, point.y)
}

fn write_points(f: &mut impl Write, points: &[Point]) -> fmt::Result {
    f.write_char('(')?;

    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }

        write_point(f, point)?;
    }

    f.write_char(')')
}

fn write_lines(f: &mut impl Write, lines: &[LineString]) -> fmt::Result {
    f.write_char('(')?;

    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }

        write_points(f, line.points())?;
    }

    f.write_char(')')
}

fn write_polygon(f: &mut impl Write, polygon: &Polygon) -> fmt::Result {
    write_lines(f, &polygon.rings)
}
