//! Geometry values as stored in spatial columns.
//!
//! [`Geometry`] is a closed sum type: one variant per shape the OpenGIS model defines
//! for MySQL and MariaDB. Equality is structural; two values compare equal when their
//! shapes, nesting and coordinates are equal.

use std::fmt::{self, Display};

pub mod wkb;
mod wkt;

/// A single position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A sequence of points.
///
/// Whether the line is open (its first and last point differ) is computed when the
/// line is built, so the points are only reachable through accessors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct LineString {
    points: Vec<Point>,
    open: bool,
}

impl LineString {
    pub fn new(points: Vec<Point>) -> Self {
        let open = match (points.first(), points.last()) {
            (Some(first), Some(last)) => first != last,
            _ => true,
        };

        Self { points, open }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// `true` unless the first and last points coincide.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<Point> for LineString {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<(f64, f64)>> for LineString {
    fn from(points: Vec<(f64, f64)>) -> Self {
        points.into_iter().map(|(x, y)| Point::new(x, y)).collect()
    }
}

/// A polygon: the exterior ring followed by any interior rings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    pub rings: Vec<LineString>,
}

impl Polygon {
    pub fn new(rings: Vec<LineString>) -> Self {
        Self { rings }
    }

    pub fn exterior(&self) -> Option<&LineString> {
        self.rings.first()
    }

    pub fn interiors(&self) -> &[LineString] {
        self.rings.get(1..).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiPoint {
    pub points: Vec<Point>,
}

impl MultiPoint {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiLineString {
    pub lines: Vec<LineString>,
}

impl MultiLineString {
    pub fn new(lines: Vec<LineString>) -> Self {
        Self { lines }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiPolygon {
    pub polygons: Vec<Polygon>,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryCollection {
    pub shapes: Vec<Geometry>,
}

impl GeometryCollection {
    pub fn new(shapes: Vec<Geometry>) -> Self {
        Self { shapes }
    }
}

/// Any geometry value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Wraps the value in a [`GeometryCollection`] unless it already is one.
    pub fn into_collection(self) -> GeometryCollection {
        match self {
            Geometry::GeometryCollection(collection) => collection,
            other => GeometryCollection::new(vec![other]),
        }
    }

    /// Converts the value to the requested kind, if it is of that kind.
    ///
    /// [`GeometryKind::Any`] accepts every value; [`GeometryKind::GeometryCollection`]
    /// accepts every value by wrapping it.
    pub fn into_kind(self, kind: GeometryKind) -> Result<Geometry, Geometry> {
        match kind {
            GeometryKind::Any => Ok(self),
            GeometryKind::GeometryCollection => {
                Ok(Geometry::GeometryCollection(self.into_collection()))
            }
            kind if kind == self.kind() => Ok(self),
            _ => Err(self),
        }
    }

    /// Renders the value as Well-Known Text.
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        wkt::write_geometry(f, self)
    }
}

macro_rules! impl_from_shape {
    ($($shape:ident),*) => {
        $(
            impl From<$shape> for Geometry {
                fn from(shape: $shape) -> Self {
                    Geometry::$shape(shape)
                }
            }
        )*
    };
}

impl_from_shape!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

/// The shape of a geometry value, or [`GeometryKind::Any`] for "whatever is stored".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryKind {
    Any,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub const fn name(&self) -> &'static str {
        match self {
            GeometryKind::Any => "Geometry",
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }

    /// The SQL type name of a column restricted to this shape.
    pub const fn sql_name(&self) -> &'static str {
        match self {
            GeometryKind::Any => "GEOMETRY",
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
            GeometryKind::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// The WKB type code; `0` for [`GeometryKind::Any`].
    pub const fn wkb_code(&self) -> u32 {
        match self {
            GeometryKind::Any => 0,
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
            GeometryKind::MultiPoint => 4,
            GeometryKind::MultiLineString => 5,
            GeometryKind::MultiPolygon => 6,
            GeometryKind::GeometryCollection => 7,
        }
    }

    pub const fn from_wkb_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => GeometryKind::Point,
            2 => GeometryKind::LineString,
            3 => GeometryKind::Polygon,
            4 => GeometryKind::MultiPoint,
            5 => GeometryKind::MultiLineString,
            6 => GeometryKind::MultiPolygon,
            7 => GeometryKind::GeometryCollection,
            _ => return None,
        })
    }

    /// Parses a SQL type name such as `POINT` or `geometrycollection`.
    pub fn from_sql_name(name: &str) -> Option<Self> {
        const KINDS: [GeometryKind; 8] = [
            GeometryKind::Any,
            GeometryKind::Point,
            GeometryKind::LineString,
            GeometryKind::Polygon,
            GeometryKind::MultiPoint,
            GeometryKind::MultiLineString,
            GeometryKind::MultiPolygon,
            GeometryKind::GeometryCollection,
        ];

        KINDS
            .into_iter()
            .find(|kind| kind.sql_name().eq_ignore_ascii_case(name))
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_tracks_open_line_strings() {
        let closed = LineString::from(vec![(10., 10.), (20., 10.), (20., 20.), (10., 10.)]);
        let open = LineString::from(vec![(10., 10.), (20., 10.), (20., 20.)]);

        assert!(!closed.is_open());
        assert!(open.is_open());
        assert_ne!(closed, open);
    }

    #[test]
    fn it_wraps_into_collection_on_request() {
        let point = Geometry::from(Point::new(1., 2.));

        assert_eq!(
            point.clone().into_kind(GeometryKind::GeometryCollection),
            Ok(Geometry::GeometryCollection(GeometryCollection::new(vec![
                point.clone()
            ])))
        );

        assert_eq!(
            point.clone().into_kind(GeometryKind::Polygon),
            Err(point.clone())
        );
        assert_eq!(point.clone().into_kind(GeometryKind::Point), Ok(point));
    }
}
