//! The host-side value model.
//!
//! [`HostType`] names every kind of value the codec can produce or consume, and
//! [`HostValue`] carries one. The set is closed: decoders and encoders match on it
//! exhaustively.
//!
//! | Host type         | Rust representation                       |
//! |-------------------|-------------------------------------------|
//! | `Boolean`         | [`bool`]                                  |
//! | `Byte` … `Long`   | [`i8`], [`i16`], [`i32`], [`i64`]         |
//! | `BigInteger`      | [`BigInt`]                                |
//! | `BigDecimal`      | [`BigDecimal`]                            |
//! | `Float`, `Double` | [`f32`], [`f64`]                          |
//! | `Bytes`, `String` | [`Vec<u8>`], [`String`]                   |
//! | `CharacterStream`, `Clob` | [`Clob`]                          |
//! | `BinaryStream`, `Blob`    | [`Blob`]                          |
//! | `Date`, `Time`, `Timestamp` | [`SqlDate`], [`SqlTime`], [`SqlTimestamp`] |
//! | `Duration`        | [`time::Duration`]                        |
//! | `LocalDate`, `LocalTime`, `LocalDateTime` | [`time::Date`], [`time::Time`], [`time::PrimitiveDateTime`] |
//! | `ZonedDateTime`   | [`ZonedDateTime`]                         |
//! | `OffsetDateTime`, `Instant` | [`time::OffsetDateTime`] (an `Instant` is always at UTC) |
//! | `LegacyDate`      | [`LegacyDate`]                            |
//! | `BitSet`          | [`BitVec`]                                |
//! | `Uuid`, `Url`     | [`Uuid`], [`Url`]                         |
//! | `Geometry(_)`     | [`Geometry`]                              |
//! | `FloatArray`      | [`Vec<f32>`]                              |

use std::fmt::{self, Display};
use std::str::FromStr;

pub use bigdecimal::BigDecimal;
pub use bit_vec::BitVec;
pub use num_bigint::BigInt;
pub use time;
pub use url::Url;
pub use uuid::Uuid;

use time::{OffsetDateTime, PrimitiveDateTime};

pub use crate::geometry::{Geometry, GeometryKind};
use crate::error::DecodeError;
use crate::tz::ZonedDateTime;

mod legacy;
mod lob;

pub use legacy::{LegacyDate, SqlDate, SqlTime, SqlTimestamp};
pub use lob::{Blob, Clob};

/// The kind of host value requested from, or supplied to, the codec.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "offline", derive(serde::Serialize, serde::Deserialize))]
pub enum HostType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    BigInteger,
    BigDecimal,
    Float,
    Double,
    Bytes,
    String,
    CharacterStream,
    BinaryStream,
    Blob,
    Clob,
    Date,
    Time,
    Timestamp,
    Duration,
    LocalDate,
    LocalTime,
    LocalDateTime,
    ZonedDateTime,
    OffsetDateTime,
    Instant,
    LegacyDate,
    BitSet,
    Uuid,
    Url,
    Geometry(GeometryKind),
    FloatArray,
}

impl HostType {
    const SIMPLE: [HostType; 30] = [
        HostType::Boolean,
        HostType::Byte,
        HostType::Short,
        HostType::Int,
        HostType::Long,
        HostType::BigInteger,
        HostType::BigDecimal,
        HostType::Float,
        HostType::Double,
        HostType::Bytes,
        HostType::String,
        HostType::CharacterStream,
        HostType::BinaryStream,
        HostType::Blob,
        HostType::Clob,
        HostType::Date,
        HostType::Time,
        HostType::Timestamp,
        HostType::Duration,
        HostType::LocalDate,
        HostType::LocalTime,
        HostType::LocalDateTime,
        HostType::ZonedDateTime,
        HostType::OffsetDateTime,
        HostType::Instant,
        HostType::LegacyDate,
        HostType::BitSet,
        HostType::Uuid,
        HostType::Url,
        HostType::FloatArray,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            HostType::Boolean => "Boolean",
            HostType::Byte => "Byte",
            HostType::Short => "Short",
            HostType::Int => "Int",
            HostType::Long => "Long",
            HostType::BigInteger => "BigInteger",
            HostType::BigDecimal => "BigDecimal",
            HostType::Float => "Float",
            HostType::Double => "Double",
            HostType::Bytes => "Bytes",
            HostType::String => "String",
            HostType::CharacterStream => "CharacterStream",
            HostType::BinaryStream => "BinaryStream",
            HostType::Blob => "Blob",
            HostType::Clob => "Clob",
            HostType::Date => "Date",
            HostType::Time => "Time",
            HostType::Timestamp => "Timestamp",
            HostType::Duration => "Duration",
            HostType::LocalDate => "LocalDate",
            HostType::LocalTime => "LocalTime",
            HostType::LocalDateTime => "LocalDateTime",
            HostType::ZonedDateTime => "ZonedDateTime",
            HostType::OffsetDateTime => "OffsetDateTime",
            HostType::Instant => "Instant",
            HostType::LegacyDate => "LegacyDate",
            HostType::BitSet => "BitSet",
            HostType::Uuid => "Uuid",
            HostType::Url => "Url",
            HostType::Geometry(kind) => kind.name(),
            HostType::FloatArray => "FloatArray",
        }
    }

    /// `true` for types served by a dedicated scalar accessor (as opposed to types only
    /// reachable through an object codec).
    ///
    /// Decides which of the two type-mismatch errors a failed conversion reports.
    pub const fn has_accessor(&self) -> bool {
        matches!(
            self,
            HostType::Boolean
                | HostType::Byte
                | HostType::Short
                | HostType::Int
                | HostType::Long
                | HostType::BigDecimal
                | HostType::Float
                | HostType::Double
                | HostType::Bytes
                | HostType::String
                | HostType::CharacterStream
                | HostType::BinaryStream
                | HostType::Blob
                | HostType::Clob
                | HostType::Date
                | HostType::Time
                | HostType::Timestamp
        )
    }

    /// `true` for every date, time or timestamp shaped type.
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            HostType::Date
                | HostType::Time
                | HostType::Timestamp
                | HostType::Duration
                | HostType::LocalDate
                | HostType::LocalTime
                | HostType::LocalDateTime
                | HostType::ZonedDateTime
                | HostType::OffsetDateTime
                | HostType::Instant
                | HostType::LegacyDate
        )
    }
}

impl Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HostType {
    type Err = DecodeError;

    /// Parses a host type name, case-insensitively. Geometry kinds are accepted by their
    /// own name (`Point`, `GeometryCollection`, …) with `Geometry` meaning any shape.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(ty) = Self::SIMPLE
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(s))
        {
            return Ok(ty);
        }

        [
            GeometryKind::Any,
            GeometryKind::Point,
            GeometryKind::LineString,
            GeometryKind::Polygon,
            GeometryKind::MultiPoint,
            GeometryKind::MultiLineString,
            GeometryKind::MultiPolygon,
            GeometryKind::GeometryCollection,
        ]
        .into_iter()
        .find(|kind| kind.name().eq_ignore_ascii_case(s))
        .map(HostType::Geometry)
        .ok_or_else(|| DecodeError::Unsupported {
            target: s.to_owned(),
        })
    }
}

/// A single non-null host value.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    BigInteger(BigInt),
    BigDecimal(BigDecimal),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    String(String),
    CharacterStream(Clob),
    BinaryStream(Blob),
    Blob(Blob),
    Clob(Clob),
    Date(SqlDate),
    Time(SqlTime),
    Timestamp(SqlTimestamp),
    Duration(time::Duration),
    LocalDate(time::Date),
    LocalTime(time::Time),
    LocalDateTime(PrimitiveDateTime),
    ZonedDateTime(ZonedDateTime),
    OffsetDateTime(OffsetDateTime),
    Instant(OffsetDateTime),
    LegacyDate(LegacyDate),
    BitSet(BitVec),
    Uuid(Uuid),
    Url(Url),
    Geometry(Geometry),
    FloatArray(Vec<f32>),
}

impl HostValue {
    pub fn host_type(&self) -> HostType {
        match self {
            HostValue::Boolean(_) => HostType::Boolean,
            HostValue::Byte(_) => HostType::Byte,
            HostValue::Short(_) => HostType::Short,
            HostValue::Int(_) => HostType::Int,
            HostValue::Long(_) => HostType::Long,
            HostValue::BigInteger(_) => HostType::BigInteger,
            HostValue::BigDecimal(_) => HostType::BigDecimal,
            HostValue::Float(_) => HostType::Float,
            HostValue::Double(_) => HostType::Double,
            HostValue::Bytes(_) => HostType::Bytes,
            HostValue::String(_) => HostType::String,
            HostValue::CharacterStream(_) => HostType::CharacterStream,
            HostValue::BinaryStream(_) => HostType::BinaryStream,
            HostValue::Blob(_) => HostType::Blob,
            HostValue::Clob(_) => HostType::Clob,
            HostValue::Date(_) => HostType::Date,
            HostValue::Time(_) => HostType::Time,
            HostValue::Timestamp(_) => HostType::Timestamp,
            HostValue::Duration(_) => HostType::Duration,
            HostValue::LocalDate(_) => HostType::LocalDate,
            HostValue::LocalTime(_) => HostType::LocalTime,
            HostValue::LocalDateTime(_) => HostType::LocalDateTime,
            HostValue::ZonedDateTime(_) => HostType::ZonedDateTime,
            HostValue::OffsetDateTime(_) => HostType::OffsetDateTime,
            HostValue::Instant(_) => HostType::Instant,
            HostValue::LegacyDate(_) => HostType::LegacyDate,
            HostValue::BitSet(_) => HostType::BitSet,
            HostValue::Uuid(_) => HostType::Uuid,
            HostValue::Url(_) => HostType::Url,
            HostValue::Geometry(g) => HostType::Geometry(g.kind()),
            HostValue::FloatArray(_) => HostType::FloatArray,
        }
    }

    /// An [`HostValue::Instant`], normalized to UTC.
    pub fn instant(value: OffsetDateTime) -> Self {
        HostValue::Instant(value.to_offset(time::UtcOffset::UTC))
    }

    /// The textual form of the value, for host types that have one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            HostValue::Clob(c) | HostValue::CharacterStream(c) => Some(c.as_str()),
            _ => None,
        }
    }

    /// The binary form of the value, for host types that have one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            HostValue::Bytes(b) => Some(b),
            HostValue::Blob(b) | HostValue::BinaryStream(b) => Some(b.as_bytes()),
            _ => None,
        }
    }
}

impl Display for HostValue {
    /// A short description for diagnostics; binary payloads print their length only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Boolean(v) => write!(f, "{v}"),
            HostValue::Byte(v) => write!(f, "{v}"),
            HostValue::Short(v) => write!(f, "{v}"),
            HostValue::Int(v) => write!(f, "{v}"),
            HostValue::Long(v) => write!(f, "{v}"),
            HostValue::BigInteger(v) => write!(f, "{v}"),
            HostValue::BigDecimal(v) => write!(f, "{v}"),
            HostValue::Float(v) => write!(f, "{v}"),
            HostValue::Double(v) => write!(f, "{v}"),
            HostValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            HostValue::String(v) => write!(f, "{v:?}"),
            HostValue::CharacterStream(v) | HostValue::Clob(v) => write!(f, "{:?}", v.as_str()),
            HostValue::BinaryStream(v) | HostValue::Blob(v) => write!(f, "<{} bytes>", v.len()),
            HostValue::Date(v) => write!(f, "{v}"),
            HostValue::Time(v) => write!(f, "{v}"),
            HostValue::Timestamp(v) => write!(f, "{v}"),
            HostValue::Duration(v) => write!(f, "{v}"),
            HostValue::LocalDate(v) => write!(f, "{v}"),
            HostValue::LocalTime(v) => write!(f, "{v}"),
            HostValue::LocalDateTime(v) => write!(f, "{v}"),
            HostValue::ZonedDateTime(v) => write!(f, "{v}"),
            HostValue::OffsetDateTime(v) | HostValue::Instant(v) => write!(f, "{v}"),
            HostValue::LegacyDate(v) => write!(f, "{v}"),
            HostValue::BitSet(v) => write!(f, "{v:?}"),
            HostValue::Uuid(v) => write!(f, "{v}"),
            HostValue::Url(v) => write!(f, "{v}"),
            HostValue::Geometry(v) => write!(f, "{v}"),
            HostValue::FloatArray(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! impl_from_host {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for HostValue {
                fn from(value: $ty) -> Self {
                    HostValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_host!(
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    BigInt => BigInteger,
    BigDecimal => BigDecimal,
    f32 => Float,
    f64 => Double,
    Vec<u8> => Bytes,
    String => String,
    Blob => Blob,
    Clob => Clob,
    SqlDate => Date,
    SqlTime => Time,
    SqlTimestamp => Timestamp,
    time::Duration => Duration,
    time::Date => LocalDate,
    time::Time => LocalTime,
    PrimitiveDateTime => LocalDateTime,
    ZonedDateTime => ZonedDateTime,
    OffsetDateTime => OffsetDateTime,
    LegacyDate => LegacyDate,
    BitVec => BitSet,
    Uuid => Uuid,
    Url => Url,
    Geometry => Geometry,
    Vec<f32> => FloatArray,
);

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::String(value.to_owned())
    }
}
