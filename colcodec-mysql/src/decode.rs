//! Types and traits for decoding values from a cell.

use colcodec_core::geometry::{
    GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use colcodec_core::types::{
    BigDecimal, BigInt, BitVec, Blob, Clob, LegacyDate, SqlDate, SqlTime, SqlTimestamp, Url, Uuid,
};
use colcodec_core::{DecodeError, Geometry, GeometryKind, HostType, HostValue, ZonedDateTime};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};

use crate::type_info::TypeFamily;
use crate::types::MySqlTime;
use crate::{MySqlValueFormat, MySqlValueRef};

/// A type that can be decoded from a cell.
pub trait Decode<'r>: Sized {
    /// Decodes the cell, or returns `None` for SQL `NULL` (and for a zero date read as a
    /// date when zero dates are permitted).
    fn decode_opt(value: MySqlValueRef<'r>) -> Result<Option<Self>, DecodeError>;

    /// Decodes the cell, failing if it is `NULL`.
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, DecodeError> {
        Self::decode_opt(value)?
            .ok_or_else(|| DecodeError::unexpected_null(std::any::type_name::<Self>()))
    }
}

impl<'r, T> Decode<'r> for Option<T>
where
    T: Decode<'r>,
{
    fn decode_opt(value: MySqlValueRef<'r>) -> Result<Option<Self>, DecodeError> {
        T::decode_opt(value).map(Some)
    }

    fn decode(value: MySqlValueRef<'r>) -> Result<Self, DecodeError> {
        T::decode_opt(value)
    }
}

macro_rules! impl_decode {
    ($($ty:ty => $target:expr, $variant:ident;)*) => {
        $(
            impl<'r> Decode<'r> for $ty {
                fn decode_opt(value: MySqlValueRef<'r>) -> Result<Option<Self>, DecodeError> {
                    match value.decode_as(Some($target))? {
                        Some(HostValue::$variant(v)) => Ok(Some(v)),
                        Some(_) => Err(DecodeError::incompatible(value.type_info().name(), $target)),
                        None => Ok(None),
                    }
                }
            }
        )*
    };
}

impl_decode! {
    bool => HostType::Boolean, Boolean;
    i8 => HostType::Byte, Byte;
    i16 => HostType::Short, Short;
    i32 => HostType::Int, Int;
    i64 => HostType::Long, Long;
    f32 => HostType::Float, Float;
    f64 => HostType::Double, Double;
    String => HostType::String, String;
    Vec<u8> => HostType::Bytes, Bytes;
    BigInt => HostType::BigInteger, BigInteger;
    BigDecimal => HostType::BigDecimal, BigDecimal;
    Blob => HostType::Blob, Blob;
    Clob => HostType::Clob, Clob;

    Date => HostType::LocalDate, LocalDate;
    Time => HostType::LocalTime, LocalTime;
    PrimitiveDateTime => HostType::LocalDateTime, LocalDateTime;
    OffsetDateTime => HostType::OffsetDateTime, OffsetDateTime;
    Duration => HostType::Duration, Duration;
    ZonedDateTime => HostType::ZonedDateTime, ZonedDateTime;
    SqlDate => HostType::Date, Date;
    SqlTime => HostType::Time, Time;
    SqlTimestamp => HostType::Timestamp, Timestamp;
    LegacyDate => HostType::LegacyDate, LegacyDate;

    BitVec => HostType::BitSet, BitSet;
    Uuid => HostType::Uuid, Uuid;
    Url => HostType::Url, Url;
    Vec<f32> => HostType::FloatArray, FloatArray;
    Geometry => HostType::Geometry(GeometryKind::Any), Geometry;
}

macro_rules! impl_decode_shape {
    ($($shape:ident),*) => {
        $(
            impl<'r> Decode<'r> for $shape {
                fn decode_opt(value: MySqlValueRef<'r>) -> Result<Option<Self>, DecodeError> {
                    let target = HostType::Geometry(GeometryKind::$shape);

                    match value.decode_as(Some(target))? {
                        Some(HostValue::Geometry(Geometry::$shape(v))) => Ok(Some(v)),
                        Some(_) => Err(DecodeError::incompatible(value.type_info().name(), target)),
                        None => Ok(None),
                    }
                }
            }
        )*
    };
}

impl_decode_shape!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);

// unsigned targets range-check against their own width
macro_rules! impl_decode_unsigned {
    ($($ty:ty),*) => {
        $(
            impl<'r> Decode<'r> for $ty {
                fn decode_opt(value: MySqlValueRef<'r>) -> Result<Option<Self>, DecodeError> {
                    let Some(v) = BigInt::decode_opt(value)? else {
                        return Ok(None);
                    };

                    <$ty>::try_from(&v).map(Some).map_err(|_| {
                        DecodeError::overflow(value.type_info().name(), stringify!($ty), &v)
                    })
                }
            }
        )*
    };
}

impl_decode_unsigned!(u8, u16, u32, u64);

/// Borrows the cell as text, without copying.
///
/// Only cells that hold text on the wire can be borrowed: every text protocol cell, and
/// string, decimal and UUID cells in the binary protocol.
impl<'r> Decode<'r> for &'r str {
    fn decode_opt(value: MySqlValueRef<'r>) -> Result<Option<Self>, DecodeError> {
        let textual = value.format() == MySqlValueFormat::Text
            || matches!(
                value.type_info().family(),
                TypeFamily::Character | TypeFamily::Binary | TypeFamily::Decimal | TypeFamily::Uuid
            );

        if !textual {
            return Err(DecodeError::incompatible(
                value.type_info().name(),
                HostType::String,
            ));
        }

        value.as_str(HostType::String)
    }
}

/// Borrows the raw bytes of the cell.
impl<'r> Decode<'r> for &'r [u8] {
    fn decode_opt(value: MySqlValueRef<'r>) -> Result<Option<Self>, DecodeError> {
        let raw = value.format() == MySqlValueFormat::Text
            || matches!(
                value.type_info().family(),
                TypeFamily::Character
                    | TypeFamily::Binary
                    | TypeFamily::Bit
                    | TypeFamily::Uuid
                    | TypeFamily::Geometry
            );

        if !raw {
            return Err(DecodeError::incompatible(
                value.type_info().name(),
                HostType::Bytes,
            ));
        }

        Ok(value.as_bytes())
    }
}

impl<'r> Decode<'r> for MySqlTime {
    fn decode_opt(value: MySqlValueRef<'r>) -> Result<Option<Self>, DecodeError> {
        let Some(duration) = Duration::decode_opt(value)? else {
            return Ok(None);
        };

        MySqlTime::from_duration(duration).map(Some).map_err(|_| {
            DecodeError::overflow(value.type_info().name(), "MySqlTime", duration)
        })
    }
}

/// Decodes into the column's default host type.
impl<'r> Decode<'r> for HostValue {
    fn decode_opt(value: MySqlValueRef<'r>) -> Result<Option<Self>, DecodeError> {
        value.decode_as(None)
    }
}

#[cfg(test)]
mod tests {
    use colcodec_core::ErrorKind;

    use super::*;
    use crate::{MySqlCodecOptions, MySqlTypeInfo};

    #[test]
    fn it_reports_null_for_non_optional_targets() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::int();
        let value = MySqlValueRef::binary(None, &ty, &options);

        assert_eq!(value.decode::<Option<i32>>().unwrap(), None);
        assert_eq!(
            value.decode::<i32>().unwrap_err().kind(),
            ErrorKind::NullToPrimitive
        );
    }

    #[test]
    fn it_range_checks_unsigned_targets() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::bigint().unsigned();
        let bytes = u64::MAX.to_le_bytes();
        let value = MySqlValueRef::binary(Some(&bytes), &ty, &options);

        assert_eq!(value.decode::<u64>().unwrap(), u64::MAX);
        assert_eq!(
            value.decode::<u32>().unwrap_err().kind(),
            ErrorKind::RangeOverflow
        );
    }

    #[test]
    fn it_borrows_text() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::varchar(10);
        let value = MySqlValueRef::binary(Some(b"hello"), &ty, &options);

        assert_eq!(value.decode::<&str>().unwrap(), "hello");
        assert_eq!(value.decode::<&[u8]>().unwrap(), b"hello");

        let ty = MySqlTypeInfo::int();
        let bytes = 1_i32.to_le_bytes();
        let value = MySqlValueRef::binary(Some(&bytes), &ty, &options);
        assert_eq!(
            value.decode::<&str>().unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn it_reads_mysql_times() {
        let options = MySqlCodecOptions::new();
        let ty = MySqlTypeInfo::time(2);
        let value = MySqlValueRef::text(Some(b"-18:30:12.55"), &ty, &options);

        let time = value.decode::<MySqlTime>().unwrap();
        assert!(time.is_negative());
        assert_eq!(time.hours(), 18);
        assert_eq!(time.microseconds(), 550_000);
    }
}
