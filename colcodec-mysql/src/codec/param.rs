//! Coercion of host values into parameters for a column type.

use colcodec_core::types::{BigDecimal, BigInt, BitVec, Uuid};
use colcodec_core::{EncodeError, Geometry, GeometryKind, HostValue, TimeZoneContext};
use num_bigint::Sign;
use time::PrimitiveDateTime;

use super::geometry::write_geometry;
use crate::io::MySqlBufMutExt;
use crate::protocol::ColumnType;
use crate::type_info::TypeFamily;
use crate::types::numeric::{is_integral, plain_decimal, truncate_decimal, Numeric};
use crate::types::temporal::{fraction_digits, RawDateTime};
use crate::types::MySqlTime;
use crate::{MySqlCodecOptions, MySqlTypeInfo};

#[derive(Debug, thiserror::Error)]
pub(super) enum ParamError {
    #[error("not a whole number")]
    NotWhole,

    #[error("not a finite number")]
    NotFinite,

    #[error("not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A host value coerced to the representation a column type stores.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Param {
    Int(i128),
    Decimal(BigDecimal),
    Float(f32),
    Double(f64),
    Bits(Vec<u8>),
    Date(RawDateTime),
    Time(MySqlTime),
    DateTime(RawDateTime),
    Text(String),
    Binary(Vec<u8>),
    Geometry(Geometry),
}

impl Param {
    pub(crate) fn coerce(
        value: &HostValue,
        ty: &MySqlTypeInfo,
        options: &MySqlCodecOptions,
    ) -> Result<Self, EncodeError> {
        let sql = ty.name();
        let ctx = options.time_zone_context();

        Ok(match ty.family() {
            TypeFamily::Integer => Param::Int(integer(value, ty)?),
            TypeFamily::Year => Param::Int(year(value, ctx, sql)?),

            TypeFamily::Decimal => {
                let n = numeric(value, sql)?;
                let not_finite = || EncodeError::format(n.to_string(), sql, ParamError::NotFinite);

                Param::Decimal(n.to_big_decimal().ok_or_else(not_finite)?)
            }

            TypeFamily::Float => Param::Float(numeric(value, sql)?.to_f32()),
            TypeFamily::Double => Param::Double(numeric(value, sql)?.to_f64()),
            TypeFamily::Bit => Param::Bits(bits(value, ty)?),

            TypeFamily::Date => Param::Date(date(value, ctx, sql)?),
            TypeFamily::Time => Param::Time(time(value, ctx, sql)?),
            TypeFamily::DateTime => Param::DateTime(datetime(value, ctx, sql)?),

            TypeFamily::Character => Param::Text(text(value, ctx, sql)?),
            TypeFamily::Binary => Param::Binary(binary(value, ctx, sql)?),

            TypeFamily::Uuid => Param::Text(uuid(value, sql)?),
            TypeFamily::Geometry => Param::Geometry(geometry(value, ty)?),

            TypeFamily::Null => return Err(EncodeError::mismatch(value, sql)),
        })
    }

    /// Appends the binary protocol form and returns the type to announce for it.
    pub(crate) fn write_binary(&self, ty: &MySqlTypeInfo, buf: &mut Vec<u8>) -> MySqlTypeInfo {
        match self {
            Param::Int(v) => {
                let width = ty.r#type().integer_width().unwrap_or(8);

                // the value was range-checked against the column, so the low bytes of the
                // two's complement form are its wire form for either signedness
                buf.extend_from_slice(&v.to_le_bytes()[..width]);

                let announced = match ty.r#type() {
                    ColumnType::Int24 => MySqlTypeInfo::int(),
                    ColumnType::Year => MySqlTypeInfo::smallint(),
                    _ => return ty.clone(),
                };

                if ty.is_unsigned() || ty.r#type() == ColumnType::Year {
                    announced.unsigned()
                } else {
                    announced
                }
            }

            Param::Decimal(v) => {
                buf.put_str_lenenc(&plain_decimal(v));
                ty.clone()
            }

            Param::Float(v) => {
                buf.extend_from_slice(&v.to_le_bytes());
                MySqlTypeInfo::float()
            }

            Param::Double(v) => {
                buf.extend_from_slice(&v.to_le_bytes());
                MySqlTypeInfo::double()
            }

            Param::Bits(v) | Param::Binary(v) => {
                buf.put_bytes_lenenc(v);
                ty.clone()
            }

            Param::Date(v) => {
                v.encode_date(buf);
                MySqlTypeInfo::date()
            }

            Param::Time(v) => {
                v.encode_binary(buf);
                ty.clone()
            }

            Param::DateTime(v) => {
                v.encode_datetime(buf);
                ty.clone()
            }

            Param::Text(v) => {
                buf.put_str_lenenc(v);
                ty.clone()
            }

            Param::Geometry(v) => {
                let mut bytes = Vec::new();
                write_geometry(v, &mut bytes);

                buf.put_bytes_lenenc(&bytes);
                ty.clone()
            }
        }
    }
}

/// The column type a value is sent as when no column type is known.
pub(crate) fn natural_type(value: &HostValue) -> MySqlTypeInfo {
    match value {
        HostValue::Boolean(_) => MySqlTypeInfo::boolean(),
        HostValue::Byte(_) => MySqlTypeInfo::tinyint(),
        HostValue::Short(_) => MySqlTypeInfo::smallint(),
        HostValue::Int(_) => MySqlTypeInfo::int(),
        HostValue::Long(_) => MySqlTypeInfo::bigint(),
        HostValue::BigInteger(_) => MySqlTypeInfo::decimal(65, 0),
        HostValue::BigDecimal(_) => MySqlTypeInfo::decimal(65, 30),
        HostValue::Float(_) => MySqlTypeInfo::float(),
        HostValue::Double(_) => MySqlTypeInfo::double(),

        HostValue::Bytes(_)
        | HostValue::BinaryStream(_)
        | HostValue::Blob(_)
        | HostValue::FloatArray(_) => MySqlTypeInfo::longblob(),

        HostValue::String(_)
        | HostValue::CharacterStream(_)
        | HostValue::Clob(_)
        | HostValue::Url(_) => MySqlTypeInfo::longtext(),

        HostValue::Date(_) | HostValue::LocalDate(_) => MySqlTypeInfo::date(),
        HostValue::Time(_) => MySqlTypeInfo::time(3),
        HostValue::LocalTime(_) | HostValue::Duration(_) => MySqlTypeInfo::time(6),

        HostValue::Timestamp(_)
        | HostValue::LocalDateTime(_)
        | HostValue::ZonedDateTime(_)
        | HostValue::OffsetDateTime(_)
        | HostValue::Instant(_)
        | HostValue::LegacyDate(_) => MySqlTypeInfo::datetime(6),

        HostValue::BitSet(bits) => {
            MySqlTypeInfo::bit(u32::try_from(bits.len()).unwrap_or(64).clamp(1, 64))
        }

        HostValue::Uuid(_) => MySqlTypeInfo::uuid(),
        HostValue::Geometry(g) => MySqlTypeInfo::geometry(g.kind()),
    }
}

fn numeric(value: &HostValue, sql: &str) -> Result<Numeric, EncodeError> {
    Ok(match value {
        HostValue::Boolean(v) => Numeric::Int(i128::from(*v)),
        HostValue::Byte(v) => Numeric::Int(i128::from(*v)),
        HostValue::Short(v) => Numeric::Int(i128::from(*v)),
        HostValue::Int(v) => Numeric::Int(i128::from(*v)),
        HostValue::Long(v) => Numeric::Int(i128::from(*v)),

        HostValue::BigInteger(v) => i128::try_from(v)
            .map_or_else(|_| Numeric::Decimal(BigDecimal::new(v.clone(), 0)), Numeric::Int),

        HostValue::BigDecimal(v) => Numeric::Decimal(v.clone()),
        HostValue::Float(v) => Numeric::Float(*v),
        HostValue::Double(v) => Numeric::Double(*v),

        _ => match value.as_str() {
            Some(s) => Numeric::parse(s).map_err(|e| EncodeError::format(s, sql, e))?,
            None => return Err(EncodeError::mismatch(value, sql)),
        },
    })
}

/// A number without a fractional part.
fn whole_number(value: &HostValue, sql: &str) -> Result<BigInt, EncodeError> {
    let n = numeric(value, sql)?;

    if let Numeric::Int(v) = n {
        return Ok(BigInt::from(v));
    }

    let decimal = n
        .to_big_decimal()
        .ok_or_else(|| EncodeError::format(n.to_string(), sql, ParamError::NotFinite))?;

    if !is_integral(&decimal) {
        return Err(EncodeError::format(
            plain_decimal(&decimal),
            sql,
            ParamError::NotWhole,
        ));
    }

    Ok(truncate_decimal(&decimal))
}

fn check_range(v: BigInt, min: i128, max: i128, sql: &str) -> Result<i128, EncodeError> {
    if v > BigInt::from(max) {
        return Err(EncodeError::too_large(v, sql));
    }

    if v < BigInt::from(min) {
        return Err(EncodeError::too_small(v, sql));
    }

    i128::try_from(&v).map_err(|_| EncodeError::too_large(&v, sql))
}

fn integer(value: &HostValue, ty: &MySqlTypeInfo) -> Result<i128, EncodeError> {
    let sql = ty.name();

    let bits = match ty.r#type() {
        ColumnType::Tiny => 8,
        ColumnType::Short => 16,
        ColumnType::Int24 => 24,
        ColumnType::Long => 32,
        _ => 64,
    };

    let (min, max) = if ty.is_unsigned() {
        (0, (1_i128 << bits) - 1)
    } else {
        (-(1_i128 << (bits - 1)), (1_i128 << (bits - 1)) - 1)
    };

    check_range(whole_number(value, sql)?, min, max, sql)
}

fn year(value: &HostValue, ctx: &TimeZoneContext, sql: &str) -> Result<i128, EncodeError> {
    if let Some(datetime) = stored_datetime(value, ctx, sql)? {
        return check_range(BigInt::from(datetime.year()), 0, 2155, sql);
    }

    check_range(whole_number(value, sql)?, 0, 2155, sql)
}

/// `BIT(n)` as `ceil(n / 8)` big-endian bytes.
fn bits(value: &HostValue, ty: &MySqlTypeInfo) -> Result<Vec<u8>, EncodeError> {
    let sql = ty.name();

    let bytes = match value {
        HostValue::BitSet(bits) => bit_set_bytes(bits),
        HostValue::Boolean(v) => vec![u8::from(*v)],

        _ => match value.as_bytes() {
            Some(bytes) => bytes.to_vec(),

            None => {
                let v = whole_number(value, sql)?;

                if v.sign() == Sign::Minus {
                    return Err(EncodeError::too_small(v, sql));
                }

                v.to_bytes_be().1
            }
        },
    };

    let significant = match bytes.iter().position(|b| *b != 0) {
        Some(start) => &bytes[start..],
        None => &[][..],
    };

    let declared = match ty.max_size() {
        0 => 64,
        n => usize::try_from(n).unwrap_or(64),
    };

    let used = significant
        .first()
        .map_or(0, |first| significant.len() * 8 - first.leading_zeros() as usize);

    if used > declared {
        return Err(EncodeError::too_large(value, sql));
    }

    let width = declared.div_ceil(8).max(1);
    let mut out = vec![0; width - significant.len()];
    out.extend_from_slice(significant);

    Ok(out)
}

/// The inverse of reading a bit set: bit `i` is worth `2^i`.
fn bit_set_bytes(bits: &BitVec) -> Vec<u8> {
    let mut bytes = vec![0_u8; bits.len().div_ceil(8)];
    let last = bytes.len().saturating_sub(1);

    for (i, set) in bits.iter().enumerate() {
        if set {
            bytes[last - i / 8] |= 1 << (i % 8);
        }
    }

    bytes
}

/// The wall-clock digits to store for a date or time host value, or `None` if the value
/// is not one.
///
/// A value bound to an instant is stored as that instant read in the data zone, so
/// reading it back yields the same instant.
fn stored_datetime(
    value: &HostValue,
    ctx: &TimeZoneContext,
    sql: &str,
) -> Result<Option<PrimitiveDateTime>, EncodeError> {
    let store = |instant: time::OffsetDateTime| {
        ctx.to_stored(instant)
            .ok_or_else(|| EncodeError::too_large(instant, sql))
    };

    Ok(Some(match value {
        HostValue::LocalDate(date) => date.midnight(),
        HostValue::LocalDateTime(datetime) => *datetime,
        HostValue::Date(date) => date.date().midnight(),

        // digits already read in the data zone are kept as they are
        HostValue::Timestamp(ts) if ts.zone() == ctx.data_zone() => ts.datetime(),
        HostValue::Timestamp(ts) => store(ts.instant())?,

        HostValue::ZonedDateTime(zdt) if zdt.zone() == ctx.data_zone() => zdt.local(),
        HostValue::ZonedDateTime(zdt) => store(zdt.offset_date_time())?,

        HostValue::OffsetDateTime(odt) => store(*odt)?,

        // an instant has no digits of its own
        HostValue::Instant(instant) => store(*instant)?,
        HostValue::LegacyDate(date) => store(
            date.instant()
                .ok_or_else(|| EncodeError::too_large(date, sql))?,
        )?,

        _ => return Ok(None),
    }))
}

fn parse_datetime(s: &str, sql: &str) -> Result<RawDateTime, EncodeError> {
    RawDateTime::parse_datetime(s.trim()).map_err(|e| EncodeError::format(s, sql, e))
}

fn date(value: &HostValue, ctx: &TimeZoneContext, sql: &str) -> Result<RawDateTime, EncodeError> {
    if let Some(s) = value.as_str() {
        let raw = parse_datetime(s, sql)?;

        return Ok(RawDateTime {
            year: raw.year,
            month: raw.month,
            day: raw.day,
            ..RawDateTime::default()
        });
    }

    let datetime =
        stored_datetime(value, ctx, sql)?.ok_or_else(|| EncodeError::mismatch(value, sql))?;

    RawDateTime::from_date(datetime.date()).map_err(|e| EncodeError::format(value.to_string(), sql, e))
}

fn datetime(
    value: &HostValue,
    ctx: &TimeZoneContext,
    sql: &str,
) -> Result<RawDateTime, EncodeError> {
    if let Some(s) = value.as_str() {
        return parse_datetime(s, sql);
    }

    let datetime =
        stored_datetime(value, ctx, sql)?.ok_or_else(|| EncodeError::mismatch(value, sql))?;

    RawDateTime::from_datetime(datetime)
        .map_err(|e| EncodeError::format(value.to_string(), sql, e))
}

fn time(value: &HostValue, ctx: &TimeZoneContext, sql: &str) -> Result<MySqlTime, EncodeError> {
    match value {
        HostValue::Duration(duration) => MySqlTime::from_duration(*duration).map_err(|_| {
            if duration.is_negative() {
                EncodeError::too_small(duration, sql)
            } else {
                EncodeError::too_large(duration, sql)
            }
        }),

        HostValue::LocalTime(time) => Ok(MySqlTime::from_time_of_day(*time)),
        HostValue::Time(time) => Ok(MySqlTime::from_time_of_day(time.time())),

        _ => {
            if let Some(s) = value.as_str() {
                return MySqlTime::parse(s.trim()).or_else(|e| {
                    parse_datetime(s, sql)?
                        .time()
                        .map(MySqlTime::from_time_of_day)
                        .map_err(|_| EncodeError::format(s, sql, e))
                });
            }

            stored_datetime(value, ctx, sql)?
                .map(|datetime| MySqlTime::from_time_of_day(datetime.time()))
                .ok_or_else(|| EncodeError::mismatch(value, sql))
        }
    }
}

/// The text a character column stores for a value.
fn text(value: &HostValue, ctx: &TimeZoneContext, sql: &str) -> Result<String, EncodeError> {
    if let Some(s) = value.as_str() {
        return Ok(s.to_owned());
    }

    Ok(match value {
        HostValue::Boolean(v) => u8::from(*v).to_string(),
        HostValue::Byte(v) => v.to_string(),
        HostValue::Short(v) => v.to_string(),
        HostValue::Int(v) => v.to_string(),
        HostValue::Long(v) => v.to_string(),
        HostValue::BigInteger(v) => v.to_string(),
        HostValue::BigDecimal(v) => plain_decimal(v),
        HostValue::Float(v) => v.to_string(),
        HostValue::Double(v) => v.to_string(),

        HostValue::Bytes(_) | HostValue::BinaryStream(_) | HostValue::Blob(_) => {
            let bytes = value.as_bytes().unwrap_or_default().to_vec();

            String::from_utf8(bytes)
                .map_err(|e| EncodeError::format(value.to_string(), sql, ParamError::from(e)))?
        }

        HostValue::LocalDate(_) | HostValue::Date(_) => date(value, ctx, sql)?.format_date(),

        HostValue::LocalTime(_) | HostValue::Time(_) | HostValue::Duration(_) => {
            time(value, ctx, sql)?.to_string()
        }

        HostValue::Timestamp(_)
        | HostValue::LocalDateTime(_)
        | HostValue::ZonedDateTime(_)
        | HostValue::OffsetDateTime(_)
        | HostValue::Instant(_)
        | HostValue::LegacyDate(_) => {
            let raw = datetime(value, ctx, sql)?;
            raw.format_datetime(fraction_digits(raw.microsecond))
        }

        HostValue::Uuid(v) => v.hyphenated().to_string(),
        HostValue::Url(v) => v.as_str().to_owned(),
        HostValue::Geometry(v) => v.to_wkt(),

        _ => return Err(EncodeError::mismatch(value, sql)),
    })
}

/// The bytes a binary column stores for a value.
fn binary(value: &HostValue, ctx: &TimeZoneContext, sql: &str) -> Result<Vec<u8>, EncodeError> {
    if let Some(bytes) = value.as_bytes() {
        return Ok(bytes.to_vec());
    }

    Ok(match value {
        HostValue::FloatArray(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        HostValue::Uuid(v) => v.as_bytes().to_vec(),

        HostValue::Geometry(v) => {
            let mut bytes = Vec::new();
            write_geometry(v, &mut bytes);
            bytes
        }

        _ => text(value, ctx, sql)?.into_bytes(),
    })
}

fn uuid(value: &HostValue, sql: &str) -> Result<String, EncodeError> {
    let uuid = match value {
        HostValue::Uuid(v) => *v,

        HostValue::Bytes(bytes) => Uuid::from_slice(bytes)
            .map_err(|e| EncodeError::format(value.to_string(), sql, e))?,

        _ => match value.as_str() {
            Some(s) => Uuid::parse_str(s.trim()).map_err(|e| EncodeError::format(s, sql, e))?,
            None => return Err(EncodeError::mismatch(value, sql)),
        },
    };

    Ok(uuid.hyphenated().to_string())
}

fn geometry(value: &HostValue, ty: &MySqlTypeInfo) -> Result<Geometry, EncodeError> {
    let HostValue::Geometry(g) = value else {
        return Err(EncodeError::mismatch(value, ty.name()));
    };

    match ty.geometry_kind() {
        GeometryKind::Any => Ok(g.clone()),
        kind if kind == g.kind() => Ok(g.clone()),
        GeometryKind::GeometryCollection => {
            Ok(Geometry::GeometryCollection(g.clone().into_collection()))
        }
        _ => Err(EncodeError::mismatch(value, ty.name())),
    }
}
