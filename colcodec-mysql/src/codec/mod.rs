//! The codec dispatcher.
//!
//! [`decode`] turns one cell into the requested host type; [`encode_binary`] and
//! [`encode_text`] turn a host value into a parameter for a column type. Each SQL type
//! family has its own module; the dispatcher only picks the module and resolves the
//! default host type.

use std::str::from_utf8;

use colcodec_core::error::BoxDynError;
use colcodec_core::types::{Blob, Clob};
use colcodec_core::{DecodeError, EncodeError, HostType, HostValue};

use crate::describe::default_type;
use crate::type_info::TypeFamily;
use crate::{MySqlCodecOptions, MySqlTypeInfo, MySqlValueFormat, MySqlValueRef};

mod binary;
mod bit;
mod character;
mod decimal;
pub(crate) mod geometry;
mod integer;
mod literal;
pub(crate) mod param;
mod temporal;

use param::Param;

/// Decodes a cell into `target`, or into the column's default host type if `target` is
/// `None`.
///
/// Returns `Ok(None)` for SQL `NULL`, and for zero dates requested as a date-shaped type
/// when the options permit zero dates.
pub fn decode(
    value: &MySqlValueRef<'_>,
    target: Option<HostType>,
) -> Result<Option<HostValue>, DecodeError> {
    let ty = value.type_info();
    let target = target.unwrap_or_else(|| default_type(ty, value.options()));

    let Some(bytes) = value.as_bytes() else {
        return Ok(None);
    };

    tracing::trace!(
        target: "colcodec::decode",
        sql_type = ty.name(),
        host_type = target.name(),
        format = ?value.format(),
        len = bytes.len(),
    );

    let cell = Cell {
        bytes,
        ty,
        format: value.format(),
        options: value.options(),
        target,
    };

    match ty.family() {
        TypeFamily::Integer => integer::decode(&cell),
        TypeFamily::Year => integer::decode_year(&cell),
        TypeFamily::Decimal | TypeFamily::Float | TypeFamily::Double => decimal::decode(&cell),
        TypeFamily::Bit => bit::decode(&cell),
        TypeFamily::Date => temporal::decode_date(&cell),
        TypeFamily::Time => temporal::decode_time(&cell),
        TypeFamily::DateTime => temporal::decode_datetime(&cell),
        TypeFamily::Character => character::decode(&cell),
        TypeFamily::Binary => binary::decode(&cell),
        TypeFamily::Uuid => character::decode_uuid(&cell),
        TypeFamily::Geometry => geometry::decode(&cell),
        TypeFamily::Null => Err(cell.incompatible()),
    }
}

/// Writes `value` as a binary protocol parameter for a column of type `ty`.
///
/// Returns the type to announce for the parameter. A `NULL` type stands for "no column
/// type known" and encodes the value as its natural SQL type.
pub fn encode_binary(
    value: &HostValue,
    ty: &MySqlTypeInfo,
    options: &MySqlCodecOptions,
    buf: &mut Vec<u8>,
) -> Result<MySqlTypeInfo, EncodeError> {
    let ty = resolve_type(value, ty);

    tracing::trace!(
        target: "colcodec::encode",
        sql_type = ty.name(),
        host_type = value.host_type().name(),
        format = "binary",
    );

    let param = Param::coerce(value, &ty, options)?;
    Ok(param.write_binary(&ty, buf))
}

/// Writes `value` as a SQL literal for a column of type `ty`, for the text protocol.
pub fn encode_text(
    value: &HostValue,
    ty: &MySqlTypeInfo,
    options: &MySqlCodecOptions,
    buf: &mut String,
) -> Result<(), EncodeError> {
    let ty = resolve_type(value, ty);

    tracing::trace!(
        target: "colcodec::encode",
        sql_type = ty.name(),
        host_type = value.host_type().name(),
        format = "text",
    );

    let param = Param::coerce(value, &ty, options)?;
    literal::write(&param, &ty, options, buf)
}

fn resolve_type(value: &HostValue, ty: &MySqlTypeInfo) -> MySqlTypeInfo {
    if ty.family() == TypeFamily::Null {
        param::natural_type(value)
    } else {
        ty.clone()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("zero dates are not permitted")]
struct ZeroDate;

/// One non-null cell on its way to a host value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cell<'r> {
    pub(crate) bytes: &'r [u8],
    pub(crate) ty: &'r MySqlTypeInfo,
    pub(crate) format: MySqlValueFormat,
    pub(crate) options: &'r MySqlCodecOptions,
    pub(crate) target: HostType,
}

impl<'r> Cell<'r> {
    pub(crate) fn sql_type(&self) -> &'static str {
        self.ty.name()
    }

    pub(crate) fn incompatible(&self) -> DecodeError {
        DecodeError::incompatible(self.sql_type(), self.target)
    }

    pub(crate) fn format_error(
        &self,
        value: impl Into<String>,
        source: impl Into<BoxDynError>,
    ) -> DecodeError {
        DecodeError::format(self.sql_type(), self.target, value, source)
    }

    pub(crate) fn malformed(&self, source: impl Into<BoxDynError>) -> DecodeError {
        DecodeError::malformed(self.sql_type(), source)
    }

    /// The cell as UTF-8 text.
    pub(crate) fn str(&self) -> Result<&'r str, DecodeError> {
        from_utf8(self.bytes)
            .map_err(|e| self.format_error(String::from_utf8_lossy(self.bytes), e))
    }

    /// The outcome for a zero date requested as a date-shaped type.
    pub(crate) fn zero_date(&self, literal: &str) -> Result<Option<HostValue>, DecodeError> {
        if self.options.permit_zero_date {
            tracing::debug!(
                target: "colcodec::decode",
                sql_type = self.sql_type(),
                host_type = self.target.name(),
                "zero date {literal:?} decoded as NULL"
            );

            return Ok(None);
        }

        Err(self.format_error(literal, ZeroDate))
    }
}

/// `true` for host types that hold a number (or a boolean).
pub(crate) fn is_numeric(target: HostType) -> bool {
    matches!(
        target,
        HostType::Boolean
            | HostType::Byte
            | HostType::Short
            | HostType::Int
            | HostType::Long
            | HostType::BigInteger
            | HostType::BigDecimal
            | HostType::Float
            | HostType::Double
    )
}

/// `true` for host types that hold text.
pub(crate) fn is_text(target: HostType) -> bool {
    matches!(
        target,
        HostType::String | HostType::CharacterStream | HostType::Clob
    )
}

/// `true` for host types that hold bytes.
pub(crate) fn is_binary(target: HostType) -> bool {
    matches!(
        target,
        HostType::Bytes | HostType::BinaryStream | HostType::Blob
    )
}

/// Wraps text in the requested text host type.
pub(crate) fn text_value(target: HostType, s: String) -> HostValue {
    match target {
        HostType::CharacterStream => HostValue::CharacterStream(Clob::new(s)),
        HostType::Clob => HostValue::Clob(Clob::new(s)),
        _ => HostValue::String(s),
    }
}

/// Wraps bytes in the requested binary host type.
pub(crate) fn binary_value(target: HostType, bytes: Vec<u8>) -> HostValue {
    match target {
        HostType::BinaryStream => HostValue::BinaryStream(Blob::new(bytes)),
        HostType::Blob => HostValue::Blob(Blob::new(bytes)),
        _ => HostValue::Bytes(bytes),
    }
}
