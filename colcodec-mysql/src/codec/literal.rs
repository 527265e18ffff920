//! SQL literals for the text protocol.

use std::fmt::Write;

use colcodec_core::EncodeError;

use super::bit;
use super::param::{Param, ParamError};
use crate::types::numeric::plain_decimal;
use crate::types::temporal::fraction_digits;
use crate::{MySqlCodecOptions, MySqlTypeInfo};

pub(super) fn write(
    param: &Param,
    ty: &MySqlTypeInfo,
    options: &MySqlCodecOptions,
    buf: &mut String,
) -> Result<(), EncodeError> {
    match param {
        Param::Int(v) => buf.push_str(itoa::Buffer::new().format(*v)),
        Param::Decimal(v) => buf.push_str(&plain_decimal(v)),

        Param::Float(v) if v.is_finite() => push_display(buf, v),
        Param::Double(v) if v.is_finite() => push_display(buf, v),
        Param::Float(v) => return Err(not_finite(v, ty)),
        Param::Double(v) => return Err(not_finite(v, ty)),

        Param::Bits(v) => buf.push_str(&bit::render(v)),

        Param::Date(v) => push_quoted(buf, &v.format_date(), options),
        Param::Time(v) => push_quoted(buf, &v.to_string(), options),
        Param::DateTime(v) => push_quoted(
            buf,
            &v.format_datetime(fraction_digits(v.microsecond)),
            options,
        ),

        Param::Text(v) => push_quoted(buf, v, options),

        Param::Binary(v) => {
            buf.push_str("X'");
            buf.push_str(&hex::encode_upper(v));
            buf.push('\'');
        }

        Param::Geometry(v) => {
            buf.push_str("ST_GeomFromText(");
            push_quoted(buf, &v.to_wkt(), options);
            buf.push(')');
        }
    }

    Ok(())
}

fn push_display(buf: &mut String, v: impl std::fmt::Display) {
    // writing to a `String` cannot fail
    let _ = write!(buf, "{v}");
}

fn not_finite(v: impl std::fmt::Display, ty: &MySqlTypeInfo) -> EncodeError {
    EncodeError::format(v.to_string(), ty.name(), ParamError::NotFinite)
}

/// Appends `s` as a quoted string literal.
///
/// With `NO_BACKSLASH_ESCAPES` the server reads backslashes literally, so only quotes
/// are escaped (by doubling them).
fn push_quoted(buf: &mut String, s: &str, options: &MySqlCodecOptions) {
    buf.reserve(s.len() + 2);
    buf.push('\'');

    if options.no_backslash_escapes {
        for c in s.chars() {
            if c == '\'' {
                buf.push('\'');
            }

            buf.push(c);
        }
    } else {
        for c in s.chars() {
            match c {
                '\0' => buf.push_str("\\0"),
                '\n' => buf.push_str("\\n"),
                '\r' => buf.push_str("\\r"),
                '\\' => buf.push_str("\\\\"),
                '\'' => buf.push_str("\\'"),
                '"' => buf.push_str("\\\""),
                '\x1a' => buf.push_str("\\Z"),
                c => buf.push(c),
            }
        }
    }

    buf.push('\'');
}
