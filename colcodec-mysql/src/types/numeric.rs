//! Conversions between numeric wire values and numeric host types.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use bigdecimal::{ToPrimitive, Zero};
use colcodec_core::types::{BigDecimal, BigInt};
use colcodec_core::{DecodeError, HostType, HostValue};

/// A numeric value read from a cell, before conversion to the requested host type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Numeric {
    Int(i128),
    Decimal(BigDecimal),
    Float(f32),
    Double(f64),
}

#[derive(Debug, thiserror::Error)]
#[error("invalid numeric literal {0:?}")]
pub(crate) struct ParseNumericError(String);

impl Numeric {
    /// Parses a decimal literal, as the server renders numbers in the text protocol.
    ///
    /// Leading and trailing whitespace is ignored. Integers that fit an `i128` stay exact
    /// integers; everything else goes through [`BigDecimal`].
    pub(crate) fn parse(s: &str) -> Result<Self, ParseNumericError> {
        let s = s.trim();

        if is_integer_literal(s) {
            if let Ok(v) = s.parse::<i128>() {
                return Ok(Numeric::Int(v));
            }
        }

        BigDecimal::from_str(s)
            .map(Numeric::Decimal)
            .map_err(|_| ParseNumericError(s.to_owned()))
    }

    fn is_zero(&self) -> bool {
        match self {
            Numeric::Int(v) => *v == 0,
            Numeric::Decimal(v) => v.is_zero(),
            Numeric::Float(v) => *v == 0.0,
            Numeric::Double(v) => *v == 0.0,
        }
    }

    /// The integral part, truncated toward zero.
    ///
    /// `None` if the value is not finite or has no `i128` representation.
    fn truncate(&self) -> Option<i128> {
        match self {
            Numeric::Int(v) => Some(*v),
            Numeric::Decimal(v) => i128::try_from(&truncate_decimal(v)).ok(),
            Numeric::Float(v) => truncate_float(f64::from(*v)),
            Numeric::Double(v) => truncate_float(*v),
        }
    }

    fn to_big_integer(&self) -> Option<BigInt> {
        match self {
            Numeric::Int(v) => Some(BigInt::from(*v)),
            Numeric::Decimal(v) => Some(truncate_decimal(v)),
            Numeric::Float(_) | Numeric::Double(_) => {
                self.to_big_decimal().map(|v| truncate_decimal(&v))
            }
        }
    }

    pub(crate) fn to_big_decimal(&self) -> Option<BigDecimal> {
        match self {
            Numeric::Int(v) => Some(BigDecimal::new(BigInt::from(*v), 0)),
            Numeric::Decimal(v) => Some(v.clone()),

            // `Display` for floats never uses an exponent and prints the shortest
            // representation that reads back as the same value
            Numeric::Float(v) if v.is_finite() => BigDecimal::from_str(&v.to_string()).ok(),
            Numeric::Double(v) if v.is_finite() => BigDecimal::from_str(&v.to_string()).ok(),

            Numeric::Float(_) | Numeric::Double(_) => None,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub(crate) fn to_f64(&self) -> f64 {
        match self {
            Numeric::Int(v) => *v as f64,
            Numeric::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
            Numeric::Float(v) => f64::from(*v),
            Numeric::Double(v) => *v,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub(crate) fn to_f32(&self) -> f32 {
        match self {
            Numeric::Int(v) => *v as f32,
            Numeric::Float(v) => *v,
            other => other.to_f64() as f32,
        }
    }

    /// Converts to a numeric or boolean host type.
    ///
    /// Integral targets truncate toward zero and then range-check; a value that does not
    /// fit is an overflow, never a wrapped or saturated result.
    pub(crate) fn convert(self, sql_type: &str, target: HostType) -> Result<HostValue, DecodeError> {
        let overflow = || DecodeError::overflow(sql_type, target, &self);

        Ok(match target {
            HostType::Boolean => HostValue::Boolean(!self.is_zero()),

            HostType::Byte => HostValue::Byte(
                self.truncate()
                    .and_then(|v| i8::try_from(v).ok())
                    .ok_or_else(overflow)?,
            ),

            HostType::Short => HostValue::Short(
                self.truncate()
                    .and_then(|v| i16::try_from(v).ok())
                    .ok_or_else(overflow)?,
            ),

            HostType::Int => HostValue::Int(
                self.truncate()
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(overflow)?,
            ),

            HostType::Long => HostValue::Long(
                self.truncate()
                    .and_then(|v| i64::try_from(v).ok())
                    .ok_or_else(overflow)?,
            ),

            HostType::BigInteger => {
                HostValue::BigInteger(self.to_big_integer().ok_or_else(overflow)?)
            }

            HostType::BigDecimal => {
                HostValue::BigDecimal(self.to_big_decimal().ok_or_else(overflow)?)
            }

            HostType::Float => HostValue::Float(self.to_f32()),
            HostType::Double => HostValue::Double(self.to_f64()),

            _ => return Err(DecodeError::incompatible(sql_type, target)),
        })
    }
}

impl Display for Numeric {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(v) => write!(f, "{v}"),
            Numeric::Decimal(v) => f.write_str(&plain_decimal(v)),
            Numeric::Float(v) => write!(f, "{v}"),
            Numeric::Double(v) => write!(f, "{v}"),
        }
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);

    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_float(v: f64) -> Option<i128> {
    // `i128::MAX as f64` rounds up to 2^127, which is itself out of range
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

    let v = v.trunc();

    (v.is_finite() && v >= -LIMIT && v < LIMIT).then(|| v as i128)
}

fn pow10(exp: i64) -> Option<BigInt> {
    u32::try_from(exp).ok().map(|exp| BigInt::from(10_u8).pow(exp))
}

/// The integral part of a decimal, truncated toward zero.
pub(crate) fn truncate_decimal(v: &BigDecimal) -> BigInt {
    let (digits, exp) = v.as_bigint_and_exponent();

    if exp <= 0 {
        return pow10(-exp).map_or_else(BigInt::zero, |scale| digits * scale);
    }

    // a scale that large leaves nothing before the decimal point
    pow10(exp).map_or_else(BigInt::zero, |scale| digits / scale)
}

/// `true` if the decimal has no fractional part.
pub(crate) fn is_integral(v: &BigDecimal) -> bool {
    BigDecimal::new(truncate_decimal(v), 0) == *v
}

/// Renders a decimal in plain notation, keeping its scale (`1.50`, `-0.001`, `1200`).
pub(crate) fn plain_decimal(v: &BigDecimal) -> String {
    let (digits, exp) = v.as_bigint_and_exponent();

    let negative = digits < BigInt::zero();
    let magnitude = if negative { -digits } else { digits }.to_string();

    let mut out = String::with_capacity(magnitude.len() + 3);

    if negative {
        out.push('-');
    }

    match usize::try_from(exp) {
        Ok(0) => out.push_str(&magnitude),

        Ok(scale) if scale < magnitude.len() => {
            let (int, frac) = magnitude.split_at(magnitude.len() - scale);
            out.push_str(int);
            out.push('.');
            out.push_str(frac);
        }

        Ok(scale) => {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(scale - magnitude.len()));
            out.push_str(&magnitude);
        }

        // a negative exponent multiplies by a power of ten
        Err(_) => {
            out.push_str(&magnitude);

            if magnitude != "0" {
                let zeros = usize::try_from(exp.unsigned_abs()).unwrap_or(0);
                out.extend(std::iter::repeat('0').take(zeros));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn it_truncates_toward_zero() {
        assert_eq!(truncate_decimal(&dec("1.9")), BigInt::from(1));
        assert_eq!(truncate_decimal(&dec("-1.9")), BigInt::from(-1));
        assert_eq!(truncate_decimal(&dec("1.2e3")), BigInt::from(1200));
        assert_eq!(truncate_float(-1.6), Some(-1));
        assert_eq!(truncate_float(f64::NAN), None);
        assert_eq!(truncate_float(f64::INFINITY), None);
    }

    #[test]
    fn it_renders_plain_decimals() {
        assert_eq!(plain_decimal(&dec("105.21")), "105.21");
        assert_eq!(plain_decimal(&dec("-0.001")), "-0.001");
        assert_eq!(plain_decimal(&dec("1.50")), "1.50");
        assert_eq!(plain_decimal(&dec("12e2")), "1200");
        assert_eq!(plain_decimal(&dec("0")), "0");
    }

    #[test]
    fn it_parses_literals() {
        assert_eq!(Numeric::parse(" 42 ").unwrap(), Numeric::Int(42));
        assert_eq!(Numeric::parse("-1.6").unwrap(), Numeric::Decimal(dec("-1.6")));
        assert!(Numeric::parse("abc").is_err());
        assert!(Numeric::parse("").is_err());
    }

    #[test]
    fn it_range_checks_narrowing() {
        let v = Numeric::Int(i128::from(u64::MAX));

        assert_eq!(
            v.clone().convert("BIGINT UNSIGNED", HostType::BigInteger).unwrap(),
            HostValue::BigInteger(BigInt::from(u64::MAX))
        );

        let err = v.convert("BIGINT UNSIGNED", HostType::Long).unwrap_err();
        assert_eq!(err.kind(), colcodec_core::ErrorKind::RangeOverflow);

        let err = Numeric::Double(f64::NAN)
            .convert("DOUBLE", HostType::Int)
            .unwrap_err();
        assert_eq!(err.kind(), colcodec_core::ErrorKind::RangeOverflow);

        assert_eq!(
            Numeric::Decimal(dec("-1.6")).convert("DECIMAL", HostType::Int).unwrap(),
            HostValue::Int(-1)
        );
    }

    #[test]
    fn it_rejects_non_numeric_targets() {
        let err = Numeric::Int(1).convert("INT", HostType::Date).unwrap_err();
        assert!(!err.is_not_supported());

        let err = Numeric::Int(1).convert("INT", HostType::Uuid).unwrap_err();
        assert!(err.is_not_supported());
    }
}
