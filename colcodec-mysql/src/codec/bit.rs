use colcodec_core::types::{BigDecimal, BigInt, BitVec};
use colcodec_core::{DecodeError, HostType, HostValue};
use num_bigint::Sign;

use super::{binary_value, is_binary, is_text, text_value, Cell};
use crate::types::numeric::Numeric;

/// `BIT(n)` arrives as `ceil(n / 8)` big-endian bytes in both protocols.
pub(super) fn decode(cell: &Cell<'_>) -> Result<Option<HostValue>, DecodeError> {
    let target = cell.target;
    let bytes = cell.bytes;

    Ok(Some(match target {
        HostType::Boolean => HostValue::Boolean(bytes.iter().any(|b| *b != 0)),

        HostType::Byte
        | HostType::Short
        | HostType::Int
        | HostType::Long
        | HostType::BigInteger
        | HostType::BigDecimal => to_numeric(bytes).convert(cell.sql_type(), target)?,

        _ if is_binary(target) => binary_value(target, bytes.to_vec()),
        _ if is_text(target) => text_value(target, render(bytes)),

        HostType::BitSet => HostValue::BitSet(to_bit_set(bytes)),

        _ => return Err(cell.incompatible()),
    }))
}

fn to_numeric(bytes: &[u8]) -> Numeric {
    if bytes.len() <= 8 {
        let value = bytes
            .iter()
            .fold(0_u64, |acc, b| (acc << 8) | u64::from(*b));

        return Numeric::Int(i128::from(value));
    }

    Numeric::Decimal(BigDecimal::new(BigInt::from_bytes_be(Sign::Plus, bytes), 0))
}

/// Bit `i` of the result is the bit worth `2^i`.
fn to_bit_set(bytes: &[u8]) -> BitVec {
    let len = bytes.len() * 8;
    let mut bits = BitVec::from_elem(len, false);

    for (i, byte) in bytes.iter().rev().enumerate() {
        for bit in 0..8 {
            if byte & (1 << bit) != 0 {
                bits.set(i * 8 + bit, true);
            }
        }
    }

    bits
}

/// Renders `b'…'` the way the server prints a bit literal: the leading byte without its
/// leading zeros, every following byte as all 8 digits.
pub(crate) fn render(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 8 + 3);
    out.push_str("b'");

    let mut digits = bytes.iter().skip_while(|b| **b == 0);

    match digits.next() {
        Some(first) => {
            out.push_str(&format!("{first:b}"));

            for byte in digits {
                out.push_str(&format!("{byte:08b}"));
            }
        }

        None => out.push('0'),
    }

    out.push('\'');
    out
}
