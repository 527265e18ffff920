use std::str::FromStr;

use colcodec::mysql::MySqlTypeInfo;
use colcodec::types::{BigDecimal, BigInt, Uuid};
use colcodec::{ErrorKind, HostType, HostValue};
use colcodec_test::{binary, test_decode_type, test_type, text};

test_type!(bool(MySqlTypeInfo::boolean(), "0" == false, "1" == true));

test_type!(u8(MySqlTypeInfo::tinyint().unsigned(), "253" == 253_u8));
test_type!(i8(MySqlTypeInfo::tinyint(), "5" == 5_i8, "0" == 0_i8, "-128" == i8::MIN));

test_type!(u16(MySqlTypeInfo::smallint().unsigned(), "21415" == 21415_u16));
test_type!(i16(MySqlTypeInfo::smallint(), "21415" == 21415_i16));

test_type!(u32(MySqlTypeInfo::int().unsigned(), "2141512" == 2141512_u32));
test_type!(i32(MySqlTypeInfo::int(), "2141512" == 2141512_i32));

test_type!(u64(
    MySqlTypeInfo::bigint().unsigned(),
    "2141512" == 2141512_u64,
    "18446744073709551615" == u64::MAX
));
test_type!(i64(MySqlTypeInfo::bigint(), "2141512" == 2141512_i64));

test_type!(f64(MySqlTypeInfo::double(), "3.14159265" == 3.14159265_f64));
test_type!(f32(MySqlTypeInfo::float(), "3.141" == 3.141_f32));

test_type!(string<String>(MySqlTypeInfo::varchar(255),
    "helloworld" == "helloworld",
    "" == "",
    "😂" == "😂"
));

test_type!(bytes<Vec<u8>>(MySqlTypeInfo::varbinary(255),
    "hello" == b"hello".to_vec(),
    "" == Vec::<u8>::new()
));

test_type!(decimal<BigDecimal>(MySqlTypeInfo::decimal(10, 2),
    "12.34" == BigDecimal::from_str("12.34").unwrap(),
    "-0.50" == BigDecimal::from_str("-0.5").unwrap()
));

test_type!(uuid<Uuid>(MySqlTypeInfo::uuid(),
    "936da01f-9abd-4d9d-80c7-02af85c822a8"
        == Uuid::parse_str("936da01f-9abd-4d9d-80c7-02af85c822a8").unwrap()
));

// integers read from character columns go through the number parser
test_decode_type!(int_from_text<i32>(MySqlTypeInfo::varchar(10),
    "42" == 42,
    "1.5" == 1,
    " 7 " == 7
));

#[test]
fn it_reads_varbinary_digits_as_numbers() -> anyhow::Result<()> {
    let cell = binary(MySqlTypeInfo::varbinary(10), "0");
    let value = cell.as_ref();

    assert_eq!(value.decode::<i32>()?, 0);
    assert_eq!(value.decode::<i8>()?, 0);
    assert_eq!(value.decode::<String>()?, "0");
    assert!(!value.decode::<bool>()?);

    Ok(())
}

#[test]
fn it_reads_bit_values() -> anyhow::Result<()> {
    let cell = binary(MySqlTypeInfo::bit(16), [0x0f, 0x04]);
    let value = cell.as_ref();

    assert_eq!(value.decode::<i64>()?, 3844);
    assert_eq!(value.decode::<String>()?, "b'111100000100'");
    assert_eq!(value.decode::<Vec<u8>>()?, [0x0f, 0x04]);
    assert!(value.decode::<bool>()?);

    assert_eq!(
        value.decode_as(None)?,
        Some(HostValue::Bytes(vec![0x0f, 0x04]))
    );

    Ok(())
}

#[test]
fn it_reads_bigint_unsigned_max() -> anyhow::Result<()> {
    let cell = binary(MySqlTypeInfo::bigint().unsigned(), [0xff; 8]);
    let value = cell.as_ref();

    assert_eq!(
        value.decode_as(None)?,
        Some(HostValue::BigInteger(BigInt::from(u64::MAX)))
    );
    assert_eq!(value.decode::<String>()?, "18446744073709551615");
    assert_eq!(
        value.decode::<i64>().unwrap_err().kind(),
        ErrorKind::RangeOverflow
    );

    Ok(())
}

#[test]
fn it_reads_tiny_int1_as_boolean() -> anyhow::Result<()> {
    let cell = text(MySqlTypeInfo::boolean(), "1");
    let value = cell.as_ref();

    assert_eq!(value.decode_as(None)?, Some(HostValue::Boolean(true)));
    assert_eq!(value.decode_as(Some(HostType::Int))?, Some(HostValue::Int(1)));

    Ok(())
}

#[test]
fn it_reads_float_arrays() -> anyhow::Result<()> {
    let bytes: Vec<u8> = [1.5_f32, -2.0]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();

    let cell = binary(MySqlTypeInfo::varbinary(8), bytes);

    assert_eq!(cell.as_ref().decode::<Vec<f32>>()?, [1.5, -2.0]);

    Ok(())
}
