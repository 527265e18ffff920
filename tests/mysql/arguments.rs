use colcodec::mysql::{MySqlArguments, MySqlCodecOptions, MySqlTextArguments, MySqlTypeInfo};
use colcodec::types::{BigDecimal, BitVec};
use colcodec::{Error, ErrorKind, HostValue};
use std::str::FromStr;
use time::macros::{datetime, time};

#[test]
fn it_binds_parameters_for_prepared_statements() -> anyhow::Result<()> {
    colcodec_test::setup_if_needed();

    let mut args = MySqlArguments::new(MySqlCodecOptions::new());

    args.add(42_i32)?;
    args.add(Option::<&str>::None)?;
    args.add("hello")?;
    args.add(u64::MAX)?;

    assert_eq!(args.len(), 4);
    assert_eq!(args.null_bitmap(), &[0b0010]);

    let names: Vec<_> = args.types().iter().map(MySqlTypeInfo::name).collect();
    assert_eq!(names, ["INT", "LONGTEXT", "LONGTEXT", "BIGINT UNSIGNED"]);

    // INT, then a length-encoded string, then an unsigned BIGINT
    assert_eq!(&args.values()[..4], 42_i32.to_le_bytes());
    assert_eq!(&args.values()[4..10], b"\x05hello");
    assert_eq!(&args.values()[10..], [0xff; 8]);

    assert_eq!(args.value(3).unwrap().decode::<u64>()?, u64::MAX);

    // the length prefix is stripped and the text borrowed from the buffer
    assert_eq!(args.value(2).unwrap().decode::<&str>()?, "hello");
    assert!(args.value(1).unwrap().is_null());

    Ok(())
}

#[test]
fn it_coerces_to_the_column_type() -> anyhow::Result<()> {
    let mut args = MySqlArguments::default();

    args.add_as(Some(&HostValue::String("12.5".into())), &MySqlTypeInfo::double())?;
    args.add_as(
        Some(&HostValue::Long(2024)),
        &MySqlTypeInfo::year(),
    )?;
    args.add_as(
        Some(&HostValue::String("2024-05-06 07:08:09".into())),
        &MySqlTypeInfo::datetime(0),
    )?;

    assert_eq!(args.value(0).unwrap().decode::<f64>()?, 12.5);
    assert_eq!(args.value(1).unwrap().decode::<i16>()?, 2024);
    assert_eq!(
        args.value(2).unwrap().decode::<time::PrimitiveDateTime>()?,
        datetime!(2024-05-06 07:08:09)
    );

    Ok(())
}

#[test]
fn it_rejects_values_that_do_not_fit() {
    let mut args = MySqlArguments::default();

    let err = args
        .add_as(Some(&HostValue::Int(-1)), &MySqlTypeInfo::int().unsigned())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RangeOverflow);

    let err = args
        .add_as(Some(&HostValue::Double(1.5)), &MySqlTypeInfo::int())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatError);

    let err = args
        .add_as(
            Some(&HostValue::BitSet(BitVec::from_elem(9, true))),
            &MySqlTypeInfo::bit(8),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RangeOverflow);

    let err = args
        .add_as(Some(&HostValue::Boolean(true)), &MySqlTypeInfo::date())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    assert!(args.is_empty());
    assert!(args.values().is_empty());
}

#[test]
fn it_renders_literals_for_plain_queries() -> anyhow::Result<()> {
    let mut args = MySqlTextArguments::new(MySqlCodecOptions::new());

    args.add(7_i64)?;
    args.add("O'Brien")?;
    args.add(vec![0xca_u8, 0xfe])?;
    args.add(BigDecimal::from_str("-12.500")?)?;
    args.add(time!(23:59:59.5))?;
    args.add(Option::<i32>::None)?;

    assert_eq!(
        args.interpolate("INSERT INTO t VALUES (?, ?, ?, ?, ?, ?)")?,
        r"INSERT INTO t VALUES (7, 'O\'Brien', X'CAFE', -12.500, '23:59:59.500000', NULL)"
    );

    Ok(())
}

#[test]
fn it_honors_no_backslash_escapes() -> anyhow::Result<()> {
    let options = MySqlCodecOptions::new().no_backslash_escapes(true);
    let mut args = MySqlTextArguments::new(options);

    args.add(r"a\'b")?;

    assert_eq!(
        args.interpolate(r"SELECT '\', ?")?,
        r"SELECT '\', 'a\''b'"
    );

    Ok(())
}

#[test]
fn it_checks_the_placeholder_count() {
    let args = MySqlTextArguments::default();

    let err = args.interpolate("SELECT ?").unwrap_err();

    assert!(matches!(
        err,
        Error::ArgumentCount {
            expected: 1,
            actual: 0
        }
    ));
}
