use std::sync::Arc;

use colcodec::mysql::{MySqlCodecOptions, MySqlColumn, MySqlRow, MySqlTypeInfo, MySqlValueFormat};
use colcodec::{Error, ErrorKind, GeometryKind, HostType};
use colcodec_test::{binary, text};

#[test]
fn it_reports_type_mismatches() {
    let cell = text(MySqlTypeInfo::float(), "1.5");

    let err = cell.as_ref().decode_as(Some(HostType::Date)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert!(!err.is_not_supported());
    assert_eq!(err.to_string(), "Data type FLOAT cannot be decoded as Date");

    let err = cell
        .as_ref()
        .decode_as(Some(HostType::Geometry(GeometryKind::Point)))
        .unwrap_err();
    assert!(err.is_not_supported());
    assert_eq!(
        err.to_string(),
        "Type class Point not supported type for FLOAT type"
    );
}

#[test]
fn it_reports_overflow_instead_of_wrapping() {
    let cell = text(MySqlTypeInfo::int(), "300");

    let err = cell.as_ref().decode::<i8>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RangeOverflow);

    let cell = text(MySqlTypeInfo::double(), "1e300");
    assert_eq!(
        cell.as_ref().decode::<i64>().unwrap_err().kind(),
        ErrorKind::RangeOverflow
    );
}

#[test]
fn it_reports_unparseable_text() {
    let cell = text(MySqlTypeInfo::varchar(20), "twelve");

    let err = cell.as_ref().decode::<i32>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatError);

    let cell = binary(MySqlTypeInfo::varchar(20), [0xff, 0xfe]);
    assert_eq!(
        cell.as_ref().decode::<String>().unwrap_err().kind(),
        ErrorKind::FormatError
    );
}

#[test]
fn it_reports_malformed_binary_values() {
    let cell = binary(MySqlTypeInfo::datetime(0), [5, 0xe8, 0x07]);

    assert_eq!(
        cell.as_ref()
            .decode::<time::PrimitiveDateTime>()
            .unwrap_err()
            .kind(),
        ErrorKind::FormatError
    );
}

#[test]
fn it_reports_binary_fractions_past_one_second() {
    let mut bytes = vec![11, 0xda, 0x07, 10, 17, 19, 27, 30];
    bytes.extend_from_slice(&10_000_000u32.to_le_bytes());

    let cell = binary(MySqlTypeInfo::datetime(6), bytes);

    assert_eq!(
        cell.as_ref()
            .decode::<time::PrimitiveDateTime>()
            .unwrap_err()
            .kind(),
        ErrorKind::FormatError
    );
}

#[test]
fn it_reports_nulls_for_required_values() {
    let cell = colcodec_test::null(MySqlTypeInfo::int(), MySqlValueFormat::Binary);

    assert_eq!(cell.as_ref().decode::<Option<i32>>().unwrap(), None);
    assert_eq!(
        cell.as_ref().decode::<i32>().unwrap_err().kind(),
        ErrorKind::NullToPrimitive
    );
}

#[test]
fn it_wraps_errors_with_the_column() {
    let columns = vec![MySqlColumn::new(0, "amount", MySqlTypeInfo::varchar(10))];
    let row = MySqlRow::new(
        Arc::new(columns),
        vec![Some("abc".into())],
        MySqlValueFormat::Text,
        MySqlCodecOptions::new(),
    );

    let err = row.try_get::<i64, _>("amount").unwrap_err();

    assert!(matches!(err, Error::ColumnDecode { ref index, .. } if index == "\"amount\""));
    assert_eq!(err.kind(), Some(ErrorKind::FormatError));

    let err = row.try_get::<i64, _>(1).unwrap_err();
    assert!(matches!(err, Error::ColumnIndexOutOfBounds { index: 1, len: 1 }));
    assert_eq!(err.kind(), None);
}
