use colcodec::mysql::{MySqlCodecOptions, MySqlTime, MySqlTypeInfo};
use colcodec::types::{LegacyDate, SqlDate, SqlTimestamp};
use colcodec::{ErrorKind, HostType, HostValue, Zone, ZonedDateTime};
use colcodec_test::{binary, encode_as, test_type, text, text_with};
use time::macros::{date, datetime, offset, time};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};

test_type!(date<Date>(MySqlTypeInfo::date(),
    "2001-01-05" == date!(2001-01-05),
    "2050-11-23" == date!(2050-11-23)
));

test_type!(time_of_day<Time>(MySqlTypeInfo::time(6),
    "05:10:20.115100" == time!(5:10:20.115100)
));

test_type!(interval<Duration>(MySqlTypeInfo::time(0),
    "838:59:59" == Duration::hours(838) + Duration::minutes(59) + Duration::seconds(59),
    "-01:00:00" == Duration::hours(-1)
));

test_type!(datetime<PrimitiveDateTime>(MySqlTypeInfo::datetime(6),
    "2019-01-02 05:10:20" == datetime!(2019-01-02 05:10:20),
    "2019-01-02 05:10:20.115100" == datetime!(2019-01-02 05:10:20.115100)
));

test_type!(timestamp<OffsetDateTime>(MySqlTypeInfo::timestamp(6),
    "2019-01-02 05:10:20.115100" == datetime!(2019-01-02 05:10:20.115100 UTC)
));

#[test]
fn it_reads_negative_times() -> anyhow::Result<()> {
    let cell = text(MySqlTypeInfo::time(2), "-18:30:12.55");
    let value = cell.as_ref();

    assert_eq!(
        value.decode::<Duration>()?,
        -(Duration::hours(18)
            + Duration::minutes(30)
            + Duration::seconds(12)
            + Duration::milliseconds(550))
    );

    // a negative interval wraps around midnight as a time of day
    assert_eq!(value.decode::<Time>()?, time!(5:29:47.450));

    let time = value.decode::<MySqlTime>()?;
    assert!(time.is_negative());
    assert_eq!(time.to_string(), "-18:30:12.550000");

    Ok(())
}

#[test]
fn it_reads_binary_times() -> anyhow::Result<()> {
    // negative, 1 day, 10:11:12.000001
    let cell = binary(
        MySqlTypeInfo::time(6),
        [12, 1, 1, 0, 0, 0, 10, 11, 12, 1, 0, 0, 0],
    );
    let value = cell.as_ref();

    assert_eq!(value.decode::<String>()?, "-34:11:12.000001");
    assert_eq!(
        value.decode::<Duration>()?,
        -(Duration::hours(34)
            + Duration::minutes(11)
            + Duration::seconds(12)
            + Duration::microseconds(1))
    );

    Ok(())
}

#[test]
fn it_reads_microsecond_datetimes() -> anyhow::Result<()> {
    // 1000-01-01 01:55:13.212345
    let cell = binary(
        MySqlTypeInfo::datetime(6),
        [11, 0xe8, 0x03, 1, 1, 1, 55, 13, 0x79, 0x3d, 0x03, 0x00],
    );
    let value = cell.as_ref();

    assert_eq!(
        value.decode::<PrimitiveDateTime>()?,
        datetime!(1000-01-01 01:55:13.212345)
    );
    assert_eq!(value.decode::<String>()?, "1000-01-01 01:55:13.212345");

    Ok(())
}

#[test]
fn it_treats_zero_dates_as_null() -> anyhow::Result<()> {
    let cell = text(MySqlTypeInfo::datetime(0), "0000-00-00 00:00:00");
    let value = cell.as_ref();

    assert_eq!(value.decode::<Option<PrimitiveDateTime>>()?, None);
    assert_eq!(value.decode_as(None)?, None);
    assert_eq!(value.decode::<String>()?, "0000-00-00 00:00:00");
    assert!(!value.is_null());

    let options = MySqlCodecOptions::new().permit_zero_date(false);
    let cell = text_with(MySqlTypeInfo::datetime(0), "0000-00-00 00:00:00", options);

    assert_eq!(
        cell.as_ref()
            .decode::<Option<PrimitiveDateTime>>()
            .unwrap_err()
            .kind(),
        ErrorKind::FormatError
    );

    Ok(())
}

#[test]
fn it_reads_years_as_dates() -> anyhow::Result<()> {
    let cell = text(MySqlTypeInfo::year(), "2024");
    let value = cell.as_ref();

    assert_eq!(value.decode::<Date>()?, date!(2024-01-01));
    assert_eq!(value.decode::<i16>()?, 2024);

    let options = MySqlCodecOptions::new().year_is_date_type(false);
    let cell = text_with(MySqlTypeInfo::year(), "2024", options);
    assert_eq!(cell.as_ref().decode_as(None)?, Some(HostValue::Short(2024)));

    Ok(())
}

#[test]
fn it_reads_dates_in_the_client_zone() -> anyhow::Result<()> {
    let client = Zone::fixed(offset!(+2));
    let options = MySqlCodecOptions::new().client_time_zone(client.clone());
    let cell = text_with(MySqlTypeInfo::date(), "2024-03-10", options);
    let value = cell.as_ref();

    assert_eq!(
        value.decode::<SqlDate>()?,
        SqlDate::new(date!(2024-03-10), client.clone())
    );

    let zoned = value.decode::<ZonedDateTime>()?;
    assert_eq!(zoned.local(), datetime!(2024-03-10 00:00));
    assert_eq!(zoned.zone(), &client);

    Ok(())
}

#[test]
fn it_preserves_instants_across_zones() -> anyhow::Result<()> {
    let options = MySqlCodecOptions::new()
        .session_time_zone(Zone::fixed(offset!(-5)))
        .client_time_zone(Zone::fixed(offset!(+1)))
        .preserve_instants(true);

    let cell = text_with(MySqlTypeInfo::datetime(0), "2024-01-01 12:00:00", options);
    let value = cell.as_ref();

    // stored in the session zone, read in the client zone
    assert_eq!(
        value.decode::<OffsetDateTime>()?,
        datetime!(2024-01-01 18:00:00 +1)
    );
    assert_eq!(
        value.decode::<SqlTimestamp>()?.instant(),
        datetime!(2024-01-01 17:00:00 UTC)
    );
    assert_eq!(
        value.decode::<LegacyDate>()?.instant(),
        Some(datetime!(2024-01-01 17:00:00 UTC))
    );

    // the wall clock digits are untouched
    assert_eq!(
        value.decode::<PrimitiveDateTime>()?,
        datetime!(2024-01-01 12:00:00)
    );

    Ok(())
}

#[test]
fn it_writes_instants_in_the_session_zone() -> anyhow::Result<()> {
    let options = MySqlCodecOptions::new()
        .session_time_zone(Zone::fixed(offset!(-5)))
        .preserve_instants(true);

    let cell = encode_as(
        datetime!(2024-01-01 17:00:00 UTC),
        &MySqlTypeInfo::datetime(0),
        options,
    )?;

    // the stored digits are in the session zone
    assert_eq!(
        cell.as_ref().decode::<PrimitiveDateTime>()?,
        datetime!(2024-01-01 12:00:00)
    );

    Ok(())
}

#[test]
fn it_round_trips_instants_with_other_offsets() -> anyhow::Result<()> {
    let cell = encode_as(
        datetime!(2021-06-01 12:00:00 +5),
        &MySqlTypeInfo::datetime(0),
        MySqlCodecOptions::new(),
    )?;

    assert_eq!(
        cell.as_ref().decode::<OffsetDateTime>()?,
        datetime!(2021-06-01 07:00:00 UTC)
    );

    let paris = Zone::named("Europe/Paris")?;
    let zoned = ZonedDateTime::from_instant(datetime!(2021-06-01 12:00:00 UTC), paris)
        .expect("in range");
    let options = MySqlCodecOptions::new().client_time_zone(Zone::fixed(offset!(-3)));

    let cell = encode_as(zoned.clone(), &MySqlTypeInfo::datetime(0), options)?;
    let read = cell.as_ref().decode::<ZonedDateTime>()?;

    assert_eq!(read.local(), datetime!(2021-06-01 09:00:00));
    assert_eq!(read.offset_date_time(), zoned.offset_date_time());

    Ok(())
}

#[test]
fn it_reads_region_zones_across_daylight_saving_time() -> anyhow::Result<()> {
    let options = MySqlCodecOptions::new()
        .session_time_zone(Zone::UTC)
        .client_time_zone(Zone::named("America/New_York")?)
        .preserve_instants(true);

    let winter = text_with(MySqlTypeInfo::datetime(0), "2024-01-15 12:00:00", options.clone());
    assert_eq!(
        winter.as_ref().decode::<OffsetDateTime>()?,
        datetime!(2024-01-15 07:00:00 -5)
    );

    let summer = text_with(MySqlTypeInfo::datetime(0), "2024-07-15 12:00:00", options);
    assert_eq!(
        summer.as_ref().decode::<OffsetDateTime>()?,
        datetime!(2024-07-15 08:00:00 -4)
    );

    Ok(())
}

#[test]
fn it_rejects_intervals_from_datetimes() {
    let cell = text(MySqlTypeInfo::datetime(0), "2024-01-01 12:00:00");

    let err = cell
        .as_ref()
        .decode_as(Some(HostType::Duration))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}
