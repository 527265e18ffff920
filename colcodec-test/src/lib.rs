use colcodec::mysql::{
    Encode, MySqlArguments, MySqlCodecOptions, MySqlTypeInfo, MySqlValue, MySqlValueFormat,
};
use colcodec::{EncodeError, HostValue};

pub fn setup_if_needed() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A text protocol cell holding `text`.
pub fn text(ty: MySqlTypeInfo, text: &str) -> MySqlValue {
    text_with(ty, text, MySqlCodecOptions::new())
}

pub fn text_with(ty: MySqlTypeInfo, text: &str, options: MySqlCodecOptions) -> MySqlValue {
    setup_if_needed();

    MySqlValue::new(
        Some(text.as_bytes().to_vec().into()),
        ty,
        MySqlValueFormat::Text,
        options,
    )
}

/// A binary protocol cell holding exactly `bytes`.
pub fn binary(ty: MySqlTypeInfo, bytes: impl Into<Vec<u8>>) -> MySqlValue {
    binary_with(ty, bytes, MySqlCodecOptions::new())
}

pub fn binary_with(
    ty: MySqlTypeInfo,
    bytes: impl Into<Vec<u8>>,
    options: MySqlCodecOptions,
) -> MySqlValue {
    setup_if_needed();

    MySqlValue::new(
        Some(bytes.into().into()),
        ty,
        MySqlValueFormat::Binary,
        options,
    )
}

/// A `NULL` cell of type `ty`.
pub fn null(ty: MySqlTypeInfo, format: MySqlValueFormat) -> MySqlValue {
    MySqlValue::new(None, ty, format, MySqlCodecOptions::new())
}

/// Encodes `value` as a binary protocol parameter for a column of type `ty`, and reads
/// the parameter back as a cell.
pub fn encode_as<T: Encode>(
    value: T,
    ty: &MySqlTypeInfo,
    options: MySqlCodecOptions,
) -> Result<MySqlValue, EncodeError> {
    setup_if_needed();

    let mut args = MySqlArguments::new(options);
    args.add_as(value.to_host_value().as_ref(), ty)?;

    let value = args.value(0).map(|value| value.to_owned());

    log::trace!("encoded {:?} as {:?}", value, args.types());

    Ok(value.unwrap_or_else(|| null(ty.clone(), MySqlValueFormat::Binary)))
}

/// Encodes `value` as a SQL literal for a column of type `ty`.
pub fn literal(value: &HostValue, ty: &MySqlTypeInfo, options: MySqlCodecOptions) -> String {
    let mut buf = String::new();

    if let Err(e) = colcodec::mysql::encode_text(value, ty, &options, &mut buf) {
        panic!("failed to encode {value:?} as {ty}: {e}");
    }

    buf
}

// Test type decoding from the text protocol, and encoding through the binary protocol
#[macro_export]
macro_rules! test_type {
    ($name:ident<$ty:ty>($sql_type:expr, $($text:literal == $value:expr),+ $(,)?)) => {
        $crate::test_decode_type!($name<$ty>($sql_type, $($text == $value),+));

        paste::item! {
            #[test]
            fn [< test_encode_type_ $name >] () -> anyhow::Result<()> {
                let sql_type = $sql_type;

                $(
                    let expected: $ty = ($value).into();
                    let cell = $crate::encode_as(&expected, &sql_type, Default::default())?;
                    let rec = cell.as_ref().decode::<$ty>()?;

                    assert!(expected == rec,
                            "[2] for {}, expected: {:?}, received: {:?}",
                            $text, expected, rec);
                )+

                Ok(())
            }
        }
    };

    ($name:ident($sql_type:expr, $($text:literal == $value:expr),+ $(,)?)) => {
        $crate::test_type!($name<$name>($sql_type, $($text == $value),+));
    };
}

// Test type decoding only
#[macro_export]
macro_rules! test_decode_type {
    ($name:ident<$ty:ty>($sql_type:expr, $($text:literal == $value:expr),+ $(,)?)) => {
        paste::item! {
            #[test]
            fn [< test_decode_type_ $name >] () -> anyhow::Result<()> {
                $(
                    let cell = $crate::text($sql_type, $text);
                    let rec = cell.as_ref().decode::<$ty>()?;

                    assert!(($value) == rec,
                            "[1] for {}, expected: {:?}, received: {:?}",
                            $text, $value, rec);
                )+

                Ok(())
            }
        }
    };

    ($name:ident($sql_type:expr, $($text:literal == $value:expr),+ $(,)?)) => {
        $crate::test_decode_type!($name<$name>($sql_type, $($text == $value),+));
    };
}
