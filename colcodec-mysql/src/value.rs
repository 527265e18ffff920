use std::str::from_utf8;

use bytes::Bytes;
use colcodec_core::{DecodeError, HostType, HostValue};

use crate::decode::Decode;
use crate::{codec, MySqlCodecOptions, MySqlTypeInfo};

/// The wire format of a value.
///
/// MySQL returns values in [`Text`](MySqlValueFormat::Text) format for plain queries and
/// in [`Binary`](MySqlValueFormat::Binary) format for prepared statements.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[repr(u8)]
pub enum MySqlValueFormat {
    Text,
    Binary,
}

/// A borrowed view of one cell.
///
/// Binary protocol date and time values keep their leading length byte. Values of
/// length-encoded types (strings, blobs, decimals, bits) do not keep their length prefix.
#[derive(Debug, Clone, Copy)]
pub struct MySqlValueRef<'r> {
    pub(crate) value: Option<&'r [u8]>,
    pub(crate) type_info: &'r MySqlTypeInfo,
    pub(crate) format: MySqlValueFormat,
    pub(crate) options: &'r MySqlCodecOptions,
}

impl<'r> MySqlValueRef<'r> {
    pub fn new(
        value: Option<&'r [u8]>,
        type_info: &'r MySqlTypeInfo,
        format: MySqlValueFormat,
        options: &'r MySqlCodecOptions,
    ) -> Self {
        Self {
            value,
            type_info,
            format,
            options,
        }
    }

    /// A text protocol cell.
    pub fn text(
        value: Option<&'r [u8]>,
        type_info: &'r MySqlTypeInfo,
        options: &'r MySqlCodecOptions,
    ) -> Self {
        Self::new(value, type_info, MySqlValueFormat::Text, options)
    }

    /// A binary protocol cell.
    pub fn binary(
        value: Option<&'r [u8]>,
        type_info: &'r MySqlTypeInfo,
        options: &'r MySqlCodecOptions,
    ) -> Self {
        Self::new(value, type_info, MySqlValueFormat::Binary, options)
    }

    pub fn format(&self) -> MySqlValueFormat {
        self.format
    }

    pub fn type_info(&self) -> &'r MySqlTypeInfo {
        self.type_info
    }

    pub fn options(&self) -> &'r MySqlCodecOptions {
        self.options
    }

    /// `true` if the cell is SQL `NULL`.
    ///
    /// A zero date is not `NULL` here; it only decodes to `None`.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// The raw bytes of the cell, or `None` for SQL `NULL`.
    pub fn as_bytes(&self) -> Option<&'r [u8]> {
        self.value
    }

    pub(crate) fn as_str(&self, target: HostType) -> Result<Option<&'r str>, DecodeError> {
        self.value
            .map(|bytes| {
                from_utf8(bytes).map_err(|e| {
                    DecodeError::format(
                        self.type_info.name(),
                        target,
                        String::from_utf8_lossy(bytes),
                        e,
                    )
                })
            })
            .transpose()
    }

    /// Decodes into `target`, or into the column's default host type if `target` is `None`.
    pub fn decode_as(&self, target: Option<HostType>) -> Result<Option<HostValue>, DecodeError> {
        codec::decode(self, target)
    }

    /// Decodes into a Rust type.
    pub fn decode<T: Decode<'r>>(self) -> Result<T, DecodeError> {
        T::decode(self)
    }

    pub fn to_owned(&self) -> MySqlValue {
        MySqlValue {
            value: self.value.map(Bytes::copy_from_slice),
            type_info: self.type_info.clone(),
            format: self.format,
            options: self.options.clone(),
        }
    }
}

/// An owned cell.
#[derive(Debug, Clone)]
pub struct MySqlValue {
    value: Option<Bytes>,
    type_info: MySqlTypeInfo,
    format: MySqlValueFormat,
    options: MySqlCodecOptions,
}

impl MySqlValue {
    pub fn new(
        value: Option<Bytes>,
        type_info: MySqlTypeInfo,
        format: MySqlValueFormat,
        options: MySqlCodecOptions,
    ) -> Self {
        Self {
            value,
            type_info,
            format,
            options,
        }
    }

    pub fn as_ref(&self) -> MySqlValueRef<'_> {
        MySqlValueRef {
            value: self.value.as_deref(),
            type_info: &self.type_info,
            format: self.format,
            options: &self.options,
        }
    }

    pub fn type_info(&self) -> &MySqlTypeInfo {
        &self.type_info
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}
