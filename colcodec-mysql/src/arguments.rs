use std::ops::{Deref, Range};

use colcodec_core::{EncodeError, Error, HostValue};

use crate::codec::{encode_binary, encode_text};
use crate::encode::{Encode, IsNull};
use crate::io::MySqlBufExt;
use crate::{MySqlCodecOptions, MySqlTypeInfo, MySqlValueRef};

/// Parameters of a prepared statement, encoded for the binary protocol.
#[derive(Debug, Default, Clone)]
pub struct MySqlArguments {
    pub(crate) values: Vec<u8>,
    pub(crate) types: Vec<MySqlTypeInfo>,
    pub(crate) null_bitmap: NullBitMap,
    ranges: Vec<Option<Range<usize>>>,
    options: MySqlCodecOptions,
}

impl MySqlArguments {
    pub fn new(options: MySqlCodecOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Binds `value` as the next parameter, sent as its own natural type.
    pub fn add<T>(&mut self, value: T) -> Result<(), EncodeError>
    where
        T: Encode,
    {
        let ty = value.produces();
        self.add_as(value.to_host_value().as_ref(), &ty)
    }

    /// Binds `value` as the next parameter, for a column of type `ty`.
    ///
    /// `None` binds SQL `NULL`.
    pub fn add_as(
        &mut self,
        value: Option<&HostValue>,
        ty: &MySqlTypeInfo,
    ) -> Result<(), EncodeError> {
        let Some(value) = value else {
            self.types.push(ty.clone());
            self.ranges.push(None);
            self.null_bitmap.push(IsNull::Yes);

            return Ok(());
        };

        let value_length_before_encoding = self.values.len();
        let announced = match encode_binary(value, ty, &self.options, &mut self.values) {
            Ok(announced) => announced,
            Err(error) => {
                // reset the value buffer so a failed value leaves nothing half-encoded behind
                self.values.truncate(value_length_before_encoding);
                return Err(error);
            }
        };

        self.types.push(announced);
        self.ranges
            .push(Some(value_length_before_encoding..self.values.len()));
        self.null_bitmap.push(IsNull::No);

        Ok(())
    }

    pub fn reserve(&mut self, len: usize, size: usize) {
        self.types.reserve(len);
        self.ranges.reserve(len);
        self.values.reserve(size);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The parameter types to announce, in order.
    pub fn types(&self) -> &[MySqlTypeInfo] {
        &self.types
    }

    /// The concatenated parameter values, as sent after the null bitmap.
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// The null bitmap of the parameters, one bit per parameter.
    pub fn null_bitmap(&self) -> &[u8] {
        &self.null_bitmap
    }

    /// Reads back the parameter at `index` as a binary protocol cell.
    pub fn value(&self, index: usize) -> Option<MySqlValueRef<'_>> {
        let ty = self.types.get(index)?;
        let range = self.ranges.get(index)?.clone();

        let bytes = match range {
            Some(range) => {
                let mut bytes = &self.values[range];

                if ty.is_length_encoded() {
                    bytes = bytes.get_bytes_lenenc().ok()?;
                }

                Some(bytes)
            }

            None => None,
        };

        Some(MySqlValueRef::binary(bytes, ty, &self.options))
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct NullBitMap {
    bytes: Vec<u8>,
    length: usize,
}

impl NullBitMap {
    fn push(&mut self, is_null: IsNull) {
        let byte_index = self.length / (u8::BITS as usize);
        let bit_offset = self.length % (u8::BITS as usize);

        if bit_offset == 0 {
            self.bytes.push(0);
        }

        self.bytes[byte_index] |= u8::from(is_null.is_null()) << bit_offset;
        self.length += 1;
    }
}

impl Deref for NullBitMap {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.bytes
    }
}

/// Parameters of a plain query, rendered as SQL literals.
#[derive(Debug, Default, Clone)]
pub struct MySqlTextArguments {
    literals: Vec<String>,
    options: MySqlCodecOptions,
}

impl MySqlTextArguments {
    pub fn new(options: MySqlCodecOptions) -> Self {
        Self {
            literals: Vec::new(),
            options,
        }
    }

    /// Binds `value` as the next parameter, rendered as its own natural type.
    pub fn add<T>(&mut self, value: T) -> Result<(), EncodeError>
    where
        T: Encode,
    {
        let ty = value.produces();
        self.add_as(value.to_host_value().as_ref(), &ty)
    }

    /// Binds `value` as the next parameter, rendered for a column of type `ty`.
    pub fn add_as(
        &mut self,
        value: Option<&HostValue>,
        ty: &MySqlTypeInfo,
    ) -> Result<(), EncodeError> {
        let literal = match value {
            Some(value) => {
                let mut buf = String::new();
                encode_text(value, ty, &self.options, &mut buf)?;
                buf
            }

            None => String::from("NULL"),
        };

        self.literals.push(literal);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// Replaces each `?` placeholder in `sql` with the next bound literal.
    ///
    /// Placeholders inside quoted strings and quoted identifiers are left alone.
    pub fn interpolate(&self, sql: &str) -> Result<String, Error> {
        let bytes = sql.as_bytes();
        let mut out =
            String::with_capacity(sql.len() + self.literals.iter().map(String::len).sum::<usize>());
        let mut literals = self.literals.iter();
        let mut expected = 0;
        let mut start = 0;
        let mut i = 0;

        while let Some(offset) = bytes[i..]
            .iter()
            .position(|b| matches!(b, b'?' | b'\'' | b'"' | b'`'))
        {
            let at = i + offset;

            if bytes[at] == b'?' {
                out.push_str(&sql[start..at]);
                expected += 1;

                if let Some(literal) = literals.next() {
                    out.push_str(literal);
                }

                start = at + 1;
                i = at + 1;
                continue;
            }

            i = self.skip_quoted(bytes, at);
        }

        out.push_str(&sql[start..]);

        if expected != self.literals.len() {
            return Err(Error::ArgumentCount {
                expected,
                actual: self.literals.len(),
            });
        }

        Ok(out)
    }

    /// Returns the index just past the quoted section opening at `open`.
    fn skip_quoted(&self, bytes: &[u8], open: usize) -> usize {
        let quote = bytes[open];
        let escapes = quote != b'`' && !self.options.no_backslash_escapes;
        let mut i = open + 1;

        loop {
            let found = if escapes {
                memchr::memchr2(quote, b'\\', &bytes[i..])
            } else {
                memchr::memchr(quote, &bytes[i..])
            };

            let Some(offset) = found else {
                return bytes.len();
            };

            let at = i + offset;

            if bytes[at] == b'\\' {
                i = at + 2;
            } else if bytes.get(at + 1) == Some(&quote) {
                // a doubled quote stands for itself
                i = at + 2;
            } else {
                return at + 1;
            }

            if i >= bytes.len() {
                return bytes.len();
            }
        }
    }
}
