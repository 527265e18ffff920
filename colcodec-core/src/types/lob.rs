use std::fmt::{self, Debug};
use std::io::{Cursor, Read};

use bytes::{Buf, Bytes};

/// A binary large object handle.
///
/// The contents are already in memory; [`Blob::reader`] hands out a lazily-consumed
/// view without copying.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Blob(Bytes);

impl Blob {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Blob(bytes.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// A reader over the contents.
    pub fn reader(&self) -> impl Read {
        self.0.clone().reader()
    }
}

impl Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Blob {
    fn from(value: Vec<u8>) -> Self {
        Blob(value.into())
    }
}

impl From<&'static [u8]> for Blob {
    fn from(value: &'static [u8]) -> Self {
        Blob(Bytes::from_static(value))
    }
}

/// A character large object handle.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Clob(String);

impl Clob {
    pub fn new(text: impl Into<String>) -> Self {
        Clob(text.into())
    }

    /// Length in bytes of the UTF-8 contents.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// A reader over the UTF-8 encoded contents.
    pub fn reader(&self) -> impl Read + '_ {
        Cursor::new(self.0.as_bytes())
    }

    /// Number of characters, as opposed to [`Clob::len`].
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl Debug for Clob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clob({} chars)", self.char_count())
    }
}

impl From<String> for Clob {
    fn from(value: String) -> Self {
        Clob(value)
    }
}

impl From<&str> for Clob {
    fn from(value: &str) -> Self {
        Clob(value.to_owned())
    }
}
