//! Types for working with errors produced by colcodec.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::result::Result as StdResult;

use crate::types::HostType;

/// A specialized `Result` type for colcodec.
pub type Result<T> = StdResult<T, Error>;

// Convenience type alias for usage within colcodec.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The broad class of a decode or encode failure.
///
/// Callers should match on this instead of inspecting error messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested host type is structurally incompatible with the SQL type.
    TypeMismatch,

    /// The value parsed but does not fit the requested numeric type.
    RangeOverflow,

    /// Textual or binary content does not parse as the requested type requires.
    FormatError,

    /// The requested host type is never supported by this codec.
    UnsupportedConversion,

    /// A `NULL` was requested into a type that cannot represent it.
    NullToPrimitive,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::RangeOverflow => "range overflow",
            ErrorKind::FormatError => "format error",
            ErrorKind::UnsupportedConversion => "unsupported conversion",
            ErrorKind::NullToPrimitive => "null to primitive",
        })
    }
}

/// An error that occurred while decoding a column value into a host value.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// No codec exists for the requested object type on this SQL type.
    #[error("Type class {target} not supported type for {sql_type} type")]
    NotSupported { sql_type: String, target: HostType },

    /// The SQL type has a value accessor for the requested type but the two are incompatible.
    #[error("Data type {sql_type} cannot be decoded as {target}")]
    Mismatch { sql_type: String, target: HostType },

    /// The value does not fit the requested numeric type.
    #[error("value {value} of SQL type {sql_type} is out of range for {target}")]
    Overflow {
        sql_type: String,
        target: String,
        value: String,
    },

    /// The cell content does not parse as the requested type.
    #[error("value {value:?} of SQL type {sql_type} cannot be parsed as {target}: {source}")]
    Format {
        sql_type: String,
        target: HostType,
        value: String,

        #[source]
        source: BoxDynError,
    },

    /// The bytes received for the cell do not have the layout its SQL type requires.
    #[error("malformed {sql_type} value: {source}")]
    Malformed {
        sql_type: String,

        #[source]
        source: BoxDynError,
    },

    /// The requested type is not something this codec can ever produce.
    #[error("unsupported conversion target: {target}")]
    Unsupported { target: String },

    /// A `NULL` was found where a non-nullable type was requested.
    #[error("unexpected null; try decoding as an `Option` (requested {target})")]
    UnexpectedNull { target: String },
}

impl DecodeError {
    /// Returns the [`ErrorKind`] this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::NotSupported { .. } | DecodeError::Mismatch { .. } => {
                ErrorKind::TypeMismatch
            }
            DecodeError::Overflow { .. } => ErrorKind::RangeOverflow,
            DecodeError::Format { .. } | DecodeError::Malformed { .. } => ErrorKind::FormatError,
            DecodeError::Unsupported { .. } => ErrorKind::UnsupportedConversion,
            DecodeError::UnexpectedNull { .. } => ErrorKind::NullToPrimitive,
        }
    }

    /// `true` for the "Type class … not supported" form of a type mismatch.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, DecodeError::NotSupported { .. })
    }

    /// Builds the type-mismatch error appropriate for `target`.
    ///
    /// Targets with a scalar value accessor get [`DecodeError::Mismatch`]; every other
    /// target gets [`DecodeError::NotSupported`].
    pub fn incompatible(sql_type: impl Into<String>, target: HostType) -> Self {
        let sql_type = sql_type.into();

        if target.has_accessor() {
            DecodeError::Mismatch { sql_type, target }
        } else {
            DecodeError::NotSupported { sql_type, target }
        }
    }

    pub fn overflow(
        sql_type: impl Into<String>,
        target: impl Display,
        value: impl Display,
    ) -> Self {
        DecodeError::Overflow {
            sql_type: sql_type.into(),
            target: target.to_string(),
            value: value.to_string(),
        }
    }

    pub fn format(
        sql_type: impl Into<String>,
        target: HostType,
        value: impl Into<String>,
        source: impl Into<BoxDynError>,
    ) -> Self {
        DecodeError::Format {
            sql_type: sql_type.into(),
            target,
            value: value.into(),
            source: source.into(),
        }
    }

    pub fn malformed(sql_type: impl Into<String>, source: impl Into<BoxDynError>) -> Self {
        DecodeError::Malformed {
            sql_type: sql_type.into(),
            source: source.into(),
        }
    }

    pub fn unexpected_null(target: impl Into<String>) -> Self {
        DecodeError::UnexpectedNull {
            target: target.into(),
        }
    }
}

/// An error that occurred while encoding a host value for a parameter.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// The host value cannot be written to a parameter of this SQL type.
    #[error("cannot encode {value} as SQL type {sql_type}")]
    Mismatch { value: String, sql_type: String },

    /// The host value does not fit the SQL type.
    #[error("number `{value}` too {direction} to fit in SQL type `{sql_type}`")]
    Overflow {
        value: String,
        sql_type: String,
        direction: Direction,
    },

    /// A textual host value does not parse as the SQL type requires.
    #[error("cannot encode {value:?} as SQL type {sql_type}: {source}")]
    Format {
        value: String,
        sql_type: String,

        #[source]
        source: BoxDynError,
    },

    /// The host value is never accepted as a parameter.
    #[error("unsupported parameter value: {value}")]
    Unsupported { value: String },
}

/// Which bound of a SQL type an out-of-range value crossed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Large,
    Small,
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Large => "large",
            Direction::Small => "small",
        })
    }
}

impl EncodeError {
    /// Returns the [`ErrorKind`] this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::Mismatch { .. } => ErrorKind::TypeMismatch,
            EncodeError::Overflow { .. } => ErrorKind::RangeOverflow,
            EncodeError::Format { .. } => ErrorKind::FormatError,
            EncodeError::Unsupported { .. } => ErrorKind::UnsupportedConversion,
        }
    }

    pub fn mismatch(value: impl Display, sql_type: impl Into<String>) -> Self {
        EncodeError::Mismatch {
            value: value.to_string(),
            sql_type: sql_type.into(),
        }
    }

    pub fn too_large(value: impl Display, sql_type: impl Into<String>) -> Self {
        EncodeError::Overflow {
            value: value.to_string(),
            sql_type: sql_type.into(),
            direction: Direction::Large,
        }
    }

    pub fn too_small(value: impl Display, sql_type: impl Into<String>) -> Self {
        EncodeError::Overflow {
            value: value.to_string(),
            sql_type: sql_type.into(),
            direction: Direction::Small,
        }
    }

    pub fn format(
        value: impl Into<String>,
        sql_type: impl Into<String>,
        source: impl Into<BoxDynError>,
    ) -> Self {
        EncodeError::Format {
            value: value.into(),
            sql_type: sql_type.into(),
            source: source.into(),
        }
    }
}

/// Represents all the ways a row access can fail within colcodec.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error occurred while parsing codec options.
    #[error("error occurred while parsing codec options: {0}")]
    Configuration(#[source] BoxDynError),

    /// Column index was out of bounds.
    #[error("column index out of bounds: the len is {len}, but the index is {index}")]
    ColumnIndexOutOfBounds { index: usize, len: usize },

    /// No column found for the given name.
    #[error("no column found for name: {0}")]
    ColumnNotFound(String),

    /// Error occurred while decoding a value from a specific column.
    #[error("error occurred while decoding column {index}: {source}")]
    ColumnDecode {
        index: String,

        #[source]
        source: DecodeError,
    },

    /// A statement has a different number of placeholders than arguments were bound.
    #[error("statement expects {expected} arguments but {actual} were bound")]
    ArgumentCount { expected: usize, actual: usize },

    /// Error occurred while decoding a value.
    #[error("error occurred while decoding: {0}")]
    Decode(#[from] DecodeError),

    /// Error occurred while encoding a value.
    #[error("error occurred while encoding: {0}")]
    Encode(#[from] EncodeError),
}

impl Error {
    #[inline]
    pub fn config(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Configuration(err.into())
    }

    /// Returns the [`ErrorKind`] of the underlying codec failure, if any.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::ColumnDecode { source, .. } | Error::Decode(source) => Some(source.kind()),
            Error::Encode(source) => Some(source.kind()),
            _ => None,
        }
    }
}
