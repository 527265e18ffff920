//! Column type codec for MySQL and MariaDB.
//!
//! Decodes the cells of a result set into host values and encodes host values as
//! statement parameters, over both the text and the binary protocol.
//!
//! ```rust
//! use colcodec::mysql::{MySqlCodecOptions, MySqlTypeInfo, MySqlValueRef};
//!
//! let options = MySqlCodecOptions::new();
//! let ty = MySqlTypeInfo::bit(16);
//! let value = MySqlValueRef::binary(Some(&[0x0f, 0x04]), &ty, &options);
//!
//! assert_eq!(value.decode::<i64>()?, 3844);
//! assert_eq!(value.decode::<String>()?, "b'111100000100'");
//! # Ok::<(), colcodec::DecodeError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// Modules
pub use colcodec_core::{error, geometry, tz, types};

// Types
pub use colcodec_core::{
    DecodeError, EncodeError, Error, ErrorKind, Geometry, GeometryKind, HostType, HostValue,
    Result, TimeZoneContext, Zone, ZonedDateTime,
};

#[cfg(feature = "mysql")]
#[cfg_attr(docsrs, doc(cfg(feature = "mysql")))]
pub use colcodec_mysql as mysql;

#[cfg(feature = "mysql")]
pub use colcodec_mysql::{
    Decode, Encode, MySqlArguments, MySqlCodecOptions, MySqlColumn, MySqlRow,
    MySqlTextArguments, MySqlTypeInfo, MySqlValue, MySqlValueFormat, MySqlValueRef,
};

/// Convenience re-export of common traits.
pub mod prelude {
    #[cfg(feature = "mysql")]
    pub use colcodec_mysql::{ColumnIndex, Decode, Encode, Type};
}
