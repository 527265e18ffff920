//! Core of colcodec, the column type codec for MySQL and MariaDB.
//!
//! This crate holds everything that does not depend on a particular wire protocol:
//! the host value model ([`HostType`], [`HostValue`]), the [`Geometry`] sum type and its
//! WKB reader/writer, time zone handling ([`TimeZoneContext`]) and the error taxonomy.
//!
//! Not intended to be used directly; see the `colcodec` crate.
#![recursion_limit = "256"]
#![warn(future_incompatible, rust_2018_idioms)]

pub mod error;
pub mod geometry;
pub mod io;
pub mod types;
pub mod tz;

pub use error::{DecodeError, EncodeError, Error, ErrorKind, Result};
pub use geometry::{Geometry, GeometryKind};
pub use types::{HostType, HostValue};
pub use tz::{InvalidZone, TimeZoneContext, Zone, ZonedDateTime};
