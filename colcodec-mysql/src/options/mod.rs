use std::str::FromStr;

use colcodec_core::error::Error;
use colcodec_core::{TimeZoneContext, Zone};
use url::Url;

mod parse;

/// Options that change how column values are decoded and encoded.
///
/// A value can be built up with the builder methods, or parsed from a connection URL
/// whose query string carries the options:
///
/// ```text
/// mysql://[host][/database][?properties]
/// mariadb://[host][/database][?properties]
/// ```
///
/// Keys that are not codec options (such as `ssl-mode`) are ignored.
///
/// | Key | Default | Description |
/// |-----|---------|-------------|
/// | `session-time-zone` | `UTC` | Time zone of the server session: an offset such as `+02:00` or a region such as `Europe/Paris`. |
/// | `client-time-zone` | `UTC` | Time zone of the client, used for legacy and zoned values. |
/// | `preserve-instants` | `false` | Convert stored date-times between the session and client zones. |
/// | `uuid-as-string` | `false` | `UUID` columns decode to strings by default. |
/// | `geometry-default-concrete` | `true` | Spatial columns decode to their concrete shape by default. |
/// | `permit-zero-date` | `true` | Zero dates decode as `NULL` instead of failing. |
/// | `extended-metadata` | `false` for `mysql://`, `true` for `mariadb://` | The server reports extended type names. |
/// | `tiny-int1-is-bit` | `true` | `TINYINT(1)` is described as `BIT` and decodes to `bool`. |
/// | `year-is-date-type` | `true` | `YEAR` decodes to a date by default. |
/// | `no-backslash-escapes` | `false` | The session runs with `NO_BACKSLASH_ESCAPES`. |
///
/// ```rust
/// # use colcodec_mysql::MySqlCodecOptions;
/// let options: MySqlCodecOptions =
///     "mariadb://localhost/app?uuid-as-string=true&client-time-zone=%2B02:00".parse()?;
/// # Ok::<(), colcodec_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlCodecOptions {
    pub(crate) time_zone: TimeZoneContext,
    pub(crate) uuid_as_string: bool,
    pub(crate) geometry_default_concrete: bool,
    pub(crate) permit_zero_date: bool,
    pub(crate) extended_metadata: bool,
    pub(crate) tiny_int1_is_bit: bool,
    pub(crate) year_is_date_type: bool,
    pub(crate) no_backslash_escapes: bool,
}

impl Default for MySqlCodecOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlCodecOptions {
    /// Creates the default set of options.
    pub const fn new() -> Self {
        Self {
            time_zone: TimeZoneContext {
                session: Zone::UTC,
                client: Zone::UTC,
                preserve_instants: false,
            },
            uuid_as_string: false,
            geometry_default_concrete: true,
            permit_zero_date: true,
            extended_metadata: false,
            tiny_int1_is_bit: true,
            year_is_date_type: true,
            no_backslash_escapes: false,
        }
    }

    /// Sets the time zone of the server session.
    pub fn session_time_zone(mut self, zone: Zone) -> Self {
        self.time_zone.session = zone;
        self
    }

    /// Sets the time zone legacy and zoned values are presented in.
    pub fn client_time_zone(mut self, zone: Zone) -> Self {
        self.time_zone.client = zone;
        self
    }

    /// When set, a stored `DATETIME` is read as a wall-clock time in the session zone
    /// and converted to the client zone, so the instant is preserved. Otherwise the
    /// wall-clock digits are kept and read in the client zone.
    pub fn preserve_instants(mut self, preserve: bool) -> Self {
        self.time_zone.preserve_instants = preserve;
        self
    }

    pub fn uuid_as_string(mut self, enabled: bool) -> Self {
        self.uuid_as_string = enabled;
        self
    }

    /// Sets whether a spatial column decodes to its concrete shape (`Point`,
    /// `Polygon`, …) when no type is requested.
    ///
    /// This needs extended metadata; without it, spatial values decode to a
    /// `GeometryCollection` wrapping the stored shape.
    pub fn geometry_default_concrete(mut self, enabled: bool) -> Self {
        self.geometry_default_concrete = enabled;
        self
    }

    /// Sets whether zero dates such as `0000-00-00` decode as `NULL`.
    ///
    /// When disabled, decoding a zero date into anything but a string fails.
    pub fn permit_zero_date(mut self, enabled: bool) -> Self {
        self.permit_zero_date = enabled;
        self
    }

    pub fn extended_metadata(mut self, enabled: bool) -> Self {
        self.extended_metadata = enabled;
        self
    }

    pub fn tiny_int1_is_bit(mut self, enabled: bool) -> Self {
        self.tiny_int1_is_bit = enabled;
        self
    }

    pub fn year_is_date_type(mut self, enabled: bool) -> Self {
        self.year_is_date_type = enabled;
        self
    }

    /// Sets whether string literals are written for a session in `NO_BACKSLASH_ESCAPES`
    /// mode, where only quotes are escaped (by doubling them).
    pub fn no_backslash_escapes(mut self, enabled: bool) -> Self {
        self.no_backslash_escapes = enabled;
        self
    }

    /// The time zone parameters for temporal values.
    pub fn time_zone_context(&self) -> &TimeZoneContext {
        &self.time_zone
    }
}

impl FromStr for MySqlCodecOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let url: Url = s.parse().map_err(Error::config)?;
        Self::parse_from_url(&url)
    }
}
