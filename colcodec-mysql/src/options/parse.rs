use colcodec_core::error::Error;
use colcodec_core::Zone;
use url::Url;

use super::MySqlCodecOptions;

#[derive(Debug, thiserror::Error)]
#[error("unsupported URL scheme `{0}`; expected `mysql` or `mariadb`")]
struct UnsupportedScheme(String);

impl MySqlCodecOptions {
    pub(crate) fn parse_from_url(url: &Url) -> Result<Self, Error> {
        let mut options = match url.scheme() {
            "mysql" => Self::new(),
            "mariadb" => Self::new().extended_metadata(true),

            other => return Err(Error::config(UnsupportedScheme(other.to_owned()))),
        };

        for (key, value) in url.query_pairs().into_iter() {
            match &*key {
                "session-time-zone" | "sessionTimeZone" => {
                    options = options.session_time_zone(parse_zone(&value)?);
                }

                "client-time-zone" | "clientTimeZone" => {
                    options = options.client_time_zone(parse_zone(&value)?);
                }

                "preserve-instants" | "preserveInstants" => {
                    options = options.preserve_instants(value.parse().map_err(Error::config)?);
                }

                "uuid-as-string" | "uuidAsString" => {
                    options = options.uuid_as_string(value.parse().map_err(Error::config)?);
                }

                "geometry-default-concrete" | "geometryDefaultType" => {
                    options =
                        options.geometry_default_concrete(value.parse().map_err(Error::config)?);
                }

                "permit-zero-date" => {
                    options = options.permit_zero_date(value.parse().map_err(Error::config)?);
                }

                "extended-metadata" => {
                    options = options.extended_metadata(value.parse().map_err(Error::config)?);
                }

                "tiny-int1-is-bit" | "tinyInt1isBit" => {
                    options = options.tiny_int1_is_bit(value.parse().map_err(Error::config)?);
                }

                "year-is-date-type" | "yearIsDateType" => {
                    options = options.year_is_date_type(value.parse().map_err(Error::config)?);
                }

                "no-backslash-escapes" => {
                    options = options.no_backslash_escapes(value.parse().map_err(Error::config)?);
                }

                _ => log::debug!("ignoring connect parameter not used by the codec: {}={}", key, value),
            }
        }

        Ok(options)
    }
}

fn parse_zone(value: &str) -> Result<Zone, Error> {
    value.parse().map_err(Error::config)
}
