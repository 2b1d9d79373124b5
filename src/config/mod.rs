use crate::cli::Args;
use crate::geo::LocationSource;
use crate::models::place::Coordinates;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// How long the floating landing widget waits for a position before sending
/// without one.
pub const LANDING_LOCATION_TIMEOUT: Duration = Duration::from_secs(3);

pub const USER_AGENT: &str = "SurgeSense/1.0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} URL '{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("latitude and longitude must be given together")]
    PartialCoordinates,
    #[error("coordinates out of range: {0}")]
    CoordinatesOutOfRange(Coordinates),
    #[error("tile URL template must contain {{z}}, {{x}} and {{y}}: {0}")]
    InvalidTileTemplate(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: Url,
    pub geocoder_url: Url,
    pub tile_url: String,
    pub request_timeout: Duration,
    pub landing_location_timeout: Duration,
    pub location: LocationSource,
    pub location_delay: Duration,
    pub session_path: Option<PathBuf>,
    pub start_route: String,
}

impl ClientConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let backend_url = parse_url("backend", &args.backend_url)?;
        let geocoder_url = parse_url("geocoder", &args.geocoder_url)?;

        if !["{z}", "{x}", "{y}"].iter().all(|p| args.tile_url.contains(p)) {
            return Err(ConfigError::InvalidTileTemplate(args.tile_url.clone()));
        }

        let location = if args.deny_location {
            LocationSource::Denied
        } else {
            match (args.latitude, args.longitude) {
                (Some(lat), Some(lon)) => {
                    let coords = Coordinates::new(lat, lon);
                    if !coords.is_valid() {
                        return Err(ConfigError::CoordinatesOutOfRange(coords));
                    }
                    LocationSource::Fixed(coords)
                }
                (None, None) => LocationSource::Unavailable,
                _ => {
                    return Err(ConfigError::PartialCoordinates);
                }
            }
        };

        Ok(Self {
            backend_url,
            geocoder_url,
            tile_url: args.tile_url.clone(),
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            landing_location_timeout: LANDING_LOCATION_TIMEOUT,
            location,
            location_delay: Duration::from_millis(args.location_delay_ms),
            session_path: if args.memory_session {
                None
            } else {
                Some(PathBuf::from(&args.session_path))
            },
            start_route: args.start_route.clone(),
        })
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        source,
    })
}
