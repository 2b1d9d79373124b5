use crate::backend::{ Backend, ClientError, HttpBackend, NominatimGeocoder, ReverseGeocoder };
use crate::config::ClientConfig;
use crate::geo::{ FixedGeolocator, Geolocator };
use crate::session::{ create_session_store, SessionStore };
use log::info;
use std::sync::Arc;

/// Collaborators every page is built from. Handed down explicitly so a test
/// can swap any of them.
#[derive(Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub backend: Arc<dyn Backend>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub geolocator: Arc<dyn Geolocator>,
    pub session: Arc<dyn SessionStore>,
}

impl AppContext {
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let backend = HttpBackend::new(config.backend_url.clone(), config.request_timeout)?;
        info!("Backend client configured: BaseURL={}", backend.base_url());
        let geocoder = NominatimGeocoder::new(config.geocoder_url.clone(), config.request_timeout)?;
        let geolocator = FixedGeolocator::new(config.location.clone()).with_delay(
            config.location_delay
        );
        let session = create_session_store(&config);

        Ok(Self {
            config,
            backend: Arc::new(backend),
            geocoder: Arc::new(geocoder),
            geolocator: Arc::new(geolocator),
            session,
        })
    }
}
