use super::{ with_trailing_slash, ClientError };
use crate::config::USER_AGENT;
use crate::models::api::ReverseGeocodeReply;
use crate::models::place::Coordinates;
use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use std::time::Duration;
use url::Url;

/// Label shown when the locality lookup fails.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Human readable "City, Country" label for a position.
    async fn locality(&self, at: Coordinates) -> Result<String, ClientError>;
}

/// Keyless reverse lookup against a Nominatim instance.
pub struct NominatimGeocoder {
    http: HttpClient,
    base_url: Url,
}

impl NominatimGeocoder {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::builder().timeout(timeout).user_agent(USER_AGENT).build()?,
            base_url: with_trailing_slash(base_url),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn locality(&self, at: Coordinates) -> Result<String, ClientError> {
        let url = self.base_url.join("reverse")?;
        debug!("Reverse geocoding {} via {}", at, url);
        let reply = self.http
            .get(url)
            .query(
                &[
                    ("lat", at.latitude.to_string()),
                    ("lon", at.longitude.to_string()),
                    ("format", "json".to_string()),
                ]
            )
            .send().await?
            .error_for_status()?
            .json::<ReverseGeocodeReply>().await?;
        Ok(locality_label(&reply))
    }
}

pub fn locality_label(reply: &ReverseGeocodeReply) -> String {
    let address = reply.address.clone().unwrap_or_default();
    let city = address.city
        .or(address.town)
        .or(address.village)
        .unwrap_or_else(|| "Unknown City".to_string());
    let country = address.country.unwrap_or_default();
    format!("{}, {}", city, country)
}
