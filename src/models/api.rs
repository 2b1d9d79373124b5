//! Request and response bodies exchanged with the SurgeSense backend.
//!
//! Every reply carries a `success` flag. Failure replies usually only add a
//! `message`, so all payload fields are optional on the way in.

use serde::{ Deserialize, Serialize };
use super::place::MedicalPlace;
use super::weather::WeatherSnapshot;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssistantReply {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NearbyReply {
    pub success: bool,
    #[serde(default)]
    pub places: Vec<MedicalPlace>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeatherReply {
    pub success: bool,
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Subset of a Nominatim reverse lookup the dashboard needs.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReverseGeocodeReply {
    #[serde(default)]
    pub address: Option<GeocodeAddress>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GeocodeAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub country: Option<String>,
}
