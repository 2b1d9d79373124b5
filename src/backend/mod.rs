mod geocode;
mod http;
#[cfg(test)]
pub mod fake;

pub use geocode::{ locality_label, NominatimGeocoder, ReverseGeocoder, UNKNOWN_LOCATION };
pub use http::HttpBackend;

use crate::error::ErrorKind;
use crate::models::api::{ AssistantRequest, LoginReply, LoginRequest };
use crate::models::place::{ Coordinates, MedicalPlace };
use crate::models::weather::WeatherSnapshot;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend rejected the request: {message}")]
    Rejected {
        message: String,
    },
}

impl ClientError {
    pub fn rejected(message: Option<String>) -> Self {
        ClientError::Rejected {
            message: message.unwrap_or_else(|| "no reason given".to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Rejected { .. } => ErrorKind::BackendRejected,
            _ => ErrorKind::BackendUnavailable,
        }
    }
}

/// `Url::join` drops the last path segment unless the base ends in a slash.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// The two AI personas the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assistant {
    /// Structured, weather-aware guidance for logged-in citizens. Replies are markdown.
    Citizen,
    /// Short wellness tips for anonymous visitors. Replies are plain text.
    Landing,
}

impl Assistant {
    pub fn route(&self) -> &'static str {
        match self {
            Assistant::Citizen => "/citizenai",
            Assistant::Landing => "/landingai",
        }
    }
}

impl fmt::Display for Assistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assistant::Citizen => write!(f, "citizen"),
            Assistant::Landing => write!(f, "landing"),
        }
    }
}

/// Everything the client asks of the SurgeSense backend. A reply carrying
/// `success: false` comes back as `ClientError::Rejected`.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn ask(
        &self,
        assistant: Assistant,
        request: &AssistantRequest
    ) -> Result<String, ClientError>;

    async fn nearby_medical(&self, at: Coordinates) -> Result<Vec<MedicalPlace>, ClientError>;

    async fn weather(&self, at: Coordinates) -> Result<WeatherSnapshot, ClientError>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, ClientError>;
}
