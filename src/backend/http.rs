use super::{ with_trailing_slash, Assistant, Backend, ClientError };
use crate::config::USER_AGENT;
use crate::models::api::{
    AssistantReply,
    AssistantRequest,
    LoginReply,
    LoginRequest,
    NearbyReply,
    WeatherReply,
};
use crate::models::place::{ Coordinates, MedicalPlace };
use crate::models::weather::WeatherSnapshot;
use async_trait::async_trait;
use log::{ debug, info };
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// The one shared HTTP client. Every backend route is resolved against the
/// same base URL.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: HttpClient,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        let http = HttpClient::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(route.trim_start_matches('/'))?)
    }

    async fn post_json<B, R>(&self, route: &str, body: &B) -> Result<R, ClientError>
        where B: Serialize + ?Sized + Sync, R: DeserializeOwned
    {
        let url = self.endpoint(route)?;
        debug!("POST {}", url);
        let resp = self.http.post(url).json(body).send().await?.error_for_status()?;
        Ok(resp.json::<R>().await?)
    }

    async fn get_at<R: DeserializeOwned>(
        &self,
        route: &str,
        at: Coordinates
    ) -> Result<R, ClientError> {
        let url = self.endpoint(route)?;
        debug!("GET {} at {}", url, at);
        let resp = self.http
            .get(url)
            .query(&[("lat", at.latitude), ("lon", at.longitude)])
            .send().await?
            .error_for_status()?;
        Ok(resp.json::<R>().await?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn ask(
        &self,
        assistant: Assistant,
        request: &AssistantRequest
    ) -> Result<String, ClientError> {
        info!("Asking {} assistant ({} chars)", assistant, request.message.len());
        let reply: AssistantReply = self.post_json(assistant.route(), request).await?;
        match (reply.success, reply.response) {
            (true, Some(text)) => Ok(text),
            (true, None) => Err(ClientError::rejected(Some("reply without response text".into()))),
            (false, _) => Err(ClientError::rejected(reply.message)),
        }
    }

    async fn nearby_medical(&self, at: Coordinates) -> Result<Vec<MedicalPlace>, ClientError> {
        let reply: NearbyReply = self.get_at("/nearby-medical", at).await?;
        if !reply.success {
            return Err(ClientError::rejected(reply.message));
        }
        info!("Found {} medical facilities near {}", reply.places.len(), at);
        Ok(reply.places)
    }

    async fn weather(&self, at: Coordinates) -> Result<WeatherSnapshot, ClientError> {
        let reply: WeatherReply = self.get_at("/weather", at).await?;
        match (reply.success, reply.weather) {
            (true, Some(weather)) => Ok(weather),
            _ => Err(ClientError::rejected(reply.message)),
        }
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, ClientError> {
        info!("Login request started for {}", request.email);
        let reply: LoginReply = self.post_json("/login", request).await?;
        if !reply.success {
            return Err(ClientError::rejected(reply.message));
        }
        Ok(reply)
    }
}
