use super::{ Assistant, Backend, ClientError, ReverseGeocoder };
use crate::models::api::{ AssistantRequest, LoginReply, LoginRequest };
use crate::models::place::{ Coordinates, MedicalPlace, PlaceCategory };
use crate::models::weather::WeatherSnapshot;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Arc;
use tokio::sync::{ Mutex, Notify, Semaphore };

/// Scripted outcome for one fake call.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Ok(T),
    Rejected(String),
    Unreachable,
}

impl<T: Clone> Scripted<T> {
    fn resolve(&self) -> Result<T, ClientError> {
        match self {
            Scripted::Ok(value) => Ok(value.clone()),
            Scripted::Rejected(message) => Err(ClientError::rejected(Some(message.clone()))),
            Scripted::Unreachable => Err(ClientError::Unreachable("scripted outage".to_string())),
        }
    }
}

/// In-process backend double. Assistant calls echo the question unless a
/// reply is queued; every call is counted.
pub struct FakeBackend {
    pub assistant_replies: Mutex<VecDeque<Scripted<String>>>,
    pub places: Mutex<Scripted<Vec<MedicalPlace>>>,
    pub weather: Mutex<Scripted<WeatherSnapshot>>,
    pub login: Mutex<Scripted<LoginReply>>,
    pub asked: Mutex<Vec<(Assistant, AssistantRequest)>>,
    pub logins: Mutex<Vec<LoginRequest>>,
    pub ask_calls: AtomicUsize,
    pub nearby_calls: AtomicUsize,
    pub weather_calls: AtomicUsize,
    /// When set, each assistant call waits for one permit before answering.
    pub gate: Option<Arc<Semaphore>>,
    /// Signalled whenever an assistant call arrives.
    pub arrived: Notify,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            assistant_replies: Mutex::new(VecDeque::new()),
            places: Mutex::new(Scripted::Ok(Vec::new())),
            weather: Mutex::new(
                Scripted::Ok(WeatherSnapshot {
                    temperature_c: 25.0,
                    humidity_percent: 60.0,
                    description: "clear sky".to_string(),
                })
            ),
            login: Mutex::new(Scripted::Rejected("Invalid email or password".to_string())),
            asked: Mutex::new(Vec::new()),
            logins: Mutex::new(Vec::new()),
            ask_calls: AtomicUsize::new(0),
            nearby_calls: AtomicUsize::new(0),
            weather_calls: AtomicUsize::new(0),
            gate: None,
            arrived: Notify::new(),
        }
    }
}

impl FakeBackend {
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (Self { gate: Some(gate.clone()), ..Self::default() }, gate)
    }

    pub async fn queue_reply(&self, reply: Scripted<String>) {
        self.assistant_replies.lock().await.push_back(reply);
    }

    pub async fn set_places(&self, places: Scripted<Vec<MedicalPlace>>) {
        *self.places.lock().await = places;
    }

    pub async fn set_login(&self, login: Scripted<LoginReply>) {
        *self.login.lock().await = login;
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn place(name: &str, category: &str, latitude: f64, longitude: f64) -> MedicalPlace {
    MedicalPlace {
        name: name.to_string(),
        latitude,
        longitude,
        category: PlaceCategory::from(category.to_string()),
        address: "Address not available".to_string(),
    }
}

pub fn login_reply(role: &str) -> LoginReply {
    LoginReply {
        success: true,
        message: Some(format!("Successfully logged in as {}", role)),
        role: Some(role.to_string()),
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn ask(
        &self,
        assistant: Assistant,
        request: &AssistantRequest
    ) -> Result<String, ClientError> {
        self.ask_calls.fetch_add(1, Ordering::SeqCst);
        self.asked.lock().await.push((assistant, request.clone()));
        self.arrived.notify_one();
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        match self.assistant_replies.lock().await.pop_front() {
            Some(scripted) => scripted.resolve(),
            None => Ok(format!("echo: {}", request.message)),
        }
    }

    async fn nearby_medical(&self, _at: Coordinates) -> Result<Vec<MedicalPlace>, ClientError> {
        self.nearby_calls.fetch_add(1, Ordering::SeqCst);
        self.places.lock().await.resolve()
    }

    async fn weather(&self, _at: Coordinates) -> Result<WeatherSnapshot, ClientError> {
        self.weather_calls.fetch_add(1, Ordering::SeqCst);
        self.weather.lock().await.resolve()
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, ClientError> {
        self.logins.lock().await.push(request.clone());
        self.login.lock().await.resolve()
    }
}

pub struct FakeGeocoder {
    pub label: Scripted<String>,
}

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn locality(&self, _at: Coordinates) -> Result<String, ClientError> {
        self.label.resolve()
    }
}
