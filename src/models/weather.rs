use serde::{ Deserialize, Serialize };
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
    #[serde(rename = "humidity")]
    pub humidity_percent: f64,
    pub description: String,
}

impl fmt::Display for WeatherSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Temperature: {}°C | Humidity: {}% | Condition: {}",
            self.temperature_c,
            self.humidity_percent,
            self.description
        )
    }
}
