use serde::{ Deserialize, Serialize };
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Facility kind as reported by the nearby search. Anything that is not a
/// hospital, clinic or pharmacy keeps its raw tag under `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlaceCategory {
    Hospital,
    Clinic,
    Pharmacy,
    Other(String),
}

impl From<String> for PlaceCategory {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "hospital" => PlaceCategory::Hospital,
            "clinic" => PlaceCategory::Clinic,
            "pharmacy" => PlaceCategory::Pharmacy,
            _ => PlaceCategory::Other(raw),
        }
    }
}

impl From<PlaceCategory> for String {
    fn from(category: PlaceCategory) -> Self {
        category.to_string()
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceCategory::Hospital => write!(f, "hospital"),
            PlaceCategory::Clinic => write!(f, "clinic"),
            PlaceCategory::Pharmacy => write!(f, "pharmacy"),
            PlaceCategory::Other(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedicalPlace {
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "type")]
    pub category: PlaceCategory,
    #[serde(default = "default_address")]
    pub address: String,
}

fn default_address() -> String {
    "Address not available".to_string()
}

impl MedicalPlace {
    pub fn position(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
