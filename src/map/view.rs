use crate::models::place::{ Coordinates, MedicalPlace, PlaceCategory };
use std::f64::consts::PI;

pub const DEFAULT_ZOOM: u8 = 14;
pub const ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Red,
    Blue,
    Green,
    /// The user's own position.
    Azure,
}

impl MarkerColor {
    pub fn for_category(category: &PlaceCategory) -> Self {
        match category {
            PlaceCategory::Hospital => MarkerColor::Red,
            PlaceCategory::Pharmacy => MarkerColor::Green,
            PlaceCategory::Clinic | PlaceCategory::Other(_) => MarkerColor::Blue,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            MarkerColor::Red => "#FF0000",
            MarkerColor::Blue => "#0000FF",
            MarkerColor::Green => "#00FF00",
            MarkerColor::Azure => "#007cbf",
        }
    }

    /// 256-colour terminal escape approximating `hex`.
    pub fn ansi(&self) -> &'static str {
        match self {
            MarkerColor::Red => "\x1b[38;5;196m",
            MarkerColor::Blue => "\x1b[38;5;21m",
            MarkerColor::Green => "\x1b[38;5;46m",
            MarkerColor::Azure => "\x1b[38;5;31m",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    User,
    Facility(PlaceCategory),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coordinates,
    pub color: MarkerColor,
    pub title: String,
    pub popup: Vec<String>,
}

pub fn legend() -> [(MarkerColor, &'static str); 3] {
    [
        (MarkerColor::Red, "Hospitals"),
        (MarkerColor::Blue, "Clinics"),
        (MarkerColor::Green, "Pharmacies"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    /// Web-mercator tile holding `at` at zoom `z`.
    pub fn containing(at: Coordinates, z: u8) -> Self {
        let n = f64::from(1u32 << z);
        let lat = at.latitude.clamp(-85.0511, 85.0511).to_radians();
        let x = ((at.longitude + 180.0) / 360.0) * n;
        let y = ((1.0 - lat.tan().asinh() / PI) / 2.0) * n;
        let max = (n as u32).saturating_sub(1);
        Self {
            z,
            x: (x.floor().max(0.0) as u32).min(max),
            y: (y.floor().max(0.0) as u32).min(max),
        }
    }

    pub fn url(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// Snapshot behind a ready map: who is looking and what is around them.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    user: Coordinates,
    places: Vec<MedicalPlace>,
    tile_template: String,
    zoom: u8,
}

impl MapView {
    pub fn new(user: Coordinates, places: Vec<MedicalPlace>, tile_template: String) -> Self {
        Self {
            user,
            places,
            tile_template,
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn center(&self) -> Coordinates {
        self.user
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn places(&self) -> &[MedicalPlace] {
        &self.places
    }

    pub fn center_tile_url(&self) -> String {
        TileCoord::containing(self.user, self.zoom).url(&self.tile_template)
    }

    pub fn markers(&self) -> Vec<Marker> {
        let mut markers = Vec::with_capacity(self.places.len() + 1);
        markers.push(Marker {
            kind: MarkerKind::User,
            position: self.user,
            color: MarkerColor::Azure,
            title: "Your Location".to_string(),
            popup: vec!["Your Location".to_string()],
        });
        markers.extend(
            self.places.iter().map(|place| Marker {
                kind: MarkerKind::Facility(place.category.clone()),
                position: place.position(),
                color: MarkerColor::for_category(&place.category),
                title: place.name.clone(),
                popup: vec![
                    place.name.clone(),
                    format!("Type: {}", place.category),
                    format!("Address: {}", place.address)
                ],
            })
        );
        markers
    }
}
