use super::gate;
use crate::backend::UNKNOWN_LOCATION;
use crate::chat::{ ChatWidget, SendOutcome };
use crate::context::AppContext;
use crate::error::ErrorKind;
use crate::map::FacilityMap;
use crate::models::place::Coordinates;
use crate::models::weather::WeatherSnapshot;
use crate::router::Route;
use crate::session::Role;
use futures::join;
use log::{ error, info };

#[derive(Debug, Clone, PartialEq)]
pub enum LocationCard {
    Locating,
    Known {
        coords: Coordinates,
        locality: String,
    },
    Failed(ErrorKind),
}

/// Citizen home: live location, weather, nearby facilities and the health
/// assistant.
pub struct CitizenDashboard {
    location: LocationCard,
    weather: Option<WeatherSnapshot>,
    map: FacilityMap,
    chat: ChatWidget,
}

impl CitizenDashboard {
    pub fn open(ctx: &AppContext) -> Result<Self, Route> {
        gate::require_role(ctx.session.as_ref(), Role::Citizen)?;
        Ok(Self {
            location: LocationCard::Locating,
            weather: None,
            map: FacilityMap::new(
                ctx.backend.clone(),
                ctx.geolocator.clone(),
                ctx.config.tile_url.clone()
            ),
            chat: ChatWidget::citizen(ctx.backend.clone(), ctx.geolocator.clone()),
        })
    }

    /// Location card, map and chat each look up the position on their own and none waits on
    /// another; weather and locality start once the card has coordinates.
    pub async fn load(&mut self, ctx: &AppContext) {
        let ((location, weather), (), ()) = join!(
            load_surroundings(ctx),
            self.map.mount(),
            self.chat.mount()
        );
        self.location = location;
        self.weather = weather;
    }

    pub fn location(&self) -> &LocationCard {
        &self.location
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn map(&self) -> &FacilityMap {
        &self.map
    }

    pub fn chat(&self) -> &ChatWidget {
        &self.chat
    }

    pub async fn ask(&self, text: &str) -> SendOutcome {
        self.chat.send_message(text).await
    }

    pub fn logout(&self, ctx: &AppContext) -> Route {
        self.unmount();
        gate::logout(ctx.session.as_ref())
    }

    pub fn unmount(&self) {
        self.map.unmount();
        self.chat.unmount();
    }
}

async fn load_surroundings(ctx: &AppContext) -> (LocationCard, Option<WeatherSnapshot>) {
    let coords = match ctx.geolocator.current_position().await {
        Ok(coords) => coords,
        Err(e) => {
            error!("Location error: {}", e);
            return (LocationCard::Failed(e.kind()), None);
        }
    };
    info!("User location: {}", coords);

    let (weather, locality) = join!(fetch_weather(ctx, coords), fetch_locality(ctx, coords));
    (LocationCard::Known { coords, locality }, weather)
}

async fn fetch_weather(ctx: &AppContext, at: Coordinates) -> Option<WeatherSnapshot> {
    match ctx.backend.weather(at).await {
        Ok(weather) => Some(weather),
        Err(e) => {
            error!("Weather fetch error: {}", e);
            None
        }
    }
}

async fn fetch_locality(ctx: &AppContext, at: Coordinates) -> String {
    match ctx.geocoder.locality(at).await {
        Ok(label) => label,
        Err(e) => {
            error!("City name fetch error: {}", e);
            UNKNOWN_LOCATION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{ place, FakeBackend, Scripted };
    use crate::geo::FixedGeolocator;
    use crate::map::MapState;
    use crate::testing::{ context_at, context_with };
    use std::sync::Arc;

    #[tokio::test]
    async fn without_a_citizen_session_the_dashboard_redirects_and_fetches_nothing() {
        for role in [None, Some(Role::Hospital)] {
            let backend = Arc::new(FakeBackend::default());
            let ctx = context_with(backend.clone(), role);
            assert_eq!(CitizenDashboard::open(&ctx).err(), Some(Route::Login));
            assert_eq!(FakeBackend::calls(&backend.weather_calls), 0);
            assert_eq!(FakeBackend::calls(&backend.nearby_calls), 0);
        }
    }

    #[tokio::test]
    async fn load_fills_location_weather_map_and_chat() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_places(Scripted::Ok(vec![place("General", "hospital", 12.0, 56.0)])).await;
        let ctx = context_at(
            backend.clone(),
            FixedGeolocator::at(12.34, 56.78),
            Scripted::Ok("Pune, India".into()),
            Some(Role::Citizen)
        );

        let mut page = CitizenDashboard::open(&ctx).unwrap();
        assert_eq!(page.location(), &LocationCard::Locating);
        page.load(&ctx).await;

        assert_eq!(
            page.location(),
            &(LocationCard::Known {
                coords: Coordinates::new(12.34, 56.78),
                locality: "Pune, India".into(),
            })
        );
        assert_eq!(page.weather().map(|w| w.description.as_str()), Some("clear sky"));
        assert_eq!(page.map().markers().len(), 2);
        assert_eq!(page.chat().location(), Some(Coordinates::new(12.34, 56.78)));
        assert_eq!(FakeBackend::calls(&backend.weather_calls), 1);
    }

    #[tokio::test]
    async fn lookup_failures_degrade_to_placeholders() {
        let backend = Arc::new(FakeBackend::default());
        *backend.weather.lock().await = Scripted::Unreachable;
        let ctx = context_at(
            backend,
            FixedGeolocator::at(1.0, 2.0),
            Scripted::Unreachable,
            Some(Role::Citizen)
        );
        let mut page = CitizenDashboard::open(&ctx).unwrap();
        page.load(&ctx).await;

        assert!(page.weather().is_none());
        assert!(
            matches!(page.location(), LocationCard::Known { locality, .. } if locality == UNKNOWN_LOCATION)
        );
    }

    #[tokio::test]
    async fn denied_location_leaves_notices_everywhere() {
        let backend = Arc::new(FakeBackend::default());
        let ctx = context_at(
            backend.clone(),
            FixedGeolocator::denied(),
            Scripted::Ok("unused".into()),
            Some(Role::Citizen)
        );
        let mut page = CitizenDashboard::open(&ctx).unwrap();
        page.load(&ctx).await;

        assert_eq!(page.location(), &LocationCard::Failed(ErrorKind::LocationDenied));
        assert_eq!(page.map().state(), MapState::Error(ErrorKind::LocationDenied));
        assert_eq!(page.chat().location_notice(), Some(ErrorKind::LocationDenied));
        assert_eq!(FakeBackend::calls(&backend.weather_calls), 0);
        assert_eq!(FakeBackend::calls(&backend.nearby_calls), 0);
    }

    #[tokio::test]
    async fn logout_clears_session_and_returns_to_login() {
        let backend = Arc::new(FakeBackend::default());
        let ctx = context_with(backend, Some(Role::Citizen));
        let page = CitizenDashboard::open(&ctx).unwrap();
        assert_eq!(page.logout(&ctx), Route::Login);
        assert_eq!(ctx.session.read(), None);
        assert_eq!(CitizenDashboard::open(&ctx).err(), Some(Route::Login));
    }
}
