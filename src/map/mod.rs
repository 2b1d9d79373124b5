mod view;

pub use view::{ legend, MapView, Marker, MarkerColor, MarkerKind, TileCoord, ATTRIBUTION, DEFAULT_ZOOM };

use crate::backend::Backend;
use crate::error::ErrorKind;
use crate::geo::Geolocator;
use log::{ error, info, warn };
use std::sync::{ Arc, Mutex, MutexGuard, PoisonError };

#[derive(Debug, Clone, PartialEq)]
pub enum MapState {
    Loading,
    Error(ErrorKind),
    Ready(MapView),
}

/// Nearby-facility map. Goes Loading → Error or Loading → Ready exactly once;
/// a fresh `FacilityMap` is the only way back to Loading.
#[derive(Clone)]
pub struct FacilityMap {
    backend: Arc<dyn Backend>,
    geolocator: Arc<dyn Geolocator>,
    tile_template: String,
    state: Arc<Mutex<MapState>>,
    mounted: Arc<Mutex<bool>>,
}

impl FacilityMap {
    pub fn new(
        backend: Arc<dyn Backend>,
        geolocator: Arc<dyn Geolocator>,
        tile_template: impl Into<String>
    ) -> Self {
        Self {
            backend,
            geolocator,
            tile_template: tile_template.into(),
            state: Arc::new(Mutex::new(MapState::Loading)),
            mounted: Arc::new(Mutex::new(false)),
        }
    }

    fn mounted(&self) -> MutexGuard<'_, bool> {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: MapState) {
        if !*self.mounted() {
            info!("Map result arrived after unmount, dropped");
            return;
        }
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub fn state(&self) -> MapState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Locate once, then fetch once. Calling it again is a no-op.
    pub async fn mount(&self) {
        {
            let mut mounted = self.mounted();
            if *mounted || self.state() != MapState::Loading {
                return;
            }
            *mounted = true;
        }

        let user = match self.geolocator.current_position().await {
            Ok(coords) => {
                info!("User location obtained: {}", coords);
                coords
            }
            Err(e) => {
                warn!("Geolocation error: {}", e);
                self.set_state(MapState::Error(e.kind()));
                return;
            }
        };

        let places = match self.backend.nearby_medical(user).await {
            Ok(places) => places,
            Err(e) => {
                error!("Error fetching medical places: {}", e);
                Vec::new()
            }
        };
        self.set_state(MapState::Ready(MapView::new(user, places, self.tile_template.clone())));
    }

    pub fn unmount(&self) {
        *self.mounted() = false;
    }

    pub fn markers(&self) -> Vec<Marker> {
        match self.state() {
            MapState::Ready(view) => view.markers(),
            _ => Vec::new(),
        }
    }
}
