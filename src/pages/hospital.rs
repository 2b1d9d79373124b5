use super::gate;
use crate::context::AppContext;
use crate::map::FacilityMap;
use crate::router::Route;
use crate::session::Role;

/// Staff view: the facility map around the hospital's position.
pub struct HospitalDashboard {
    map: FacilityMap,
}

impl HospitalDashboard {
    pub fn open(ctx: &AppContext) -> Result<Self, Route> {
        gate::require_role(ctx.session.as_ref(), Role::Hospital)?;
        Ok(Self {
            map: FacilityMap::new(
                ctx.backend.clone(),
                ctx.geolocator.clone(),
                ctx.config.tile_url.clone()
            ),
        })
    }

    pub async fn load(&self) {
        self.map.mount().await;
    }

    pub fn map(&self) -> &FacilityMap {
        &self.map
    }

    pub fn logout(&self, ctx: &AppContext) -> Route {
        self.unmount();
        gate::logout(ctx.session.as_ref())
    }

    pub fn unmount(&self) {
        self.map.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::map::MapState;
    use crate::testing::context_with;
    use std::sync::Arc;

    #[tokio::test]
    async fn without_a_session_the_dashboard_redirects_and_fetches_nothing() {
        let backend = Arc::new(FakeBackend::default());
        let ctx = context_with(backend.clone(), None);
        assert_eq!(HospitalDashboard::open(&ctx).err(), Some(Route::Login));
        assert_eq!(FakeBackend::calls(&backend.nearby_calls), 0);
    }

    #[tokio::test]
    async fn only_hospital_sessions_get_in() {
        let backend = Arc::new(FakeBackend::default());
        assert_eq!(
            HospitalDashboard::open(&context_with(backend.clone(), Some(Role::Citizen))).err(),
            Some(Route::Login)
        );

        let ctx = context_with(backend.clone(), Some(Role::Hospital));
        let page = HospitalDashboard::open(&ctx).unwrap();
        page.load().await;
        assert!(matches!(page.map().state(), MapState::Ready(_)));
        assert_eq!(page.logout(&ctx), Route::Login);
        assert_eq!(ctx.session.read(), None);
    }
}
