use crate::backend::fake::{ FakeBackend, FakeGeocoder, Scripted };
use crate::cli::Args;
use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::geo::FixedGeolocator;
use crate::session::{ MemorySessionStore, Role, SessionStore };
use clap::Parser;
use std::sync::Arc;

pub fn test_config() -> ClientConfig {
    let args = Args::parse_from(["surgesense", "--memory-session"]);
    ClientConfig::from_args(&args).expect("default test config")
}

pub fn context_at(
    backend: Arc<FakeBackend>,
    geolocator: FixedGeolocator,
    locality: Scripted<String>,
    role: Option<Role>
) -> AppContext {
    let session: Arc<dyn SessionStore> = match role {
        Some(role) => Arc::new(MemorySessionStore::with_role(role)),
        None => Arc::new(MemorySessionStore::default()),
    };
    AppContext {
        config: test_config(),
        backend,
        geocoder: Arc::new(FakeGeocoder { label: locality }),
        geolocator: Arc::new(geolocator),
        session,
    }
}

/// Context positioned at (12.34, 56.78) with a working locality lookup.
pub fn context_with(backend: Arc<FakeBackend>, role: Option<Role>) -> AppContext {
    context_at(
        backend,
        FixedGeolocator::at(12.34, 56.78),
        Scripted::Ok("Pune, India".to_string()),
        role
    )
}
