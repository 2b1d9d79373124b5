use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Base URL every backend call is issued against.
    #[arg(long, env = "BACKEND_URL", default_value = "http://127.0.0.1:8000")]
    pub backend_url: String,

    /// Seconds to wait for any single backend response before treating it as unavailable.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- External Services Args ---
    /// Reverse geocoding service used for the dashboard location card (Nominatim compatible).
    #[arg(long, env = "GEOCODER_URL", default_value = "https://nominatim.openstreetmap.org")]
    pub geocoder_url: String,

    /// Map tile URL template with {z}, {x} and {y} placeholders.
    #[arg(long, env = "TILE_URL", default_value = "https://tile.openstreetmap.org/{z}/{x}/{y}.png")]
    pub tile_url: String,

    // --- Location Args ---
    /// Latitude reported by the location lookup. Requires --longitude.
    #[arg(long, env = "LATITUDE", allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Longitude reported by the location lookup. Requires --latitude.
    #[arg(long, env = "LONGITUDE", allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Refuse location permission, as a user clicking "Block" would.
    #[arg(long, env = "DENY_LOCATION", default_value = "false")]
    pub deny_location: bool,

    /// Artificial delay before the location lookup answers, in milliseconds.
    #[arg(long, env = "LOCATION_DELAY_MS", default_value = "0")]
    pub location_delay_ms: u64,

    // --- Session Args ---
    /// File the logged-in role is persisted in.
    #[arg(long, env = "SESSION_PATH", default_value = ".surgesense/session.json")]
    pub session_path: String,

    /// Keep the session in memory only; nothing is written to disk.
    #[arg(long, env = "MEMORY_SESSION", default_value = "false")]
    pub memory_session: bool,

    // --- General App Args ---
    /// Route the shell opens on (/, /login, /citizen, /hospital).
    #[arg(long, env = "START_ROUTE", default_value = "/")]
    pub start_route: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
