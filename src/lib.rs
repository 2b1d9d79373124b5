pub mod backend;
pub mod chat;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod geo;
pub mod map;
pub mod markdown;
pub mod models;
pub mod pages;
pub mod router;
pub mod session;
pub mod terminal;
#[cfg(test)]
mod testing;

use cli::Args;
use config::ClientConfig;
use context::AppContext;
use log::info;
use std::error::Error;
use std::io::IsTerminal;
use terminal::Shell;
use tokio::io::BufReader;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = ClientConfig::from_args(&args)?;

    info!("--- Client Configuration ---");
    info!("Backend URL: {}", config.backend_url);
    info!("Geocoder URL: {}", config.geocoder_url);
    info!("Tile URL: {}", config.tile_url);
    info!("Request Timeout: {:?}", config.request_timeout);
    info!("Location Source: {:?}", config.location);
    info!("Landing Location Timeout: {:?}", config.landing_location_timeout);
    match &config.session_path {
        Some(path) => info!("Session Path: {}", path.display()),
        None => info!("Session Path: (memory)"),
    }
    info!("Start Route: {}", config.start_route);
    info!("----------------------------");

    let ctx = AppContext::from_config(config)?;
    let stdout = std::io::stdout();
    let ansi = stdout.is_terminal();
    let mut shell = Shell::new(ctx, stdout.lock(), ansi);
    shell.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
