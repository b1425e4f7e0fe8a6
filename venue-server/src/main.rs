use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use venue_server::availability::HashedOracle;
use venue_server::cache::CachedProvider;
use venue_server::config::ServerConfig;
use venue_server::places::{MockPlacesProvider, PlacesClient, PlacesConfig};
use venue_server::reservations::ReservationStore;
use venue_server::web::{AppState, VenueDirectory, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("venue_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Create venue directory
    let directory = match &config.places_api_key {
        Some(key) => {
            let mut places_config = PlacesConfig::new(key);
            if let Some(url) = &config.places_base_url {
                places_config = places_config.with_base_url(url);
            }
            info!(base_url = %places_config.base_url, "using Places API");
            VenueDirectory::Live(PlacesClient::new(places_config)?)
        }
        None => {
            warn!(
                dir = %config.mock_places_dir.display(),
                "PLACES_API_KEY not set, serving venues from fixtures"
            );
            let mock = MockPlacesProvider::new(&config.mock_places_dir)?;
            info!(sports = ?mock.sports(), "loaded mock venues");
            VenueDirectory::Mock(mock)
        }
    };

    let state = AppState::new(
        CachedProvider::new(directory, &config.cache),
        ReservationStore::new(),
        HashedOracle::default(),
        config.search.clone(),
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "venue search listening");
    info!("  GET  /health                     - Health check");
    info!("  POST /search                     - Search and rank venues");
    info!("  POST /reservations               - Book a slot");
    info!("  GET  /reservations/:id           - Look up a booking");
    info!("  POST /reservations/:id/confirm   - Confirm a booking");
    info!("  POST /reservations/:id/cancel    - Cancel a booking");

    axum::serve(listener, app).await?;
    Ok(())
}
