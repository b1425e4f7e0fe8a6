//! Application state for the web layer.

use std::sync::Arc;

use crate::availability::HashedOracle;
use crate::cache::CachedProvider;
use crate::places::{MockPlacesProvider, PlacesClient};
use crate::reservations::ReservationStore;
use crate::search::{CandidatePage, CandidateProvider, ProviderError, SearchConfig, SearchFilters};

/// Width requested for venue photos.
const PHOTO_MAX_WIDTH: u32 = 400;

/// Where venues come from.
pub enum VenueDirectory {
    /// The live Places API
    Live(PlacesClient),
    /// JSON fixtures on disk
    Mock(MockPlacesProvider),
}

impl VenueDirectory {
    /// Photo URL for a directory photo reference. Fixtures have no photos
    /// to serve.
    pub fn photo_url(&self, photo_reference: &str) -> Option<String> {
        match self {
            VenueDirectory::Live(client) => {
                Some(client.photo_url(photo_reference, PHOTO_MAX_WIDTH))
            }
            VenueDirectory::Mock(_) => None,
        }
    }
}

impl CandidateProvider for VenueDirectory {
    async fn search(
        &self,
        sport: &str,
        location: &str,
        filters: &SearchFilters,
    ) -> Result<CandidatePage, ProviderError> {
        match self {
            VenueDirectory::Live(client) => client.search(sport, location, filters).await,
            VenueDirectory::Mock(mock) => mock.search(sport, location, filters).await,
        }
    }
}

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached venue directory
    pub directory: Arc<CachedProvider<VenueDirectory>>,

    /// Reservations, also consulted for slot conflicts
    pub reservations: ReservationStore,

    /// Availability check for venues without a booking integration
    pub oracle: HashedOracle,

    /// Venue search configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        directory: CachedProvider<VenueDirectory>,
        reservations: ReservationStore,
        oracle: HashedOracle,
        config: SearchConfig,
    ) -> Self {
        Self {
            directory: Arc::new(directory),
            reservations,
            oracle,
            config: Arc::new(config),
        }
    }
}
