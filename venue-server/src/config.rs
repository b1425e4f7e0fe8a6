//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::search::SearchConfig;

/// Fixture directory used when no API key is configured.
const DEFAULT_MOCK_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/mock_places");

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,

    /// Places API key. The mock directory is used when absent.
    pub places_api_key: Option<String>,

    /// Override for the Places API base URL.
    pub places_base_url: Option<String>,

    pub mock_places_dir: PathBuf,

    pub search: SearchConfig,

    pub cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            places_api_key: None,
            places_base_url: None,
            mock_places_dir: PathBuf::from(DEFAULT_MOCK_DIR),
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns the value of an
    /// environment variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let mut config = Self {
            bind_addr: parse_var("VENUE_BIND_ADDR", get("VENUE_BIND_ADDR"))?
                .unwrap_or(defaults.bind_addr),
            places_api_key: get("PLACES_API_KEY"),
            places_base_url: get("PLACES_BASE_URL"),
            ..defaults
        };

        if let Some(dir) = get("MOCK_PLACES_DIR") {
            config.mock_places_dir = PathBuf::from(dir);
        }

        if let Some(n) = parse_var::<usize>("SEARCH_MAX_ATTEMPTS", get("SEARCH_MAX_ATTEMPTS"))? {
            config.search = config.search.with_max_attempts(n);
        }
        if let Some(ms) = parse_var::<u64>("SEARCH_PAGE_DELAY_MS", get("SEARCH_PAGE_DELAY_MS"))? {
            config.search = config.search.with_page_delay(Duration::from_millis(ms));
        }
        if let Some(secs) = parse_var::<u64>("SEARCH_DEADLINE_SECS", get("SEARCH_DEADLINE_SECS"))? {
            config.search = config.search.with_deadline(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Whether venues come from the fixture directory.
    pub fn uses_mock_places(&self) -> bool {
        self.places_api_key.is_none()
    }
}

fn parse_var<T>(var: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse().map_err(|e: T::Err| ConfigError {
                var,
                reason: e.to_string(),
                value: v,
            })
        })
        .transpose()
}
