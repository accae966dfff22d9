use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

pub const OMDB_BASE: &str = "https://www.omdbapi.com/";
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);
const BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 3000);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Reads `OMDB_API_KEY` once. A missing key is logged and left as `None`;
    /// every catalog call then degrades to an empty result.
    pub fn from_env() -> Self {
        let api_key = env::var("OMDB_API_KEY").ok().filter(|k| !k.trim().is_empty());
        match api_key {
            Some(_) => info!("OMDB_API_KEY is set"),
            None => warn!("OMDB_API_KEY is not set - movie data will be unavailable"),
        }
        Self::with_api_key(api_key)
    }

    pub fn with_api_key(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: OMDB_BASE.to_string(),
            timeout: REQUEST_TIMEOUT,
            bind_addr: SocketAddr::from(BIND_ADDR),
        }
    }
}
