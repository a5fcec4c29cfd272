use std::env;
use std::time::Duration;

use crate::error::{invalid_input_error, Error};

const DEFAULT_GOOGLE_MAPS_API_BASE: &str = "maps.googleapis.com";
const DEFAULT_RESOLVER_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_SUBMIT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub google_maps_api_base: String,
    pub google_maps_api_key: String,
    pub resolver_timeout: Duration,
    pub submit_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the environment, loading a `.env` file
    /// first when one is present.
    #[tracing::instrument]
    pub fn from_env() -> Result<Self, Error> {
        if let Err(err) = dotenv::dotenv() {
            tracing::debug!("no .env file loaded: {}", err);
        }

        let api_url = env::var("ITINERA_API_URL")?;
        let google_maps_api_key = env::var("GOOGLE_MAPS_API_KEY")?;
        let google_maps_api_base = env::var("GOOGLE_MAPS_API_BASE")
            .unwrap_or_else(|_| DEFAULT_GOOGLE_MAPS_API_BASE.into());

        Ok(Self {
            api_url: api_url.trim_end_matches('/').into(),
            google_maps_api_base,
            google_maps_api_key,
            resolver_timeout: millis_var("ITINERA_RESOLVER_TIMEOUT_MS", DEFAULT_RESOLVER_TIMEOUT_MS)?,
            submit_timeout: millis_var("ITINERA_SUBMIT_TIMEOUT_MS", DEFAULT_SUBMIT_TIMEOUT_MS)?,
        })
    }
}

fn millis_var(name: &str, default: u64) -> Result<Duration, Error> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| invalid_input_error()),
        Err(env::VarError::NotPresent) => Ok(Duration::from_millis(default)),
        Err(err) => Err(err.into()),
    }
}
