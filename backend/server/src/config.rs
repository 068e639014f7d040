use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub geocoding_base_url: String,
    pub geocoding_user_agent: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "4000"),
            geocoding_base_url: try_load(
                "GEOCODING_BASE_URL",
                "https://nominatim.openstreetmap.org/search",
            ),
            geocoding_user_agent: try_load(
                "GEOCODING_USER_AGENT",
                "EntreLibros/1.0 (geocoding@entrelibros)",
            ),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
