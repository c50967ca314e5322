use std::env;
use std::str::FromStr;

use crate::error::CivicError;

const DEFAULT_API_URL: &str = "http://localhost:3080/api";
const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Issues backend
    pub api_url: String,
    pub api_token: Option<String>,

    // Reverse geocoding
    pub nominatim_url: String,
    pub geocode_cache_capacity: usize,
    pub geocode_cache_ttl_secs: u64,

    // Clustering
    pub default_radius_km: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            geocode_cache_capacity: 1024,
            geocode_cache_ttl_secs: 24 * 60 * 60,
            default_radius_km: 2.0,
        }
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, CivicError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CivicError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            api_url: lookup("CIVIC_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            api_token: lookup("CIVIC_API_TOKEN").filter(|t| !t.is_empty()),
            nominatim_url: lookup("NOMINATIM_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.nominatim_url),
            geocode_cache_capacity: parse_or(
                &lookup,
                "GEOCODE_CACHE_CAPACITY",
                defaults.geocode_cache_capacity,
            )?,
            geocode_cache_ttl_secs: parse_or(
                &lookup,
                "GEOCODE_CACHE_TTL_SECS",
                defaults.geocode_cache_ttl_secs,
            )?,
            default_radius_km: parse_or(&lookup, "DEFAULT_RADIUS_KM", defaults.default_radius_km)?,
        };

        if !(config.default_radius_km.is_finite() && config.default_radius_km > 0.0) {
            return Err(CivicError::Config(format!(
                "DEFAULT_RADIUS_KM must be a positive number, got {}",
                config.default_radius_km
            )));
        }
        Ok(config)
    }

    /// Log config values with the API token redacted.
    pub fn log_redacted(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => {
                    let head: String = v.chars().take(5).collect();
                    format!("{head}...({} chars)", v.len())
                }
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  CIVIC_API_URL: {}", self.api_url);
        tracing::info!("  CIVIC_API_TOKEN: {}", preview_opt(&self.api_token));
        tracing::info!("  NOMINATIM_URL: {}", self.nominatim_url);
        tracing::info!(
            "  GEOCODE_CACHE: capacity={} ttl={}s",
            self.geocode_cache_capacity,
            self.geocode_cache_ttl_secs
        );
        tracing::info!("  DEFAULT_RADIUS_KM: {}", self.default_radius_km);
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, CivicError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CivicError::Config(format!("{key} is invalid ({raw:?}): {e}"))),
        None => Ok(default),
    }
}
