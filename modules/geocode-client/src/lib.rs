pub mod cache;
pub mod error;
pub mod format;
pub mod types;

pub use cache::LocationNameCache;
pub use error::{GeocodeError, Result};
pub use format::{describe, format_address, format_coordinates, location_label};
pub use types::{Address, ReverseResponse};

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("civic-reports/", env!("CARGO_PKG_VERSION"));

/// Turns coordinates into a place name.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<String>;
}

/// Reverse geocoding against an OpenStreetMap Nominatim instance.
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<String> {
        let endpoint = format!("{}/reverse", self.base_url);
        let resp = self
            .client
            .get(&endpoint)
            .query(&[
                ("format", "json".to_string()),
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .header("Accept-Language", "en")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ReverseResponse = resp.json().await?;
        Ok(describe(&body, lat, lng))
    }
}

/// Wraps a [`Geocoder`] with a [`LocationNameCache`] and never fails:
/// lookups that error fall back to formatted coordinates, uncached.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: LocationNameCache,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G, cache: LocationNameCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &LocationNameCache {
        &self.cache
    }

    pub async fn location_name(&self, lat: f64, lng: f64) -> String {
        if let Some(name) = self.cache.get(lat, lng).await {
            debug!(lat, lng, "Location name cache hit");
            return name;
        }

        match self.inner.reverse(lat, lng).await {
            Ok(name) => {
                self.cache.insert(lat, lng, name.clone()).await;
                name
            }
            Err(e) => {
                warn!(lat, lng, error = %e, "Reverse geocoding failed, using coordinates");
                format_coordinates(lat, lng)
            }
        }
    }
}
