//! CachedGeocoder behaviour with an in-memory geocoder (no network).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use civic_common::FixedClock;
use geocode_client::{CachedGeocoder, GeocodeError, Geocoder, LocationNameCache, Result};

/// Names every point "Place <n>" and counts calls. Fails when `fail` is set.
struct FakeGeocoder {
    calls: AtomicUsize,
    fail: bool,
}

impl FakeGeocoder {
    fn new(fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(GeocodeError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(format!("Place {n} ({lat:.6}, {lng:.6})"))
    }
}

fn cache() -> LocationNameCache {
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()));
    LocationNameCache::new(16, Duration::hours(24), clock)
}

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let geocoder = CachedGeocoder::new(FakeGeocoder::new(false), cache());

    let first = geocoder.location_name(44.97781, -93.26502).await;
    let second = geocoder.location_name(44.97781, -93.26502).await;

    assert_eq!(first, "Place 1 (44.977810, -93.265020)");
    assert_eq!(second, first);
    assert_eq!(geocoder.cache().len().await, 1);
}

#[tokio::test]
async fn distinct_points_each_hit_the_geocoder() {
    let geocoder = CachedGeocoder::new(FakeGeocoder::new(false), cache());
    let a = geocoder.location_name(1.0, 1.0).await;
    let b = geocoder.location_name(2.0, 2.0).await;
    assert!(a.starts_with("Place 1"));
    assert!(b.starts_with("Place 2"));
}

#[tokio::test]
async fn failures_fall_back_to_coordinates_and_are_not_cached() {
    let geocoder = CachedGeocoder::new(FakeGeocoder::new(true), cache());

    let name = geocoder.location_name(12.971598, 77.594566).await;
    assert_eq!(name, "12.9716, 77.5946");
    assert!(geocoder.cache().is_empty().await);

    // Retried on the next lookup rather than pinned to the fallback
    let _ = geocoder.location_name(12.971598, 77.594566).await;
    assert!(geocoder.cache().is_empty().await);
}
