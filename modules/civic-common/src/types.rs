use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CivicError;

// --- Geography ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside WGS-84 degree bounds.
    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.lat, self.lng)
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// True when both values are finite and within [-90, 90] / [-180, 180].
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

/// Haversine great-circle distance between two lat/lng points in kilometers.
///
/// Inputs are assumed to be valid WGS-84 degrees. Nothing is clamped: a NaN
/// coordinate yields a NaN distance, so validate with [`is_valid_coordinate`]
/// at the boundary.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

// --- Reports ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Archived,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Still waiting on an administrator.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = CivicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PENDING" => Ok(Self::Pending),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "RESOLVED" => Ok(Self::Resolved),
            "ARCHIVED" => Ok(Self::Archived),
            other => Err(CivicError::Validation(format!("unknown report status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: String,
    pub full_name: String,
}

/// A citizen report as served by the issues backend.
///
/// `upvotes` is the canonical engagement field; older payloads call it
/// `upvoteCount` and are accepted on input. `created_at` stays a raw string
/// so one malformed timestamp cannot fail a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub status: ReportStatus,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, alias = "upvoteCount")]
    pub upvotes: u32,
    #[serde(default)]
    pub is_duplicate: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_issue_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
}

impl Report {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Title as compared for duplicate matching: trimmed and lowercased.
    pub fn normalized_title(&self) -> String {
        self.title.trim().to_lowercase()
    }

    /// Parse a JSON array of reports.
    pub fn parse_list(json: &str) -> Result<Vec<Report>, CivicError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Per-status report counts for the dashboard summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub archived: usize,
}

impl ReportStats {
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut stats = Self {
            total: reports.len(),
            ..Self::default()
        };
        for report in reports {
            match report.status {
                ReportStatus::Pending => stats.pending += 1,
                ReportStatus::InProgress => stats.in_progress += 1,
                ReportStatus::Resolved => stats.resolved += 1,
                ReportStatus::Archived => stats.archived += 1,
            }
        }
        stats
    }
}
