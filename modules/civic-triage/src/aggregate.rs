use civic_common::{GeoPoint, Report};
use serde::Serialize;

use crate::error::{Result, TriageError};

/// Summary statistics for a group of reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAggregate {
    /// Arithmetic mean of member latitudes and longitudes.
    pub center: GeoPoint,
    /// Largest distance in km from `center` to any member.
    pub radius: f64,
    pub count: usize,
    pub top_upvotes: u32,
}

/// Compute centroid, spread, and peak upvotes for a non-empty set of reports.
///
/// The centroid is a plain mean of degrees, which is fine at neighbourhood
/// scale but not across the antimeridian.
pub fn aggregate(members: &[Report]) -> Result<ClusterAggregate> {
    if members.is_empty() {
        return Err(TriageError::EmptyCluster);
    }

    let n = members.len() as f64;
    let (lat_sum, lng_sum) = members
        .iter()
        .fold((0.0, 0.0), |(lat, lng), r| (lat + r.latitude, lng + r.longitude));
    let center = GeoPoint::new(lat_sum / n, lng_sum / n);

    let radius = members
        .iter()
        .map(|r| center.distance_km(&r.location()))
        .fold(0.0_f64, f64::max);

    let top_upvotes = members.iter().map(|r| r.upvotes).max().unwrap_or(0);

    Ok(ClusterAggregate {
        center,
        radius,
        count: members.len(),
        top_upvotes,
    })
}
