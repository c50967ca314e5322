//! Greedy proximity clustering of reports.
//!
//! Membership is always tested against the cluster's seed report, never
//! against the running centroid. A chain of reports each 1.5 km apart with a
//! 2 km radius therefore splits into several clusters instead of merging into
//! one long one. This is not DBSCAN and should not be "fixed" into it: the
//! output, including cluster ids, depends on input order.

use civic_common::{GeoPoint, Report};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::aggregate;
use crate::error::{Result, TriageError};

/// Decides whether a candidate joins a seed's cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterPredicate {
    /// Within `radius_km` of the seed.
    #[default]
    Location,
    /// Within `radius_km` of the seed and the same title, ignoring case and
    /// surrounding whitespace.
    LocationAndTitle,
}

/// Reports judged to be at the same physical place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCluster {
    /// `cluster-<seed report id>`.
    pub id: String,
    pub center: GeoPoint,
    /// Actual spread in km from `center`, not the admission radius.
    pub radius: f64,
    /// Members, most upvoted first.
    pub issues: Vec<Report>,
    pub count: usize,
    pub top_upvotes: u32,
}

/// Group by distance from the seed only.
pub fn group_by_location(reports: &[Report], radius_km: f64) -> Result<Vec<LocationCluster>> {
    cluster_reports(reports, radius_km, ClusterPredicate::Location)
}

/// Group by distance from the seed plus matching title.
pub fn group_by_location_and_title(
    reports: &[Report],
    radius_km: f64,
) -> Result<Vec<LocationCluster>> {
    cluster_reports(reports, radius_km, ClusterPredicate::LocationAndTitle)
}

/// Partition `reports` into clusters, ordered by their top member's upvotes.
///
/// Every report lands in exactly one cluster. Two reports exactly `radius_km`
/// apart are grouped together. Coordinates are validated up front so a NaN
/// can never leak into the distance comparisons.
pub fn cluster_reports(
    reports: &[Report],
    radius_km: f64,
    predicate: ClusterPredicate,
) -> Result<Vec<LocationCluster>> {
    if !(radius_km.is_finite() && radius_km > 0.0) {
        return Err(TriageError::InvalidRadius(radius_km));
    }
    if let Some(bad) = reports.iter().find(|r| !r.location().is_valid()) {
        return Err(TriageError::InvalidCoordinate {
            id: bad.id.clone(),
            latitude: bad.latitude,
            longitude: bad.longitude,
        });
    }

    let titles: Vec<String> = match predicate {
        ClusterPredicate::LocationAndTitle => {
            reports.iter().map(Report::normalized_title).collect()
        }
        ClusterPredicate::Location => Vec::new(),
    };

    // Tracked by position so repeated ids still partition cleanly.
    let mut processed = vec![false; reports.len()];
    let mut clusters = Vec::new();

    for (seed_idx, seed) in reports.iter().enumerate() {
        if processed[seed_idx] {
            continue;
        }
        processed[seed_idx] = true;
        let mut members = vec![seed.clone()];

        for (idx, other) in reports.iter().enumerate().skip(seed_idx + 1) {
            if processed[idx] {
                continue;
            }
            let near = haversine_between(seed, other) <= radius_km;
            let joins = match predicate {
                ClusterPredicate::Location => near,
                ClusterPredicate::LocationAndTitle => near && titles[seed_idx] == titles[idx],
            };
            if joins {
                members.push(other.clone());
                processed[idx] = true;
            }
        }

        members.sort_by(|a, b| b.upvotes.cmp(&a.upvotes));
        let summary = aggregate(&members)?;
        debug_assert_eq!(summary.count, members.len());

        debug!(
            seed = %seed.id,
            count = summary.count,
            radius_km = summary.radius,
            "Formed cluster"
        );

        clusters.push(LocationCluster {
            id: format!("cluster-{}", seed.id),
            center: summary.center,
            radius: summary.radius,
            issues: members,
            count: summary.count,
            top_upvotes: summary.top_upvotes,
        });
    }

    clusters.sort_by(|a, b| b.top_upvotes.cmp(&a.top_upvotes));

    debug!(
        reports = reports.len(),
        clusters = clusters.len(),
        radius_km,
        ?predicate,
        "Clustered reports"
    );
    Ok(clusters)
}

fn haversine_between(a: &Report, b: &Report) -> f64 {
    a.location().distance_km(&b.location())
}
