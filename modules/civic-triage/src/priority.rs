//! Urgency ranking for open reports.
//!
//! `score = upvotes * 2 + age_ms / 1_000_000`. Age grows by one point roughly
//! every 16.7 minutes, so a year-old report with one upvote outranks a fresh
//! one with ten. That trade-off is intended: long-ignored reports surface.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use civic_common::{Clock, Report};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, TriageError};

/// Reports shown on the priority board.
pub const PRIORITY_LIMIT: usize = 20;

const UPVOTE_WEIGHT: f64 = 2.0;
const AGE_DIVISOR_MS: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredReport {
    #[serde(flatten)]
    pub report: Report,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PriorityRanking {
    /// Highest score first. Order among exactly equal scores is not guaranteed.
    pub ranked: Vec<ScoredReport>,
    /// Open reports that could not be scored.
    pub skipped: Vec<TriageError>,
}

/// Score one report against a fixed `now`.
pub fn priority_score(report: &Report, now: DateTime<Utc>) -> Result<f64> {
    let created = parse_created_at(&report.created_at).ok_or_else(|| {
        TriageError::InvalidTimestamp {
            id: report.id.clone(),
            value: report.created_at.clone(),
        }
    })?;
    let age_ms = (now - created).num_milliseconds() as f64;
    Ok(f64::from(report.upvotes) * UPVOTE_WEIGHT + age_ms / AGE_DIVISOR_MS)
}

/// Top [`PRIORITY_LIMIT`] open, non-duplicate reports. Reads the clock once.
pub fn rank_priority(reports: &[Report], clock: &dyn Clock) -> PriorityRanking {
    rank_priority_at(reports, clock.now(), PRIORITY_LIMIT)
}

/// Rank open, non-duplicate reports by score as of `now`, keeping at most `limit`.
///
/// A report with an unparseable timestamp is moved to `skipped`; the rest of
/// the pass continues.
pub fn rank_priority_at(reports: &[Report], now: DateTime<Utc>, limit: usize) -> PriorityRanking {
    let mut ranking = PriorityRanking::default();

    for report in reports.iter().filter(|r| r.status.is_open() && !r.is_duplicate) {
        match priority_score(report, now) {
            Ok(score) => ranking.ranked.push(ScoredReport {
                report: report.clone(),
                score,
            }),
            Err(err) => {
                warn!(report_id = %report.id, error = %err, "Skipping report in priority ranking");
                ranking.skipped.push(err);
            }
        }
    }

    let qualifying = ranking.ranked.len();
    ranking.ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranking.ranked.truncate(limit);

    debug!(
        input = reports.len(),
        qualifying,
        returned = ranking.ranked.len(),
        skipped = ranking.skipped.len(),
        "Ranked priority reports"
    );
    ranking
}

/// RFC 3339 first, then a naive date-time or bare date read as UTC.
fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
