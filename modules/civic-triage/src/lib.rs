//! Triage engine for civic issue reports.
//!
//! Everything here is a pure function of its input: reports go in, fresh
//! clusters or rankings come out, and nothing is retained between calls.

pub mod aggregate;
pub mod clustering;
pub mod error;
pub mod priority;

pub use aggregate::{aggregate, ClusterAggregate};
pub use clustering::{
    cluster_reports, group_by_location, group_by_location_and_title, ClusterPredicate,
    LocationCluster,
};
pub use error::{Result, TriageError};
pub use priority::{
    priority_score, rank_priority, rank_priority_at, PriorityRanking, ScoredReport, PRIORITY_LIMIT,
};
