use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use civic_common::{Clock, Config, Report, ReportStats, ReportStatus, SystemClock};
use civic_triage::{
    cluster_reports, rank_priority_at, ClusterPredicate, LocationCluster, PRIORITY_LIMIT,
};
use geocode_client::{CachedGeocoder, LocationNameCache, NominatimClient};
use issues_client::IssuesClient;

#[derive(Parser)]
#[command(name = "triage", version, about = "Cluster and prioritise civic issue reports")]
struct Cli {
    /// Read reports from a JSON array on disk instead of the issues API.
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Group reports that sit within a radius of each other.
    Clusters {
        /// Grouping radius in km (the dashboard offers 1, 2, 5 and 10).
        #[arg(long)]
        radius: Option<f64>,
        /// Only group reports that also share a title.
        #[arg(long)]
        match_title: bool,
        /// Label each cluster center with a reverse-geocoded place name.
        #[arg(long)]
        names: bool,
    },
    /// Open, non-duplicate reports ordered by urgency.
    Priority {
        #[arg(long, default_value_t = PRIORITY_LIMIT)]
        limit: usize,
    },
    /// Report counts per status.
    Stats,
    /// Move a report to a new status on the backend.
    SetStatus { id: String, status: ReportStatus },
    /// Delete a report on the backend.
    Delete { id: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NamedCluster {
    #[serde(flatten)]
    cluster: LocationCluster,
    location_name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs)?;

    let config = Config::from_env()?;
    config.log_redacted();

    match cli.command {
        Command::Clusters {
            radius,
            match_title,
            names,
        } => {
            let reports = load_reports(cli.file.as_deref(), &config).await?;
            let radius_km = radius.unwrap_or(config.default_radius_km);
            let predicate = if match_title {
                ClusterPredicate::LocationAndTitle
            } else {
                ClusterPredicate::Location
            };

            let clusters = cluster_reports(&reports, radius_km, predicate)?;
            info!(
                reports = reports.len(),
                clusters = clusters.len(),
                radius_km,
                "Clustered reports"
            );

            if names {
                let named = name_clusters(clusters, &config).await?;
                print_json(&named)?;
            } else {
                print_json(&clusters)?;
            }
        }
        Command::Priority { limit } => {
            let reports = load_reports(cli.file.as_deref(), &config).await?;
            let ranking = rank_priority_at(&reports, SystemClock.now(), limit);
            info!(
                ranked = ranking.ranked.len(),
                skipped = ranking.skipped.len(),
                "Ranked priority reports"
            );
            print_json(&ranking.ranked)?;
        }
        Command::Stats => {
            let reports = load_reports(cli.file.as_deref(), &config).await?;
            print_json(&ReportStats::from_reports(&reports))?;
        }
        Command::SetStatus { id, status } => {
            let client = issues_client(&config)?;
            let updated = client.update_status(&id, status).await?;
            info!(report_id = %updated.id, status = %updated.status, "Status updated");
            print_json(&updated)?;
        }
        Command::Delete { id } => {
            let client = issues_client(&config)?;
            client.delete_report(&id).await?;
            info!(report_id = %id, "Report deleted");
        }
    }

    Ok(())
}

/// Info-level targets for this binary and the workspace crates it drives.
const DEFAULT_LOG_DIRECTIVES: &[&str] = &[
    "triage=info",
    "civic_common=info",
    "civic_triage=info",
    "issues_client=info",
    "geocode_client=info",
];

/// `RUST_LOG` directives (if any) plus [`DEFAULT_LOG_DIRECTIVES`].
fn log_filter(rust_log: Option<&str>) -> Result<EnvFilter> {
    let mut filter = EnvFilter::builder().parse_lossy(rust_log.unwrap_or_default());
    for directive in DEFAULT_LOG_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

fn init_tracing(json: bool) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref())?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn issues_client(config: &Config) -> Result<IssuesClient> {
    IssuesClient::new(&config.api_url, config.api_token.as_deref())
        .context("Failed to build issues client")
}

async fn load_reports(file: Option<&Path>, config: &Config) -> Result<Vec<Report>> {
    match file {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let reports = Report::parse_list(&raw)
                .with_context(|| format!("Failed to parse reports in {}", path.display()))?;
            info!(count = reports.len(), path = %path.display(), "Loaded reports from file");
            Ok(reports)
        }
        None => {
            let reports = issues_client(config)?
                .list_reports()
                .await
                .context("Failed to fetch reports")?;
            info!(count = reports.len(), api = %config.api_url, "Loaded reports from API");
            Ok(reports)
        }
    }
}

async fn name_clusters(
    clusters: Vec<LocationCluster>,
    config: &Config,
) -> Result<Vec<NamedCluster>> {
    let ttl = i64::try_from(config.geocode_cache_ttl_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .context("GEOCODE_CACHE_TTL_SECS is out of range")?;
    let cache = LocationNameCache::new(config.geocode_cache_capacity, ttl, Arc::new(SystemClock));
    let geocoder = CachedGeocoder::new(NominatimClient::new(&config.nominatim_url)?, cache);

    let mut named = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        let location_name = geocoder
            .location_name(cluster.center.lat, cluster.center.lng)
            .await;
        named.push(NamedCluster {
            cluster,
            location_name,
        });
    }
    Ok(named)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
