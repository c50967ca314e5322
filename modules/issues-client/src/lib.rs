pub mod error;

pub use error::{IssuesError, Result};

use std::time::Duration;

use civic_common::{Report, ReportStats, ReportStatus};
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct IssuesClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl IssuesClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Fetch every report known to the backend.
    pub async fn list_reports(&self) -> Result<Vec<Report>> {
        let req = self.authorized(self.client.get(self.url("issues")));
        let reports: Vec<Report> = send_json(req).await?;
        debug!(count = reports.len(), "Fetched reports");
        Ok(reports)
    }

    /// Move a report to a new status. Returns the updated report.
    pub async fn update_status(&self, report_id: &str, status: ReportStatus) -> Result<Report> {
        let body = serde_json::json!({ "status": status });
        let req = self
            .authorized(self.client.patch(self.url(&format!("issues/{report_id}/status"))))
            .json(&body);
        send_json(req).await
    }

    pub async fn delete_report(&self, report_id: &str) -> Result<()> {
        let req = self.authorized(self.client.delete(self.url(&format!("issues/{report_id}"))));
        let resp = req.send().await?;
        check_status(resp).await?;
        Ok(())
    }

    /// Per-status counts, computed from the full report list.
    pub async fn stats(&self) -> Result<ReportStats> {
        let reports = self.list_reports().await?;
        Ok(ReportStats::from_reports(&reports))
    }
}

async fn send_json<T: DeserializeOwned>(req: reqwest::RequestBuilder) -> Result<T> {
    let resp = req.send().await?;
    let resp = check_status(resp).await?;
    Ok(resp.json().await?)
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(IssuesError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}
