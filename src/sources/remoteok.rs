//! RemoteOK public feed.

use std::time::Duration;

use applyflow_core_types::JobPosting;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::SourceError;

const API_BASE: &str = "https://remoteok.com/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct RemoteOkClient {
    client: Client,
}

impl RemoteOkClient {
    pub fn new() -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (compatible; applyflow/0.1)")
            .build()?;
        Ok(Self { client })
    }

    /// Fetch postings for one tag. The feed's first element is metadata, not
    /// a job.
    pub async fn search(&self, role: &str) -> Result<Vec<JobPosting>, SourceError> {
        let payload: Value = self
            .client
            .get(API_BASE)
            .query(&[("tag", role)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| SourceError::Malformed(err.to_string()))?;

        let items = payload
            .as_array()
            .ok_or_else(|| SourceError::Malformed("expected a JSON array".into()))?;

        let jobs: Vec<JobPosting> = items
            .iter()
            .skip(1)
            .filter_map(parse_item)
            .collect();
        debug!(role, count = jobs.len(), "remoteok search done");
        Ok(jobs)
    }
}

fn parse_item(item: &Value) -> Option<JobPosting> {
    let object = item.as_object()?;
    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let title = text("position");
    let url = text("url");
    if title.is_empty() || url.is_empty() {
        return None;
    }
    let mut job = JobPosting::new(title, text("company"), url)
        .with_location("Remote")
        .with_region("remote")
        .with_source("remoteok");
    let salary = text("salary");
    if !salary.is_empty() {
        job.salary = Some(salary);
    }
    let posted = text("date");
    if !posted.is_empty() {
        job.posted = Some(posted);
    }
    Some(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_item_skips_entries_without_title_or_url() {
        let legit = serde_json::json!({
            "position": "Junior Rust Developer",
            "company": "Acme",
            "url": "https://remoteok.com/jobs/1",
            "date": "2026-08-20"
        });
        let meta = serde_json::json!({"legal": "feed terms"});

        let job = parse_item(&legit).unwrap();
        assert_eq!(job.title, "Junior Rust Developer");
        assert_eq!(job.region, "remote");
        assert_eq!(job.posted.as_deref(), Some("2026-08-20"));
        assert!(parse_item(&meta).is_none());
    }
}
