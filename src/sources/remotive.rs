//! Remotive public API, tech-focused remote roles.

use std::time::Duration;

use applyflow_core_types::JobPosting;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::SourceError;

const API_BASE: &str = "https://remotive.com/api/remote-jobs";
const RESULT_LIMIT: usize = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    candidate_required_location: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    salary: String,
    #[serde(default)]
    publication_date: Option<String>,
}

pub struct RemotiveClient {
    client: Client,
}

impl RemotiveClient {
    pub fn new() -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (compatible; applyflow/0.1)")
            .build()?;
        Ok(Self { client })
    }

    pub async fn search(&self, role: &str) -> Result<Vec<JobPosting>, SourceError> {
        let parsed: SearchResponse = self
            .client
            .get(API_BASE)
            .query(&[("search", role), ("limit", &RESULT_LIMIT.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| SourceError::Malformed(err.to_string()))?;

        let jobs: Vec<JobPosting> = parsed
            .jobs
            .into_iter()
            .filter(|item| !item.title.is_empty() && !item.url.is_empty())
            .map(|item| {
                let location = if item.candidate_required_location.is_empty() {
                    "Remote".to_string()
                } else {
                    item.candidate_required_location
                };
                let mut job = JobPosting::new(item.title, item.company_name, item.url)
                    .with_location(location)
                    .with_region("remote")
                    .with_source("remotive");
                if !item.salary.is_empty() {
                    job.salary = Some(item.salary);
                }
                job.posted = item.publication_date;
                job
            })
            .collect();
        debug!(role, count = jobs.len(), "remotive search done");
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_and_defaults_location_to_remote() {
        let raw = r#"{
            "jobs": [
                {
                    "title": "Junior Backend Engineer",
                    "company_name": "Acme",
                    "url": "https://remotive.com/jobs/1",
                    "salary": "$60k",
                    "publication_date": "2026-08-10T00:00:00"
                },
                {"title": "", "url": "https://remotive.com/jobs/2"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.jobs.len(), 2);
        assert!(parsed.jobs[0].candidate_required_location.is_empty());
        assert_eq!(parsed.jobs[0].company_name, "Acme");
    }
}
