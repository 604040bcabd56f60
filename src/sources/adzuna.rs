//! Adzuna public search API.

use std::time::Duration;

use applyflow_core_types::JobPosting;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::SourceError;

const API_BASE: &str = "https://api.adzuna.com/v1/api/jobs";
const RESULTS_PER_PAGE: usize = 20;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const PAGE_PAUSE: Duration = Duration::from_millis(500);

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: Option<CompanyRef>,
    #[serde(default)]
    location: Option<LocationRef>,
    #[serde(default)]
    redirect_url: String,
    #[serde(default)]
    salary_min: Option<f64>,
    #[serde(default)]
    created: Option<String>,
}

#[derive(Deserialize)]
struct CompanyRef {
    #[serde(default)]
    display_name: String,
}

#[derive(Deserialize)]
struct LocationRef {
    #[serde(default)]
    display_name: String,
}

/// Adzuna client. Works unauthenticated at low volume; app credentials lift
/// the rate limit.
pub struct AdzunaClient {
    client: Client,
    credentials: Option<(String, String)>,
}

impl AdzunaClient {
    pub fn new(credentials: Option<(String, String)>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (compatible; applyflow/0.1)")
            .build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    /// Search one role in one country, walking up to `max_pages` pages.
    /// Stops early on an empty page or a failed request.
    pub async fn search(
        &self,
        role: &str,
        country: &str,
        region_key: &str,
        max_pages: usize,
    ) -> Result<Vec<JobPosting>, SourceError> {
        let mut jobs = Vec::new();
        for page in 1..=max_pages.max(1) {
            let mut request = self
                .client
                .get(format!("{API_BASE}/{country}/search/{page}"))
                .query(&[
                    ("results_per_page", RESULTS_PER_PAGE.to_string()),
                    ("what", role.to_string()),
                    ("content-type", "application/json".to_string()),
                ]);
            if let Some((app_id, app_key)) = &self.credentials {
                request = request.query(&[("app_id", app_id), ("app_key", app_key)]);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    warn!(country, page, error = %err, "adzuna request failed");
                    break;
                }
            };
            if !response.status().is_success() {
                warn!(country, page, status = %response.status(), "adzuna rejected request");
                break;
            }
            let parsed: SearchResponse = response
                .json()
                .await
                .map_err(|err| SourceError::Malformed(err.to_string()))?;
            if parsed.results.is_empty() {
                break;
            }

            for item in parsed.results {
                let mut job = JobPosting::new(
                    item.title,
                    item.company.map(|c| c.display_name).unwrap_or_default(),
                    item.redirect_url,
                )
                .with_region(region_key)
                .with_source("adzuna");
                job.location = item.location.map(|l| l.display_name).unwrap_or_default();
                job.salary = item.salary_min.map(|salary| salary.to_string());
                job.posted = item.created;
                jobs.push(job);
            }
            tokio::time::sleep(PAGE_PAUSE).await;
        }
        debug!(role, country, count = jobs.len(), "adzuna search done");
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_with_missing_optional_fields() {
        let raw = r#"{
            "results": [
                {"title": "Junior Developer", "redirect_url": "https://adzuna/j/1"},
                {
                    "title": "ML Engineer",
                    "company": {"display_name": "Acme"},
                    "location": {"display_name": "London"},
                    "redirect_url": "https://adzuna/j/2",
                    "salary_min": 35000.0,
                    "created": "2026-08-01T00:00:00Z"
                }
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[1].company.as_ref().unwrap().display_name, "Acme");
        assert!(parsed.results[0].salary_min.is_none());
    }
}
