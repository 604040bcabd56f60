//! Reed.co.uk jobseeker API. Key-gated: the free API key goes in the basic
//! auth username with an empty password.

use std::time::Duration;

use applyflow_core_types::JobPosting;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::SourceError;

const API_BASE: &str = "https://www.reed.co.uk/api/1.0/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const LOCATION: &str = "UK";
const DISTANCE_MILES: u32 = 50;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    #[serde(default)]
    job_title: String,
    #[serde(default)]
    employer_name: String,
    #[serde(default)]
    location_name: String,
    #[serde(default)]
    job_url: String,
    #[serde(default)]
    minimum_salary: Option<f64>,
    #[serde(default)]
    maximum_salary: Option<f64>,
    #[serde(default)]
    date: Option<String>,
}

pub struct ReedClient {
    client: Client,
    api_key: String,
}

impl ReedClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (compatible; applyflow/0.1)")
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    pub async fn search(&self, role: &str) -> Result<Vec<JobPosting>, SourceError> {
        let parsed: SearchResponse = self
            .client
            .get(API_BASE)
            .query(&[
                ("keywords", role),
                ("locationName", LOCATION),
                ("distancefromlocation", &DISTANCE_MILES.to_string()),
            ])
            .basic_auth(&self.api_key, Some(""))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| SourceError::Malformed(err.to_string()))?;

        let jobs: Vec<JobPosting> = parsed
            .results
            .into_iter()
            .filter(|item| !item.job_title.is_empty() && !item.job_url.is_empty())
            .map(|item| {
                let mut job = JobPosting::new(item.job_title, item.employer_name, item.job_url)
                    .with_location(item.location_name)
                    .with_region("uk")
                    .with_source("reed");
                job.salary = salary_band(item.minimum_salary, item.maximum_salary);
                job.posted = item.date;
                job
            })
            .collect();
        debug!(role, count = jobs.len(), "reed search done");
        Ok(jobs)
    }
}

fn salary_band(min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (None, None) => None,
        (min, max) => Some(format!(
            "{}-{}",
            min.map(|v| v.to_string()).unwrap_or_default(),
            max.map(|v| v.to_string()).unwrap_or_default()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_camel_case_fields() {
        let raw = r#"{
            "results": [
                {
                    "jobTitle": "Graduate Software Engineer",
                    "employerName": "Acme",
                    "locationName": "London",
                    "jobUrl": "https://www.reed.co.uk/jobs/1",
                    "minimumSalary": 28000.0,
                    "maximumSalary": 32000.0,
                    "date": "20/08/2026"
                }
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.results[0].job_title, "Graduate Software Engineer");
        assert_eq!(parsed.results[0].minimum_salary, Some(28000.0));
    }

    #[test]
    fn salary_band_formats_partial_bounds() {
        assert_eq!(salary_band(None, None), None);
        assert_eq!(salary_band(Some(28000.0), Some(32000.0)).as_deref(), Some("28000-32000"));
        assert_eq!(salary_band(Some(28000.0), None).as_deref(), Some("28000-"));
    }
}
