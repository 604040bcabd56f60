//! Public listing sources and the shared relevance/dedup helpers.

pub mod adzuna;
pub mod reed;
pub mod remoteok;
pub mod remotive;

use applyflow_core_types::JobPosting;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("listing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listing payload was malformed: {0}")]
    Malformed(String),
}

/// One supported search region.
#[derive(Clone, Copy, Debug)]
pub struct Region {
    pub key: &'static str,
    pub location: &'static str,
    /// LinkedIn geography id for search URLs.
    pub geo_id: &'static str,
    /// Adzuna country code; `None` where Adzuna has no coverage.
    pub adzuna_country: Option<&'static str>,
}

pub const REGIONS: &[Region] = &[
    Region {
        key: "uk",
        location: "United Kingdom",
        geo_id: "101165590",
        adzuna_country: Some("gb"),
    },
    Region {
        key: "india",
        location: "India",
        geo_id: "102713980",
        adzuna_country: Some("in"),
    },
    Region {
        key: "germany",
        location: "Germany",
        geo_id: "101282230",
        adzuna_country: Some("de"),
    },
    Region {
        key: "netherlands",
        location: "Netherlands",
        geo_id: "102890719",
        adzuna_country: Some("nl"),
    },
    Region {
        key: "uae",
        location: "United Arab Emirates",
        geo_id: "104305776",
        adzuna_country: None,
    },
];

pub fn region(key: &str) -> Option<&'static Region> {
    let key = key.to_lowercase();
    REGIONS.iter().find(|region| region.key == key)
}

pub fn region_keys() -> Vec<&'static str> {
    REGIONS.iter().map(|region| region.key).collect()
}

/// Search terms used when the profile does not name target roles.
pub const DEFAULT_SEARCH_TERMS: &[&str] = &[
    "junior ai engineer",
    "junior software developer",
    "junior software engineer",
    "junior fullstack developer",
    "junior ml engineer",
    "associate software engineer",
];

const WANTED_KEYWORDS: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "node",
    "react",
    "ai",
    "ml",
    "machine learning",
    "fullstack",
    "full-stack",
    "full stack",
    "backend",
    "software engineer",
    "developer",
    "junior",
    "graduate",
    "associate",
    "reinforcement",
    "llm",
    "nlp",
    "docker",
    "cloud",
];

const EXCLUDED_KEYWORDS: &[&str] = &[
    "senior",
    "lead",
    "principal",
    "director",
    "manager",
    "10+ years",
    "8+ years",
    "7+ years",
    "architect",
];

/// Keyword relevance score over title and company text. Seniority markers
/// weigh heavily negative; junior markers get a flat boost.
pub fn score_job(job: &JobPosting) -> i32 {
    let text = format!("{} {}", job.title, job.company).to_lowercase();
    let mut score = 0;
    for keyword in WANTED_KEYWORDS {
        if text.contains(keyword) {
            score += 2;
        }
    }
    for keyword in EXCLUDED_KEYWORDS {
        if text.contains(keyword) {
            score -= 10;
        }
    }
    if ["junior", "graduate", "associate", "entry"]
        .iter()
        .any(|marker| text.contains(marker))
    {
        score += 5;
    }
    score
}

pub fn is_relevant(job: &JobPosting) -> bool {
    score_job(job) > -5
}

/// Drop duplicate postings by case-insensitive (title, company), keeping the
/// first occurrence.
pub fn dedup(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen = std::collections::HashSet::new();
    jobs.into_iter()
        .filter(|job| {
            seen.insert((
                job.title.trim().to_lowercase(),
                job.company.trim().to_lowercase(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, company: &str) -> JobPosting {
        JobPosting::new(title, company, "https://jobs.example.com/1")
    }

    #[test]
    fn junior_roles_outscore_senior_roles() {
        let junior = score_job(&job("Junior Python Developer", "Acme"));
        let senior = score_job(&job("Senior Python Developer", "Acme"));
        assert!(junior > senior);
        assert!(is_relevant(&job("Junior Python Developer", "Acme")));
        assert!(!is_relevant(&job("Principal Architect, 10+ years", "Acme")));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let jobs = vec![
            job("Rust Engineer", "Acme"),
            job("rust engineer", "ACME"),
            job("Rust Engineer", "Other"),
        ];
        let unique = dedup(jobs);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn every_region_has_a_geo_id() {
        for entry in REGIONS {
            assert!(!entry.geo_id.is_empty(), "region {} lacks geo id", entry.key);
        }
        assert!(region("UK").is_some());
        assert!(region("uae").unwrap().adzuna_country.is_none());
        assert!(region("mars").is_none());
    }
}
