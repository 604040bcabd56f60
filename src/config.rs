//! Runtime configuration and the candidate profile.
//!
//! Secrets and host specifics come from the environment; everything about
//! the candidate (contact details, static form answers, cover-letter blocks)
//! comes from `profile.json` in the data directory.

use std::env;
use std::path::{Path, PathBuf};

use answer_resolver::{AnswerRule, CandidateFacts, RuleTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read profile at {path}: {source}")]
    ProfileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("profile at {path} is not valid JSON: {source}")]
    ProfileParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Contact details rendered into answers and cover-letter signatures.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub website: String,
}

/// One reusable cover-letter paragraph, chosen when any tag matches the job
/// title.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillBlock {
    pub tags: Vec<String>,
    pub text: String,
}

/// Cover-letter building blocks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CoverConfig {
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub blocks: Vec<SkillBlock>,
    /// Notice-period phrasing used in the closing paragraph.
    #[serde(default)]
    pub availability: String,
}

/// The candidate profile loaded from `profile.json`.
///
/// `answers` is an ordered list and its order is meaningful: the resolver
/// applies first-match-wins, so profile answers are consulted before the
/// built-in defaults and earlier entries shadow later ones.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    pub personal: PersonalInfo,
    #[serde(default)]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub answers: Vec<AnswerRule>,
    /// Bullet facts fed to the generative answer fallback.
    #[serde(default)]
    pub facts: Vec<String>,
    /// One-line description of the roles being applied for.
    #[serde(default)]
    pub role_summary: String,
    #[serde(default)]
    pub cover: CoverConfig,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ProfileRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::ProfileParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the ordered answer table: profile answers first, then defaults
    /// derived from the personal details.
    pub fn rule_table(&self) -> RuleTable {
        let mut table = RuleTable::new();
        for rule in &self.answers {
            table.push(rule.key.clone(), rule.value.clone());
        }
        if !self.personal.phone.is_empty() {
            table.push("phone", self.personal.phone.clone());
            table.push("mobile", self.personal.phone.clone());
        }
        if !self.personal.city.is_empty() {
            table.push("current location", self.location_line());
            table.push("city", self.personal.city.clone());
            table.push("location", self.location_line());
        }
        if !self.personal.linkedin.is_empty() {
            table.push("linkedin", self.personal.linkedin.clone());
        }
        if !self.personal.github.is_empty() {
            table.push("github", self.personal.github.clone());
        }
        if !self.personal.website.is_empty() {
            table.push("portfolio", self.personal.website.clone());
            table.push("website", self.personal.website.clone());
        }
        table
    }

    pub fn candidate_facts(&self) -> CandidateFacts {
        CandidateFacts {
            name: self.personal.name.clone(),
            role_summary: if self.role_summary.is_empty() {
                "a software engineering role".to_string()
            } else {
                self.role_summary.clone()
            },
            facts: self.facts.clone(),
        }
    }

    fn location_line(&self) -> String {
        if self.personal.country.is_empty() {
            self.personal.city.clone()
        } else {
            format!("{}, {}", self.personal.city, self.personal.country)
        }
    }
}

/// Environment-derived runtime configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    /// LinkedIn session cookie value.
    pub li_at: Option<String>,
    pub cv_path: Option<PathBuf>,
    pub gemini_api_key: Option<String>,
    pub adzuna_app_id: Option<String>,
    pub adzuna_app_key: Option<String>,
    pub reed_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = env::var_os("APPLYFLOW_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("applyflow")
            });
        Self {
            data_dir,
            li_at: non_empty_var("LINKEDIN_LI_AT"),
            cv_path: non_empty_var("CV_PATH").map(PathBuf::from),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            adzuna_app_id: non_empty_var("ADZUNA_APP_ID"),
            adzuna_app_key: non_empty_var("ADZUNA_APP_KEY"),
            reed_api_key: non_empty_var("REED_API_KEY"),
        }
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }

    pub fn tracker_path(&self) -> PathBuf {
        self.data_dir.join("tracker.csv")
    }

    pub fn covers_dir(&self) -> PathBuf {
        self.data_dir.join("cover_letters")
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.data_dir.join("applications")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("apply_logs")
    }

    pub fn leads_dir(&self) -> PathBuf {
        self.data_dir.join("leads")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
