//! Shared primitives for the applyflow workspace.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on the reason text carried by [`Outcome::Error`].
pub const MAX_ERROR_REASON: usize = 80;

/// Terminal result of one application attempt.
///
/// Exactly one `Outcome` is produced per attempt. Internal faults are mapped
/// into `Error(reason)` at the attempt boundary; nothing escapes the engine
/// as a raised error.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// The form was driven to a submitted state.
    Applied,
    /// The posting cannot be handled here (external application, no dialog,
    /// or a dialog without form content).
    Skipped,
    /// A valid entry point was confirmed but nothing was filled or clicked
    /// beyond opening it.
    DryRun,
    /// The attempt failed; the reason is bounded to [`MAX_ERROR_REASON`].
    Error(String),
}

impl Outcome {
    /// Build an error outcome, truncating the reason to [`MAX_ERROR_REASON`].
    pub fn error(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self::Error(reason.chars().take(MAX_ERROR_REASON).collect())
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Wire form consumed by the batch driver and the tracker:
    /// `applied`, `skipped`, `dry_run`, or `error:<reason>`.
    pub fn as_wire(&self) -> String {
        match self {
            Self::Applied => "applied".to_string(),
            Self::Skipped => "skipped".to_string(),
            Self::DryRun => "dry_run".to_string(),
            Self::Error(reason) => format!("error:{reason}"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_wire())
    }
}

/// Identifier for one engine invocation; used to correlate log output.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub String);

impl AttemptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A job posting discovered by a listing source or a page search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub region: String,
    pub source: String,
    pub salary: Option<String>,
    pub posted: Option<String>,
}

impl JobPosting {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}
