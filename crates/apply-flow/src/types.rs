//! Per-attempt input parameters.

use std::path::PathBuf;

/// Hard cap on form steps per attempt. Bounds worst-case execution for forms
/// that keep presenting "Next" without ever exposing a submit.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// Destination length limit for cover-letter textareas.
pub const COVER_LETTER_MAX_LEN: usize = 2900;

/// Everything the engine needs for one application attempt.
#[derive(Clone, Debug)]
pub struct AttemptSpec {
    pub job_url: String,
    pub title: String,
    pub company: String,
    /// Uploaded on any step exposing a file input, if the file exists.
    pub resume_path: Option<PathBuf>,
    /// Fills a cover-letter-designated textarea, clipped to
    /// [`COVER_LETTER_MAX_LEN`].
    pub cover_letter: Option<String>,
    /// Stop after confirming a valid entry point, before touching any field.
    pub dry_run: bool,
    pub max_steps: usize,
}

impl AttemptSpec {
    pub fn new(
        job_url: impl Into<String>,
        title: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            job_url: job_url.into(),
            title: title.into(),
            company: company.into(),
            resume_path: None,
            cover_letter: None,
            dry_run: false,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_resume(mut self, path: impl Into<PathBuf>) -> Self {
        self.resume_path = Some(path.into());
        self
    }

    pub fn with_cover_letter(mut self, text: impl Into<String>) -> Self {
        self.cover_letter = Some(text.into());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}
