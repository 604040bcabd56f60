//! The attempt state machine.
//!
//! `run` is the single attempt boundary: it always returns an [`Outcome`],
//! always gives the on-screen dialog a best-effort close on failure, and
//! always flushes the attempt log, whatever happened inside the step loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use answer_resolver::{first_non_empty, pick_option, pick_radio, truthy, AnswerResolver};
use applyflow_core_types::{AttemptId, Outcome};
use browser_port::{ControlKind, FieldGroup, NavKind, PagePort};
use tracing::{debug, field, info, instrument, Span};

use crate::errors::AttemptError;
use crate::log::AttemptLog;
use crate::types::{AttemptSpec, COVER_LETTER_MAX_LEN};
use crate::vocab::{ENTRY_VOCAB, QUICK_APPLY_NAV};

/// Bounded waits and settle pauses used across one attempt.
#[derive(Clone, Debug)]
pub struct EngineTiming {
    /// Page navigation to the posting URL.
    pub navigation: Duration,
    /// Polling window for the entry action to appear.
    pub entry_wait: Duration,
    /// Polling window for the application dialog to open.
    pub dialog_wait: Duration,
    /// Pause after the dialog opens, before inspecting it.
    pub dialog_settle: Duration,
    /// Pause after filling a step, before locating the nav button.
    pub fill_settle: Duration,
    /// Pause after a resume upload.
    pub upload_settle: Duration,
    /// Pause after advancing to the next step.
    pub advance_settle: Duration,
    /// Pause after clicking submit, before the confirmation check.
    pub submit_settle: Duration,
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            entry_wait: Duration::from_secs(8),
            dialog_wait: Duration::from_secs(6),
            dialog_settle: Duration::from_secs(1),
            fill_settle: Duration::from_millis(600),
            upload_settle: Duration::from_secs(1),
            advance_settle: Duration::from_millis(1500),
            submit_settle: Duration::from_millis(2500),
        }
    }
}

/// Drives one quick-apply form per [`AttemptSpec`] over any [`PagePort`].
pub struct ApplyEngine {
    resolver: Arc<AnswerResolver>,
    timing: EngineTiming,
    log_dir: PathBuf,
}

impl ApplyEngine {
    /// `log_dir` receives the narration log of every attempt; persistence is
    /// unconditional, so the directory is required up front.
    pub fn new(resolver: Arc<AnswerResolver>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            timing: EngineTiming::default(),
            log_dir: log_dir.into(),
        }
    }

    pub fn with_timing(mut self, timing: EngineTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Run one attempt to a terminal outcome. Never returns an error and
    /// never panics on port faults; every failure class maps to an outcome.
    #[instrument(skip_all, fields(title = %spec.title, company = %spec.company, attempt = field::Empty))]
    pub async fn run(&self, page: &dyn PagePort, spec: &AttemptSpec) -> Outcome {
        let attempt = AttemptId::new();
        Span::current().record("attempt", field::display(&attempt));
        let mut log = AttemptLog::new(&spec.title, &spec.company);
        log.push(format!("attempt {attempt}"));

        let outcome = match self.drive(page, spec, &mut log).await {
            Ok(outcome) => outcome,
            Err(error) => {
                log.push(format!("aborted: {error}"));
                if !matches!(error, AttemptError::EntryNotFound) {
                    if let Err(err) = page.dismiss_dialog().await {
                        debug!(error = %err, "dialog close after failure also failed");
                    }
                }
                error.outcome()
            }
        };

        info!(outcome = %outcome, "attempt finished");
        log.flush_into(&self.log_dir);
        outcome
    }

    async fn drive(
        &self,
        page: &dyn PagePort,
        spec: &AttemptSpec,
        log: &mut AttemptLog,
    ) -> Result<Outcome, AttemptError> {
        page.goto(&spec.job_url, self.timing.navigation).await?;

        if !page
            .entry_action_present(ENTRY_VOCAB, self.timing.entry_wait)
            .await?
        {
            log.push("no quick-apply action, external application");
            return Err(AttemptError::EntryNotFound);
        }
        if !page.click_entry_action(ENTRY_VOCAB).await? {
            log.push("quick-apply action vanished before click");
            return Err(AttemptError::EntryNotFound);
        }
        log.push("quick-apply action clicked");

        if !page.wait_for_dialog(self.timing.dialog_wait).await? {
            log.push("application dialog did not open");
            return Err(AttemptError::ModalTimeout);
        }
        page.settle(self.timing.dialog_settle).await;

        if !page.dialog_has_form_content().await? {
            log.push("dialog matched but holds no form content");
            return Err(AttemptError::InvalidModal);
        }

        if spec.dry_run {
            log.push("dry run, stopping before any field is touched");
            if let Err(err) = page.dismiss_dialog().await {
                debug!(error = %err, "could not close dialog after dry run");
            }
            return Ok(Outcome::DryRun);
        }

        for step in 0..spec.max_steps {
            log.push(format!("step {}", step + 1));

            if let Some(path) = &spec.resume_path {
                if path.exists() && page.upload_file(path).await? {
                    log.push("uploaded resume");
                    page.settle(self.timing.upload_settle).await;
                }
            }

            for group in page.field_groups().await? {
                self.fill_group(page, &group).await;
            }

            if let Some(cover) = spec.cover_letter.as_deref().filter(|c| !c.is_empty()) {
                if let Some(handle) = page.cover_letter_field().await? {
                    let text: String = cover.chars().take(COVER_LETTER_MAX_LEN).collect();
                    if page.fill_text(handle, &text).await.is_ok() {
                        log.push("filled cover letter");
                    }
                }
            }
            page.settle(self.timing.fill_settle).await;

            let Some(action) = page.find_nav_action(&QUICK_APPLY_NAV).await? else {
                log.push("no navigation button visible");
                return Err(AttemptError::NavigationStall);
            };

            match action.kind {
                NavKind::Submit => {
                    page.click_nav_action(&action).await?;
                    page.settle(self.timing.submit_settle).await;
                    log.push(format!("application submitted via '{}'", action.label));
                    // A confirmation dialog usually follows submission.
                    if let Err(err) = page.dismiss_dialog().await {
                        debug!(error = %err, "could not close confirmation dialog");
                    }
                    return Ok(Outcome::Applied);
                }
                NavKind::Review | NavKind::Next => {
                    log.push(format!("advancing via '{}'", action.label));
                    page.click_nav_action(&action).await?;
                    page.settle(self.timing.advance_settle).await;
                }
            }
        }

        log.push("step cap reached without a submit button");
        Err(AttemptError::NavigationStall)
    }

    /// Fill every control in one logical field group. Per-field write
    /// failures are swallowed: an unfilled field is a weaker application,
    /// not a failed attempt.
    async fn fill_group(&self, page: &dyn PagePort, group: &FieldGroup) {
        for control in &group.controls {
            let label = if control.field.label.trim().is_empty() {
                &group.label
            } else {
                &control.field.label
            };
            let Some(value) = self.resolver.resolve(label, control.field.kind).await else {
                continue;
            };

            let applied = match control.field.kind {
                ControlKind::Text | ControlKind::Textarea => {
                    page.fill_text(control.handle, &value).await
                }
                ControlKind::Select => {
                    match pick_option(&control.field.options, &value)
                        .or_else(|| first_non_empty(&control.field.options))
                    {
                        Some(index) => page.select_option(control.handle, index).await,
                        None => Ok(()),
                    }
                }
                ControlKind::Checkbox => {
                    if truthy(&value) {
                        page.set_checked(control.handle, true).await
                    } else {
                        Ok(())
                    }
                }
                // Radios are resolved per group below; file inputs go
                // through the upload path.
                ControlKind::Radio | ControlKind::File => Ok(()),
            };
            if let Err(err) = applied {
                debug!(label = %label, error = %err, "field write failed, leaving unfilled");
            }
        }

        if group.radios.is_empty() || group.label.trim().is_empty() {
            return;
        }
        let Some(value) = self.resolver.lookup_rule(&group.label) else {
            return;
        };
        let labels: Vec<String> = group.radios.iter().map(|radio| radio.label.clone()).collect();
        // TODO: when no radio label overlaps the answer this defaults to the
        // first option, which picks "Yes" in a Yes/No group even when the
        // answer was "No"; needs a safer default.
        let index = pick_radio(&labels, value).unwrap_or(0);
        if let Err(err) = page.click_control(group.radios[index].handle).await {
            debug!(group = %group.label, error = %err, "radio click failed, leaving unselected");
        }
    }
}
