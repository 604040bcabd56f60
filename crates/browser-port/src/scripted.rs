//! Deterministic in-memory [`PagePort`] used for engine tests and offline
//! development.
//!
//! A `ScriptedPage` is configured with a fixed sequence of form steps; it
//! records every mutation the engine performs so tests can assert on exactly
//! what was filled, selected, clicked, and uploaded.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::PortError;
use crate::model::{ControlRef, FieldGroup, NavAction, NavKind, NavVocabulary};
use crate::ports::PagePort;

/// One scripted form step: the field groups visible on it, the navigation
/// button it exposes, and whether it carries a file input.
#[derive(Clone, Debug, Default)]
pub struct ScriptedStep {
    pub groups: Vec<FieldGroup>,
    pub cover_letter_field: Option<ControlRef>,
    pub nav: Option<NavAction>,
    pub has_file_input: bool,
}

impl ScriptedStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: FieldGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_nav(mut self, kind: NavKind, label: impl Into<String>) -> Self {
        self.nav = Some(NavAction::new(kind, label));
        self
    }

    pub fn with_cover_letter_field(mut self, handle: ControlRef) -> Self {
        self.cover_letter_field = Some(handle);
        self
    }

    pub fn with_file_input(mut self) -> Self {
        self.has_file_input = true;
        self
    }
}

#[derive(Debug, Default)]
struct ScriptedState {
    step: usize,
    visited: Vec<String>,
    entry_clicked: bool,
    dismissed: bool,
    filled: Vec<(u32, String)>,
    selected: Vec<(u32, usize)>,
    checked: Vec<(u32, bool)>,
    clicked: Vec<u32>,
    uploads: Vec<PathBuf>,
    nav_clicks: Vec<String>,
    goto_error: Option<PortError>,
}

/// Scripted page double. Construction follows the builder style of the rest
/// of the workspace; all recorded interactions are readable afterwards.
#[derive(Debug)]
pub struct ScriptedPage {
    entry_present: bool,
    dialog_opens: bool,
    has_form_content: bool,
    steps: Vec<ScriptedStep>,
    state: Mutex<ScriptedState>,
}

impl Default for ScriptedPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self {
            entry_present: true,
            dialog_opens: true,
            has_form_content: true,
            steps: Vec::new(),
            state: Mutex::new(ScriptedState::default()),
        }
    }

    pub fn with_entry_action(mut self, present: bool) -> Self {
        self.entry_present = present;
        self
    }

    pub fn with_dialog(mut self, opens: bool) -> Self {
        self.dialog_opens = opens;
        self
    }

    pub fn with_form_content(mut self, present: bool) -> Self {
        self.has_form_content = present;
        self
    }

    pub fn with_step(mut self, step: ScriptedStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Inject a one-shot failure for the next `goto` call.
    pub fn with_goto_error(self, error: PortError) -> Self {
        self.state_mut().goto_error = Some(error);
        self
    }

    fn state_mut(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().expect("scripted page state poisoned")
    }

    fn current_step(&self) -> Option<&ScriptedStep> {
        let index = self.state_mut().step;
        self.steps.get(index.min(self.steps.len().saturating_sub(1)))
    }

    pub fn visited(&self) -> Vec<String> {
        self.state_mut().visited.clone()
    }

    pub fn entry_clicked(&self) -> bool {
        self.state_mut().entry_clicked
    }

    pub fn dismissed(&self) -> bool {
        self.state_mut().dismissed
    }

    pub fn filled(&self) -> Vec<(u32, String)> {
        self.state_mut().filled.clone()
    }

    pub fn selected(&self) -> Vec<(u32, usize)> {
        self.state_mut().selected.clone()
    }

    pub fn checked(&self) -> Vec<(u32, bool)> {
        self.state_mut().checked.clone()
    }

    pub fn clicked_controls(&self) -> Vec<u32> {
        self.state_mut().clicked.clone()
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.state_mut().uploads.clone()
    }

    pub fn nav_clicks(&self) -> Vec<String> {
        self.state_mut().nav_clicks.clone()
    }

    /// Total count of field mutations of any kind.
    pub fn mutation_count(&self) -> usize {
        let state = self.state_mut();
        state.filled.len() + state.selected.len() + state.checked.len() + state.clicked.len()
    }
}

#[async_trait]
impl PagePort for ScriptedPage {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<(), PortError> {
        let mut state = self.state_mut();
        if let Some(error) = state.goto_error.take() {
            return Err(error);
        }
        state.visited.push(url.to_string());
        Ok(())
    }

    async fn entry_action_present(
        &self,
        _vocab: &[&str],
        _timeout: Duration,
    ) -> Result<bool, PortError> {
        Ok(self.entry_present)
    }

    async fn click_entry_action(&self, _vocab: &[&str]) -> Result<bool, PortError> {
        if self.entry_present {
            self.state_mut().entry_clicked = true;
        }
        Ok(self.entry_present)
    }

    async fn wait_for_dialog(&self, _timeout: Duration) -> Result<bool, PortError> {
        Ok(self.dialog_opens)
    }

    async fn dialog_has_form_content(&self) -> Result<bool, PortError> {
        Ok(self.has_form_content)
    }

    async fn field_groups(&self) -> Result<Vec<FieldGroup>, PortError> {
        Ok(self
            .current_step()
            .map(|step| step.groups.clone())
            .unwrap_or_default())
    }

    async fn fill_text(&self, handle: ControlRef, value: &str) -> Result<(), PortError> {
        self.state_mut().filled.push((handle.0, value.to_string()));
        Ok(())
    }

    async fn select_option(&self, handle: ControlRef, index: usize) -> Result<(), PortError> {
        self.state_mut().selected.push((handle.0, index));
        Ok(())
    }

    async fn set_checked(&self, handle: ControlRef, checked: bool) -> Result<(), PortError> {
        self.state_mut().checked.push((handle.0, checked));
        Ok(())
    }

    async fn click_control(&self, handle: ControlRef) -> Result<(), PortError> {
        self.state_mut().clicked.push(handle.0);
        Ok(())
    }

    async fn upload_file(&self, path: &Path) -> Result<bool, PortError> {
        let has_input = self
            .current_step()
            .map(|step| step.has_file_input)
            .unwrap_or(false);
        if has_input {
            self.state_mut().uploads.push(path.to_path_buf());
        }
        Ok(has_input)
    }

    async fn cover_letter_field(&self) -> Result<Option<ControlRef>, PortError> {
        Ok(self.current_step().and_then(|step| step.cover_letter_field))
    }

    async fn find_nav_action(
        &self,
        _vocab: &NavVocabulary,
    ) -> Result<Option<NavAction>, PortError> {
        Ok(self.current_step().and_then(|step| step.nav.clone()))
    }

    async fn click_nav_action(&self, action: &NavAction) -> Result<(), PortError> {
        let mut state = self.state_mut();
        state.nav_clicks.push(action.label.clone());
        // Advancing past the last scripted step leaves the page on it, which
        // models a form that keeps re-presenting the same step.
        if action.kind != NavKind::Submit && state.step + 1 < self.steps.len() {
            state.step += 1;
        }
        Ok(())
    }

    async fn dismiss_dialog(&self) -> Result<bool, PortError> {
        self.state_mut().dismissed = true;
        Ok(true)
    }

    async fn settle(&self, _pause: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ControlKind, FormField};

    const NAV: NavVocabulary = NavVocabulary {
        submit: &["submit"],
        review: &["review"],
        next: &["next"],
        exclude: &["back"],
    };

    #[tokio::test]
    async fn scripted_page_advances_on_next() {
        let page = ScriptedPage::new()
            .with_step(ScriptedStep::new().with_nav(NavKind::Next, "Next"))
            .with_step(ScriptedStep::new().with_nav(NavKind::Submit, "Submit application"));

        let first = page.find_nav_action(&NAV).await.unwrap().unwrap();
        assert_eq!(first.kind, NavKind::Next);
        page.click_nav_action(&first).await.unwrap();

        let second = page.find_nav_action(&NAV).await.unwrap().unwrap();
        assert_eq!(second.kind, NavKind::Submit);
        assert_eq!(page.nav_clicks(), vec!["Next".to_string()]);
    }

    #[tokio::test]
    async fn scripted_page_records_mutations() {
        let field = FormField {
            label: "Phone".into(),
            kind: ControlKind::Text,
            options: Vec::new(),
        };
        let page = ScriptedPage::new().with_step(
            ScriptedStep::new().with_group(FieldGroup::labelled("Phone").with_control(
                field,
                ControlRef(7),
            )),
        );

        page.fill_text(ControlRef(7), "+44 1234").await.unwrap();
        assert_eq!(page.filled(), vec![(7, "+44 1234".to_string())]);
        assert_eq!(page.mutation_count(), 1);
    }
}
