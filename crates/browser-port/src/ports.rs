//! The page capability trait consumed by the apply engine.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::PortError;
use crate::model::{ControlRef, FieldGroup, NavAction, NavVocabulary};

/// Scriptable page abstraction over one browser tab.
///
/// Implementations own the markup heuristics (selectors, visibility rules,
/// label resolution); callers only see semantic operations. Every waiting
/// operation takes an explicit bound and reports expiry either as a `false`
/// probe result or as [`PortError::Timeout`] — no call may hang
/// indefinitely.
#[async_trait]
pub trait PagePort: Send + Sync {
    /// Navigate the tab to `url`, waiting at most `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), PortError>;

    /// Probe for an element that unambiguously represents the "start
    /// application" action, polling until `timeout`. `Ok(false)` means no
    /// such element ever appeared.
    async fn entry_action_present(
        &self,
        vocab: &[&str],
        timeout: Duration,
    ) -> Result<bool, PortError>;

    /// Click the entry action. Returns `false` if it vanished since the
    /// probe.
    async fn click_entry_action(&self, vocab: &[&str]) -> Result<bool, PortError>;

    /// Wait (bounded) for a modal/dialog container to appear.
    async fn wait_for_dialog(&self, timeout: Duration) -> Result<bool, PortError>;

    /// Check that the open dialog actually contains form controls, a file
    /// input, or a recognizable action button.
    async fn dialog_has_form_content(&self) -> Result<bool, PortError>;

    /// Snapshot the visible, enabled controls of the active dialog grouped
    /// into logical field groups. Handles are valid until the next snapshot.
    async fn field_groups(&self) -> Result<Vec<FieldGroup>, PortError>;

    /// Set the value of a text or textarea control.
    async fn fill_text(&self, handle: ControlRef, value: &str) -> Result<(), PortError>;

    /// Select the option at `index` in a select control.
    async fn select_option(&self, handle: ControlRef, index: usize) -> Result<(), PortError>;

    /// Set a checkbox state.
    async fn set_checked(&self, handle: ControlRef, checked: bool) -> Result<(), PortError>;

    /// Click an arbitrary control (used for radio inputs).
    async fn click_control(&self, handle: ControlRef) -> Result<(), PortError>;

    /// Attach `path` to the dialog's file input, if one is present.
    /// Returns `false` when the current step has no file input.
    async fn upload_file(&self, path: &Path) -> Result<bool, PortError>;

    /// Locate a cover-letter-designated textarea in the dialog, if any.
    async fn cover_letter_field(&self) -> Result<Option<ControlRef>, PortError>;

    /// Locate the primary navigation action by vocabulary priority.
    /// `Ok(None)` means no actionable button is visible at all.
    async fn find_nav_action(&self, vocab: &NavVocabulary) -> Result<Option<NavAction>, PortError>;

    /// Click a previously located navigation action.
    async fn click_nav_action(&self, action: &NavAction) -> Result<(), PortError>;

    /// Best-effort close of the active dialog (confirmation or abandoned
    /// form). Returns whether a dismiss control was found and clicked.
    async fn dismiss_dialog(&self) -> Result<bool, PortError>;

    /// Let the page settle for `pause` (animations, async validation).
    async fn settle(&self, pause: Duration);
}
