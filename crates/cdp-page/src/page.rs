//! [`PagePort`] implementation over one CDP page.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use browser_port::{ControlRef, FieldGroup, NavAction, NavVocabulary, PagePort, PortError};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::scripts;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Port implementation that drives the page exclusively through evaluated
/// scripts, except for file uploads which need a protocol-level node
/// reference.
#[derive(Clone)]
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Evaluate a script and deserialize its return value.
    pub async fn eval<T: DeserializeOwned>(&self, js: impl Into<String>) -> Result<T, PortError> {
        self.page
            .evaluate(js.into())
            .await
            .map_err(PortError::protocol)?
            .into_value()
            .map_err(PortError::protocol)
    }

    /// Re-run a boolean probe until it holds or the window expires.
    async fn poll_true(&self, js: &str, timeout: Duration) -> Result<bool, PortError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.eval::<bool>(js).await? {
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Scroll one viewport height down, used to trigger lazy result lists.
    pub async fn scroll_viewport(&self) -> Result<(), PortError> {
        let _: bool = self.eval(scripts::SCROLL_VIEWPORT).await?;
        Ok(())
    }

    pub async fn current_url(&self) -> Result<String, PortError> {
        self.eval("(() => window.location.href)()").await
    }
}

#[async_trait]
impl PagePort for CdpPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), PortError> {
        let navigation = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(timeout, navigation).await {
            Ok(result) => result.map_err(PortError::protocol),
            Err(_) => Err(PortError::Timeout(timeout.as_millis() as u64)),
        }
    }

    async fn entry_action_present(
        &self,
        vocab: &[&str],
        timeout: Duration,
    ) -> Result<bool, PortError> {
        self.poll_true(&scripts::entry_probe(vocab), timeout).await
    }

    async fn click_entry_action(&self, vocab: &[&str]) -> Result<bool, PortError> {
        self.eval(scripts::entry_click(vocab)).await
    }

    async fn wait_for_dialog(&self, timeout: Duration) -> Result<bool, PortError> {
        self.poll_true(scripts::DIALOG_PRESENT, timeout).await
    }

    async fn dialog_has_form_content(&self) -> Result<bool, PortError> {
        self.eval(scripts::DIALOG_CONTENT).await
    }

    async fn field_groups(&self) -> Result<Vec<FieldGroup>, PortError> {
        self.eval(scripts::snapshot_groups()).await
    }

    async fn fill_text(&self, handle: ControlRef, value: &str) -> Result<(), PortError> {
        if self.eval::<bool>(scripts::fill_field(handle.0, value)).await? {
            Ok(())
        } else {
            Err(PortError::StaleControl(handle.0))
        }
    }

    async fn select_option(&self, handle: ControlRef, index: usize) -> Result<(), PortError> {
        if self.eval::<bool>(scripts::select_index(handle.0, index)).await? {
            Ok(())
        } else {
            Err(PortError::StaleControl(handle.0))
        }
    }

    async fn set_checked(&self, handle: ControlRef, checked: bool) -> Result<(), PortError> {
        if self.eval::<bool>(scripts::set_checked(handle.0, checked)).await? {
            Ok(())
        } else {
            Err(PortError::StaleControl(handle.0))
        }
    }

    async fn click_control(&self, handle: ControlRef) -> Result<(), PortError> {
        if self.eval::<bool>(scripts::click_field(handle.0)).await? {
            Ok(())
        } else {
            Err(PortError::StaleControl(handle.0))
        }
    }

    async fn upload_file(&self, path: &Path) -> Result<bool, PortError> {
        let input = match self.page.find_element("input[type='file']").await {
            Ok(element) => element,
            Err(_) => return Ok(false),
        };
        let params = SetFileInputFilesParams::builder()
            .file(path.to_string_lossy())
            .backend_node_id(input.backend_node_id)
            .build()
            .map_err(PortError::Protocol)?;
        self.page
            .execute(params)
            .await
            .map_err(PortError::protocol)?;
        Ok(true)
    }

    async fn cover_letter_field(&self) -> Result<Option<ControlRef>, PortError> {
        let handle: Option<u32> = self.eval(scripts::cover_field()).await?;
        Ok(handle.map(ControlRef))
    }

    async fn find_nav_action(
        &self,
        vocab: &NavVocabulary,
    ) -> Result<Option<NavAction>, PortError> {
        self.eval(scripts::nav_probe(vocab)).await
    }

    async fn click_nav_action(&self, action: &NavAction) -> Result<(), PortError> {
        let clicked: bool = self.eval(scripts::click_by_label(&action.label)).await?;
        if !clicked {
            debug!(label = %action.label, "navigation button vanished before click");
        }
        Ok(())
    }

    async fn dismiss_dialog(&self) -> Result<bool, PortError> {
        self.eval(scripts::CLOSE_DIALOG).await
    }

    async fn settle(&self, pause: Duration) {
        tokio::time::sleep(pause).await;
    }
}
