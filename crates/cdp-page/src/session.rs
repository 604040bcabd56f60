//! Browser lifecycle: launch, authentication cookie, login verification.

use std::path::Path;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::Page;
use futures::StreamExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::page::CdpPage;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("browser protocol error: {0}")]
    Protocol(String),
}

impl SessionError {
    fn protocol(error: impl std::fmt::Display) -> Self {
        Self::Protocol(error.to_string())
    }
}

/// Launch parameters for one batch run's browser.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub headless: bool,
    pub viewport: (u32, u32),
    pub user_agent: Option<String>,
    /// Explicit Chrome binary; auto-discovered when unset.
    pub chrome_path: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: (1280, 800),
            user_agent: None,
            chrome_path: None,
        }
    }
}

/// One launched browser, its CDP event loop, and the single page reused
/// across every attempt in a batch.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    pub async fn launch(config: &SessionConfig) -> Result<Self, SessionError> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport.0, config.viewport.1)
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");
        if let Some(path) = config.chrome_path.clone().or_else(find_chrome) {
            builder = builder.chrome_executable(path);
        }
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|err| SessionError::Launch(err.to_string()))?;
        let handler_task =
            tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(SessionError::protocol)?;
        if let Some(user_agent) = &config.user_agent {
            page.set_user_agent(user_agent)
                .await
                .map_err(SessionError::protocol)?;
        }

        info!(headless = config.headless, "browser session started");
        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    /// The port-facing view of this session's page.
    pub fn page(&self) -> CdpPage {
        CdpPage::new(self.page.clone())
    }

    /// Install a pre-authenticated session cookie before the first
    /// navigation.
    pub async fn set_session_cookie(
        &self,
        name: &str,
        value: &str,
        domain: &str,
    ) -> Result<(), SessionError> {
        let mut cookie = CookieParam::new(name, value);
        cookie.domain = Some(domain.to_string());
        cookie.path = Some("/".to_string());
        cookie.secure = Some(true);
        self.page
            .set_cookies(vec![cookie])
            .await
            .map_err(SessionError::protocol)?;
        debug!(name, domain, "session cookie installed");
        Ok(())
    }

    /// Navigate to `url` and report whether the session is authenticated,
    /// judged by the page not bouncing to a login or wall URL.
    pub async fn verify_login(
        &self,
        url: &str,
        settle: Duration,
    ) -> Result<bool, SessionError> {
        self.page.goto(url).await.map_err(SessionError::protocol)?;
        tokio::time::sleep(settle).await;
        let href: String = self
            .page
            .evaluate("(() => window.location.href)()")
            .await
            .map_err(SessionError::protocol)?
            .into_value()
            .map_err(SessionError::protocol)?;
        let walled = ["/login", "/authwall", "/checkpoint", "/uas/"]
            .iter()
            .any(|marker| href.contains(marker));
        Ok(!walled)
    }

    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            warn!(error = %err, "browser did not close cleanly");
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

/// Locate a Chrome or Chromium binary on this host.
pub fn find_chrome() -> Option<String> {
    for binary in ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(output) = std::process::Command::new("which").arg(binary).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Some(path);
                }
            }
        }
    }
    let candidates = [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];
    candidates
        .iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(|candidate| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_headless_with_sane_viewport() {
        let config = SessionConfig::default();
        assert!(config.headless);
        assert_eq!(config.viewport, (1280, 800));
        assert!(config.chrome_path.is_none());
    }

    #[test]
    fn find_chrome_never_panics() {
        // Result depends on the host; only the absence of a panic matters.
        let _ = find_chrome();
    }
}
