//! Chrome/Chromium-backed document viewer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::DocumentViewer;
use crate::config::ViewerConfig;
use crate::{QuireError, Result};

/// Virtual key code for Page Down, expected by some renderers alongside the
/// DOM key name.
const PAGE_DOWN_KEY_CODE: i64 = 34;

/// JavaScript to wait for the page ready state.
const WAIT_FOR_READY_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState === 'complete' || document.readyState === 'interactive') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
            setTimeout(() => resolve('timeout'), 10000);
        }
    })
"#;

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

/// Document viewer driving a local Chrome/Chromium instance over CDP
pub struct ChromeViewer {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromeViewer {
    /// Launches a browser and opens the document at `url`
    ///
    /// The browser window is visible unless `config.headless` is set, so the
    /// operator can check the right document came up before confirming the
    /// run.
    pub async fn open(config: &ViewerConfig, url: &str) -> Result<Self> {
        let chrome_path = find_chrome()?;
        info!("Launching browser (headless={})", config.headless);

        let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);
        if !config.headless {
            builder = builder.with_head();
        }
        builder = builder
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--no-sandbox")
            .arg("--disable-gpu");

        let browser_config = builder.build().map_err(QuireError::Viewer)?;
        let (browser, mut handler) = Browser::launch(browser_config).await?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        let viewer = Self {
            browser,
            page,
            handler_task,
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
        };
        viewer.navigate(url).await?;
        Ok(viewer)
    }

    /// Navigates the page to the document and waits until it has rendered
    async fn navigate(&self, url: &str) -> Result<()> {
        info!("Opening document at {}", url);

        let params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(QuireError::Viewer)?;
        tokio::time::timeout(self.navigation_timeout, self.page.execute(params))
            .await
            .map_err(|_| QuireError::NavigationTimeout {
                url: url.to_string(),
                seconds: self.navigation_timeout.as_secs(),
            })??;

        self.wait_for_ready().await;

        // Hand keyboard focus to the document root so advance keystrokes land.
        self.page
            .evaluate("document.documentElement.focus()".to_string())
            .await?;

        Ok(())
    }

    /// Waits for the page to reach a ready state
    async fn wait_for_ready(&self) {
        match tokio::time::timeout(
            self.navigation_timeout,
            self.page.evaluate(WAIT_FOR_READY_SCRIPT.to_string()),
        )
        .await
        {
            Ok(Ok(result)) => {
                let state: String = result
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("Page ready state: {}", state);
            }
            Ok(Err(e)) => {
                debug!("Could not check ready state: {}", e);
            }
            Err(_) => {
                warn!("Timeout waiting for page ready state");
            }
        }
    }

    /// Dispatches one half of the Page Down key press
    async fn dispatch_page_down(&self, event_type: DispatchKeyEventType) -> Result<()> {
        let params = DispatchKeyEventParams::builder()
            .r#type(event_type)
            .key("PageDown")
            .code("PageDown")
            .windows_virtual_key_code(PAGE_DOWN_KEY_CODE)
            .native_virtual_key_code(PAGE_DOWN_KEY_CODE)
            .build()
            .map_err(QuireError::Viewer)?;
        self.page.execute(params).await?;
        Ok(())
    }

    /// Closes the browser and stops the event handler task
    pub async fn close(mut self) -> Result<()> {
        let _ = self.browser.close().await;
        self.handler_task.abort();
        Ok(())
    }
}

#[async_trait]
impl DocumentViewer for ChromeViewer {
    async fn snapshot(&self) -> Result<String> {
        let content = self.page.content().await?;
        Ok(content)
    }

    async fn advance(&self) -> Result<()> {
        debug!("Advancing viewport (Page Down)");
        self.dispatch_page_down(DispatchKeyEventType::KeyDown).await?;
        self.dispatch_page_down(DispatchKeyEventType::KeyUp).await?;
        Ok(())
    }
}

/// Locates a Chrome/Chromium executable on disk or in PATH
fn find_chrome() -> Result<PathBuf> {
    for path in CHROME_PATHS {
        let candidate = Path::new(path);
        if candidate.exists() {
            debug!("Found browser at {}", path);
            return Ok(candidate.to_path_buf());
        }
    }

    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(output) = std::process::Command::new("which").arg(name).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    debug!("Found browser in PATH: {}", path);
                    return Ok(PathBuf::from(path));
                }
            }
        }
    }

    Err(QuireError::Viewer(
        "Chrome or Chromium not found; install one or put it on PATH".to_string(),
    ))
}
