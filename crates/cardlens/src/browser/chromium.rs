//! chromiumoxide backend for the [`Browser`] / [`BrowserPage`] seam.
//!
//! Every [`Browser::open_page`] call launches a fresh chromium process that
//! is exclusively owned by the returned page and killed on close. Dropping
//! an in-flight page still reaps the child process through chromiumoxide's
//! own cleanup.

use super::{Browser, BrowserPage, ElementHandle};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

/// How often [`BrowserPage::wait_for`] re-checks for the selector.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launch configuration for the chromiumoxide backend.
#[derive(Debug, Clone, Default)]
pub struct ChromiumConfig {
    /// Run with a visible window (debugging). Headless otherwise.
    pub headed: bool,
    /// Explicit chromium executable; discovered via [`find_chromium`]
    /// when `None`.
    pub executable: Option<PathBuf>,
}

/// Factory that launches one chromium instance per page.
pub struct ChromiumBrowser {
    config: ChromiumConfig,
}

impl ChromiumBrowser {
    pub fn new(config: ChromiumConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn open_page(&self) -> Result<Box<dyn BrowserPage>> {
        // headless is the builder default
        let mut builder = BrowserConfig::builder();
        if self.config.headed {
            builder = builder.with_head();
        }

        let executable = self.config.executable.clone().or_else(find_chromium);
        if let Some(path) = executable {
            debug!(path = %path.display(), "using chromium executable");
            builder = builder.chrome_executable(path);
        }

        if std::env::var("CARDLENS_CHROMIUM_NO_SANDBOX").is_ok() {
            builder = builder.arg("--no-sandbox");
        }

        let config = builder
            .build()
            .map_err(|e| anyhow!("invalid browser config: {e}"))?;

        let (browser, mut handler) = chromiumoxide::Browser::launch(config)
            .await
            .context("launching chromium")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("opening blank page")?;

        Ok(Box::new(ChromiumPage {
            browser,
            page,
            handler_task,
            elements: Vec::new(),
        }))
    }
}

/// A page plus the chromium process that owns it.
struct ChromiumPage {
    browser: chromiumoxide::Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    /// Elements from the last `query_all`, addressed by handle index.
    elements: Vec<Element>,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(anyhow!("navigation failed: {e}")),
            Err(_) => Err(anyhow!(
                "navigation timed out after {}ms",
                timeout.as_millis()
            )),
        }
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!(
                    "element `{selector}` did not appear within {}ms",
                    timeout.as_millis()
                );
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn query_all(&mut self, selector: &str) -> Result<Vec<ElementHandle>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("querying `{selector}`"))?;
        let handles = (0..elements.len()).map(ElementHandle).collect();
        self.elements = elements;
        Ok(handles)
    }

    async fn click(&mut self, handle: ElementHandle) -> Result<()> {
        let element = self
            .elements
            .get(handle.0)
            .ok_or_else(|| anyhow!("stale element handle {}", handle.0))?;
        element
            .click()
            .await
            .with_context(|| format!("clicking element {}", handle.0))?;
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        self.page
            .content()
            .await
            .context("capturing page content")
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let Self {
            mut browser,
            page,
            handler_task,
            ..
        } = *self;
        page.close().await.ok();
        browser.close().await.ok();
        browser.wait().await.ok();
        handler_task.abort();
        Ok(())
    }
}

/// Find a chromium binary by checking multiple locations.
///
/// Order: `CARDLENS_CHROMIUM_PATH` env, system PATH
/// (google-chrome / chromium / chromium-browser), common macOS location.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("CARDLENS_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}
