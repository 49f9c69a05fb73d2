//! Fetch-expand: drive a page until every benefit panel is open.

use crate::browser::{Browser, BrowserPage};
use crate::error::ScrapeError;
use crate::selectors;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Full post-interaction DOM serialization, as opposed to the raw response
/// body the server sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMarkup(String);

impl RenderedMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RenderedMarkup {
    fn from(html: String) -> Self {
        Self(html)
    }
}

/// Timing bounds for one render call. Tests shrink these.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Upper bound on navigation (DOM parsed, not network idle).
    pub navigation_timeout: Duration,
    /// Upper bound on each structural anchor wait.
    pub selector_timeout: Duration,
    /// Pause after each toggle activation before the next one.
    pub settle: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(60),
            selector_timeout: Duration::from_secs(30),
            settle: Duration::from_millis(500),
        }
    }
}

/// Renders card detail pages with every benefit panel expanded.
///
/// Owns the browser lifecycle: each [`render`](Self::render) call gets a
/// fresh, exclusively-owned browser instance that is torn down on every
/// exit path. A dropped in-flight call still releases it through the
/// backend's process cleanup.
pub struct PageRenderer {
    browser: Box<dyn Browser>,
    options: RenderOptions,
}

impl PageRenderer {
    pub fn new(browser: Box<dyn Browser>, options: RenderOptions) -> Self {
        Self { browser, options }
    }

    /// Navigate to `url`, activate every benefit toggle strictly
    /// sequentially, and capture the expanded markup.
    pub async fn render(&self, url: &str) -> Result<RenderedMarkup, ScrapeError> {
        let parsed = Url::parse(url).map_err(|e| ScrapeError::Navigation {
            url: url.to_string(),
            reason: format!("not a valid URL: {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }

        let mut page = self
            .browser
            .open_page()
            .await
            .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;

        let outcome = self.expand(page.as_mut(), url).await;

        if let Err(e) = page.close().await {
            warn!(error = %e, "browser teardown failed");
        }

        outcome
    }

    async fn expand(
        &self,
        page: &mut dyn BrowserPage,
        url: &str,
    ) -> Result<RenderedMarkup, ScrapeError> {
        let opts = &self.options;

        info!(url, "navigating");
        page.navigate(url, opts.navigation_timeout)
            .await
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                reason: format!("{e:#}"),
            })?;

        for selector in [selectors::BENEFITS_AREA, selectors::CARD_NAME] {
            debug!(selector, "waiting for structural anchor");
            page.wait_for(selector, opts.selector_timeout)
                .await
                .map_err(|_| ScrapeError::StructuralTimeout {
                    selector: selector.to_string(),
                    timeout_ms: opts.selector_timeout.as_millis() as u64,
                })?;
        }

        let toggles = page
            .query_all(selectors::BENEFIT_TOGGLE)
            .await
            .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;
        info!(toggles = toggles.len(), "expanding benefit panels");

        // Strictly sequential: activation order affects which panel is
        // animating, and a premature capture would race the UI.
        for toggle in toggles {
            page.click(toggle)
                .await
                .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;
            tokio::time::sleep(opts.settle).await;
        }

        let html = page
            .content()
            .await
            .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;
        info!(bytes = html.len(), "captured expanded markup");

        Ok(RenderedMarkup(html))
    }
}
