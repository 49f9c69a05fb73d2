//! Driver seam between the renderer and the real browser.
//!
//! The renderer only speaks these traits. [`chromium::ChromiumBrowser`] is
//! the production backend; tests substitute scripted fakes.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Opaque reference to an element returned by [`BrowserPage::query_all`].
///
/// Valid until the next `query_all` call on the same page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle(pub usize);

/// Launches one isolated page per render call.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Open a fresh page backed by a browser instance owned by that page.
    async fn open_page(&self) -> Result<Box<dyn BrowserPage>>;
}

/// The page-level primitives the renderer needs.
#[async_trait]
pub trait BrowserPage: Send {
    /// Navigate and wait until the DOM is parsed (not full network idle),
    /// bounded by `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Wait until `selector` matches at least one element, bounded by
    /// `timeout`.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// All elements currently matching `selector`, in document order.
    async fn query_all(&mut self, selector: &str) -> Result<Vec<ElementHandle>>;

    /// Activate (click) a previously queried element.
    async fn click(&mut self, handle: ElementHandle) -> Result<()>;

    /// Serialize the full current DOM, post-interaction.
    async fn content(&mut self) -> Result<String>;

    /// Tear the page and its owning browser instance down.
    async fn close(self: Box<Self>) -> Result<()>;
}
