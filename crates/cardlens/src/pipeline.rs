//! Render→parse composition into the terminal result shape.

use crate::benefit::{CardBenefitResult, CardBenefits};
use crate::browser::Browser;
use crate::error::ScrapeError;
use crate::extract;
use crate::render::{PageRenderer, RenderOptions};

/// The whole fetch-expand-extract pipeline behind one entry point.
///
/// Each invocation constructs its result fresh; no state is shared across
/// calls beyond the immutable configuration.
pub struct ScrapePipeline {
    renderer: PageRenderer,
}

impl ScrapePipeline {
    pub fn new(browser: Box<dyn Browser>, options: RenderOptions) -> Self {
        Self {
            renderer: PageRenderer::new(browser, options),
        }
    }

    /// Fetch, expand, and parse one card detail page.
    pub async fn scrape(&self, url: &str) -> Result<CardBenefits, ScrapeError> {
        let markup = self.renderer.render(url).await?;
        extract::parse(&markup, url)
    }

    /// Like [`scrape`](Self::scrape), collapsed into the JSON-serializable
    /// success-or-error shape handed to the tool layer.
    pub async fn scrape_result(&self, url: &str) -> CardBenefitResult {
        self.scrape(url).await.into()
    }
}
