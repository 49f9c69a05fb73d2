//! Typed failures for the scrape pipeline.

use thiserror::Error;

/// Everything that can go wrong between `render(url)` and the parsed result.
///
/// One variant per failure class, so callers and tests can distinguish
/// causes instead of matching on message text.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The browser could not be launched, or a page-level primitive
    /// (query, click, capture) failed mid-render.
    #[error("browser failure: {0}")]
    Browser(String),

    /// The target was unreachable, the URL was malformed, or navigation
    /// exceeded its bound.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// A required anchor element never appeared within its bound; the page
    /// does not match the expected layout.
    #[error("page does not match expected layout: `{selector}` not found within {timeout_ms}ms")]
    StructuralTimeout { selector: String, timeout_ms: u64 },

    /// A benefit block was missing a required sub-element.
    #[error("parse failure: {0}")]
    Parse(String),
}
