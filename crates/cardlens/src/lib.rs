//! CardLens core — the fetch-expand-extract pipeline for card benefit pages.
//!
//! Drives a headless browser to a card detail page, clicks every collapsible
//! benefit panel open in document order, and parses the expanded markup into
//! a card name plus an ordered list of benefit records.
//!
//! The browser sits behind the [`browser::Browser`] / [`browser::BrowserPage`]
//! traits so the pipeline is testable without chromium;
//! [`browser::chromium::ChromiumBrowser`] is the production backend.
//!
//! # Example (conceptual)
//!
//! ```ignore
//! use cardlens::browser::chromium::{ChromiumBrowser, ChromiumConfig};
//! use cardlens::{RenderOptions, ScrapePipeline};
//!
//! let browser = ChromiumBrowser::new(ChromiumConfig::default());
//! let pipeline = ScrapePipeline::new(Box::new(browser), RenderOptions::default());
//! let result = pipeline.scrape_result("https://example.test/card/1").await;
//! println!("{}", serde_json::to_string(&result)?);
//! ```

pub mod benefit;
pub mod browser;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod render;
pub mod selectors;

pub use benefit::{BenefitRecord, CardBenefitResult, CardBenefits};
pub use error::ScrapeError;
pub use pipeline::ScrapePipeline;
pub use render::{PageRenderer, RenderOptions, RenderedMarkup};
