//! Benefit extraction from the expanded page markup.

use crate::benefit::{BenefitRecord, CardBenefits, NO_DETAILS, UNKNOWN_CARD};
use crate::error::ScrapeError;
use crate::render::RenderedMarkup;
use crate::selectors;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::info;

static CARD_NAME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(selectors::CARD_NAME).unwrap());

static BENEFIT_BLOCK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(selectors::BENEFIT_BLOCK).unwrap());

static CATEGORY_LABEL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(selectors::CATEGORY_LABEL).unwrap());

static SUMMARY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(selectors::SUMMARY).unwrap());

static DETAILS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(selectors::DETAILS).unwrap());

/// Parse the expanded markup into a card name and ordered benefit records.
///
/// A missing card name is non-fatal and degrades to [`UNKNOWN_CARD`]. A
/// missing required sub-element in any block fails the whole parse; no
/// partial results are returned.
pub fn parse(markup: &RenderedMarkup, url: &str) -> Result<CardBenefits, ScrapeError> {
    let document = Html::parse_document(markup.as_str());

    let card_name = document
        .select(&CARD_NAME_SEL)
        .next()
        .map(element_text)
        .unwrap_or_else(|| UNKNOWN_CARD.to_string());

    let mut benefits = Vec::new();
    for (index, block) in document.select(&BENEFIT_BLOCK_SEL).enumerate() {
        benefits.push(parse_block(block, index)?);
    }

    info!(blocks = benefits.len(), "extracted benefit blocks");

    Ok(CardBenefits {
        card_name,
        benefits,
        url: url.to_string(),
    })
}

fn parse_block(block: ElementRef<'_>, index: usize) -> Result<BenefitRecord, ScrapeError> {
    let category = block.select(&CATEGORY_LABEL_SEL).next().ok_or_else(|| {
        ScrapeError::Parse(format!(
            "benefit block {index} has no `{}` category label",
            selectors::CATEGORY_LABEL
        ))
    })?;
    let summary = block.select(&SUMMARY_SEL).next().ok_or_else(|| {
        ScrapeError::Parse(format!(
            "benefit block {index} has no `{}` summary",
            selectors::SUMMARY
        ))
    })?;
    let details = block
        .select(&DETAILS_SEL)
        .next()
        .map(details_text)
        .unwrap_or_else(|| NO_DETAILS.to_string());

    Ok(BenefitRecord {
        category: element_text(category),
        summary: element_text(summary),
        details,
    })
}

/// Concatenated text content of an element, trimmed at the edges.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text content with line breaks preserved: every text fragment starts a
/// new line, each line is trimmed, blank lines are dropped.
fn details_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(|fragment| fragment.split('\n'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
