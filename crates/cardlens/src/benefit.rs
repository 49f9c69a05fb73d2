//! Data model for extracted card benefits.

use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};

/// Substituted when the card-name element is missing from the page.
pub const UNKNOWN_CARD: &str = "unknown card";

/// Substituted when a benefit block has no details region.
pub const NO_DETAILS: &str = "no detailed description";

/// One category of card benefit as shown on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitRecord {
    /// Category label of the block (e.g., "Shopping").
    pub category: String,
    /// One-line summary of the benefit.
    pub summary: String,
    /// Detail text with line breaks preserved, or [`NO_DETAILS`].
    pub details: String,
}

/// Successful scrape of one card detail page.
///
/// Serialized field order is `card_name`, `benefits`, `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBenefits {
    pub card_name: String,
    /// Benefit records in document order. No reordering, no deduplication.
    pub benefits: Vec<BenefitRecord>,
    pub url: String,
}

/// Terminal output of one pipeline invocation: the success payload or a
/// single `{"error": ...}` object, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardBenefitResult {
    Success(CardBenefits),
    Failure { error: String },
}

impl CardBenefitResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

impl From<Result<CardBenefits, ScrapeError>> for CardBenefitResult {
    fn from(result: Result<CardBenefits, ScrapeError>) -> Self {
        match result {
            Ok(benefits) => Self::Success(benefits),
            Err(e) => Self::Failure {
                error: e.to_string(),
            },
        }
    }
}
