//! CSS anchors for the card detail page layout.
//!
//! These are deliberately site-specific; generalizing them across arbitrary
//! sites is out of scope.

/// Container that holds every benefit block. Structural anchor.
pub const BENEFITS_AREA: &str = "div.bene_area";

/// Element carrying the card's display name. Structural anchor.
pub const CARD_NAME: &str = "strong.card";

/// Collapsible toggle header of each benefit block, in document order.
pub const BENEFIT_TOGGLE: &str = "div.bene_area > dl > dt";

/// One benefit block per category.
pub const BENEFIT_BLOCK: &str = "div.bene_area > dl";

/// Category label inside a block. Required.
pub const CATEGORY_LABEL: &str = "p.txt1";

/// One-line summary inside a block. Required.
pub const SUMMARY: &str = "i";

/// Details region inside a block. Optional.
pub const DETAILS: &str = "dd";
