//! The card catalog: whitelist of known card names and detail URLs.
//!
//! Loaded once at startup and treated as immutable for the process
//! lifetime. The scrape tool only accepts URLs that appear here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One known card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCatalogEntry {
    pub name: String,
    pub url: String,
}

/// Ordered card whitelist.
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    entries: Vec<CardCatalogEntry>,
}

impl CardCatalog {
    pub fn new(entries: Vec<CardCatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load from a JSON file holding an ordered array of `{name, url}`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading card catalog {}", path.display()))?;
        let entries: Vec<CardCatalogEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing card catalog {}", path.display()))?;
        Ok(Self { entries })
    }

    /// Membership check; returns the matching entry on a hit.
    pub fn lookup(&self, url: &str) -> Option<&CardCatalogEntry> {
        self.entries.iter().find(|entry| entry.url == url)
    }

    /// All entries in load order.
    pub fn entries(&self) -> &[CardCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
