//! MCP stdio server for CardLens.
//!
//! Speaks newline-delimited JSON-RPC 2.0 on stdin/stdout, exposes the card
//! catalog as a resource and a listing tool, and fronts the cardlens scrape
//! pipeline as a URL-validated tool. Requests for URLs outside the catalog
//! are rejected before any browser is launched.

pub mod catalog;
pub mod protocol;
pub mod server;
