// src/crawl/mod.rs
// =============================================================================
// This module is the mirror crawler.
//
// Pieces:
// - registry: the set of URLs already claimed (no duplicate fetches)
// - limiter: the fetch permit pool (caps in-flight requests)
// - resolver: raw page references -> absolute same-host URLs
// - orchestrator: the recursive fetch -> save -> expand -> join loop
// =============================================================================

mod limiter;
mod orchestrator;
mod registry;
mod resolver;

// Re-export the pieces the binary needs
pub use orchestrator::{CrawlReport, Crawler};
