// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Features:
// - Breadth-first crawling in depth-synchronized waves
// - Every URL is fetched at most once per crawl
// - Fixed number of waves (max depth)
// - Optional cap on concurrent fetches and a per-fetch deadline
//
// Submodules:
// - state: visited registry and frontier (the shared, locked state)
// - wave: the orchestrator that runs one wave after another
// =============================================================================

mod state;
mod wave;

pub use wave::{CrawlConfig, CrawlSummary, Crawler};
