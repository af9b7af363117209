// src/page/mod.rs
// =============================================================================
// Everything that happens to a single page, with no shared state:
//
// - fetch: GET the page and parse it (Fetcher, FetchError)
// - links: list the raw href values of a parsed page
// - normalize: resolve an href against its page into a NormalizedUrl
//
// The crawl module strings these together and owns all coordination.
// =============================================================================

mod fetch;
mod links;
mod normalize;

pub use fetch::{FetchError, Fetcher};
pub use links::extract_links;
pub use normalize::{normalize, NormalizedUrl};
