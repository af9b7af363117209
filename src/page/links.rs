// src/page/links.rs
// =============================================================================
// This module pulls the raw href values out of a parsed HTML document.
//
// Nothing is resolved or filtered here - that is the normalizer's job. We
// only walk the <a> tags in document order and keep the ones that actually
// carry an href attribute.
// =============================================================================

use scraper::{Html, Selector};
use std::sync::OnceLock;

// "a[href]" means "all <a> tags that have an href attribute"
fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("static selector is valid"))
}

// Returns every href on the page, in the order the anchors appear.
//
// Malformed markup never makes this fail: html5ever repairs what it can and
// we simply see whatever anchors survived parsing.
pub fn extract_links(document: &Html) -> Vec<String> {
    document
        .select(anchor_selector())
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
