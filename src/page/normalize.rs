// src/page/normalize.rs
// =============================================================================
// This module turns raw href values into absolute, fetchable URLs.
//
// A link found on a page is usually relative ("/about", "../img.png"), so it
// has to be resolved against the URL of the page it was found on before it
// can be queued for the next wave.
//
// Rules:
// - href must parse as a URL reference (absolute or relative)
// - javascript: and mailto: links are rejected
// - the base URL must parse too
// - the resolved URL must be http or https
//
// No further canonicalization happens: trailing slashes, query order and
// fragments are kept exactly as the `url` crate serializes them.
// =============================================================================

use serde::Serialize;
use std::fmt;
use url::{ParseError, Url};

// Schemes that are never followed, even before resolution
const REJECTED_SCHEMES: &[&str] = &["javascript", "mailto"];

// Schemes a NormalizedUrl is allowed to carry
const FETCHABLE_SCHEMES: &[&str] = &["http", "https"];

/// An absolute http(s) URL, compared by exact string equality.
///
/// Only [`normalize`] and [`NormalizedUrl::parse`] can build one, so holding a
/// `NormalizedUrl` means the value is already safe to hand to the fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    /// Parses an absolute URL (the crawl seed) under the same rules links follow.
    pub fn parse(absolute: &str) -> Option<Self> {
        let url = Url::parse(absolute).ok()?;
        Self::from_url(url)
    }

    fn from_url(url: Url) -> Option<Self> {
        if !FETCHABLE_SCHEMES.contains(&url.scheme()) {
            return None;
        }
        Some(Self(url.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Resolves `href` against `base` and returns the absolute URL, or None when
// the link should be dropped.
//
// Examples:
//   normalize("/about", "http://example.com/x/y") -> "http://example.com/about"
//   normalize("../z", "http://example.com/x/y")   -> "http://example.com/z"
//   normalize("mailto:a@b.com", "http://example.com") -> None
pub fn normalize(href: &str, base: &str) -> Option<NormalizedUrl> {
    // Parsing href on its own tells us whether it is absolute, relative, or
    // garbage. A relative reference is not an error here.
    match Url::parse(href) {
        Ok(absolute) if REJECTED_SCHEMES.contains(&absolute.scheme()) => return None,
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => {}
        Err(_) => return None,
    }

    // Base URLs come from pages we already fetched, so this only fails if
    // something upstream handed us a bad page URL.
    let base = Url::parse(base).ok()?;

    let resolved = base.join(href).ok()?;
    NormalizedUrl::from_url(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(href: &str, base: &str) -> Option<String> {
        normalize(href, base).map(|url| url.as_str().to_string())
    }

    #[test]
    fn test_root_relative_link() {
        assert_eq!(
            normalized("/about", "http://example.com/x/y"),
            Some("http://example.com/about".to_string())
        );
    }

    #[test]
    fn test_parent_relative_link() {
        assert_eq!(
            normalized("../z", "http://example.com/x/y"),
            Some("http://example.com/z".to_string())
        );
    }

    #[test]
    fn test_sibling_relative_link() {
        assert_eq!(
            normalized("page2", "http://example.com/docs/page1"),
            Some("http://example.com/docs/page2".to_string())
        );
    }

    #[test]
    fn test_absolute_link_passes_through() {
        assert_eq!(
            normalized("http://other.com/page", "http://example.com"),
            Some("http://other.com/page".to_string())
        );
    }

    #[test]
    fn test_scheme_relative_link_takes_base_scheme() {
        assert_eq!(
            normalized("//cdn.example.org/lib.js", "https://example.com/"),
            Some("https://cdn.example.org/lib.js".to_string())
        );
    }

    #[test]
    fn test_reject_mailto() {
        assert_eq!(normalized("mailto:a@b.com", "http://example.com"), None);
    }

    #[test]
    fn test_reject_javascript() {
        assert_eq!(normalized("javascript:void(0)", "http://example.com"), None);
        assert_eq!(normalized("JavaScript:alert(1)", "http://example.com"), None);
    }

    #[test]
    fn test_reject_non_http_schemes() {
        assert_eq!(normalized("tel:+15551234", "http://example.com"), None);
        assert_eq!(normalized("ftp://files.example.com/a", "http://example.com"), None);
    }

    #[test]
    fn test_reject_unparseable_href() {
        assert_eq!(normalized("http://[::1", "http://example.com"), None);
    }

    #[test]
    fn test_reject_unparseable_base() {
        assert_eq!(normalized("/about", "not a url"), None);
    }

    #[test]
    fn test_fragment_is_kept() {
        assert_eq!(
            normalized("#top", "http://example.com/x"),
            Some("http://example.com/x#top".to_string())
        );
    }

    #[test]
    fn test_parse_seed() {
        let seed = NormalizedUrl::parse("http://example.com").unwrap();
        assert_eq!(seed.as_str(), "http://example.com/");
        assert!(NormalizedUrl::parse("/relative").is_none());
        assert!(NormalizedUrl::parse("file:///etc/passwd").is_none());
    }

    #[test]
    fn test_back_link_matches_seed() {
        let seed = NormalizedUrl::parse("http://example.com").unwrap();
        let back = normalize("http://example.com", "http://example.com/page1").unwrap();
        assert_eq!(seed, back);
    }
}
