// src/links/extract.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Every element/attribute pair that can point at another resource is scanned:
//   a[href], link[href], area[href]              (href-bearing)
//   iframe[src], img[src], script[src], source[src] (src-bearing)
//
// Each value is normalized (see normalize.rs). Values that fail to normalize
// are dropped one by one, so a single bad href never stops the rest of the
// document from being extracted.
//
// Rust concepts:
// - BTreeSet: a set that also keeps its items sorted, so output is stable
// - LazyLock: build the selectors once, the first time they are used
// =============================================================================

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::trace;

use super::normalize::{is_valid_url, normalize, NormalizedLink};

/// A deduplicated collection of links. Only membership matters.
pub type LinkSet = BTreeSet<NormalizedLink>;

// Which attribute a raw reference came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceAttribute {
    Href,
    Src,
}

impl SourceAttribute {
    fn name(self) -> &'static str {
        match self {
            SourceAttribute::Href => "href",
            SourceAttribute::Src => "src",
        }
    }
}

/// An attribute value pulled from the document, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    pub value: String,
    pub source: SourceAttribute,
}

const LINK_SELECTORS: [(&str, SourceAttribute); 7] = [
    ("a[href]", SourceAttribute::Href),
    ("link[href]", SourceAttribute::Href),
    ("area[href]", SourceAttribute::Href),
    ("iframe[src]", SourceAttribute::Src),
    ("img[src]", SourceAttribute::Src),
    ("script[src]", SourceAttribute::Src),
    ("source[src]", SourceAttribute::Src),
];

// The selectors are constants and known to be valid, so a parse failure
// here is a programmer error
static SELECTORS: LazyLock<Vec<(Selector, SourceAttribute)>> = LazyLock::new(|| {
    LINK_SELECTORS
        .iter()
        .map(|(css, attr)| (Selector::parse(css).expect("static link selector"), *attr))
        .collect()
});

// Collects every raw reference in the document, in document order per selector
pub fn raw_references(document: &Html) -> Vec<RawReference> {
    let mut references = Vec::new();

    for (selector, attr) in SELECTORS.iter() {
        for element in document.select(selector) {
            if let Some(value) = element.value().attr(attr.name()) {
                references.push(RawReference {
                    value: value.to_string(),
                    source: *attr,
                });
            }
        }
    }

    references
}

// Extracts all links from a parsed document
//
// Parameters:
//   document: the parsed HTML (only read, never modified)
//   base: the URL of the page (for resolving relative links)
//
// Returns: the set of distinct absolute links
pub fn extract(document: &Html, base: &str) -> LinkSet {
    let mut links = LinkSet::new();

    for reference in raw_references(document) {
        match normalize(&reference.value, base) {
            Ok(link) if is_valid_url(link.as_str()) => {
                links.insert(link);
            }
            Ok(link) => trace!("Dropping invalid link {}", link),
            Err(e) => trace!(
                "Dropping {} reference '{}': {}",
                reference.source.name(),
                reference.value,
                e
            ),
        }
    }

    links
}

/// Parses `html` and extracts its links in one go.
pub fn extract_links(html: &str, base: &str) -> LinkSet {
    let document = Html::parse_document(html);
    extract(&document, base)
}
