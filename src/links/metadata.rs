// src/links/metadata.rs
// =============================================================================
// Page-level details gathered alongside the links: title, meta description,
// Open Graph tags, and the media/script/stylesheet URLs the page references.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::BTreeSet;

use super::normalize::{normalize, NormalizedLink};

pub const NO_TITLE: &str = "No title found";
pub const NO_DESCRIPTION: &str = "No description found";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    #[serde(rename = "metaDescription")]
    pub description: String,
    #[serde(rename = "metaKeywords")]
    pub keywords: String,
    pub canonical_url: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub images: BTreeSet<NormalizedLink>,
    pub videos: BTreeSet<NormalizedLink>,
    pub scripts: BTreeSet<NormalizedLink>,
    pub stylesheets: BTreeSet<NormalizedLink>,
}

pub fn extract_metadata(document: &Html, base: &str) -> PageMetadata {
    let title = first(document, "title")
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = attr_of(document, r#"meta[name="description"]"#, "content")
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    PageMetadata {
        title,
        description,
        keywords: attr_of(document, r#"meta[name="keywords"]"#, "content").unwrap_or_default(),
        canonical_url: attr_of(document, r#"link[rel="canonical"]"#, "href").unwrap_or_default(),
        og_title: attr_of(document, r#"meta[property="og:title"]"#, "content").unwrap_or_default(),
        og_description: attr_of(document, r#"meta[property="og:description"]"#, "content")
            .unwrap_or_default(),
        og_image: attr_of(document, r#"meta[property="og:image"]"#, "content").unwrap_or_default(),
        images: collect(document, "img[src]", "src", base),
        videos: collect(document, "video[src], video source[src]", "src", base),
        scripts: collect(document, "script[src]", "src", base),
        stylesheets: collect(document, r#"link[rel="stylesheet"][href]"#, "href", base),
    }
}

// Selectors here are string constants; a bad one just yields no match
fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    let element = document.select(&selector).next();
    element
}

fn attr_of(document: &Html, css: &str, attr: &str) -> Option<String> {
    first(document, css)
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
}

fn collect(document: &Html, css: &str, attr: &str, base: &str) -> BTreeSet<NormalizedLink> {
    let Some(selector) = selector(css) else {
        return BTreeSet::new();
    };
    let links = document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .filter_map(|value| normalize(value, base).ok())
        .collect();
    links
}
