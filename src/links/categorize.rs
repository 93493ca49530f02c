// src/links/categorize.rs
// =============================================================================
// Splits an extracted link set into internal, external and resource links.
//
// internal / external: decided only by comparing the link's host with the
//   page's host. Every link with a host lands in exactly one of the two.
// resources: an independent tag for links whose path ends in a known file
//   extension. A CDN image is both "external" and a "resource"; that overlap
//   is intentional.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;

use super::extract::LinkSet;

/// File extensions (lowercase) that mark a link as a resource:
/// images, stylesheets, scripts, documents and archives.
pub const RESOURCE_EXTENSIONS: [&str; 9] =
    ["jpg", "jpeg", "png", "gif", "css", "js", "pdf", "doc", "zip"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizedLinks {
    pub internal: LinkSet,
    pub external: LinkSet,
    pub resources: LinkSet,
}

impl CategorizedLinks {
    /// Internal followed by external, i.e. every categorized link once.
    pub fn all_pages(&self) -> impl Iterator<Item = &super::NormalizedLink> {
        self.internal.iter().chain(self.external.iter())
    }
}

// Categorizes links relative to `base_domain` (e.g. "example.com")
pub fn categorize(links: &LinkSet, base_domain: &str) -> CategorizedLinks {
    let mut categorized = CategorizedLinks::default();

    for link in links {
        let Some(host) = link.host() else {
            continue;
        };

        if host == base_domain {
            categorized.internal.insert(link.clone());
        } else {
            categorized.external.insert(link.clone());
        }

        if is_resource_path(&link.path()) {
            categorized.resources.insert(link.clone());
        }
    }

    categorized
}

// Checks the last path segment's extension against RESOURCE_EXTENSIONS
//
// Query strings and fragments are not part of the path, so
// "/logo.png?v=3" still counts as a resource.
pub fn is_resource_path(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or_default();
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => RESOURCE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}

/// Number of links per host, for the external-domain breakdown.
pub fn domain_stats(links: &LinkSet) -> BTreeMap<String, usize> {
    let mut stats = BTreeMap::new();
    for host in links.iter().filter_map(|link| link.host()) {
        *stats.entry(host).or_insert(0) += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::NormalizedLink;

    fn set(urls: &[&str]) -> LinkSet {
        urls.iter().map(|u| NormalizedLink::parse(u).unwrap()).collect()
    }

    #[test]
    fn test_internal_external_partition() {
        let links = set(&[
            "https://example.com/",
            "https://example.com/about",
            "https://www.example.com/",
            "https://other.com/x",
        ]);
        let categorized = categorize(&links, "example.com");

        assert_eq!(categorized.internal.len(), 2);
        assert_eq!(categorized.external.len(), 2);
        for link in &links {
            assert!(
                categorized.internal.contains(link) ^ categorized.external.contains(link),
                "{} must be in exactly one of internal/external",
                link
            );
        }
    }

    #[test]
    fn test_resource_tag_is_independent() {
        let links = set(&[
            "https://example.com/style.css",
            "https://cdn.other.com/logo.PNG",
            "https://example.com/page",
        ]);
        let categorized = categorize(&links, "example.com");

        assert_eq!(categorized.resources, set(&[
            "https://example.com/style.css",
            "https://cdn.other.com/logo.PNG",
        ]));
        assert!(categorized.internal.contains(&NormalizedLink::parse("https://example.com/style.css").unwrap()));
        assert!(categorized.external.contains(&NormalizedLink::parse("https://cdn.other.com/logo.PNG").unwrap()));
    }

    #[test]
    fn test_is_resource_path() {
        assert!(is_resource_path("/a/b/report.pdf"));
        assert!(is_resource_path("/bundle.min.js"));
        assert!(is_resource_path("/IMG.JPEG"));
        assert!(!is_resource_path("/blog/"));
        assert!(!is_resource_path("/index.html"));
        assert!(!is_resource_path("/.css"));
        assert!(!is_resource_path("/zip"));
    }

    #[test]
    fn test_domain_stats() {
        let links = set(&[
            "https://a.com/1",
            "https://a.com/2",
            "https://b.com/",
        ]);
        let stats = domain_stats(&links);
        assert_eq!(stats.get("a.com"), Some(&2));
        assert_eq!(stats.get("b.com"), Some(&1));
    }
}
