// src/export/xml.rs
// =============================================================================
// XML exports of a scrape: a link collection (internal or external) with a
// metadata header, and a sitemap of the internal links.
//
// These are plain string builders; the data is already computed and only
// needs escaping.
// =============================================================================

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::links::{extract_domain, LinkSet};
use crate::scrape::ScrapeResult;

pub const TOOL_NAME: &str = "link-scout";

// Which half of the partition to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Internal => "internal",
            LinkKind::External => "external",
        }
    }

    fn links(self, result: &ScrapeResult) -> &LinkSet {
        match self {
            LinkKind::Internal => &result.categorized_links.internal,
            LinkKind::External => &result.categorized_links.external,
        }
    }
}

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<linkCollection>` document for one kind of link.
pub fn link_collection_xml(result: &ScrapeResult, kind: LinkKind, generated: DateTime<Utc>) -> String {
    let links = kind.links(result);
    let mut xml = String::new();

    // Writing to a String can't fail
    let _ = writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        xml,
        r#"<linkCollection type="{}" generated="{}">"#,
        kind.as_str(),
        generated.to_rfc3339()
    );
    let _ = writeln!(xml, "  <metadata>");
    let _ = writeln!(xml, "    <sourceUrl>{}</sourceUrl>", escape_xml(&result.original_url));
    let _ = writeln!(xml, "    <sourceDomain>{}</sourceDomain>", escape_xml(&result.base_domain));
    let _ = writeln!(xml, "    <scrapeTimestamp>{}</scrapeTimestamp>", result.timestamp.to_rfc3339());
    let _ = writeln!(xml, "    <totalLinks>{}</totalLinks>", links.len());
    let _ = writeln!(xml, "    <scrapeMethod>proxy-chain</scrapeMethod>");
    let _ = writeln!(xml, "    <tool>{}</tool>", TOOL_NAME);
    let _ = writeln!(xml, "  </metadata>");
    let _ = writeln!(xml, "  <links>");

    for (index, link) in links.iter().enumerate() {
        let domain = extract_domain(link.as_str()).unwrap_or_default();
        let _ = writeln!(xml, r#"    <link id="{}">"#, index + 1);
        let _ = writeln!(xml, "      <url>{}</url>", escape_xml(link.as_str()));
        let _ = writeln!(xml, "      <domain>{}</domain>", escape_xml(&domain));
        let _ = writeln!(xml, "      <type>{}</type>", kind.as_str());
        let _ = writeln!(xml, "    </link>");
    }

    let _ = writeln!(xml, "  </links>");
    xml.push_str("</linkCollection>");
    xml
}

/// Sitemap (sitemaps.org 0.9) of the internal links.
pub fn sitemap_xml(result: &ScrapeResult, generated: DateTime<Utc>) -> String {
    let lastmod = generated.format("%Y-%m-%d").to_string();
    let mut xml = String::new();

    let _ = writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(xml, r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    for link in &result.categorized_links.internal {
        let _ = writeln!(xml, "  <url>");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(link.as_str()));
        let _ = writeln!(xml, "    <lastmod>{}</lastmod>", lastmod);
        let _ = writeln!(xml, "    <changefreq>monthly</changefreq>");
        let _ = writeln!(xml, "    <priority>0.5</priority>");
        let _ = writeln!(xml, "  </url>");
    }
    xml.push_str("</urlset>");
    xml
}
