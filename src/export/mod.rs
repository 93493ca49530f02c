// src/export/mod.rs
// =============================================================================
// Output formats for a finished scrape.
//
// Submodules:
// - xml: link collection and sitemap documents
// - json: full result and broken-links report
// =============================================================================

mod json;
mod xml;

pub use json::{broken_links_report_json, result_json, BrokenLinksReport, WORKING_SAMPLE_SIZE};
pub use xml::{escape_xml, link_collection_xml, sitemap_xml, LinkKind};
