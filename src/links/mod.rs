// src/links/mod.rs
// =============================================================================
// This module turns raw HTML into a classified set of links.
//
// Submodules:
// - normalize: resolves one raw reference into an absolute URL
// - extract: walks the document and builds the deduplicated link set
// - categorize: internal / external / resource classification
// - metadata: title, meta tags and media lists of the page
//
// All of it is pure: no network access, no global state. Each call owns
// the sets it builds.
// =============================================================================

mod categorize;
mod extract;
mod metadata;
mod normalize;

pub use categorize::{categorize, domain_stats, is_resource_path, CategorizedLinks, RESOURCE_EXTENSIONS};
pub use extract::{extract, extract_links, raw_references, LinkSet, RawReference, SourceAttribute};
pub use metadata::{extract_metadata, PageMetadata};
pub use normalize::{extract_domain, is_valid_url, normalize, NormalizedLink};
