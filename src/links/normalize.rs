// src/links/normalize.rs
// =============================================================================
// Turns a raw attribute value into an absolute URL.
//
// Rules, applied in order (after trimming whitespace):
// 1. "//cdn.example.com/x"  protocol-relative: borrow the base's scheme
// 2. "/about"               root-relative: base scheme + host + path
// 3. "docs/intro", "#top"   no scheme: standard relative resolution
// 4. "https://other.com/x"  already absolute
//
// Whatever comes out must parse and must have a host. If it doesn't, the
// reference is rejected with a NormalizationError and the caller drops it.
// That is how mailto:, javascript:, tel: and data: links fall out.
//
// Rust concepts:
// - Newtype pattern: NormalizedLink wraps a String so the type itself proves
//   the string went through validation
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::NormalizationError;

// An absolute URL with a scheme and a host
//
// The only ways to build one are normalize() and NormalizedLink::parse(),
// both of which validate. Serializes as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedLink(String);

impl NormalizedLink {
    /// Validates an absolute URL string.
    pub fn parse(input: &str) -> Result<Self, NormalizationError> {
        let url = Url::parse(input.trim())
            .map_err(|_| NormalizationError::Malformed(input.to_string()))?;
        Self::from_url(url)
    }

    fn from_url(url: Url) -> Result<Self, NormalizationError> {
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self(url.to_string())),
            _ => Err(NormalizationError::MissingHost(url.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The host part, e.g. "example.com".
    pub fn host(&self) -> Option<String> {
        extract_domain(&self.0)
    }

    /// The path part, without query or fragment.
    pub fn path(&self) -> String {
        Url::parse(&self.0)
            .map(|url| url.path().to_string())
            .unwrap_or_default()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Resolves `reference` against `base`
//
// Examples (base = "https://example.com/blog/post"):
//   "//cdn.example.com/a.js" -> "https://cdn.example.com/a.js"
//   "/about"                 -> "https://example.com/about"
//   "next"                   -> "https://example.com/blog/next"
//   "https://other.com"      -> "https://other.com/"
//   "mailto:a@b.c"           -> Err(MissingHost)
pub fn normalize(reference: &str, base: &str) -> Result<NormalizedLink, NormalizationError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(NormalizationError::Empty);
    }

    let base_url =
        Url::parse(base).map_err(|_| NormalizationError::InvalidBase(base.to_string()))?;

    let resolved = if reference.starts_with("//") {
        parse_absolute(&format!("{}:{}", base_url.scheme(), reference))?
    } else if reference.starts_with('/') {
        let authority = base_url
            .host_str()
            .map(|host| match base_url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            })
            .ok_or_else(|| NormalizationError::InvalidBase(base.to_string()))?;
        parse_absolute(&format!("{}://{}{}", base_url.scheme(), authority, reference))?
    } else if !has_scheme(reference) {
        base_url
            .join(reference)
            .map_err(|_| NormalizationError::Malformed(reference.to_string()))?
    } else {
        parse_absolute(reference)?
    };

    NormalizedLink::from_url(resolved)
}

fn parse_absolute(input: &str) -> Result<Url, NormalizationError> {
    Url::parse(input).map_err(|_| NormalizationError::Malformed(input.to_string()))
}

// True when the string starts with "scheme:" (RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ))
fn has_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// True for exactly the strings the URL parser accepts.
pub fn is_valid_url(input: &str) -> bool {
    Url::parse(input).is_ok()
}

/// Host of a URL, or None if it doesn't parse or has no host.
pub fn extract_domain(input: &str) -> Option<String> {
    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}
