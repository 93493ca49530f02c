// src/fetch/proxy.rs
// =============================================================================
// The proxy strategies the fetch chain can use.
//
// Three shapes of CORS proxy exist in the wild, and we know one of each:
//
//   Envelope    https://api.allorigins.win/get?url=<encoded target>
//               answers with JSON: { "contents": "<html>..." , ... }
//   PathPrefix  https://cors-anywhere.herokuapp.com/<target as-is>
//               answers with the raw page
//   QueryParam  https://api.codetabs.com/v1/proxy?quest=<encoded target>
//               answers with the raw page
//
// Every strategy has the same two operations, build() and unwrap(), so the
// chain can walk a list of them without caring which kind each one is.
// =============================================================================

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::fmt;

pub const ALLORIGINS: &str = "allorigins";
pub const CORS_ANYWHERE: &str = "cors-anywhere";
pub const CODETABS: &str = "codetabs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyStrategy {
    /// Target URL encoded into the template; page nested under `contents`
    Envelope { id: String, template: String },
    /// Target URL appended verbatim to the template
    PathPrefix { id: String, template: String },
    /// Target URL encoded into the template; raw body
    QueryParam { id: String, template: String },
}

// allorigins wraps the page like this; other fields are ignored
#[derive(Debug, Deserialize)]
struct Envelope {
    contents: Option<String>,
}

impl ProxyStrategy {
    pub fn envelope(id: &str, template: &str) -> Self {
        ProxyStrategy::Envelope { id: id.to_string(), template: template.to_string() }
    }

    pub fn path_prefix(id: &str, template: &str) -> Self {
        ProxyStrategy::PathPrefix { id: id.to_string(), template: template.to_string() }
    }

    pub fn query_param(id: &str, template: &str) -> Self {
        ProxyStrategy::QueryParam { id: id.to_string(), template: template.to_string() }
    }

    pub fn id(&self) -> &str {
        match self {
            ProxyStrategy::Envelope { id, .. }
            | ProxyStrategy::PathPrefix { id, .. }
            | ProxyStrategy::QueryParam { id, .. } => id,
        }
    }

    pub fn template(&self) -> &str {
        match self {
            ProxyStrategy::Envelope { template, .. }
            | ProxyStrategy::PathPrefix { template, .. }
            | ProxyStrategy::QueryParam { template, .. } => template,
        }
    }

    /// Whether the target URL is percent-encoded into the endpoint.
    pub fn encodes_url(&self) -> bool {
        !matches!(self, ProxyStrategy::PathPrefix { .. })
    }

    // Builds the endpoint to request for `target`
    pub fn build(&self, target: &str) -> String {
        if self.encodes_url() {
            format!("{}{}", self.template(), encode_component(target))
        } else {
            format!("{}{}", self.template(), target)
        }
    }

    // Pulls the page out of a response body
    //
    // Envelope bodies that are not JSON are passed through as they are.
    // An envelope without `contents` yields "", which the chain treats as
    // empty content.
    pub fn unwrap(&self, body: String) -> String {
        match self {
            ProxyStrategy::Envelope { .. } => match serde_json::from_str::<Envelope>(&body) {
                Ok(envelope) => envelope.contents.unwrap_or_default(),
                Err(_) => body,
            },
            ProxyStrategy::PathPrefix { .. } | ProxyStrategy::QueryParam { .. } => body,
        }
    }
}

impl fmt::Display for ProxyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The built-in strategies, in the order `auto` mode tries them.
pub fn known_strategies() -> Vec<ProxyStrategy> {
    vec![
        ProxyStrategy::envelope(ALLORIGINS, "https://api.allorigins.win/get?url="),
        ProxyStrategy::path_prefix(CORS_ANYWHERE, "https://cors-anywhere.herokuapp.com/"),
        ProxyStrategy::query_param(CODETABS, "https://api.codetabs.com/v1/proxy?quest="),
    ]
}

// Everything except A-Z a-z 0-9 - _ . ! ~ * ' ( ) gets escaped, same as a
// browser's encodeURIComponent
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// Encodes the target as a query parameter value
fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}
