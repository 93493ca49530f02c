// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Some flags can also come from the environment (LINK_SCOUT_*), which is
// handy for the server running under a process manager.
// =============================================================================

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_MAX_CONCURRENT, DEFAULT_MAX_LINKS};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "link-scout",
    version,
    about = "Fetch a page through CORS proxies, extract and categorize its links, and check them",
    long_about = "link-scout retrieves a web page (directly or through a chain of public CORS proxies), \
                  extracts every link and resource reference, sorts them into internal, external and \
                  resource links, and can check each one for availability."
)]
pub struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape one page and list its links
    ///
    /// Example: link-scout scrape https://example.com --check
    Scrape {
        /// Page to scrape (e.g., https://example.com)
        url: String,

        /// Proxy to use: "auto" tries every known proxy, "direct" uses none,
        /// or name one (allorigins, cors-anywhere, codetabs)
        #[arg(long, env = "LINK_SCOUT_PROXY", default_value = "auto")]
        proxy: String,

        /// Advanced mode: 30s fetch timeout and no link limit
        #[arg(long)]
        advanced: bool,

        /// Maximum number of links kept outside advanced mode
        #[arg(long, default_value_t = DEFAULT_MAX_LINKS)]
        max_links: usize,

        /// Also check every internal and external link
        #[arg(long)]
        check: bool,

        /// Links checked at the same time
        #[arg(long, env = "LINK_SCOUT_MAX_CONCURRENT", default_value_t = DEFAULT_MAX_CONCURRENT)]
        max_concurrent: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },

    /// Check a list of URLs for availability
    ///
    /// Example: link-scout check https://example.com https://example.org/missing
    Check {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,

        /// Links checked at the same time
        #[arg(long, env = "LINK_SCOUT_MAX_CONCURRENT", default_value_t = DEFAULT_MAX_CONCURRENT)]
        max_concurrent: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Serve the /api/proxy endpoint
    ///
    /// Example: link-scout serve --bind 0.0.0.0:8080
    Serve {
        /// Address to listen on
        #[arg(long, env = "LINK_SCOUT_BIND", default_value = "127.0.0.1:3000")]
        bind: String,

        /// Use the 30s fetch timeout for every request
        #[arg(long)]
        advanced: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    Table,
    /// Full scrape result as JSON
    Json,
    /// Internal links as a link collection XML
    XmlInternal,
    /// External links as a link collection XML
    XmlExternal,
    /// Sitemap of the internal links
    Sitemap,
    /// Broken-links report as JSON (implies --check)
    Report,
}
