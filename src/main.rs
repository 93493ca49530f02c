// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, on stderr so stdout stays clean for output)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

use link_scout::cli::{Cli, Commands, OutputFormat};
use link_scout::config::{FetchMode, ProbeConfig, ScrapeConfig};
use link_scout::export::{self, LinkKind};
use link_scout::http::{HttpClient, ReqwestClient};
use link_scout::links::NormalizedLink;
use link_scout::probe::{self, ProbeOutcome, ProbeResult, ProbeSummary};
use link_scout::server::{self, AppState};
use link_scout::{ScrapeResult, Scraper};

#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = everything fine
//   Ok(1) = broken or unreachable links found
//   Err   = validation, fetch or I/O failure
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Scrape {
            url,
            proxy,
            advanced,
            max_links,
            check,
            max_concurrent,
            format,
            output,
        } => {
            let config = ScrapeConfig {
                proxy: Some(proxy),
                advanced,
                max_links,
                probe: ProbeConfig::default().with_max_concurrent(max_concurrent),
            };
            let check = check || format == OutputFormat::Report;
            handle_scrape(&url, config, check, format, output.as_deref()).await
        }
        Commands::Check { urls, max_concurrent, json } => {
            handle_check(&urls, max_concurrent, json).await
        }
        Commands::Serve { bind, advanced } => {
            let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new()?);
            let mut state = AppState::new(client);
            if advanced {
                state.fetch_mode = FetchMode::Extended;
            }
            server::serve(&bind, state).await?;
            Ok(0)
        }
    }
}

// Logs go to stderr; WARN by default, DEBUG with -v, ERROR with -q
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else if matches!(cli.command, Commands::Serve { .. }) {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn handle_scrape(
    url: &str,
    config: ScrapeConfig,
    check: bool,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<i32> {
    let scraper = Scraper::new(ReqwestClient::new()?, config);

    eprintln!("🔍 Scraping: {}", url);
    let result = scraper.scrape(url).await?;
    eprintln!(
        "📄 {} link(s) via {} ({} internal, {} external, {} resources)",
        result.total_links,
        result.proxy_used,
        result.unique_internal_links,
        result.unique_external_links,
        result.resource_links
    );

    let summary = if check {
        let links = result.links_to_check();
        eprintln!(
            "\n🌐 Checking {} link(s) in {} batch(es)...\n",
            links.len(),
            probe::batch_count(links.len(), scraper.config().probe.max_concurrent)
        );
        Some(scraper.check(&result).await)
    } else {
        None
    };

    let now = Utc::now();
    let rendered = match format {
        OutputFormat::Table => render_scrape_table(&result, summary.as_ref()),
        OutputFormat::Json => export::result_json(&result)?,
        OutputFormat::XmlInternal => export::link_collection_xml(&result, LinkKind::Internal, now),
        OutputFormat::XmlExternal => export::link_collection_xml(&result, LinkKind::External, now),
        OutputFormat::Sitemap => export::sitemap_xml(&result, now),
        OutputFormat::Report => {
            let summary = summary.as_ref().context("The report format needs a link check")?;
            export::broken_links_report_json(&result, summary, now)?
        }
    };

    write_output(&rendered, output)?;

    Ok(exit_code(summary.as_ref()))
}

async fn handle_check(urls: &[String], max_concurrent: usize, json: bool) -> Result<i32> {
    // Invalid input is reported and skipped, never sent over the network
    let links: Vec<NormalizedLink> = urls
        .iter()
        .filter_map(|url| match NormalizedLink::parse(url) {
            Ok(link) => Some(link),
            Err(e) => {
                warn!("Skipping {}: {}", url, e);
                None
            }
        })
        .collect();

    if links.is_empty() {
        eprintln!("⚠️  No valid URLs to check");
        return Ok(2);
    }

    let config = ProbeConfig::default().with_max_concurrent(max_concurrent);
    eprintln!("🌐 Checking {} link(s)...\n", links.len());

    let client = ReqwestClient::new()?;
    let summary = probe::probe(&client, &links, &config).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_probe_table(&summary));
    }

    Ok(exit_code(Some(&summary)))
}

fn exit_code(summary: Option<&ProbeSummary>) -> i32 {
    match summary {
        Some(summary) if !summary.all_working() => 1,
        _ => 0,
    }
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("💾 Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn render_scrape_table(result: &ScrapeResult, summary: Option<&ProbeSummary>) -> String {
    let mut out = String::new();
    out.push_str(&format!("Title:       {}\n", result.metadata.title));
    out.push_str(&format!("Description: {}\n", result.metadata.description));
    out.push_str(&format!("Domain:      {}\n\n", result.base_domain));

    out.push_str(&format!("{:<70} {:<10} {:<8}\n", "URL", "TYPE", "RESOURCE"));
    out.push_str(&format!("{}\n", "=".repeat(90)));
    let categorized = &result.categorized_links;
    for (kind, links) in [("internal", &categorized.internal), ("external", &categorized.external)] {
        for link in links {
            let resource = if categorized.resources.contains(link) { "yes" } else { "" };
            out.push_str(&format!("{:<70} {:<10} {:<8}\n", truncate(link.as_str(), 67), kind, resource));
        }
    }

    if !result.external_domains.is_empty() {
        out.push_str("\n🌍 External domains:\n");
        for (domain, count) in &result.domain_stats {
            out.push_str(&format!("   {:<40} {}\n", domain, count));
        }
    }

    out.push_str(&format!(
        "\n📊 Links: {} (found {}), internal {}, external {}, resources {}\n",
        result.total_links,
        result.total_links_found,
        result.unique_internal_links,
        result.unique_external_links,
        result.resource_links
    ));
    if result.analysis_stats.link_limit_applied {
        out.push_str("   ⚠️  Link limit applied; use --advanced to keep every link\n");
    }

    if let Some(summary) = summary {
        out.push('\n');
        out.push_str(&render_probe_table(summary));
    }
    out
}

// Prints results as a human-readable table in the terminal
fn render_probe_table(summary: &ProbeSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<60} {:<15} {:<30}\n", "URL", "STATUS", "MESSAGE"));
    out.push_str(&format!("{}\n", "=".repeat(105)));

    let rows = summary.broken.iter().chain(&summary.unreachable).chain(&summary.working);
    for result in rows {
        out.push_str(&format!(
            "{:<60} {:<15} {:<30}\n",
            truncate(result.url.as_str(), 57),
            format_status(result),
            message(result)
        ));
    }

    out.push_str("\n📊 Summary:\n");
    out.push_str(&format!("   ✅ Working: {}\n", summary.working_count));
    out.push_str(&format!("   ❌ Broken: {}\n", summary.broken_count));
    out.push_str(&format!("   ⏱️  Unreachable: {}\n", summary.unreachable_count));
    out.push_str(&format!("   📋 Total: {}\n", summary.total));
    out
}

fn format_status(result: &ProbeResult) -> &'static str {
    match result.outcome {
        ProbeOutcome::Working => "✅ WORKING",
        ProbeOutcome::Broken => "❌ BROKEN",
        ProbeOutcome::Timeout => "⏱️  TIMEOUT",
    }
}

fn message(result: &ProbeResult) -> String {
    match (&result.error, result.status_code) {
        (Some(error), _) => error.clone(),
        (None, Some(code)) => format!("HTTP {}", code),
        (None, None) => String::new(),
    }
}

// Truncate URL if too long for display
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}
