// src/main.rs
// =============================================================================
// This is the entry point of site-mirror.
//
// What happens here:
// 1. Install the logger (tracing, writing to stderr)
// 2. Parse command-line arguments using clap
// 3. Validate them into a MirrorConfig
// 4. Run the crawler and print its report
// 5. Exit with proper code (0 = origin mirrored, 1 = error)
//
// The exit code only reflects the starting page. Pages further down that
// failed are listed in the report but do not change the exit code.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod extract;
mod fetch;
mod mirror;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::MirrorConfig;
use crawl::{CrawlReport, Crawler};
use extract::HtmlExtractor;
use fetch::HttpFetcher;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so that --json output on stdout stays parseable.
// RUST_LOG overrides the default level, e.g. RUST_LOG=site_mirror=debug
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,site_mirror=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Check the flags once; a bad URL stops us before any request is made
    let config = MirrorConfig::new(
        &cli.url,
        cli.depth,
        cli.output,
        usize::from(cli.concurrency),
        cli.assets,
        cli.skip_tls_verify,
    )?;

    // Real network + real HTML parser. Tests swap these for fakes
    let fetcher = HttpFetcher::new(config.skip_tls_verify).context("failed to build HTTP client")?;
    let crawler = Crawler::new(config, Arc::new(fetcher), Arc::new(HtmlExtractor::new()));

    // Only the starting page's failure comes back as Err here;
    // failures further down are listed inside the report
    let report = crawler
        .run()
        .await
        .with_context(|| format!("failed to mirror {}", cli.url))?;

    print_report(&report, cli.json)
}

// Prints the report either as JSON or as a short human-readable summary
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
        return Ok(());
    }

    if !report.is_complete() {
        println!("{:<60} ERROR", "URL");
        println!("{}", "=".repeat(100));
        for failure in report.failed.iter().chain(&report.unparsed) {
            println!("{:<60} {}", truncate(&failure.url, 57), failure.error);
        }
        println!();
    }

    let total_bytes: usize = report.persisted.iter().map(|e| e.bytes).sum();

    println!("Summary:");
    println!("   Saved: {} file(s), {} bytes", report.persisted.len(), total_bytes);
    println!("   Failed: {}", report.failed.len());
    println!("   Not scanned: {}", report.unparsed.len());
    println!("   Duplicate links skipped: {}", report.duplicates_skipped);
    println!("   Peak concurrent downloads: {}", report.peak_concurrency);

    if !report.is_complete() {
        println!("\nSome linked resources could not be mirrored; see the list above.");
    }

    Ok(())
}

// Shortens long URLs so the table columns stay aligned
fn truncate(url: &str, max: usize) -> String {
    if url.chars().count() > max {
        let head: String = url.chars().take(max).collect();
        format!("{}...", head)
    } else {
        url.to_string()
    }
}
