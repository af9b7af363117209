// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, written to stderr)
// 3. Validate the seed URL and run the crawl
// 4. Print the summary and "Crawling complete."
// 5. Exit with proper code (0 = crawl finished, 2 = could not start)
//
// Individual pages failing does NOT change the exit code: those failures are
// logged as they happen and counted in the summary.
// =============================================================================

mod cli;    // src/cli.rs - command-line parsing
mod crawl;  // src/crawl/ - wave scheduling and shared crawl state
mod page;   // src/page/ - fetching, link extraction, URL normalization

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use crawl::{CrawlSummary, Crawler};
use page::NormalizedUrl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise info, or debug with -v.
// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wave_crawler={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let seed = NormalizedUrl::parse(&cli.seed_url).ok_or_else(|| {
        anyhow!(
            "Invalid seed URL '{}': expected an absolute http(s) URL",
            cli.seed_url
        )
    })?;

    let crawler = Crawler::new(cli.crawl_config())?;

    if !cli.json {
        println!("🔍 Crawling from: {}", seed);
        println!("📊 Max depth: {}", cli.max_depth);
    }

    let summary = crawler.run(seed).await;

    print_summary(&summary, cli.json)?;
    if cli.json {
        eprintln!("Crawling complete.");
    } else {
        println!("Crawling complete.");
    }
    Ok(())
}

fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print_table(summary);
    }
    Ok(())
}

fn print_table(summary: &CrawlSummary) {
    println!("{:<8} {:<12} {:<10} {:<12}", "WAVE", "FETCHED", "FAILED", "DISCOVERED");
    println!("{}", "=".repeat(44));

    for wave in &summary.waves {
        println!(
            "{:<8} {:<12} {:<10} {:<12}",
            wave.depth,
            wave.dispatched.len(),
            wave.failed,
            wave.discovered
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Fetched: {}", summary.fetched());
    println!("   ❌ Failed: {}", summary.failed());
    println!("   🌐 Distinct URLs: {}", summary.visited);
}
