// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The CLI is the only configuration surface: a seed URL plus a few knobs
// for depth, concurrency and timeouts. Logging verbosity comes from -v or
// the RUST_LOG environment variable.
// =============================================================================

use clap::Parser;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::crawl::CrawlConfig;

#[derive(Parser, Debug)]
#[command(
    name = "wave-crawler",
    version = "0.1.0",
    about = "Crawl a website breadth-first, one depth level at a time",
    long_about = "wave-crawler starts at a seed URL and fetches pages in waves: \
                  wave 0 is the seed, wave 1 is every page the seed links to, \
                  and so on until --max-depth waves have run. \
                  Each URL is fetched at most once."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com)
    pub seed_url: String,

    /// Number of waves to run (1 = just the seed page)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_depth: u32,

    /// Maximum number of pages fetched at the same time
    ///
    /// Without this flag every page of a wave is fetched at once.
    #[arg(long)]
    pub max_concurrency: Option<NonZeroUsize>,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Print the crawl summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log every page fetched, not just wave progress
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        let timeout = match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        CrawlConfig {
            max_depth: self.max_depth,
            max_concurrency: self.max_concurrency,
            timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["wave-crawler", "https://example.com"]).unwrap();
        let config = cli.crawl_config();

        assert_eq!(cli.seed_url, "https://example.com");
        assert_eq!(config.max_depth, 3);
        assert!(config.max_concurrency.is_none());
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert!(!cli.json);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "wave-crawler",
            "https://example.com",
            "--max-depth",
            "5",
            "--max-concurrency",
            "8",
            "--timeout-secs",
            "0",
            "--json",
            "-v",
        ])
        .unwrap();
        let config = cli.crawl_config();

        assert_eq!(config.max_depth, 5);
        assert_eq!(config.max_concurrency, NonZeroUsize::new(8));
        assert_eq!(config.timeout, None);
        assert!(cli.json);
        assert!(cli.verbose);
    }

    #[test]
    fn test_zero_depth_rejected() {
        assert!(
            Cli::try_parse_from(["wave-crawler", "https://example.com", "--max-depth", "0"])
                .is_err()
        );
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(
            Cli::try_parse_from(["wave-crawler", "https://example.com", "--max-concurrency", "0"])
                .is_err()
        );
    }

    #[test]
    fn test_seed_required() {
        assert!(Cli::try_parse_from(["wave-crawler"]).is_err());
    }
}
