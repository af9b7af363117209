// src/crawl/wave.rs
// =============================================================================
// This module drives the crawl one depth level ("wave") at a time.
//
// How it works:
// 1. Take the whole frontier as this wave's snapshot (frontier is now empty)
// 2. Mark each snapshot URL as visited; skip the ones already marked
// 3. Spawn one task per remaining URL: fetch -> extract links -> normalize,
//    then append the results to the (new) frontier
// 4. Wait until every task of the wave has finished
// 5. depth += 1, repeat until max_depth waves have run
//
// Links found during wave N are only ever fetched in wave N+1, because the
// snapshot for wave N was taken before any of its tasks started.
//
// Per-page failures are logged and counted, never propagated: the crawl as a
// whole always completes.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn, Instrument};

use super::state::{Frontier, VisitedRegistry};
use crate::page::{extract_links, normalize, FetchError, Fetcher, NormalizedUrl};

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Number of waves to run; the seed is fetched in wave 0
    pub max_depth: u32,
    /// Upper bound on fetches in flight at once (None = one task per URL, all at once)
    pub max_concurrency: Option<NonZeroUsize>,
    /// Deadline for each individual fetch (None = wait forever)
    pub timeout: Option<Duration>,
}

/// What happened during one wave.
#[derive(Debug, Clone, Serialize)]
pub struct WaveReport {
    pub depth: u32,
    /// URLs that passed dedup and were handed to a fetch task
    pub dispatched: Vec<NormalizedUrl>,
    /// Tasks that ended in an error (bad status, transport, body, panic)
    pub failed: usize,
    /// Links queued for the next wave (before dedup)
    pub discovered: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub seed: NormalizedUrl,
    pub max_depth: u32,
    /// Distinct URLs dispatched across the whole crawl
    pub visited: usize,
    pub waves: Vec<WaveReport>,
}

impl CrawlSummary {
    pub fn fetched(&self) -> usize {
        self.waves.iter().map(|wave| wave.dispatched.len()).sum()
    }

    pub fn failed(&self) -> usize {
        self.waves.iter().map(|wave| wave.failed).sum()
    }
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Fetcher,
    limiter: Option<Arc<Semaphore>>,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let fetcher = Fetcher::new(config.timeout).context("Failed to create HTTP client")?;
        let limiter = config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.get())));

        Ok(Self {
            config,
            fetcher,
            limiter,
        })
    }

    // Runs exactly max_depth waves starting from `seed`.
    //
    // Waves keep running even when the frontier is empty; they just finish
    // immediately. All crawl state lives inside this call, so running the
    // same Crawler twice starts from scratch each time.
    pub async fn run(&self, seed: NormalizedUrl) -> CrawlSummary {
        let visited = VisitedRegistry::new();
        let frontier = Arc::new(Frontier::with_seed(seed.clone()));
        let mut waves = Vec::new();

        for depth in 0..self.config.max_depth {
            waves.push(self.run_wave(depth, &visited, &frontier).await);
        }

        let summary = CrawlSummary {
            seed,
            max_depth: self.config.max_depth,
            visited: visited.len(),
            waves,
        };
        info!(
            waves = summary.waves.len(),
            fetched = summary.fetched(),
            failed = summary.failed(),
            "crawling complete"
        );
        summary
    }

    #[instrument(level = "info", skip_all, fields(depth = depth))]
    async fn run_wave(
        &self,
        depth: u32,
        visited: &VisitedRegistry,
        frontier: &Arc<Frontier>,
    ) -> WaveReport {
        let snapshot = frontier.take();

        let mut tasks = JoinSet::new();
        let mut dispatched = Vec::new();
        for url in snapshot {
            if !visited.check_and_mark(&url) {
                debug!(%url, "already visited, skipping");
                continue;
            }
            dispatched.push(url.clone());

            let fetcher = self.fetcher.clone();
            let frontier = Arc::clone(frontier);
            let limiter = self.limiter.clone();
            // Each task logs inside this wave's span, so page events carry the depth
            let task = async move {
                // Held until the task ends; dropping it frees a slot
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };

                match crawl_page(&fetcher, &url, &frontier).await {
                    Ok(found) => {
                        debug!(%url, links = found, "crawled page");
                        true
                    }
                    Err(e) => {
                        warn!(%url, error = %e, "failed to crawl page");
                        false
                    }
                }
            };
            tasks.spawn(task.in_current_span());
        }
        info!(tasks = dispatched.len(), "wave started");

        // Barrier: the wave is over only when every task has returned
        let mut failed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(true) => {}
                Ok(false) => failed += 1,
                Err(e) => {
                    error!(error = %e, "crawl task panicked");
                    failed += 1;
                }
            }
        }

        let discovered = frontier.len();
        info!(fetched = dispatched.len(), failed, discovered, "wave finished");

        WaveReport {
            depth,
            dispatched,
            failed,
            discovered,
        }
    }
}

// Fetch one page and push its links onto the next wave's frontier.
// Returns how many links were queued.
async fn crawl_page(
    fetcher: &Fetcher,
    url: &NormalizedUrl,
    frontier: &Frontier,
) -> Result<usize, FetchError> {
    // The parsed document is dropped at the end of this block, before the
    // task could be suspended again
    let hrefs = {
        let document = fetcher.fetch(url).await?;
        extract_links(&document)
    };

    // Links that fail normalization are dropped without a word
    let links: Vec<NormalizedUrl> = hrefs
        .iter()
        .filter_map(|href| normalize(href, url.as_str()))
        .collect();

    let found = links.len();
    frontier.extend(links);
    Ok(found)
}
