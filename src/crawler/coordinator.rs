//! Crawler coordinator - main crawl orchestration logic
//!
//! A run owns one frontier and one visited set and drives a fixed pool of
//! workers over them. Each worker repeatedly:
//! - takes the next pending URL from the frontier
//! - claims it against the visited set (discarding it if that fails)
//! - extracts it with the run's extractor
//! - emits a record when the page has text
//! - pushes the page's links back onto the frontier
//!
//! The run ends when the frontier drains or the record consumer goes away.

use crate::config::{validate, Config};
use crate::crawler::frontier::{Frontier, VisitedSet};
use crate::crawler::rendered::RenderedExtractor;
use crate::crawler::selector::strategy_for_run;
use crate::crawler::static_extractor::StaticExtractor;
use crate::crawler::types::{ExtractedRecord, Extractor, PageResult, Strategy};
use crate::url::parse_seed;
use crate::CrawlError;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use url::Url;

/// Summary of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub strategy: Strategy,

    /// URLs that passed the visited-set claim
    pub pages_claimed: usize,

    /// Records handed to the consumer
    pub records_emitted: usize,

    /// Claimed pages that produced no text
    pub empty_pages: usize,

    /// Claimed pages whose extraction returned an error
    pub failed_pages: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlStats {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[derive(Debug, Default)]
struct RunCounters {
    claimed: AtomicUsize,
    emitted: AtomicUsize,
    empty: AtomicUsize,
    failed: AtomicUsize,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    seed: Url,
    strategy: Strategy,
    extractor: Arc<dyn Extractor>,
}

impl Coordinator {
    /// Creates a coordinator with the extractor chosen for the seed
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError::Config)` - A setting is out of range
    /// * `Err(CrawlError::InvalidSeed)` - The seed URL is unusable
    /// * `Err(CrawlError::HttpClient)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let seed = resolve_seed(&config)?;
        let strategy = strategy_for_run(&seed, &config.crawler);

        let extractor: Arc<dyn Extractor> = match strategy {
            Strategy::Static => Arc::new(StaticExtractor::new(
                &config.fetch,
                config.focused.clone(),
            )?),
            Strategy::Rendered => Arc::new(RenderedExtractor::new(config.render.clone())),
        };

        Ok(Self {
            config: Arc::new(config),
            seed,
            strategy,
            extractor,
        })
    }

    /// Creates a coordinator that extracts every page with `extractor`
    ///
    /// The strategy is still derived from the seed and reported in the
    /// run statistics.
    pub fn with_extractor(
        config: Config,
        extractor: Arc<dyn Extractor>,
    ) -> Result<Self, CrawlError> {
        let seed = resolve_seed(&config)?;
        let strategy = strategy_for_run(&seed, &config.crawler);

        Ok(Self {
            config: Arc::new(config),
            seed,
            strategy,
            extractor,
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Runs the crawl, sending every extracted record to `sink`
    ///
    /// Per-page failures never end the run. Dropping the receiving side of
    /// `sink` stops the crawl early: pending URLs are discarded and in-flight
    /// pages finish without being emitted.
    pub async fn run(&self, sink: mpsc::Sender<ExtractedRecord>) -> Result<CrawlStats, CrawlError> {
        let started_at = Utc::now();
        let crawler = &self.config.crawler;

        tracing::info!(
            "Starting {} crawl of {} (max {} pages, {} workers, {:?})",
            self.strategy,
            self.seed,
            crawler.max_pages,
            crawler.workers,
            crawler.traversal
        );

        let frontier = Arc::new(Frontier::new(crawler.traversal));
        let visited = Arc::new(VisitedSet::new(crawler.max_pages));
        let counters = Arc::new(RunCounters::default());

        frontier.push(self.seed.clone());

        let mut workers = JoinSet::new();
        for id in 0..crawler.workers {
            let worker = Worker {
                id,
                frontier: Arc::clone(&frontier),
                visited: Arc::clone(&visited),
                extractor: Arc::clone(&self.extractor),
                counters: Arc::clone(&counters),
                sink: sink.clone(),
            };
            workers.spawn(worker.run());
        }
        drop(sink);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                // The dead worker never reported its item done.
                tracing::error!("Crawl worker failed: {}", e);
                frontier.close();
            }
        }

        let stats = CrawlStats {
            strategy: self.strategy,
            pages_claimed: counters.claimed.load(Ordering::Relaxed),
            records_emitted: counters.emitted.load(Ordering::Relaxed),
            empty_pages: counters.empty.load(Ordering::Relaxed),
            failed_pages: counters.failed.load(Ordering::Relaxed),
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl completed: {} pages claimed, {} records emitted in {}ms",
            stats.pages_claimed,
            stats.records_emitted,
            stats.elapsed().num_milliseconds()
        );

        Ok(stats)
    }

    /// Runs the crawl and gathers every record in emission order
    pub async fn collect(&self) -> Result<(Vec<ExtractedRecord>, CrawlStats), CrawlError> {
        let (tx, mut rx) = mpsc::channel(self.config.crawler.workers.max(1));

        let (stats, records) = tokio::join!(self.run(tx), async move {
            let mut records = Vec::new();
            while let Some(record) = rx.recv().await {
                records.push(record);
            }
            records
        });

        Ok((records, stats?))
    }
}

fn resolve_seed(config: &Config) -> Result<Url, CrawlError> {
    validate(config)?;

    let raw = &config.crawler.seed_url;
    parse_seed(raw).map_err(|source| CrawlError::InvalidSeed {
        url: raw.clone(),
        source,
    })
}

struct Worker {
    id: usize,
    frontier: Arc<Frontier>,
    visited: Arc<VisitedSet>,
    extractor: Arc<dyn Extractor>,
    counters: Arc<RunCounters>,
    sink: mpsc::Sender<ExtractedRecord>,
}

impl Worker {
    async fn run(self) {
        tracing::trace!("Worker {} started", self.id);

        while let Some(url) = self.frontier.next().await {
            self.process(url).await;
            self.frontier.done();
        }

        tracing::trace!("Worker {} finished", self.id);
    }

    async fn process(&self, url: Url) {
        if !self.visited.try_claim(&url) {
            if self.visited.is_exhausted() {
                tracing::debug!("Page budget exhausted, discarding {}", url);
                self.frontier.close();
            }
            return;
        }

        let claimed = self.counters.claimed.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!("Worker {} processing {}", self.id, url);

        if claimed % 10 == 0 {
            tracing::info!(
                "Progress: {} pages claimed, {} pending, {} records emitted",
                claimed,
                self.frontier.pending(),
                self.counters.emitted.load(Ordering::Relaxed)
            );
        }

        let page = match self.extractor.extract(&url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("{}", e);
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                PageResult::empty()
            }
        };

        match page.text {
            Some(text) => {
                let record = ExtractedRecord {
                    id: url.to_string(),
                    text,
                };
                if self.sink.send(record).await.is_err() {
                    tracing::warn!("Record consumer closed, stopping crawl");
                    self.frontier.close();
                    return;
                }
                self.counters.emitted.fetch_add(1, Ordering::Relaxed);
            }
            None => {
                tracing::debug!("No text extracted from {}", url);
                self.counters.empty.fetch_add(1, Ordering::Relaxed);
            }
        }

        if !self.visited.is_exhausted() {
            self.frontier.extend(page.links);
        }
    }
}
