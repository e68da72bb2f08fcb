//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the crawl as a dynamically growing tree of visit tasks:
//! - One task is spawned for the seed, then one per discovered link
//! - Every task runs its own visit state machine (scope, claim, fetch, extract)
//! - A counting admission gate bounds simultaneous fetch + extract sequences
//! - The driver joins tasks and spawns their children until the tree drains

use crate::config::{validate_options, CrawlOptions, UserAgentConfig};
use crate::crawler::fetcher::{FetchError, HttpFetcher, PageFetcher};
use crate::crawler::parser::extract_page_data;
use crate::output::CrawlStatistics;
use crate::state::VisitState;
use crate::storage::{ClaimOutcome, PageRecord, ResultStore};
use crate::url::{normalize_url, CrawlBase};
use crate::CrawlError;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Terminal result of one visit
#[derive(Debug)]
pub enum VisitOutcome {
    /// Out of scope, or the URL could not be normalized
    Rejected,

    /// Already claimed by another visit, or the page budget is exhausted
    Skipped,

    /// Fetch or extraction failed after the key was claimed
    Failed(CrawlError),

    /// Page stored; its outgoing links are ready for dispatch
    Completed { links: Vec<String> },
}

impl VisitOutcome {
    /// The terminal state this outcome represents
    pub fn state(&self) -> VisitState {
        match self {
            Self::Rejected => VisitState::Rejected,
            Self::Skipped => VisitState::Skipped,
            Self::Failed(_) => VisitState::Failed,
            Self::Completed { .. } => VisitState::Completed,
        }
    }
}

/// Everything a crawl produced
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Completed pages keyed by normalized URL
    pub pages: BTreeMap<String, PageRecord>,

    /// Per-state and per-failure tallies for the run
    pub statistics: CrawlStatistics,
}

/// State shared by every visit task of one crawl
struct VisitContext {
    base: CrawlBase,
    store: ResultStore,
    gate: Semaphore,
    fetcher: Arc<dyn PageFetcher>,
    fetch_timeout: Option<Duration>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    seed: String,
    context: Arc<VisitContext>,
}

impl Coordinator {
    /// Creates a coordinator for one crawl
    ///
    /// # Arguments
    ///
    /// * `options` - Seed, concurrency limit, page budget and fetch timeout
    /// * `fetcher` - The capability used to fetch page bodies
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - The options are invalid
    pub fn new(options: CrawlOptions, fetcher: Arc<dyn PageFetcher>) -> Result<Self, CrawlError> {
        validate_options(&options)?;
        let base = CrawlBase::parse(&options.seed)?;

        // The parser lowercases scheme and host, so the raw seed may not match its own prefix
        let seed = if base.in_scope(&options.seed) {
            options.seed
        } else {
            base.prefix().to_string()
        };

        let context = VisitContext {
            base,
            store: ResultStore::new(options.max_pages),
            gate: Semaphore::new(options.max_concurrency),
            fetcher,
            fetch_timeout: options.fetch_timeout,
        };

        Ok(Self {
            seed,
            context: Arc::new(context),
        })
    }

    /// Creates a coordinator that fetches over HTTP
    pub fn with_http(
        options: CrawlOptions,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new(user_agent, options.fetch_timeout)?;
        Self::new(options, Arc::new(fetcher))
    }

    /// Runs the crawl until every spawned visit has reached a terminal state
    ///
    /// The driver owns a `JoinSet`. Each joined `Completed` outcome spawns one
    /// new visit per outgoing link into the same set before the next join, so
    /// the set is empty only once the whole task tree has drained.
    pub async fn run(self) -> CrawlOutcome {
        tracing::info!(
            "Starting crawl of {} (max concurrency {}, max pages {})",
            self.seed,
            self.context.gate.available_permits(),
            self.context.store.max_pages()
        );

        let mut statistics = CrawlStatistics::start();
        let mut tasks: JoinSet<VisitOutcome> = JoinSet::new();
        let start_time = Instant::now();

        self.spawn_visit(&mut tasks, self.seed.clone());

        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Visit task aborted: {}", e);
                    statistics.record_aborted();
                    continue;
                }
            };

            statistics.record(&outcome);

            if let VisitOutcome::Completed { links } = outcome {
                let completed = statistics.count(VisitState::Completed);
                if completed % 10 == 0 {
                    let rate = completed as f64 / start_time.elapsed().as_secs_f64().max(1e-3);
                    tracing::info!(
                        "Progress: {} pages crawled, {} visits pending, {:.2} pages/sec",
                        completed,
                        tasks.len(),
                        rate
                    );
                }

                for link in links {
                    self.spawn_visit(&mut tasks, link);
                }
            }
        }

        statistics.finish();
        let pages = self.context.store.snapshot();

        tracing::info!(
            "Crawl finished: {} pages stored, {} keys claimed, {} never completed",
            pages.len(),
            self.context.store.claimed_count(),
            self.context.store.in_flight_count()
        );

        CrawlOutcome { pages, statistics }
    }

    fn spawn_visit(&self, tasks: &mut JoinSet<VisitOutcome>, url: String) {
        let context = Arc::clone(&self.context);
        tasks.spawn(visit(context, url));
    }
}

/// Tracks one visit through its state machine
struct Visit<'a> {
    url: &'a str,
    state: VisitState,
}

impl<'a> Visit<'a> {
    fn new(url: &'a str) -> Self {
        Self {
            url,
            state: VisitState::Discovered,
        }
    }

    fn advance(&mut self, next: VisitState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid visit transition {} -> {} for {}",
            self.state,
            next,
            self.url
        );
        tracing::trace!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
    }

    fn finish(mut self, outcome: VisitOutcome) -> VisitOutcome {
        debug_assert!(outcome.state().is_terminal());
        self.advance(outcome.state());
        outcome
    }
}

/// Runs one visit from discovery to a terminal state
async fn visit(context: Arc<VisitContext>, url: String) -> VisitOutcome {
    let mut visit = Visit::new(&url);

    if !context.base.in_scope(&url) {
        tracing::debug!("Rejected out-of-scope URL {}", url);
        return visit.finish(VisitOutcome::Rejected);
    }

    let key = match normalize_url(&url) {
        Ok(key) => key,
        Err(e) => {
            tracing::debug!("Rejected {}: {}", url, e);
            return visit.finish(VisitOutcome::Rejected);
        }
    };

    match context.store.try_claim(&key) {
        ClaimOutcome::Claimed => visit.advance(VisitState::Claimed),
        ClaimOutcome::AlreadySeen => {
            tracing::trace!("Skipped {}: already claimed", url);
            return visit.finish(VisitOutcome::Skipped);
        }
        ClaimOutcome::BudgetExhausted => {
            tracing::debug!("Skipped {}: page budget exhausted", url);
            return visit.finish(VisitOutcome::Skipped);
        }
    }

    // Held until this function returns, on every path
    let _permit = match context.gate.acquire().await {
        Ok(permit) => permit,
        Err(_) => {
            return visit.finish(VisitOutcome::Failed(CrawlError::GateClosed { url: url.clone() }));
        }
    };

    visit.advance(VisitState::Fetching);
    tracing::debug!("Fetching {}", url);

    let body = match fetch_with_timeout(&context, &url).await {
        Ok(body) => body,
        Err(source) => {
            tracing::warn!("Failed to fetch {}: {}", url, source);
            return visit.finish(VisitOutcome::Failed(CrawlError::Fetch {
                url: url.clone(),
                source,
            }));
        }
    };

    visit.advance(VisitState::Extracting);

    let record = match extract_page_data(&body, &url, &context.base) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Failed to extract {}: {}", url, e);
            return visit.finish(VisitOutcome::Failed(e));
        }
    };

    let links = record.outgoing_links.clone();
    context.store.complete(&key, record);

    visit.finish(VisitOutcome::Completed { links })
}

async fn fetch_with_timeout(context: &VisitContext, url: &str) -> Result<String, FetchError> {
    match context.fetch_timeout {
        Some(limit) => tokio::time::timeout(limit, context.fetcher.fetch(url))
            .await
            .unwrap_or(Err(FetchError::Timeout(limit))),
        None => context.fetcher.fetch(url).await,
    }
}
